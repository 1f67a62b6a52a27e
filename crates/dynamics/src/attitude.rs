//! Rigid-body attitude: Euler's equations about the principal axes coupled with
//! one of three kinematic parameterisations, and direction-cosine conversions.
//!
//! Quaternions are stored `(q1, q2, q3, q4)` with `q4` the scalar part.

use serde::{Deserialize, Serialize};

use astro_core::angle::wrap_to_2pi;
use astro_core::matrix::Matrix3;
use astro_core::vector::Vector3;
use astro_ode::{Rk45, Tolerances, Trajectory};

use crate::DynamicsError;

/// Principal moments of inertia (kg·m²).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrincipalInertia {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl PrincipalInertia {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    /// Body-rate derivatives under the body-frame torque `m`.
    fn angular_acceleration(&self, w: &[f64], m: &Vector3) -> Vector3 {
        [
            ((self.b - self.c) * w[1] * w[2] + m[0]) / self.a,
            ((self.c - self.a) * w[2] * w[0] + m[1]) / self.b,
            ((self.a - self.b) * w[0] * w[1] + m[2]) / self.c,
        ]
    }
}

/// Attitude parameterisation carried after the body rates in the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttitudeKinematics {
    /// Classical 3-1-3 precession, nutation, spin; singular at zero nutation.
    #[default]
    EulerAngles,
    /// 3-2-1 yaw, pitch, roll; singular at ±90° pitch.
    YawPitchRoll,
    Quaternion,
}

impl AttitudeKinematics {
    /// Length of the state `(ωx, ωy, ωz, attitude...)`.
    pub fn state_len(self) -> usize {
        match self {
            AttitudeKinematics::EulerAngles | AttitudeKinematics::YawPitchRoll => 6,
            AttitudeKinematics::Quaternion => 7,
        }
    }

    fn rates(self, w: &[f64], attitude: &[f64], out: &mut [f64]) {
        let (wx, wy, wz) = (w[0], w[1], w[2]);
        match self {
            AttitudeKinematics::EulerAngles => {
                let (theta, psi) = (attitude[1], attitude[2]);
                let (sp, cp) = psi.sin_cos();
                let across = wx * sp + wy * cp;
                out[0] = across / theta.sin();
                out[1] = wx * cp - wy * sp;
                out[2] = -across / theta.tan() + wz;
            }
            AttitudeKinematics::YawPitchRoll => {
                let (theta, psi) = (attitude[1], attitude[2]);
                let (sp, cp) = psi.sin_cos();
                out[0] = (wy * sp + wz * cp) / theta.cos();
                out[1] = wy * cp - wz * sp;
                out[2] = wx + (wy * sp + wz * cp) * theta.tan();
            }
            AttitudeKinematics::Quaternion => {
                let q = attitude;
                out[0] = 0.5 * (wz * q[1] - wy * q[2] + wx * q[3]);
                out[1] = 0.5 * (-wz * q[0] + wx * q[2] + wy * q[3]);
                out[2] = 0.5 * (wy * q[0] - wx * q[1] + wz * q[3]);
                out[3] = 0.5 * (-wx * q[0] - wy * q[1] - wz * q[2]);
            }
        }
    }
}

/// Integrates the attitude state `(ω, attitude)` under a constant body torque (N·m).
pub fn simulate_attitude(
    inertia: &PrincipalInertia,
    kinematics: AttitudeKinematics,
    torque: Vector3,
    y0: &[f64],
    t0: f64,
    tf: f64,
) -> Result<Trajectory, DynamicsError> {
    if y0.len() != kinematics.state_len() {
        return Err(DynamicsError::InvalidInput(format!(
            "{kinematics:?} attitude state has {} components, got {}",
            kinematics.state_len(),
            y0.len()
        )));
    }
    if inertia.a <= 0.0 || inertia.b <= 0.0 || inertia.c <= 0.0 {
        return Err(DynamicsError::InvalidInput(format!(
            "principal moments must be positive, got {inertia:?}"
        )));
    }
    let rhs = |_t: f64, y: &[f64], dydt: &mut [f64]| {
        let (w, attitude) = y.split_at(3);
        let (dw, dattitude) = dydt.split_at_mut(3);
        dw.copy_from_slice(&inertia.angular_acceleration(w, &torque));
        kinematics.rates(w, attitude, dattitude);
    };
    Ok(Rk45::new(Tolerances::new(1e-8, 1e-8)).integrate(&rhs, t0, y0, tf)?)
}

/// Direction cosine matrix of the 3-1-3 sequence (precession φ, nutation θ, spin ψ).
pub fn dcm_from_euler_angles(phi: f64, theta: f64, psi: f64) -> Matrix3 {
    let (sf, cf) = phi.sin_cos();
    let (st, ct) = theta.sin_cos();
    let (sp, cp) = psi.sin_cos();
    [
        [-sf * ct * sp + cf * cp, cf * ct * sp + sf * cp, st * sp],
        [-sf * ct * cp - cf * sp, cf * ct * cp - sf * sp, st * cp],
        [sf * st, -cf * st, ct],
    ]
}

/// Precession and spin in [0, 2π), nutation in [0, π].
pub fn euler_angles_from_dcm(q: &Matrix3) -> Vector3 {
    [
        wrap_to_2pi(q[2][0].atan2(-q[2][1])),
        q[2][2].clamp(-1.0, 1.0).acos(),
        wrap_to_2pi(q[0][2].atan2(q[1][2])),
    ]
}

/// Direction cosine matrix of the 3-2-1 sequence (yaw φ, pitch θ, roll ψ).
pub fn dcm_from_yaw_pitch_roll(phi: f64, theta: f64, psi: f64) -> Matrix3 {
    let (sf, cf) = phi.sin_cos();
    let (st, ct) = theta.sin_cos();
    let (sp, cp) = psi.sin_cos();
    [
        [cf * ct, sf * ct, -st],
        [cf * st * sp - sf * cp, sf * st * sp + cf * cp, ct * sp],
        [cf * st * cp + sf * sp, sf * st * cp - cf * sp, ct * cp],
    ]
}

/// Yaw and roll in [0, 2π), pitch in [−π/2, π/2].
pub fn yaw_pitch_roll_from_dcm(q: &Matrix3) -> Vector3 {
    [
        wrap_to_2pi(q[0][1].atan2(q[0][0])),
        (-q[0][2]).clamp(-1.0, 1.0).asin(),
        wrap_to_2pi(q[1][2].atan2(q[2][2])),
    ]
}

pub fn dcm_from_quaternion(q: &[f64; 4]) -> Matrix3 {
    let [q1, q2, q3, q4] = *q;
    [
        [
            q1 * q1 - q2 * q2 - q3 * q3 + q4 * q4,
            2.0 * (q1 * q2 + q3 * q4),
            2.0 * (q1 * q3 - q2 * q4),
        ],
        [
            2.0 * (q1 * q2 - q3 * q4),
            -q1 * q1 + q2 * q2 - q3 * q3 + q4 * q4,
            2.0 * (q2 * q3 + q1 * q4),
        ],
        [
            2.0 * (q1 * q3 + q2 * q4),
            2.0 * (q2 * q3 - q1 * q4),
            -q1 * q1 - q2 * q2 + q3 * q3 + q4 * q4,
        ],
    ]
}

/// Unit quaternion of a rotation matrix by Shepperd's method, scalar part
/// non-negative.
pub fn quaternion_from_dcm(q: &Matrix3) -> [f64; 4] {
    let trace = q[0][0] + q[1][1] + q[2][2];
    // 4·q_k² for each component; the largest one is extracted first.
    let squares = [
        1.0 + 2.0 * q[0][0] - trace,
        1.0 + 2.0 * q[1][1] - trace,
        1.0 + 2.0 * q[2][2] - trace,
        1.0 + trace,
    ];
    let (k, largest) = squares
        .iter()
        .copied()
        .enumerate()
        .fold((3, f64::MIN), |best, (i, s)| if s > best.1 { (i, s) } else { best });
    let d = 2.0 * largest.max(0.0).sqrt();

    let (q23, q32) = (q[1][2], q[2][1]);
    let (q31, q13) = (q[2][0], q[0][2]);
    let (q12, q21) = (q[0][1], q[1][0]);
    let mut out = match k {
        0 => [0.25 * d, (q12 + q21) / d, (q13 + q31) / d, (q23 - q32) / d],
        1 => [(q12 + q21) / d, 0.25 * d, (q23 + q32) / d, (q31 - q13) / d],
        2 => [(q13 + q31) / d, (q23 + q32) / d, 0.25 * d, (q12 - q21) / d],
        _ => [(q23 - q32) / d, (q31 - q13) / d, (q12 - q21) / d, 0.25 * d],
    };
    let n = out.iter().map(|x| x * x).sum::<f64>().sqrt();
    let sign = if out[3] < 0.0 { -1.0 } else { 1.0 };
    out.iter_mut().for_each(|x| *x *= sign / n);
    out
}
