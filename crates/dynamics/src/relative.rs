//! Chaser motion relative to a target in the target's LVLH frame: `x` radial,
//! `y` along-track, `z` along the target's orbital angular momentum.

use serde::{Deserialize, Serialize};

use astro_core::PhysicalContext;
use astro_core::matrix::{self, Matrix3};
use astro_core::vector::{Vector3, add, cross, dot, norm, scale, sub, unit};
use astro_ode::{Rk45, Tolerances, Trajectory};

use crate::DynamicsError;

/// Inertial position (km) and velocity (km/s).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StateVector {
    pub r: Vector3,
    pub v: Vector3,
}

impl StateVector {
    pub fn new(r: Vector3, v: Vector3) -> Self {
        Self { r, v }
    }
}

/// Chaser position, velocity and acceleration relative to the target, with the
/// frame's angular velocity, all expressed in LVLH components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RelativeKinematics {
    pub r: Vector3,
    pub v: Vector3,
    pub a: Vector3,
    pub omega: Vector3,
}

/// Rows are the LVLH unit vectors in inertial components.
fn lvlh_frame(target: &StateVector) -> Result<(Matrix3, Vector3), DynamicsError> {
    let h = cross(&target.r, &target.v);
    let r = norm(&target.r);
    if r == 0.0 || norm(&h) == 0.0 {
        return Err(DynamicsError::InvalidInput(
            "target state has no orbital plane (zero radius or angular momentum)".into(),
        ));
    }
    let i = unit(&target.r);
    let k = unit(&h);
    let j = cross(&k, &i);
    Ok(([i, j, k], scale(&h, 1.0 / (r * r))))
}

/// Relative kinematics of `chaser` seen from `target` (Curtis algorithm 7.1).
pub fn kinematics_lvlh(
    ctx: &PhysicalContext,
    target: &StateVector,
    chaser: &StateVector,
) -> Result<RelativeKinematics, DynamicsError> {
    let (q, omega) = lvlh_frame(target)?;
    let r_t = norm(&target.r);
    let omega_dot = scale(&omega, -2.0 * dot(&target.v, &target.r) / (r_t * r_t));

    let a_t = scale(&target.r, -ctx.mu / r_t.powi(3));
    let a_c = scale(&chaser.r, -ctx.mu / norm(&chaser.r).powi(3));

    let r_rel = sub(&chaser.r, &target.r);
    let v_rel = sub(&sub(&chaser.v, &target.v), &cross(&omega, &r_rel));
    let a_rel = [
        sub(&a_c, &a_t),
        scale(&cross(&omega_dot, &r_rel), -1.0),
        scale(&cross(&omega, &cross(&omega, &r_rel)), -1.0),
        scale(&cross(&omega, &v_rel), -2.0),
    ]
    .iter()
    .fold([0.0; 3], |acc, term| add(&acc, term));

    Ok(RelativeKinematics {
        r: matrix::mul_vec(&q, &r_rel),
        v: matrix::mul_vec(&q, &v_rel),
        a: matrix::mul_vec(&q, &a_rel),
        omega: matrix::mul_vec(&q, &omega),
    })
}

/// Inertial state of a chaser placed at `r_rel`, `v_rel` in the target's LVLH frame.
pub fn kinematics_geocentric(
    target: &StateVector,
    r_rel: &Vector3,
    v_rel: &Vector3,
) -> Result<StateVector, DynamicsError> {
    let (q, omega) = lvlh_frame(target)?;
    let qt = matrix::transpose(&q);
    let r_rel_inertial = matrix::mul_vec(&qt, r_rel);
    let v_rel_inertial = matrix::mul_vec(&qt, v_rel);
    Ok(StateVector {
        r: add(&target.r, &r_rel_inertial),
        v: add(&add(&target.v, &v_rel_inertial), &cross(&omega, &r_rel_inertial)),
    })
}

fn linearized_derivative(mu: f64, y: &[f64], dydt: &mut [f64]) {
    let (dx, dy, dz) = (y[0], y[1], y[2]);
    let (dvx, dvy) = (y[3], y[4]);
    let r = [y[6], y[7], y[8]];
    let v = [y[9], y[10], y[11]];
    let rn = norm(&r);
    let h = norm(&cross(&r, &v));
    let vr = dot(&r, &v);
    let (r2, r3, r4) = (rn * rn, rn.powi(3), rn.powi(4));

    dydt[0] = dvx;
    dydt[1] = dvy;
    dydt[2] = y[5];
    dydt[3] = (2.0 * mu / r3 + h * h / r4) * dx - 2.0 * vr * h / r4 * dy + 2.0 * h / r2 * dvy;
    dydt[4] = (h * h / r4 - mu / r3) * dy + 2.0 * vr * h / r4 * dx - 2.0 * h / r2 * dvx;
    dydt[5] = -mu / r3 * dz;
    dydt[6] = v[0];
    dydt[7] = v[1];
    dydt[8] = v[2];
    dydt[9] = -mu / r3 * r[0];
    dydt[10] = -mu / r3 * r[1];
    dydt[11] = -mu / r3 * r[2];
}

/// Integrates the linearised relative equations alongside the target's
/// two-body motion. The state is `(δr, δv)` in LVLH followed by the target's
/// inertial `(r, v)`.
pub fn simulate_linearized(
    ctx: &PhysicalContext,
    y0: &[f64; 12],
    t0: f64,
    tf: f64,
) -> Result<Trajectory, DynamicsError> {
    let mu = ctx.mu;
    let rhs = |_t: f64, y: &[f64], dydt: &mut [f64]| linearized_derivative(mu, y, dydt);
    let trajectory = Rk45::new(Tolerances::new(1e-8, 1e-8)).integrate(&rhs, t0, y0, tf)?;
    log::debug!("linearised relative motion: {} samples", trajectory.len());
    Ok(trajectory)
}

/// Clohessy–Wiltshire state transition blocks `Φ_rr`, `Φ_rv`, `Φ_vr`, `Φ_vv`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CwMatrices {
    pub rr: Matrix3,
    pub rv: Matrix3,
    pub vr: Matrix3,
    pub vv: Matrix3,
}

/// Transition blocks after `t` seconds about a circular orbit of mean motion `n`.
pub fn clohessy_wiltshire_matrices(n: f64, t: f64) -> CwMatrices {
    let nt = n * t;
    let (s, c) = nt.sin_cos();
    CwMatrices {
        rr: [[4.0 - 3.0 * c, 0.0, 0.0], [6.0 * (s - nt), 1.0, 0.0], [0.0, 0.0, c]],
        rv: [
            [s / n, 2.0 / n * (1.0 - c), 0.0],
            [2.0 / n * (c - 1.0), (4.0 * s - 3.0 * nt) / n, 0.0],
            [0.0, 0.0, s / n],
        ],
        vr: [[3.0 * n * s, 0.0, 0.0], [6.0 * n * (c - 1.0), 0.0, 0.0], [0.0, 0.0, -n * s]],
        vv: [[c, 2.0 * s, 0.0], [-2.0 * s, 4.0 * c - 3.0, 0.0], [0.0, 0.0, c]],
    }
}

/// Relative position and velocity after `t` seconds from `dr0`, `dv0`.
pub fn clohessy_wiltshire(dr0: &Vector3, dv0: &Vector3, n: f64, t: f64) -> (Vector3, Vector3) {
    let phi = clohessy_wiltshire_matrices(n, t);
    let dr = add(&matrix::mul_vec(&phi.rr, dr0), &matrix::mul_vec(&phi.rv, dv0));
    let dv = add(&matrix::mul_vec(&phi.vr, dr0), &matrix::mul_vec(&phi.vv, dv0));
    (dr, dv)
}

/// Two-impulse rendezvous computed with the Clohessy–Wiltshire equations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RendezvousPlan {
    /// Initial relative position (LVLH, km).
    pub dr0: Vector3,
    /// Relative velocity before and after the first impulse (km/s).
    pub dv0_minus: Vector3,
    pub dv0_plus: Vector3,
    /// Relative velocity on arrival, cancelled by the second impulse (km/s).
    pub dvf_minus: Vector3,
    pub departure_dv: f64,
    pub arrival_dv: f64,
    pub total_dv: f64,
    pub mean_motion: f64,
}

/// Plans a rendezvous of `chaser` with `target` after `tf` seconds.
pub fn two_impulse_rendezvous(
    ctx: &PhysicalContext,
    target: &StateVector,
    chaser: &StateVector,
    tf: f64,
) -> Result<RendezvousPlan, DynamicsError> {
    if tf <= 0.0 {
        return Err(DynamicsError::InvalidInput(format!(
            "rendezvous time must be positive, got {tf} s"
        )));
    }
    let kinematics = kinematics_lvlh(ctx, target, chaser)?;
    let n = norm(&kinematics.omega);
    let phi = clohessy_wiltshire_matrices(n, tf);
    let rv_inverse = matrix::inverse(&phi.rv).ok_or(DynamicsError::SingularTransition { time: tf })?;

    let dr0 = kinematics.r;
    let dv0_minus = kinematics.v;
    let dv0_plus = scale(&matrix::mul_vec(&matrix::mul(&rv_inverse, &phi.rr), &dr0), -1.0);
    let (_, dvf_minus) = clohessy_wiltshire(&dr0, &dv0_plus, n, tf);

    let departure_dv = norm(&sub(&dv0_plus, &dv0_minus));
    let arrival_dv = norm(&dvf_minus);
    log::debug!("rendezvous in {tf:.0} s: Δv = {departure_dv:.6} + {arrival_dv:.6} km/s");

    Ok(RendezvousPlan {
        dr0,
        dv0_minus,
        dv0_plus,
        dvf_minus,
        departure_dv,
        arrival_dv,
        total_dv: departure_dv + arrival_dv,
        mean_motion: n,
    })
}
