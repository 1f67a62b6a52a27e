//! Circular restricted three-body problem in the frame co-rotating with the
//! primaries, origin at their barycentre and the secondary on the +x axis.

use serde::Serialize;

use astro_core::constants::GRAVITATIONAL_CONSTANT;
use astro_core::solve::newton;
use astro_core::vector::Vector3;
use astro_core::{CelestialBody, NewtonOptions};
use astro_ode::{Rk45, Tolerances, Trajectory};

use crate::DynamicsError;

/// Seeds of the collinear points L1, L2, L3 in units of the separation.
const COLLINEAR_SEEDS: [f64; 3] = [0.8369, 1.156, -1.005];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CrtbpParameters {
    /// Angular velocity of the rotating frame (rad/s).
    pub omega: f64,
    pub pi_1: f64,
    pub pi_2: f64,
    pub mu_1: f64,
    pub mu_2: f64,
    /// Primary and secondary positions on the x axis (km).
    pub x_1: f64,
    pub x_2: f64,
    pub separation: f64,
    /// Equilibrium points L1 to L5 (km).
    pub lagrange: [Vector3; 5],
}

impl CrtbpParameters {
    /// Parameters of a pair of bodies with masses in kg, `separation` km apart.
    pub fn from_masses(m_1: f64, m_2: f64, separation: f64) -> Result<Self, DynamicsError> {
        if m_1 <= 0.0 || m_2 <= 0.0 || separation <= 0.0 {
            return Err(DynamicsError::InvalidInput(format!(
                "masses and separation must be positive, got {m_1} kg, {m_2} kg, {separation} km"
            )));
        }
        let mu = GRAVITATIONAL_CONSTANT * (m_1 + m_2);
        let pi_1 = m_1 / (m_1 + m_2);
        let pi_2 = m_2 / (m_1 + m_2);

        let f = |xi: f64| {
            let s1 = xi + pi_2;
            let s2 = xi + pi_2 - 1.0;
            (1.0 - pi_2) * s1 / s1.abs().powi(3) + pi_2 * s2 / s2.abs().powi(3) - xi
        };
        let df = |xi: f64| {
            let s1 = (xi + pi_2).abs();
            let s2 = (xi + pi_2 - 1.0).abs();
            -2.0 * (1.0 - pi_2) / s1.powi(3) - 2.0 * pi_2 / s2.powi(3) - 1.0
        };
        let options = NewtonOptions::default().with_tolerance(1e-12);
        let mut collinear = [0.0; 3];
        for (xi, seed) in collinear.iter_mut().zip(COLLINEAR_SEEDS) {
            *xi = newton(f, df, seed, options)?;
        }

        let x_triangle = (0.5 - pi_2) * separation;
        let y_triangle = 3.0_f64.sqrt() / 2.0 * separation;
        let lagrange = [
            [collinear[0] * separation, 0.0, 0.0],
            [collinear[1] * separation, 0.0, 0.0],
            [collinear[2] * separation, 0.0, 0.0],
            [x_triangle, y_triangle, 0.0],
            [x_triangle, -y_triangle, 0.0],
        ];

        Ok(Self {
            omega: (mu / separation.powi(3)).sqrt(),
            pi_1,
            pi_2,
            mu_1: mu * pi_1,
            mu_2: mu * pi_2,
            x_1: -pi_2 * separation,
            x_2: pi_1 * separation,
            separation,
            lagrange,
        })
    }

    /// Distances from `(x, y, z)` to the primary and the secondary.
    fn distances(&self, x: f64, y: f64, z: f64) -> (f64, f64) {
        let r_1 = ((x - self.x_1).powi(2) + y * y + z * z).sqrt();
        let r_2 = ((x - self.x_2).powi(2) + y * y + z * z).sqrt();
        (r_1, r_2)
    }

    fn derivative(&self, y: &[f64], dydt: &mut [f64]) {
        let (x, yy, z) = (y[0], y[1], y[2]);
        let (vx, vy) = (y[3], y[4]);
        let (r_1, r_2) = self.distances(x, yy, z);
        let (k_1, k_2) = (self.mu_1 / r_1.powi(3), self.mu_2 / r_2.powi(3));
        let w = self.omega;

        dydt[0] = vx;
        dydt[1] = vy;
        dydt[2] = y[5];
        dydt[3] = 2.0 * w * vy + w * w * x - k_1 * (x - self.x_1) - k_2 * (x - self.x_2);
        dydt[4] = -2.0 * w * vx + w * w * yy - k_1 * yy - k_2 * yy;
        dydt[5] = -k_1 * z - k_2 * z;
    }

    /// Jacobi constant `Ω²(x²+y²) + 2μ₁/r₁ + 2μ₂/r₂ − v²` of a rotating-frame state.
    pub fn jacobi_constant(&self, y: &[f64]) -> f64 {
        let (r_1, r_2) = self.distances(y[0], y[1], y[2]);
        let v2 = y[3] * y[3] + y[4] * y[4] + y[5] * y[5];
        self.omega.powi(2) * (y[0] * y[0] + y[1] * y[1]) + 2.0 * self.mu_1 / r_1 + 2.0 * self.mu_2 / r_2 - v2
    }
}

/// Parameters of `secondary` orbiting `primary`; the separation defaults to
/// the secondary's semi-major axis.
pub fn parameters(
    primary: CelestialBody,
    secondary: CelestialBody,
    separation: Option<f64>,
) -> Result<CrtbpParameters, DynamicsError> {
    let separation = separation.unwrap_or_else(|| secondary.semi_major_axis());
    CrtbpParameters::from_masses(primary.mass(), secondary.mass(), separation)
}

/// Integrates a rotating-frame state `(x, y, z, vx, vy, vz)` from `t0` to `tf`.
pub fn simulate(params: &CrtbpParameters, y0: &[f64; 6], t0: f64, tf: f64) -> Result<Trajectory, DynamicsError> {
    let rhs = |_t: f64, y: &[f64], dydt: &mut [f64]| params.derivative(y, dydt);
    Ok(Rk45::new(Tolerances::new(1e-8, 1e-8)).integrate(&rhs, t0, y0, tf)?)
}
