//! Lambert's problem with the universal-variable formulation.

use std::f64::consts::PI;

use astro_core::PhysicalContext;
use astro_core::solve::{self, NewtonOptions};
use astro_core::vector::{self, Vector3};
use astro_orbits::lagrange::{stumpff_c, stumpff_s};
use astro_orbits::{OrbitalElements, orbital_elements};
use serde::{Deserialize, Serialize};

use crate::DeterminationError;

const BRACKET_START: f64 = -4.0;
const BRACKET_STEP: f64 = 0.1;
const BRACKET_END: f64 = 4.0 * PI * PI;
const FALLBACK_SEED: f64 = 1.5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrbitDirection {
    #[default]
    Prograde,
    Retrograde,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LambertSolution {
    pub v1: Vector3,
    pub v2: Vector3,
    /// Elements of the transfer orbit at departure.
    pub elements: OrbitalElements,
    /// True anomaly at arrival (rad).
    pub arrival_true_anomaly: f64,
}

struct LambertGeometry {
    r1: f64,
    r2: f64,
    a: f64,
    sqrt_mu_dt: f64,
}

impl LambertGeometry {
    fn y(&self, z: f64) -> f64 {
        self.r1 + self.r2 + self.a * (z * stumpff_s(z) - 1.0) / stumpff_c(z).sqrt()
    }

    fn f(&self, z: f64) -> f64 {
        let y = self.y(z);
        let (s, c) = (stumpff_s(z), stumpff_c(z));
        (y / c).powf(1.5) * s + self.a * y.sqrt() - self.sqrt_mu_dt
    }

    fn df(&self, z: f64) -> f64 {
        let a = self.a;
        if z.abs() < 1e-8 {
            let y0 = self.y(0.0);
            return 2f64.sqrt() / 40.0 * y0.powf(1.5) + a / 8.0 * (y0.sqrt() + a / (2.0 * y0).sqrt());
        }
        let y = self.y(z);
        let (s, c) = (stumpff_s(z), stumpff_c(z));
        (y / c).powf(1.5) * (1.0 / (2.0 * z) * (c - 1.5 * s / c) + 0.75 * s * s / c)
            + a / 8.0 * (3.0 * s / c * y.sqrt() + a * (c / y).sqrt())
    }

    /// First z at which the time equation turns non-negative, walking up from −4.
    fn bracket(&self) -> Option<f64> {
        let mut z = BRACKET_START;
        while z <= BRACKET_END {
            let value = self.f(z);
            if value.is_finite() && value >= 0.0 {
                return Some(z);
            }
            z += BRACKET_STEP;
        }
        None
    }
}

/// Transfer-orbit velocities connecting `r1` and `r2` in `dt` seconds.
pub fn solve_lambert(
    ctx: &PhysicalContext,
    r1: &Vector3,
    r2: &Vector3,
    dt: f64,
    direction: OrbitDirection,
) -> Result<LambertSolution, DeterminationError> {
    let r1_m = vector::norm(r1);
    let r2_m = vector::norm(r2);
    let swept = (vector::dot(r1, r2) / (r1_m * r2_m)).clamp(-1.0, 1.0).acos();
    let positive_normal = vector::cross(r1, r2)[2] >= 0.0;
    let dtheta = match (direction, positive_normal) {
        (OrbitDirection::Prograde, true) | (OrbitDirection::Retrograde, false) => swept,
        _ => 2.0 * PI - swept,
    };
    if (1.0 - dtheta.cos()).abs() < 1e-12 {
        return Err(DeterminationError::DegenerateTransfer(dtheta));
    }

    let geometry = LambertGeometry {
        r1: r1_m,
        r2: r2_m,
        a: dtheta.sin() * (r1_m * r2_m / (1.0 - dtheta.cos())).sqrt(),
        sqrt_mu_dt: ctx.mu.sqrt() * dt,
    };

    let seed = geometry.bracket().unwrap_or(FALLBACK_SEED);
    let z = solve::newton(
        |z| geometry.f(z),
        |z| geometry.df(z),
        seed,
        NewtonOptions::default().with_tolerance(1e-12).with_max_iterations(200),
    )?;
    log::debug!("lambert converged to z = {z} from seed {seed}");

    let y = geometry.y(z);
    let f = 1.0 - y / r1_m;
    let g = geometry.a * (y / ctx.mu).sqrt();
    let g_dot = 1.0 - y / r2_m;

    let v1 = vector::scale(&vector::sub(r2, &vector::scale(r1, f)), 1.0 / g);
    let v2 = vector::scale(&vector::sub(&vector::scale(r2, g_dot), r1), 1.0 / g);

    Ok(LambertSolution {
        v1,
        v2,
        elements: orbital_elements(ctx, r1, &v1),
        arrival_true_anomaly: orbital_elements(ctx, r2, &v2).true_anomaly,
    })
}
