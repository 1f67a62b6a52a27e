//! Impulsive manoeuvre planning: every manoeuvre reports the velocity change,
//! elapsed time, propellant spent, and the resulting orbit.

pub mod apse;
pub mod chase;
pub mod plane;
pub mod transfers;

use std::f64::consts::PI;

use astro_core::constants::{DEFAULT_ISP_S, G0_KM};
use astro_core::{PhysicalContext, SolveError};
use astro_determination::DeterminationError;
use astro_orbits::OrbitalElements;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use apse::{ApseRotation, IntersectionPoint};
pub use chase::ChaseResult;
pub use transfers::HohmannDirection;

#[derive(Debug, Error)]
pub enum ManeuverError {
    #[error(transparent)]
    Solve(#[from] SolveError),
    #[error(transparent)]
    Determination(#[from] DeterminationError),
    #[error("invalid manoeuvre input: {0}")]
    InvalidInput(String),
}

/// Outcome of one manoeuvre.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ManeuverResult {
    /// Total velocity change (km/s).
    pub dv: f64,
    /// Elapsed time (s).
    pub dt: f64,
    /// Propellant consumed (kg).
    pub dm: f64,
    /// Orbit after (or during) the manoeuvre; fields the manoeuvre does not define stay zero.
    pub elements: OrbitalElements,
}

/// Engine characteristics used for propellant accounting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Propulsion {
    pub isp_s: f64,
}

impl Default for Propulsion {
    fn default() -> Self {
        Self { isp_s: DEFAULT_ISP_S }
    }
}

impl Propulsion {
    pub fn new(isp_s: f64) -> Self {
        Self { isp_s }
    }

    /// Propellant burnt by a spacecraft of mass `m` for a velocity change `dv`.
    pub fn propellant_mass(&self, m: f64, dv: f64) -> f64 {
        propellant_mass(m, dv, self.isp_s)
    }

    /// Propellant for consecutive impulses, each burn starting from the mass the
    /// previous one left.
    pub fn chained_propellant(&self, m: f64, impulses: &[f64]) -> f64 {
        impulses
            .iter()
            .fold(0.0, |spent, dv| spent + self.propellant_mass(m - spent, *dv))
    }
}

/// Tsiolkovsky: m (1 − exp(−Δv / (Isp g0))).
///
/// Always below `m` mathematically, but once Δv exceeds roughly 37 exhaust
/// velocities the exponential underflows the f64 mantissa and the result
/// rounds to exactly `m`.
pub fn propellant_mass(m: f64, dv: f64, isp_s: f64) -> f64 {
    m * (1.0 - (-dv / (isp_s * G0_KM)).exp())
}

/// Coplanar ellipse described by its apse radii (km).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApseOrbit {
    pub r_p: f64,
    pub r_a: f64,
}

impl ApseOrbit {
    pub fn new(r_p: f64, r_a: f64) -> Self {
        Self { r_p, r_a }
    }

    pub fn circular(r: f64) -> Self {
        Self { r_p: r, r_a: r }
    }

    pub fn eccentricity(&self) -> f64 {
        (self.r_a - self.r_p) / (self.r_a + self.r_p)
    }

    pub fn semi_major_axis(&self) -> f64 {
        0.5 * (self.r_p + self.r_a)
    }

    pub fn angular_momentum(&self, mu: f64) -> f64 {
        (2.0 * mu).sqrt() * (self.r_a * self.r_p / (self.r_a + self.r_p)).sqrt()
    }

    pub fn period(&self, mu: f64) -> f64 {
        2.0 * PI / mu.sqrt() * self.semi_major_axis().powf(1.5)
    }

    pub fn radius_at(&self, mu: f64, theta: f64) -> f64 {
        let h = self.angular_momentum(mu);
        h * h / mu / (1.0 + self.eccentricity() * theta.cos())
    }

    /// Radial and transverse velocity components at true anomaly `theta`.
    pub fn velocity_components(&self, mu: f64, theta: f64) -> (f64, f64) {
        let h = self.angular_momentum(mu);
        (mu / h * self.eccentricity() * theta.sin(), h / self.radius_at(mu, theta))
    }

    /// In-plane elements at true anomaly `theta` (orientation angles zero).
    pub fn elements(&self, mu: f64, theta: f64) -> OrbitalElements {
        OrbitalElements {
            h: self.angular_momentum(mu),
            e: self.eccentricity(),
            true_anomaly: theta,
            a: self.semi_major_axis(),
            ..OrbitalElements::default()
        }
    }
}

/// Manoeuvre calculator bound to a central body and an engine.
#[derive(Debug, Clone)]
pub struct ManeuverPlanner<'a> {
    pub ctx: &'a PhysicalContext,
    pub propulsion: Propulsion,
}

impl<'a> ManeuverPlanner<'a> {
    pub fn new(ctx: &'a PhysicalContext) -> Self {
        Self {
            ctx,
            propulsion: Propulsion::default(),
        }
    }

    pub fn with_isp(mut self, isp_s: f64) -> Self {
        self.propulsion = Propulsion::new(isp_s);
        self
    }

    fn mu(&self) -> f64 {
        self.ctx.mu
    }
}

/// Magnitude of the impulse joining two velocities given by speed and flight-path angle.
pub(crate) fn impulse_between(v1: f64, gamma1: f64, v2: f64, gamma2: f64) -> f64 {
    (v1 * v1 + v2 * v2 - 2.0 * v1 * v2 * (gamma2 - gamma1).cos()).sqrt()
}
