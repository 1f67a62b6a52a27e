//! Orbit utilities: element conversions, regime-aware time laws, universal-variable
//! propagation and two-body integration.

pub mod hyperbola;
pub mod lagrange;
pub mod three_d;
pub mod time;
pub mod two_body;

use astro_core::SolveError;
use astro_ode::IntegrationError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use three_d::{GroundTrack, orbital_elements, perifocal_to_geocentric};
pub use two_body::{HyperbolicParameters, OrbitalParameters, orbital_parameters};

/// Eccentricities within this distance of 0 or 1 select the circular or parabolic regime.
pub const ECCENTRICITY_EPSILON: f64 = 1e-9;

/// Conic section an orbit traces, selected once from its eccentricity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrbitRegime {
    Circular,
    Elliptical,
    Parabolic,
    Hyperbolic,
}

impl OrbitRegime {
    pub fn classify(e: f64) -> Self {
        if e < ECCENTRICITY_EPSILON {
            OrbitRegime::Circular
        } else if (e - 1.0).abs() < ECCENTRICITY_EPSILON {
            OrbitRegime::Parabolic
        } else if e < 1.0 {
            OrbitRegime::Elliptical
        } else {
            OrbitRegime::Hyperbolic
        }
    }

    pub fn is_closed(self) -> bool {
        matches!(self, OrbitRegime::Circular | OrbitRegime::Elliptical)
    }
}

/// Classical orbital elements. Angles in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    /// Specific angular momentum (km²/s).
    pub h: f64,
    pub e: f64,
    pub i: f64,
    pub raan: f64,
    pub arg_periapsis: f64,
    pub true_anomaly: f64,
    /// Semi-major axis (km); negative for hyperbolas, infinite for parabolas.
    pub a: f64,
}

impl OrbitalElements {
    pub fn regime(&self) -> OrbitRegime {
        OrbitRegime::classify(self.e)
    }

    /// Semi-latus rectum, from `h` when available, otherwise from `a` and `e`.
    pub fn semi_latus_rectum(&self, mu: f64) -> f64 {
        if self.h != 0.0 {
            self.h * self.h / mu
        } else {
            self.a * (1.0 - self.e * self.e)
        }
    }

    /// Copy with the angles expressed in degrees, for reporting.
    pub fn to_degrees(&self) -> OrbitalElements {
        OrbitalElements {
            i: self.i.to_degrees(),
            raan: self.raan.to_degrees(),
            arg_periapsis: self.arg_periapsis.to_degrees(),
            true_anomaly: self.true_anomaly.to_degrees(),
            ..*self
        }
    }
}

#[derive(Debug, Error)]
pub enum OrbitError {
    #[error(transparent)]
    Integration(#[from] IntegrationError),
    #[error(transparent)]
    Solve(#[from] SolveError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
