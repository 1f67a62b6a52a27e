//! Perturbed orbital motion around a central body.
//!
//! - [`cowell`]: atmospheric drag integrated directly on the state vector.
//! - [`encke`]: J2 deviations from a rectified osculating reference orbit.
//! - [`variational`]: Gauss's variational equations with selectable sources.
//! - [`almanac`]: low-precision Sun and Moon positions plus the shadow test.

pub mod almanac;
pub mod atmosphere;
pub mod cowell;
pub mod encke;
pub mod variational;

use astro_core::SolveError;
use astro_ode::IntegrationError;
use astro_orbits::OrbitError;
use thiserror::Error;

pub use almanac::{SunPosition, moon_position, shadow, sun_position};
pub use cowell::{DragPropagation, cowell_drag};
pub use encke::{EnckeOptions, EnckeSample, encke_j2};
pub use variational::{GaussPropagation, GaussState, PerturbationSet, gauss_variational};

#[derive(Debug, Error)]
pub enum PerturbationError {
    #[error(transparent)]
    Integration(#[from] IntegrationError),
    #[error(transparent)]
    Solve(#[from] SolveError),
    #[error(transparent)]
    Orbit(#[from] OrbitError),
    #[error("invalid perturbation input: {0}")]
    InvalidInput(String),
}

pub(crate) fn check_span(t0: f64, tf: f64) -> Result<(), PerturbationError> {
    if tf < t0 {
        return Err(IntegrationError::InvalidSpan { t0, tf }.into());
    }
    Ok(())
}
