//! Planar atmospheric entry with state `(V, γ, r, x, m)`: speed (km/s),
//! flight-path angle (rad), radius (km), downrange distance (km), mass (kg).

mod capsule;
mod simulate;

use astro_ode::IntegrationError;
use thiserror::Error;

pub use capsule::{Capsule, EntryAtmosphere, Parachute, ParachuteState};
pub use simulate::{EntryResult, simulate_entry};

#[derive(Debug, Error)]
pub enum EntryError {
    #[error(transparent)]
    Integration(#[from] IntegrationError),
    #[error("invalid entry input: {0}")]
    InvalidInput(String),
}
