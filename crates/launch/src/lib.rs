//! Launch vehicles: stage mass and motor models, the 7-state powered ascent
//! `(V, γ, r, x, m, ΔV_drag, ΔV_gravity)`, and stage sizing for a target
//! burnout velocity.

mod launcher;
mod stage;
mod staging;

use astro_core::SolveError;
use astro_ode::IntegrationError;
use thiserror::Error;

pub use launcher::{LaunchResult, Launcher, simulate_ascent};
pub use stage::Stage;
pub use staging::{
    StagingRequest, single_stage_to_orbit, stage_vehicle_to_orbit, three_stage_to_orbit, two_stage_to_orbit,
};

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error(transparent)]
    Integration(#[from] IntegrationError),
    #[error(transparent)]
    Solve(#[from] SolveError),
    #[error("{field} lists {actual} values for a {expected}-stage vehicle")]
    StageCountMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("stage {stage} cannot be sized: {reason}")]
    InfeasibleStaging { stage: usize, reason: String },
    #[error("invalid launch input: {0}")]
    InvalidInput(String),
}
