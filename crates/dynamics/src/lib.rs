//! Dynamics beyond the two-body problem: spacecraft relative motion in the
//! LVLH frame, the circular restricted three-body problem, and torque-free
//! rigid-body attitude.

pub mod attitude;
pub mod crtbp;
pub mod relative;

use astro_core::SolveError;
use astro_ode::IntegrationError;
use thiserror::Error;

pub use attitude::{AttitudeKinematics, PrincipalInertia, simulate_attitude};
pub use crtbp::CrtbpParameters;
pub use relative::{RelativeKinematics, RendezvousPlan, StateVector, two_impulse_rendezvous};

#[derive(Debug, Error)]
pub enum DynamicsError {
    #[error(transparent)]
    Integration(#[from] IntegrationError),
    #[error(transparent)]
    Solve(#[from] SolveError),
    #[error("Clohessy-Wiltshire position-velocity block is singular for a transfer time of {time} s")]
    SingularTransition { time: f64 },
    #[error("invalid dynamics input: {0}")]
    InvalidInput(String),
}
