//! Patched-conic interplanetary mission design around the Sun.
//!
//! - [`phasing`]: synodic period and the wait time at the target planet.
//! - [`hyperbola`]: departure, rendezvous and flyby hyperbolas for Hohmann legs.
//! - [`ephemeris`]: planetary state vectors from J2000 mean elements.
//! - [`transfer`]: Lambert-based two-impulse transfers between dated ephemerides.
//! - [`porkchop`]: transfer cost grids over departure and arrival windows.

pub mod ephemeris;
pub mod hyperbola;
pub mod phasing;
pub mod porkchop;
pub mod transfer;

use astro_core::SolveError;
use astro_determination::{CalendarError, DeterminationError};
use thiserror::Error;

pub use ephemeris::{PlanetState, ephemeris, ephemeris_at};
pub use hyperbola::{FlybyResult, FlybySide, HohmannLeg, departure, flyby, rendezvous};
pub use phasing::{WaitTime, synodic_period, wait_time};
pub use porkchop::{DateWindow, PorkchopGrid, PorkchopPoint, PorkchopRequest, porkchop};
pub use transfer::{TransferPlan, TransferRequest, optimal_transfer};

#[derive(Debug, Error)]
pub enum InterplanetaryError {
    #[error(transparent)]
    Solve(#[from] SolveError),
    #[error(transparent)]
    Determination(#[from] DeterminationError),
    #[error(transparent)]
    Calendar(#[from] CalendarError),
    #[error("invalid interplanetary input: {0}")]
    InvalidInput(String),
}
