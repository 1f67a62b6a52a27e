//! Inverse problems: orbits from positions, from a transfer time, or from
//! optical observations, plus the calendar and site-frame helpers they need.

pub mod calendar;
pub mod gauss;
pub mod gibbs;
pub mod lambert;
pub mod topocentric;

use astro_core::SolveError;
use thiserror::Error;

pub use calendar::{CalendarError, julian_day, julian_day_of, julian_day_to_date, local_sidereal_time};
pub use gauss::{GaussObservation, GaussSolution, gauss, gauss_extended};
pub use gibbs::gibbs;
pub use lambert::{LambertSolution, OrbitDirection, solve_lambert};
pub use topocentric::{AngleRangeMeasurement, ObservationSite, state_from_angles_and_range};

#[derive(Debug, Error)]
pub enum DeterminationError {
    #[error("position vectors are not coplanar (|u_r1 . C23| = {0:e})")]
    NotCoplanar(f64),
    #[error("lambert transfer angle is degenerate (delta theta = {0} rad)")]
    DegenerateTransfer(f64),
    #[error(transparent)]
    Solve(#[from] SolveError),
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}
