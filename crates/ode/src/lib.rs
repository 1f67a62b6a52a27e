//! Adaptive explicit Runge–Kutta integration (Dormand–Prince 5(4)).
//!
//! Every simulation in the workspace funnels through [`Rk45`]: the solver keeps
//! each accepted step, so the returned [`Trajectory`] is the raw time series the
//! callers post-process (accelerations, heat flux, extrema).

mod rk45;
mod trajectory;

pub use rk45::{Rk45, Tolerances};
pub use trajectory::{EventHit, Trajectory};

use thiserror::Error;

/// Right-hand side of `dy/dt = f(t, y)`.
pub trait OdeSystem {
    fn derivative(&self, t: f64, y: &[f64], dydt: &mut [f64]);
}

impl<F> OdeSystem for F
where
    F: Fn(f64, &[f64], &mut [f64]),
{
    fn derivative(&self, t: f64, y: &[f64], dydt: &mut [f64]) {
        self(t, y, dydt)
    }
}

/// Sign-change direction that triggers an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventDirection {
    #[default]
    Any,
    /// Negative to positive.
    Rising,
    /// Positive to negative.
    Falling,
}

/// Scalar function whose zero crossing terminates an integration.
pub trait EventFunction {
    fn value(&self, t: f64, y: &[f64]) -> f64;

    fn direction(&self) -> EventDirection {
        EventDirection::Any
    }
}

impl<F> EventFunction for F
where
    F: Fn(f64, &[f64]) -> f64,
{
    fn value(&self, t: f64, y: &[f64]) -> f64 {
        self(t, y)
    }
}

/// Event wrapper fixing the crossing direction of a closure.
pub struct Directed<F> {
    pub function: F,
    pub direction: EventDirection,
}

impl<F> EventFunction for Directed<F>
where
    F: Fn(f64, &[f64]) -> f64,
{
    fn value(&self, t: f64, y: &[f64]) -> f64 {
        (self.function)(t, y)
    }

    fn direction(&self) -> EventDirection {
        self.direction
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum IntegrationError {
    #[error("invalid integration time: t0 = {t0} > tf = {tf}")]
    InvalidSpan { t0: f64, tf: f64 },
    #[error("integration exceeded {max_steps} steps at t = {t}")]
    StepLimit { max_steps: usize, t: f64 },
    #[error("required step size fell below the representable minimum at t = {t}")]
    StepSizeUnderflow { t: f64 },
    #[error("state became non-finite at t = {t}")]
    NonFinite { t: f64 },
    #[error("initial state has {actual} components, expected {expected}")]
    Dimension { expected: usize, actual: usize },
}
