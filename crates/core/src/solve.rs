//! Bounded scalar root finding.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolveError {
    #[error("root finder did not converge after {iterations} iterations (last estimate {last})")]
    NonConvergent { iterations: usize, last: f64 },
    #[error("root finder produced a non-finite value at iteration {iteration}")]
    NotFinite { iteration: usize },
}

/// Stopping rules for [`newton`] and [`secant`].
#[derive(Debug, Clone, Copy)]
pub struct NewtonOptions {
    pub max_iterations: usize,
    /// Converged once |Δx| ≤ tolerance·max(1, |x|).
    pub tolerance: f64,
}

impl Default for NewtonOptions {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-10,
        }
    }
}

impl NewtonOptions {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Newton–Raphson iteration on `f` with derivative `df`, starting at `x0`.
pub fn newton<F, D>(f: F, df: D, x0: f64, options: NewtonOptions) -> Result<f64, SolveError>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    let mut x = x0;
    for iteration in 1..=options.max_iterations {
        let step = f(x) / df(x);
        if !step.is_finite() {
            return Err(SolveError::NotFinite { iteration });
        }
        x -= step;
        if step.abs() <= options.tolerance * x.abs().max(1.0) {
            return Ok(x);
        }
    }
    log::warn!(
        "newton iteration stopped after {} iterations at x = {x}",
        options.max_iterations
    );
    Err(SolveError::NonConvergent {
        iterations: options.max_iterations,
        last: x,
    })
}

/// Derivative-free secant iteration seeded with two points.
pub fn secant<F>(f: F, x0: f64, x1: f64, options: NewtonOptions) -> Result<f64, SolveError>
where
    F: Fn(f64) -> f64,
{
    let (mut a, mut b) = (x0, x1);
    let (mut fa, mut fb) = (f(a), f(b));
    for iteration in 1..=options.max_iterations {
        if fb == 0.0 {
            return Ok(b);
        }
        let step = fb * (b - a) / (fb - fa);
        if !step.is_finite() {
            return Err(SolveError::NotFinite { iteration });
        }
        a = b;
        fa = fb;
        b -= step;
        fb = f(b);
        if step.abs() <= options.tolerance * b.abs().max(1.0) {
            return Ok(b);
        }
    }
    Err(SolveError::NonConvergent {
        iterations: options.max_iterations,
        last: b,
    })
}

/// Bisection on a bracketing interval `[lo, hi]`.
pub fn bisect<F>(f: F, mut lo: f64, mut hi: f64, options: NewtonOptions) -> Result<f64, SolveError>
where
    F: Fn(f64) -> f64,
{
    let mut f_lo = f(lo);
    for iteration in 1..=options.max_iterations.max(200) {
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid);
        if !f_mid.is_finite() {
            return Err(SolveError::NotFinite { iteration });
        }
        if f_mid == 0.0 || (hi - lo).abs() <= options.tolerance * mid.abs().max(1.0) {
            return Ok(mid);
        }
        if (f_mid < 0.0) == (f_lo < 0.0) {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }
    Err(SolveError::NonConvergent {
        iterations: options.max_iterations,
        last: 0.5 * (lo + hi),
    })
}
