//! Lagrange coefficients and universal-variable propagation.

use astro_core::PhysicalContext;
use astro_core::solve::{self, NewtonOptions, SolveError};
use astro_core::vector::{self, Vector3};

// Below this |z| the closed forms lose precision; use the series instead.
const STUMPFF_SERIES_LIMIT: f64 = 1e-3;

/// Stumpff function S(z).
pub fn stumpff_s(z: f64) -> f64 {
    if z.abs() < STUMPFF_SERIES_LIMIT {
        1.0 / 6.0 - z / 120.0 + z * z / 5040.0
    } else if z > 0.0 {
        let s = z.sqrt();
        (s - s.sin()) / s.powi(3)
    } else {
        let s = (-z).sqrt();
        (s.sinh() - s) / s.powi(3)
    }
}

/// Stumpff function C(z).
pub fn stumpff_c(z: f64) -> f64 {
    if z.abs() < STUMPFF_SERIES_LIMIT {
        0.5 - z / 24.0 + z * z / 720.0
    } else if z > 0.0 {
        (1.0 - z.sqrt().cos()) / z
    } else {
        ((-z).sqrt().cosh() - 1.0) / (-z)
    }
}

/// State after the true anomaly advances by `dtheta`.
pub fn propagate_by_angle(ctx: &PhysicalContext, r0: &Vector3, v0: &Vector3, dtheta: f64) -> (Vector3, Vector3) {
    let mu = ctx.mu;
    let r0_m = vector::norm(r0);
    let v0_m = vector::norm(v0);
    let vr0 = vector::dot(r0, v0) / r0_m;
    let h = r0_m * (v0_m * v0_m - vr0 * vr0).sqrt();
    let (s, c) = dtheta.sin_cos();

    let r = h * h / mu / (1.0 + (h * h / (mu * r0_m) - 1.0) * c - h * vr0 / mu * s);
    let f = 1.0 - mu * r / (h * h) * (1.0 - c);
    let g = r * r0_m / h * s;
    let f_dot = mu / h * (1.0 - c) / s * (mu / (h * h) * (1.0 - c) - 1.0 / r0_m - 1.0 / r);
    let g_dot = 1.0 - mu * r0_m / (h * h) * (1.0 - c);

    (
        vector::add(&vector::scale(r0, f), &vector::scale(v0, g)),
        vector::add(&vector::scale(r0, f_dot), &vector::scale(v0, g_dot)),
    )
}

/// Universal anomaly χ after `dt` from radius `r0`, radial speed `vr0`, and α = 1/a.
pub fn universal_anomaly(ctx: &PhysicalContext, r0: f64, vr0: f64, alpha: f64, dt: f64) -> Result<f64, SolveError> {
    let sqrt_mu = ctx.mu.sqrt();
    let f = |chi: f64| {
        let z = alpha * chi * chi;
        r0 * vr0 / sqrt_mu * chi * chi * stumpff_c(z) + (1.0 - alpha * r0) * chi.powi(3) * stumpff_s(z) + r0 * chi
            - sqrt_mu * dt
    };
    let df = |chi: f64| {
        let z = alpha * chi * chi;
        r0 * vr0 / sqrt_mu * chi * (1.0 - z * stumpff_s(z)) + (1.0 - alpha * r0) * chi * chi * stumpff_c(z) + r0
    };
    solve::newton(f, df, sqrt_mu * alpha.abs() * dt, NewtonOptions::default().with_max_iterations(200))
}

/// Lagrange f and g after `dt` for universal anomaly `chi`.
pub fn lagrange_coefficients(ctx: &PhysicalContext, r0: f64, alpha: f64, dt: f64, chi: f64) -> (f64, f64) {
    let z = alpha * chi * chi;
    let f = 1.0 - chi * chi / r0 * stumpff_c(z);
    let g = dt - chi.powi(3) * stumpff_s(z) / ctx.mu.sqrt();
    (f, g)
}

/// State after `dt` seconds of unperturbed motion.
pub fn propagate_by_time(
    ctx: &PhysicalContext,
    r0: &Vector3,
    v0: &Vector3,
    dt: f64,
) -> Result<(Vector3, Vector3), SolveError> {
    let r0_m = vector::norm(r0);
    let v0_m = vector::norm(v0);
    let vr0 = vector::dot(r0, v0) / r0_m;
    let alpha = 2.0 / r0_m - v0_m * v0_m / ctx.mu;

    let chi = universal_anomaly(ctx, r0_m, vr0, alpha, dt)?;
    let z = alpha * chi * chi;
    let (f, g) = lagrange_coefficients(ctx, r0_m, alpha, dt, chi);
    let r = vector::add(&vector::scale(r0, f), &vector::scale(v0, g));
    let r_m = vector::norm(&r);
    let f_dot = ctx.mu.sqrt() / (r_m * r0_m) * (z * chi * stumpff_s(z) - chi);
    let g_dot = 1.0 - chi * chi / r_m * stumpff_c(z);
    let v = vector::add(&vector::scale(r0, f_dot), &vector::scale(v0, g_dot));
    Ok((r, v))
}
