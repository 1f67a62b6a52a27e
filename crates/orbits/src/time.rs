//! Kepler time laws: time since periapsis from true anomaly and the inverse, per regime.

use std::f64::consts::PI;

use astro_core::solve::{self, NewtonOptions, SolveError};

/// Circular orbit: time to sweep `theta` on an orbit of period `period`.
pub fn circular_time(period: f64, theta: f64) -> f64 {
    theta / (2.0 * PI) * period
}

/// Circular orbit: angle swept after `t`.
pub fn circular_anomaly(period: f64, t: f64) -> f64 {
    2.0 * PI / period * t
}

/// Elliptical orbit: time since periapsis for true anomaly `theta`.
pub fn elliptical_time(period: f64, e: f64, theta: f64) -> f64 {
    let ecc_anomaly = 2.0 * (((1.0 - e) / (1.0 + e)).sqrt() * (theta / 2.0).tan()).atan();
    let mean_anomaly = ecc_anomaly - e * ecc_anomaly.sin();
    mean_anomaly / (2.0 * PI) * period
}

/// Elliptical orbit: true anomaly in `(0, 2π]` reached `t` after periapsis.
pub fn elliptical_anomaly(period: f64, e: f64, t: f64) -> Result<f64, SolveError> {
    let mean_anomaly = 2.0 * PI / period * t;
    let ecc_anomaly = kepler_eccentric_anomaly(e, mean_anomaly)?;
    let theta = 2.0 * (((1.0 + e) / (1.0 - e)).sqrt() * (ecc_anomaly / 2.0).tan()).atan();
    Ok(if theta > 0.0 { theta } else { theta + 2.0 * PI })
}

/// Solves Kepler's equation E − e sin E = M.
pub fn kepler_eccentric_anomaly(e: f64, mean_anomaly: f64) -> Result<f64, SolveError> {
    let seed = if mean_anomaly < PI {
        mean_anomaly + 0.5 * e
    } else {
        mean_anomaly - 0.5 * e
    };
    solve::newton(
        |ea| ea - e * ea.sin() - mean_anomaly,
        |ea| 1.0 - e * ea.cos(),
        seed,
        NewtonOptions::default(),
    )
}

/// Parabolic orbit: Barker's equation.
pub fn parabolic_time(mu: f64, h: f64, theta: f64) -> f64 {
    let tan_half = (theta / 2.0).tan();
    let mean_anomaly = 0.5 * tan_half + tan_half.powi(3) / 6.0;
    mean_anomaly * h.powi(3) / (mu * mu)
}

/// Parabolic orbit: closed-form inverse of Barker's equation.
pub fn parabolic_anomaly(mu: f64, h: f64, t: f64) -> f64 {
    let mean_anomaly = mu * mu / h.powi(3) * t;
    let root = 3.0 * mean_anomaly + ((3.0 * mean_anomaly).powi(2) + 1.0).sqrt();
    2.0 * (root.cbrt() - root.powf(-1.0 / 3.0)).atan()
}

/// Hyperbolic orbit: time since periapsis for true anomaly `theta`.
pub fn hyperbolic_time(mu: f64, h: f64, e: f64, theta: f64) -> f64 {
    let hyp_anomaly = 2.0 * (((e - 1.0) / (e + 1.0)).sqrt() * (theta / 2.0).tan()).atanh();
    let mean_anomaly = e * hyp_anomaly.sinh() - hyp_anomaly;
    mean_anomaly * h.powi(3) / (mu * mu) * (e * e - 1.0).powf(-1.5)
}

/// Hyperbolic orbit: true anomaly reached `t` after periapsis.
pub fn hyperbolic_anomaly(mu: f64, h: f64, e: f64, t: f64) -> Result<f64, SolveError> {
    let mean_anomaly = mu * mu / h.powi(3) * (e * e - 1.0).powf(1.5) * t;
    let hyp_anomaly = solve::newton(
        |f| e * f.sinh() - f - mean_anomaly,
        |f| e * f.cosh() - 1.0,
        (mean_anomaly / e).asinh(),
        NewtonOptions::default(),
    )?;
    let theta = 2.0 * (((e + 1.0) / (e - 1.0)).sqrt() * (hyp_anomaly / 2.0).tanh()).atan();
    Ok(if theta > 0.0 { theta } else { theta + 2.0 * PI })
}
