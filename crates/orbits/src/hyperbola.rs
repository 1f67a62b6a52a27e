//! Patched-conic hyperbola helpers shared by departure and arrival design.

/// Periapsis speed on a hyperbola with excess speed `vinf_km_s` at radius `r_p_km`.
pub fn periapsis_speed(mu_km3_s2: f64, r_p_km: f64, vinf_km_s: f64) -> f64 {
    (vinf_km_s * vinf_km_s + 2.0 * mu_km3_s2 / r_p_km).sqrt()
}

/// Patched-conic escape delta-v from a circular parking orbit.
pub fn escape_delta_v(mu_km3_s2: f64, parking_radius_km: f64, vinf_km_s: f64) -> f64 {
    let circular_speed = (mu_km3_s2 / parking_radius_km).sqrt();
    (periapsis_speed(mu_km3_s2, parking_radius_km, vinf_km_s) - circular_speed).max(0.0)
}

/// Capture delta-v into an elliptical orbit of periapsis `r_p_km` and eccentricity `e`.
pub fn capture_delta_v(mu_km3_s2: f64, r_p_km: f64, e: f64, vinf_km_s: f64) -> f64 {
    let captured_speed = (mu_km3_s2 * (1.0 + e) / r_p_km).sqrt();
    (periapsis_speed(mu_km3_s2, r_p_km, vinf_km_s) - captured_speed).max(0.0)
}

/// Eccentricity of the hyperbola with periapsis `r_p_km` and excess speed `vinf_km_s`.
pub fn eccentricity(mu_km3_s2: f64, r_p_km: f64, vinf_km_s: f64) -> f64 {
    1.0 + r_p_km * vinf_km_s * vinf_km_s / mu_km3_s2
}

/// Aiming radius Δ = r_p √(1 + 2μ / (r_p v∞²)).
pub fn aiming_radius(mu_km3_s2: f64, r_p_km: f64, vinf_km_s: f64) -> f64 {
    r_p_km * (1.0 + 2.0 * mu_km3_s2 / (r_p_km * vinf_km_s * vinf_km_s)).sqrt()
}

/// Turn angle δ = 2 asin(1/e).
pub fn turn_angle(e: f64) -> f64 {
    2.0 * (1.0 / e).asin()
}
