//! Angle wrapping.

use std::f64::consts::PI;

/// Wrap an angle into one turn keeping the sign of the input
/// (`x mod 2π` for positive, `x mod -2π` for non-positive values).
pub fn wrap_to_2pi(x: f64) -> f64 {
    wrap_turn(x, 2.0 * PI)
}

/// Degree variant of [`wrap_to_2pi`].
pub fn wrap_to_360(x: f64) -> f64 {
    wrap_turn(x, 360.0)
}

/// Wrap into `[0, 2π)` regardless of sign.
pub fn normalize_positive(x: f64) -> f64 {
    x.rem_euclid(2.0 * PI)
}

fn wrap_turn(x: f64, turn: f64) -> f64 {
    // Remainder carrying the sign of the divisor.
    let divisor = if x > 0.0 { turn } else { -turn };
    x - divisor * (x / divisor).floor()
}
