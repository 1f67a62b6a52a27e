//! Core units, constants, and shared primitives for the astrodynamics mission engine.

pub mod angle;
pub mod body;
pub mod calendar;
pub mod context;
pub mod matrix;
pub mod series;
pub mod solve;

pub use body::{CelestialBody, Planet, PlanetaryElements, UnknownBody};
pub use context::PhysicalContext;
pub use solve::{NewtonOptions, SolveError};

/// Physical constants expressed in engine units (km, s, kg) unless stated otherwise.
pub mod constants {
    /// Standard gravity at Earth's surface (m/s²).
    pub const G0: f64 = 9.80665;
    /// Standard gravity at Earth's surface (km/s²).
    pub const G0_KM: f64 = G0 * 1e-3;
    /// Universal gravitational constant (km³ / kg s²).
    pub const GRAVITATIONAL_CONSTANT: f64 = 6.674_301_5e-20;
    /// Kilometres per astronomical unit.
    pub const AU_KM: f64 = 149_597_870.707;
    /// Speed of light (m/s).
    pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;
    /// Radiated power intensity at the solar photosphere (W/m²).
    pub const SOLAR_PHOTOSPHERE_INTENSITY: f64 = 5.670e-8 * 5777.0 * 5777.0 * 5777.0 * 5777.0;
    /// Solar photosphere radius (km).
    pub const SOLAR_PHOTOSPHERE_RADIUS_KM: f64 = 696_000.0;
    /// Seconds per Julian day.
    pub const SECONDS_PER_DAY: f64 = 86_400.0;
    /// Julian day of the J2000 epoch.
    pub const J2000_JD: f64 = 2_451_545.0;
    /// Days per Julian century.
    pub const DAYS_PER_CENTURY: f64 = 36_525.0;
    /// Default specific impulse for impulsive manoeuvres (s).
    pub const DEFAULT_ISP_S: f64 = 300.0;
}

/// Basic unit conversion helpers.
pub mod units {
    /// Convert kilometres to metres.
    #[inline]
    pub fn km_to_m(v: f64) -> f64 {
        v * 1_000.0
    }

    /// Convert metres to kilometres.
    #[inline]
    pub fn m_to_km(v: f64) -> f64 {
        v / 1_000.0
    }

    /// Convert newtons (kg·m/s²) to kg·km/s².
    #[inline]
    pub fn newtons_to_kg_km_s2(v: f64) -> f64 {
        v * 1e-3
    }

    /// Convert degrees to radians.
    #[inline]
    pub fn deg(v: f64) -> f64 {
        v.to_radians()
    }
}

/// Lightweight time utilities shared across crates.
pub mod time {
    use super::constants::SECONDS_PER_DAY;

    /// Convert days to seconds.
    #[inline]
    pub fn days_to_seconds(days: f64) -> f64 {
        days * SECONDS_PER_DAY
    }

    /// Convert seconds to days.
    #[inline]
    pub fn seconds_to_days(seconds: f64) -> f64 {
        seconds / SECONDS_PER_DAY
    }

    /// Convert seconds to hours.
    #[inline]
    pub fn seconds_to_hours(seconds: f64) -> f64 {
        seconds / 3_600.0
    }
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
pub mod vector {
    /// Alias for a 3D vector in kilometres or km/s depending on context.
    pub type Vector3 = [f64; 3];

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector3) -> f64 {
        dot(v, v).sqrt()
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Cross product of two vectors.
    #[inline]
    pub fn cross(a: &Vector3, b: &Vector3) -> Vector3 {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    /// Vector addition.
    #[inline]
    pub fn add(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
    }

    /// Vector subtraction.
    #[inline]
    pub fn sub(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector3, s: f64) -> Vector3 {
        [v[0] * s, v[1] * s, v[2] * s]
    }

    /// Unit vector along `v`; the zero vector maps to itself.
    #[inline]
    pub fn unit(v: &Vector3) -> Vector3 {
        let n = norm(v);
        if n == 0.0 { *v } else { scale(v, 1.0 / n) }
    }

    /// Split a 6-state slice into position and velocity.
    #[inline]
    pub fn split_state(y: &[f64]) -> (Vector3, Vector3) {
        ([y[0], y[1], y[2]], [y[3], y[4], y[5]])
    }

    /// Join position and velocity into a 6-state.
    #[inline]
    pub fn join_state(r: &Vector3, v: &Vector3) -> Vec<f64> {
        vec![r[0], r[1], r[2], v[0], v[1], v[2]]
    }
}
