//! Planet alignment for Hohmann legs between circular coplanar orbits.

use std::f64::consts::PI;

use serde::Serialize;

use astro_core::CelestialBody;

use crate::InterplanetaryError;

/// Time for the relative geometry of two planets to repeat (s).
pub fn synodic_period(departure: CelestialBody, arrival: CelestialBody) -> f64 {
    let n1 = departure.orbital_angular_velocity();
    let n2 = arrival.orbital_angular_velocity();
    2.0 * PI / (n2 - n1).abs()
}

/// Stay at the arrival planet before the return Hohmann leg can start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WaitTime {
    /// Minimum non-negative wait (s).
    pub wait: f64,
    /// Phase angle of the arrival planet ahead of the departure planet at launch (rad).
    pub departure_phase: f64,
    /// Phase angle between the planets when the outbound leg arrives (rad).
    pub arrival_phase: f64,
    /// Phase angle required to start the return leg (rad).
    pub return_phase: f64,
}

pub fn wait_time(departure: CelestialBody, arrival: CelestialBody) -> Result<WaitTime, InterplanetaryError> {
    let n1 = departure.orbital_angular_velocity();
    let n2 = arrival.orbital_angular_velocity();
    if n1 == n2 {
        return Err(InterplanetaryError::InvalidInput(format!(
            "{departure} and {arrival} share a mean motion; the geometry never repeats"
        )));
    }
    let mu_sun = CelestialBody::Sun.mu();
    let (r1, r2) = (departure.semi_major_axis(), arrival.semi_major_axis());
    let t12 = PI / mu_sun.sqrt() * ((r1 + r2) / 2.0).powf(1.5);

    let departure_phase = PI - n2 * t12;
    let arrival_phase = PI - n1 * t12;

    // Smallest whole number of relative revolutions giving a non-negative wait.
    let wait = (0..)
        .map(|n| {
            let n = f64::from(n);
            if n1 > n2 {
                (-2.0 * arrival_phase - 2.0 * PI * n) / (n2 - n1)
            } else {
                (-2.0 * arrival_phase + 2.0 * PI * n) / (n2 - n1)
            }
        })
        .find(|t| *t >= 0.0)
        .unwrap_or(f64::NAN);

    Ok(WaitTime {
        wait,
        departure_phase,
        arrival_phase,
        return_phase: -arrival_phase,
    })
}
