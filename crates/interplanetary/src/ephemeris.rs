//! Heliocentric planetary state vectors from J2000 mean elements and their
//! secular rates.

use std::f64::consts::PI;

use chrono::NaiveDateTime;
use serde::Serialize;

use astro_core::PhysicalContext;
use astro_core::Planet;
use astro_core::angle::wrap_to_360;
use astro_core::constants::{AU_KM, DAYS_PER_CENTURY, J2000_JD};
use astro_core::vector::Vector3;
use astro_determination::julian_day_of;
use astro_orbits::time::elliptical_anomaly;
use astro_orbits::{OrbitalElements, perifocal_to_geocentric};

use crate::InterplanetaryError;

/// Heliocentric ecliptic state of a planet at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlanetState {
    pub elements: OrbitalElements,
    pub r: Vector3,
    pub v: Vector3,
}

/// State of `planet` at Julian day `jd`.
pub fn ephemeris(planet: Planet, jd: f64) -> Result<PlanetState, InterplanetaryError> {
    let sun = PhysicalContext::sun();
    let centuries = (jd - J2000_JD) / DAYS_PER_CENTURY;
    let (el, rate) = planet.elements_and_rates();

    let a = (el.a + rate.a * centuries) * AU_KM;
    let e = el.e + rate.e * centuries;
    let i = wrap_to_360(el.i + rate.i * centuries);
    let raan = wrap_to_360(el.raan + rate.raan * centuries);
    let long_perihelion = wrap_to_360(el.long_perihelion + rate.long_perihelion * centuries);
    let mean_longitude = wrap_to_360(el.mean_longitude + rate.mean_longitude * centuries);

    let period = 2.0 * PI * (a.powi(3) / sun.mu).sqrt();
    let h = (sun.mu * a * (1.0 - e * e)).sqrt();
    let arg_periapsis = long_perihelion - raan;
    let mean_anomaly = wrap_to_360(mean_longitude - long_perihelion).to_radians();
    let theta = elliptical_anomaly(period, e, mean_anomaly * period / (2.0 * PI))?;

    let elements = OrbitalElements {
        h,
        e,
        i: i.to_radians(),
        raan: raan.to_radians(),
        arg_periapsis: arg_periapsis.to_radians(),
        true_anomaly: theta,
        a,
    };
    let (r, v) = perifocal_to_geocentric(&sun, &elements);
    Ok(PlanetState { elements, r, v })
}

/// State of `planet` at a calendar instant (UT).
pub fn ephemeris_at(planet: Planet, instant: NaiveDateTime) -> Result<PlanetState, InterplanetaryError> {
    ephemeris(planet, julian_day_of(instant)?)
}
