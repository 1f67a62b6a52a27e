//! Low-precision Sun and Moon positions from the Astronomical Almanac, and
//! the line-of-sight shadow test used by solar radiation pressure.

use serde::Serialize;

use astro_core::PhysicalContext;
use astro_core::angle::wrap_to_360;
use astro_core::constants::{AU_KM, DAYS_PER_CENTURY, J2000_JD};
use astro_core::vector::{self, Vector3};

/// Geocentric Sun position with the angles used to build it (rad).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SunPosition {
    pub r: Vector3,
    pub ecliptic_longitude: f64,
    pub obliquity: f64,
}

/// Geocentric equatorial position of the Sun at Julian day `jd`.
pub fn sun_position(jd: f64) -> SunPosition {
    let n = jd - J2000_JD;
    let mean_anomaly = wrap_to_360(357.529 + 0.985_600_23 * n).to_radians();
    let mean_longitude = wrap_to_360(280.459 + 0.985_647_36 * n);
    let lambda = wrap_to_360(mean_longitude + 1.915 * mean_anomaly.sin() + 0.0200 * (2.0 * mean_anomaly).sin())
        .to_radians();
    let eps = wrap_to_360(23.439 - 3.56e-7 * n).to_radians();

    let u = [lambda.cos(), lambda.sin() * eps.cos(), lambda.sin() * eps.sin()];
    let distance =
        (1.000_14 - 0.016_71 * mean_anomaly.cos() - 0.000_140 * (2.0 * mean_anomaly).cos()) * AU_KM;

    SunPosition {
        r: vector::scale(&u, distance),
        ecliptic_longitude: lambda,
        obliquity: eps,
    }
}

const MOON_LONGITUDE: [(f64, f64, f64); 6] = [
    (6.29, 135.0, 477_198.87),
    (-1.27, 259.3, -413_335.36),
    (0.66, 235.7, 890_534.22),
    (0.21, 269.9, 954_397.74),
    (-0.19, 357.5, 35_999.05),
    (-0.11, 106.5, 966_404.03),
];

const MOON_LATITUDE: [(f64, f64, f64); 4] = [
    (5.13, 93.3, 483_202.03),
    (0.28, 220.2, 960_400.89),
    (-0.28, 318.3, 6_003.15),
    (-0.17, 217.6, -407_332.21),
];

const MOON_PARALLAX: [(f64, f64, f64); 4] = [
    (0.0518, 135.0, 477_198.87),
    (0.0095, 259.3, -413_335.38),
    (0.0078, 253.7, 890_534.22),
    (0.0028, 269.9, 954_397.70),
];

/// Geocentric equatorial position of the Moon at Julian day `jd`; the distance
/// follows from the horizontal parallax and the Earth radius `earth_radius`.
pub fn moon_position(earth_radius: f64, jd: f64) -> Vector3 {
    let t0 = (jd - J2000_JD) / DAYS_PER_CENTURY;
    let series = |terms: &[(f64, f64, f64)], f: fn(f64) -> f64| -> f64 {
        terms
            .iter()
            .map(|(a, b, c)| a * f((b + c * t0).to_radians()))
            .sum()
    };

    let eps = wrap_to_360(23.439 - 0.013_004_2 * t0).to_radians();
    let lambda = wrap_to_360(218.32 + 481_267.881 * t0 + series(&MOON_LONGITUDE, f64::sin)).to_radians();
    let delta = wrap_to_360(series(&MOON_LATITUDE, f64::sin)).to_radians();
    let parallax = wrap_to_360(0.9508 + series(&MOON_PARALLAX, f64::cos)).to_radians();

    let distance = earth_radius / parallax.sin();
    let u = [
        delta.cos() * lambda.cos(),
        eps.cos() * delta.cos() * lambda.sin() - eps.sin() * delta.sin(),
        eps.sin() * delta.cos() * lambda.sin() + eps.cos() * delta.sin(),
    ];
    vector::scale(&u, distance)
}

/// True when the body blocks the line of sight between the satellite and the Sun.
pub fn shadow(ctx: &PhysicalContext, r_sat: &Vector3, r_sun: &Vector3) -> bool {
    let sat = vector::norm(r_sat);
    let sun = vector::norm(r_sun);
    let theta = (vector::dot(r_sun, r_sat) / (sun * sat)).clamp(-1.0, 1.0).acos();
    let theta_1 = (ctx.radius / sun).clamp(-1.0, 1.0).acos();
    let theta_2 = (ctx.radius / sat).clamp(-1.0, 1.0).acos();
    theta_1 + theta_2 <= theta
}
