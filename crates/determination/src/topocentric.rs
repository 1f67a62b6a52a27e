//! Observation-site frames and orbit determination from angles and range.

use std::f64::consts::PI;

use astro_core::PhysicalContext;
use astro_core::matrix::{self, Matrix3};
use astro_core::vector::{self, Vector3};
use astro_orbits::{OrbitalElements, orbital_elements};
use serde::{Deserialize, Serialize};

/// Geodetic location of a tracking station. Angles in radians, elevation in km.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationSite {
    pub latitude: f64,
    pub elevation: f64,
}

impl ObservationSite {
    pub fn new(latitude: f64, elevation: f64) -> Self {
        Self { latitude, elevation }
    }

    /// Geocentric position at local sidereal time `theta`.
    pub fn position(&self, ctx: &PhysicalContext, theta: f64) -> Vector3 {
        site_position(ctx, theta, self.latitude, self.elevation)
    }
}

/// Geocentric position of a site on the oblate body at sidereal time `theta`,
/// geodetic latitude `phi` and elevation `height` (km).
pub fn site_position(ctx: &PhysicalContext, theta: f64, phi: f64, height: f64) -> Vector3 {
    let f = ctx.flattening;
    let (sin_phi, cos_phi) = phi.sin_cos();
    let denom = (1.0 - (2.0 * f - f * f) * sin_phi * sin_phi).sqrt();
    let a = (ctx.radius / denom + height) * cos_phi;
    let b = (ctx.radius * (1.0 - f).powi(2) / denom + height) * sin_phi;
    [a * theta.cos(), a * theta.sin(), b]
}

/// Rotation from the geocentric equatorial frame to the site's horizon frame
/// (east, north, zenith).
fn horizon_rotation(theta: f64, phi: f64) -> Matrix3 {
    let (st, ct) = theta.sin_cos();
    let (sp, cp) = phi.sin_cos();
    [[-st, ct, 0.0], [-sp * ct, -sp * st, cp], [cp * ct, cp * st, sp]]
}

/// Topocentric right ascension and declination (rad) of a geocentric position.
pub fn geocentric_to_topocentric_equatorial(
    ctx: &PhysicalContext,
    r: &Vector3,
    theta: f64,
    site: &ObservationSite,
) -> (f64, f64) {
    let rho = vector::unit(&vector::sub(r, &site.position(ctx, theta)));
    let dec = rho[2].asin();
    let ra = rho[1].atan2(rho[0]).rem_euclid(2.0 * PI);
    (ra, dec)
}

/// Azimuth and elevation (rad) of a geocentric position seen from the site.
pub fn geocentric_to_topocentric_horizon(
    ctx: &PhysicalContext,
    r: &Vector3,
    theta: f64,
    site: &ObservationSite,
) -> (f64, f64) {
    let rho = vector::unit(&vector::sub(r, &site.position(ctx, theta)));
    let local = matrix::mul_vec(&horizon_rotation(theta, site.latitude), &rho);
    let elevation = local[2].asin();
    let azimuth = (local[0] / elevation.cos())
        .atan2(local[1] / elevation.cos())
        .rem_euclid(2.0 * PI);
    (azimuth, elevation)
}

/// Geocentric unit direction of a line of sight given by azimuth and elevation.
pub fn topocentric_horizon_to_equatorial(azimuth: f64, elevation: f64, theta: f64, phi: f64) -> Vector3 {
    let (sa, ca) = azimuth.sin_cos();
    let (se, ce) = elevation.sin_cos();
    let q = matrix::transpose(&horizon_rotation(theta, phi));
    matrix::mul_vec(&q, &[ce * sa, ce * ca, se])
}

/// Radar/optical tracking measurement. Angles and rates in rad and rad/s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AngleRangeMeasurement {
    /// Slant range (km).
    pub range: f64,
    pub azimuth: f64,
    pub elevation: f64,
    /// Slant range rate (km/s).
    pub range_rate: f64,
    pub azimuth_rate: f64,
    pub elevation_rate: f64,
    /// Local sidereal time of the measurement.
    pub sidereal_time: f64,
}

/// Geocentric state and elements from one angles-and-range measurement.
pub fn state_from_angles_and_range(
    ctx: &PhysicalContext,
    m: &AngleRangeMeasurement,
    site: &ObservationSite,
) -> (Vector3, Vector3, OrbitalElements) {
    let phi = site.latitude;
    let (a_z, el) = (m.azimuth, m.elevation);
    let (sin_phi, cos_phi) = phi.sin_cos();

    let r_site = site.position(ctx, m.sidereal_time);
    let r_site_dot = vector::cross(&[0.0, 0.0, ctx.rotation_rate], &r_site);

    let dec = (cos_phi * a_z.cos() * el.cos() + sin_phi * el.sin()).clamp(-1.0, 1.0).asin();
    let cos_h = ((cos_phi * el.sin() - sin_phi * a_z.cos() * el.cos()) / dec.cos()).clamp(-1.0, 1.0);
    let hour_angle = if a_z > 0.0 && a_z < PI {
        2.0 * PI - cos_h.acos()
    } else {
        cos_h.acos()
    };
    let ra = m.sidereal_time - hour_angle;

    let rho_hat = [dec.cos() * ra.cos(), dec.cos() * ra.sin(), dec.sin()];
    let r = vector::add(&r_site, &vector::scale(&rho_hat, m.range));

    let dec_dot = (-m.azimuth_rate * cos_phi * a_z.sin() * el.cos()
        + m.elevation_rate * (sin_phi * el.cos() - cos_phi * a_z.cos() * el.sin()))
        / dec.cos();
    let ra_dot = ctx.rotation_rate
        + (m.azimuth_rate * a_z.cos() * el.cos() - m.elevation_rate * a_z.sin() * el.sin()
            + dec_dot * a_z.sin() * el.cos() * dec.tan())
            / (cos_phi * el.sin() - sin_phi * a_z.cos() * el.cos());

    let rho_hat_dot = [
        -ra_dot * ra.sin() * dec.cos() - dec_dot * ra.cos() * dec.sin(),
        ra_dot * ra.cos() * dec.cos() - dec_dot * ra.sin() * dec.sin(),
        dec_dot * dec.cos(),
    ];
    let v = vector::add(
        &vector::add(&r_site_dot, &vector::scale(&rho_hat, m.range_rate)),
        &vector::scale(&rho_hat_dot, m.range),
    );

    let elements = orbital_elements(ctx, &r, &v);
    (r, v, elements)
}
