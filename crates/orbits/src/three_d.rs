//! Orbits in three dimensions: state vector ↔ elements, frame rotations,
//! oblateness drift and ground tracks.

use std::f64::consts::PI;

use astro_core::PhysicalContext;
use astro_core::angle::wrap_to_2pi;
use astro_core::matrix::{self, Matrix3};
use astro_core::vector::{self, Vector3};
use serde::Serialize;

use crate::two_body::orbital_parameters;
use crate::{OrbitError, OrbitRegime, OrbitalElements, time};

const NODE_GUARD: f64 = 1e-6;

/// Right ascension and declination (rad) of a position vector.
pub fn right_ascension_declination(r: &Vector3) -> (f64, f64) {
    let r_m = vector::norm(r);
    let (l, m, n) = (r[0] / r_m, r[1] / r_m, r[2] / r_m);
    let dec = n.asin();
    let cos_ra = (l / dec.cos()).clamp(-1.0, 1.0);
    let ra = if m > 0.0 { cos_ra.acos() } else { 2.0 * PI - cos_ra.acos() };
    (ra, dec)
}

/// Classical elements from a geocentric state.
///
/// Near-equatorial orbits (within 1° of 0 or π, and closer than 1e-6 rad) take the
/// node line along x̂ instead of ẑ × h.
pub fn orbital_elements(ctx: &PhysicalContext, r: &Vector3, v: &Vector3) -> OrbitalElements {
    let mu = ctx.mu;
    let r_m = vector::norm(r);
    let v_m = vector::norm(v);
    let v_r = vector::dot(r, v) / r_m;
    let h_vec = vector::cross(r, v);
    let h = vector::norm(&h_vec);
    let a = -0.5 * mu / (0.5 * v_m * v_m - mu / r_m);
    let i = (h_vec[2] / h).clamp(-1.0, 1.0).acos();

    let one_deg = 1f64.to_radians();
    let use_cross = if i <= 0.5 * PI {
        i > one_deg || (i < one_deg && i > NODE_GUARD)
    } else {
        i < PI - one_deg || (i > PI - one_deg && PI - i > NODE_GUARD)
    };
    let node = if use_cross {
        vector::cross(&[0.0, 0.0, 1.0], &h_vec)
    } else {
        [1.0, 0.0, 0.0]
    };
    let node_m = vector::norm(&node);

    let cos_raan = (node[0] / node_m).clamp(-1.0, 1.0);
    let raan = if node[1] >= 0.0 { cos_raan.acos() } else { 2.0 * PI - cos_raan.acos() };

    let e_vec = vector::scale(
        &vector::sub(&vector::scale(r, v_m * v_m - mu / r_m), &vector::scale(v, r_m * v_r)),
        1.0 / mu,
    );
    let e = vector::norm(&e_vec);

    let cos_w = (vector::dot(&node, &e_vec) / (node_m * e)).clamp(-1.0, 1.0);
    let arg_periapsis = if e_vec[2] >= 0.0 { cos_w.acos() } else { 2.0 * PI - cos_w.acos() };

    let cos_theta = (vector::dot(&e_vec, r) / (e * r_m)).clamp(-1.0, 1.0);
    let true_anomaly = if v_r >= 0.0 { cos_theta.acos() } else { 2.0 * PI - cos_theta.acos() };

    OrbitalElements {
        h,
        e,
        i,
        raan,
        arg_periapsis,
        true_anomaly,
        a,
    }
}

/// Rotation from the geocentric equatorial to the perifocal frame, R3(ω)·R1(i)·R3(Ω).
pub fn perifocal_rotation(elements: &OrbitalElements) -> Matrix3 {
    matrix::mul(
        &matrix::rot3(elements.arg_periapsis),
        &matrix::mul(&matrix::rot1(elements.i), &matrix::rot3(elements.raan)),
    )
}

/// Geocentric state for the given elements.
pub fn perifocal_to_geocentric(ctx: &PhysicalContext, elements: &OrbitalElements) -> (Vector3, Vector3) {
    let p = elements.semi_latus_rectum(ctx.mu);
    let (s, c) = elements.true_anomaly.sin_cos();
    let r_pf = vector::scale(&[c, s, 0.0], p / (1.0 + elements.e * c));
    let v_pf = vector::scale(&[-s, elements.e + c, 0.0], (ctx.mu / p).sqrt());
    let q = matrix::transpose(&perifocal_rotation(elements));
    (matrix::mul_vec(&q, &r_pf), matrix::mul_vec(&q, &v_pf))
}

/// Perifocal components of a geocentric state.
pub fn geocentric_to_perifocal(ctx: &PhysicalContext, r: &Vector3, v: &Vector3) -> (Vector3, Vector3) {
    let q = perifocal_rotation(&orbital_elements(ctx, r, v));
    (matrix::mul_vec(&q, r), matrix::mul_vec(&q, v))
}

/// Secular RAAN and argument-of-periapsis rates (rad/s) caused by J2.
pub fn oblateness_rates(ctx: &PhysicalContext, a: f64, e: f64, i: f64) -> (f64, f64) {
    let factor = -1.5 * ctx.mu.sqrt() * ctx.j2 * ctx.radius * ctx.radius / ((1.0 - e * e).powi(2) * a.powf(3.5));
    let raan_rate = factor * i.cos();
    let arg_rate = factor * (2.5 * i.sin().powi(2) - 2.0);
    (raan_rate, arg_rate)
}

/// Sub-satellite right ascension and declination in degrees.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroundTrack {
    pub ra: Vec<f64>,
    pub dec: Vec<f64>,
}

impl GroundTrack {
    pub fn len(&self) -> usize {
        self.ra.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ra.is_empty()
    }
}

/// Ground track over `orbits` periods sampled every `dt` seconds.
///
/// Unbound orbits have no ground track and yield `Ok(None)`.
pub fn ground_track(
    ctx: &PhysicalContext,
    elements: &OrbitalElements,
    dt: f64,
    orbits: f64,
) -> Result<Option<GroundTrack>, OrbitError> {
    let regime = elements.regime();
    if !regime.is_closed() {
        return Ok(None);
    }
    if dt <= 0.0 {
        return Err(OrbitError::InvalidInput(format!("ground track step must be positive, got {dt}")));
    }

    let (r0, v0) = perifocal_to_geocentric(ctx, elements);
    let params = orbital_parameters(ctx, &r0, &v0);
    let (raan_rate, arg_rate) = oblateness_rates(ctx, params.a, params.e, elements.i);

    let t0 = match regime {
        OrbitRegime::Circular => time::circular_time(params.period, elements.true_anomaly),
        _ => time::elliptical_time(params.period, params.e, elements.true_anomaly),
    };

    let mut oe = *elements;
    let mut track = GroundTrack::default();
    let t_end = orbits * params.period + dt;
    let mut t = t0;
    while t < t_end {
        oe.true_anomaly = match regime {
            OrbitRegime::Circular => time::circular_anomaly(params.period, t),
            _ => time::elliptical_anomaly(params.period, params.e, t)?,
        };
        oe.raan += raan_rate * dt;
        oe.arg_periapsis += arg_rate * dt;

        let (r, _) = perifocal_to_geocentric(ctx, &oe);
        let spin = wrap_to_2pi(ctx.rotation_rate * (t - t0));
        let (ra, dec) = right_ascension_declination(&matrix::mul_vec(&matrix::rot3(spin), &r));
        track.ra.push(ra.to_degrees());
        track.dec.push(dec.to_degrees());
        t += dt;
    }
    log::debug!(
        "ground track: {} samples over {orbits} orbits, node drift {:.3e} rad/s",
        track.ra.len(),
        raan_rate
    );
    Ok(Some(track))
}
