//! Gauss's variational equations in (h, e, θ, Ω, i, ω) with per-source
//! perturbing accelerations resolved in the radial/transverse/normal frame.

use serde::{Deserialize, Serialize};

use astro_core::constants::{SOLAR_PHOTOSPHERE_INTENSITY, SOLAR_PHOTOSPHERE_RADIUS_KM, SPEED_OF_LIGHT_M_S};
use astro_core::vector::{self, Vector3};
use astro_core::{CelestialBody, PhysicalContext};
use astro_ode::{Rk45, Tolerances};
use astro_orbits::{OrbitalElements, perifocal_to_geocentric};

use crate::almanac::{moon_position, shadow, sun_position};
use crate::cowell::drag_acceleration;
use crate::{PerturbationError, check_span};

/// Osculating state integrated by the variational equations. Angles in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GaussState {
    pub h: f64,
    pub e: f64,
    pub true_anomaly: f64,
    pub raan: f64,
    pub i: f64,
    pub arg_periapsis: f64,
}

impl GaussState {
    fn to_vec(self) -> Vec<f64> {
        vec![self.h, self.e, self.true_anomaly, self.raan, self.i, self.arg_periapsis]
    }

    fn elements(y: &[f64]) -> OrbitalElements {
        OrbitalElements {
            h: y[0],
            e: y[1],
            true_anomaly: y[2],
            raan: y[3],
            i: y[4],
            arg_periapsis: y[5],
            a: 0.0,
        }
    }
}

/// Perturbation sources switched on for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerturbationSet {
    /// Drag ballistic coefficient C_D·A/m (m²/kg).
    pub drag: Option<f64>,
    pub j2: bool,
    /// Radiation-pressure coefficient C_R·A_s/m (m²/kg).
    pub srp: Option<f64>,
    pub moon: bool,
    pub sun: bool,
}

impl PerturbationSet {
    fn needs_state_vector(&self) -> bool {
        self.drag.is_some() || self.srp.is_some() || self.moon || self.sun
    }
}

/// Element histories of a variational run; angles in degrees, time in days since `t0`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GaussPropagation {
    pub t_days: Vec<f64>,
    pub h: Vec<f64>,
    pub e: Vec<f64>,
    pub true_anomaly_deg: Vec<f64>,
    pub raan_deg: Vec<f64>,
    pub i_deg: Vec<f64>,
    pub arg_periapsis_deg: Vec<f64>,
    pub a: Vec<f64>,
}

fn third_body(mu_body: f64, r_body: &Vector3, r_sat: &Vector3) -> Vector3 {
    let rel = vector::sub(r_body, r_sat);
    vector::sub(
        &vector::scale(&rel, mu_body / vector::norm(&rel).powi(3)),
        &vector::scale(r_body, mu_body / vector::norm(r_body).powi(3)),
    )
}

/// Components of `p` along r̂, ŝ and ŵ of the state `(r, v)`.
fn rsw(p: &Vector3, r: &Vector3, v: &Vector3) -> Vector3 {
    let r_hat = vector::unit(r);
    let w_hat = vector::unit(&vector::cross(r, v));
    let s_hat = vector::unit(&vector::cross(&w_hat, r));
    [vector::dot(p, &r_hat), vector::dot(p, &s_hat), vector::dot(p, &w_hat)]
}

/// Perturbing acceleration (p_r, p_s, p_w) in km/s² at time `t` of the run.
fn perturbation(ctx: &PhysicalContext, sources: &PerturbationSet, y: &[f64], jd: f64) -> Vector3 {
    let (h, e, theta, raan, i, w) = (y[0], y[1], y[2], y[3], y[4], y[5]);
    let mu = ctx.mu;
    let r = h * h / (mu * (1.0 + e * theta.cos()));
    let u = w + theta;
    let mut p = [0.0; 3];

    let state = sources
        .needs_state_vector()
        .then(|| perifocal_to_geocentric(ctx, &GaussState::elements(y)));

    if let (Some(ballistic), Some((r_vec, v_vec))) = (sources.drag, state.as_ref()) {
        let drag = drag_acceleration(ctx, r_vec, v_vec, ballistic);
        // Drag opposes the relative velocity; only its magnitude acts along ŝ.
        p[1] -= vector::norm(&drag);
    }

    if sources.j2 {
        let k = -1.5 * ctx.j2 * mu * ctx.radius * ctx.radius / r.powi(4);
        p[0] += k * (1.0 - 3.0 * i.sin().powi(2) * u.sin().powi(2));
        p[1] += k * i.sin().powi(2) * (2.0 * u).sin();
        p[2] += k * (2.0 * i).sin() * u.sin();
    }

    if let (Some(srp), Some((r_vec, _))) = (sources.srp, state.as_ref()) {
        let sun = sun_position(jd);
        let flux = SOLAR_PHOTOSPHERE_INTENSITY * SOLAR_PHOTOSPHERE_RADIUS_KM.powi(2) / vector::norm(&sun.r).powi(2);
        let lit = if shadow(ctx, r_vec, &sun.r) { 0.0 } else { 1.0 };
        // N/kg → km/s².
        let p_sr = lit * flux / SPEED_OF_LIGHT_M_S * srp * 1e-3;

        let (lam, eps) = (sun.ecliptic_longitude, sun.obliquity);
        let (so, co) = raan.sin_cos();
        let (si, ci) = i.sin_cos();
        let (su, cu) = u.sin_cos();
        let q = [
            [-so * ci * su + co * cu, co * ci * su + so * cu, si * su],
            [-so * ci * cu - co * su, co * ci * cu - so * su, si * cu],
            [so * si, -co * si, ci],
        ];
        let sun_dir = [lam.cos(), lam.sin() * eps.cos(), lam.sin() * eps.sin()];
        let along = astro_core::matrix::mul_vec(&q, &sun_dir);
        for k in 0..3 {
            p[k] -= p_sr * along[k];
        }
    }

    if let (true, Some((r_vec, v_vec))) = (sources.moon, state.as_ref()) {
        let moon = moon_position(ctx.radius, jd);
        let a = third_body(CelestialBody::Moon.mu(), &moon, r_vec);
        let parts = rsw(&a, r_vec, v_vec);
        for k in 0..3 {
            p[k] += parts[k];
        }
    }

    if let (true, Some((r_vec, v_vec))) = (sources.sun, state.as_ref()) {
        let sun = sun_position(jd);
        let a = third_body(CelestialBody::Sun.mu(), &sun.r, r_vec);
        let parts = rsw(&a, r_vec, v_vec);
        for k in 0..3 {
            p[k] += parts[k];
        }
    }

    p
}

/// Integrates the variational equations from `t0` to `tf`; `epoch_jd` is the
/// Julian day at `t0`, used by the Sun and Moon ephemerides.
pub fn gauss_variational(
    ctx: &PhysicalContext,
    initial: &GaussState,
    sources: &PerturbationSet,
    epoch_jd: f64,
    t0: f64,
    tf: f64,
) -> Result<GaussPropagation, PerturbationError> {
    check_span(t0, tf)?;
    if initial.e <= 0.0 || initial.i.sin() == 0.0 {
        return Err(PerturbationError::InvalidInput(
            "variational equations are singular for circular or equatorial orbits".into(),
        ));
    }
    let mu = ctx.mu;

    let rhs = |t: f64, y: &[f64], dydt: &mut [f64]| {
        let (h, e, theta, i, w) = (y[0], y[1], y[2], y[4], y[5]);
        let r = h * h / (mu * (1.0 + e * theta.cos()));
        let jd = epoch_jd + (t - t0) / 86_400.0;
        let [p_r, p_s, p_w] = perturbation(ctx, sources, y, jd);
        let (st, ct) = theta.sin_cos();
        let u = w + theta;
        let in_plane = h * h / mu * ct * p_r - (r + h * h / mu) * st * p_s;

        dydt[0] = r * p_s;
        dydt[1] = h / mu * st * p_r + ((h * h + mu * r) * ct + mu * e * r) * p_s / (mu * h);
        dydt[2] = h / (r * r) + in_plane / (e * h);
        dydt[3] = r / (h * i.sin()) * u.sin() * p_w;
        dydt[4] = r / h * u.cos() * p_w;
        dydt[5] = -in_plane / (e * h) - r * u.sin() / (h * i.tan()) * p_w;
    };

    let trajectory = Rk45::new(Tolerances::new(1e-8, 1e-8)).integrate(&rhs, t0, &initial.to_vec(), tf)?;
    log::debug!("gauss variational equations: {} samples", trajectory.len());

    let mut out = GaussPropagation::default();
    for (t, y) in trajectory.t.iter().zip(&trajectory.y) {
        out.t_days.push((t - t0) / 86_400.0);
        out.h.push(y[0]);
        out.e.push(y[1]);
        out.true_anomaly_deg.push(y[2].to_degrees());
        out.raan_deg.push(y[3].to_degrees());
        out.i_deg.push(y[4].to_degrees());
        out.arg_periapsis_deg.push(y[5].to_degrees());
        out.a.push(y[0] * y[0] / (mu * (1.0 - y[1] * y[1])));
    }
    Ok(out)
}
