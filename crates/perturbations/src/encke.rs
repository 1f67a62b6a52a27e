//! Encke's method for the J2 perturbation.
//!
//! The deviation from an osculating reference orbit is integrated over short
//! intervals; at the end of each interval the reference is rectified onto the
//! true state and the deviation restarts from zero.

use std::cell::Cell;

use serde::{Deserialize, Serialize};

use astro_core::PhysicalContext;
use astro_core::solve::SolveError;
use astro_core::vector::{self, Vector3};
use astro_ode::{Rk45, Tolerances};
use astro_orbits::lagrange::propagate_by_time;
use astro_orbits::{OrbitalElements, orbital_elements};

use crate::{PerturbationError, check_span};

const DEFAULT_INTERVALS: f64 = 1000.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnckeOptions {
    /// Time between rectifications (s); `None` splits the span into 1000 intervals.
    pub rectification_interval: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnckeSample {
    pub t: f64,
    pub elements: OrbitalElements,
}

/// J2 acceleration (km/s²) at position `r`.
pub fn j2_acceleration(ctx: &PhysicalContext, r: &Vector3) -> Vector3 {
    let r_m = vector::norm(r);
    let k = 1.5 * ctx.j2 * ctx.mu * ctx.radius * ctx.radius / r_m.powi(4);
    let z2 = 5.0 * r[2] * r[2] / (r_m * r_m);
    [
        k * r[0] / r_m * (z2 - 1.0),
        k * r[1] / r_m * (z2 - 1.0),
        k * r[2] / r_m * (z2 - 3.0),
    ]
}

/// Battin's F(q), avoiding the cancellation in 1 − (r_osc/r)³.
fn battin_f(q: f64) -> f64 {
    (q * q - 3.0 * q + 3.0) / (1.0 + (1.0 - q).powf(1.5)) * q
}

/// Osculating elements sampled at each rectification from `t0` to `tf`.
pub fn encke_j2(
    ctx: &PhysicalContext,
    y0: &[f64; 6],
    t0: f64,
    tf: f64,
    options: EnckeOptions,
) -> Result<Vec<EnckeSample>, PerturbationError> {
    check_span(t0, tf)?;
    let interval = options
        .rectification_interval
        .unwrap_or((tf - t0) / DEFAULT_INTERVALS);
    if tf > t0 && (interval.is_nan() || interval <= 0.0) {
        return Err(PerturbationError::InvalidInput(format!(
            "rectification interval must be positive, got {interval}"
        )));
    }

    let mu = ctx.mu;
    let solver = Rk45::new(Tolerances::new(1e-8, 1e-8));
    let mut r_ref: Vector3 = [y0[0], y0[1], y0[2]];
    let mut v_ref: Vector3 = [y0[3], y0[4], y0[5]];
    let mut t = t0;
    let mut samples = vec![EnckeSample {
        t,
        elements: orbital_elements(ctx, &r_ref, &v_ref),
    }];

    let intervals = if tf > t0 {
        ((tf - t0) / interval - 1e-9).ceil().max(1.0) as usize
    } else {
        0
    };
    for k in 1..=intervals {
        let t_next = if k == intervals { tf } else { t0 + k as f64 * interval };
        let dt = t_next - t;
        let failure: Cell<Option<SolveError>> = Cell::new(None);
        let (r0, v0) = (r_ref, v_ref);

        let rhs = |tau: f64, y: &[f64], dydt: &mut [f64]| {
            let (r_osc, _) = match propagate_by_time(ctx, &r0, &v0, tau) {
                Ok(state) => state,
                Err(err) => {
                    failure.set(Some(err));
                    dydt.fill(f64::NAN);
                    return;
                }
            };
            let dr = [y[0], y[1], y[2]];
            let r = vector::add(&r_osc, &dr);
            let r_m = vector::norm(&r);
            let q = vector::dot(&dr, &vector::sub(&vector::scale(&r, 2.0), &dr)) / (r_m * r_m);
            let f = battin_f(q);
            let p = j2_acceleration(ctx, &r);
            let k = mu / vector::norm(&r_osc).powi(3);
            dydt[0] = y[3];
            dydt[1] = y[4];
            dydt[2] = y[5];
            for i in 0..3 {
                dydt[3 + i] = -k * (dr[i] - f * r[i]) + p[i];
            }
        };

        let deviation = match solver.integrate(&rhs, 0.0, &[0.0; 6], dt) {
            Ok(traj) => traj,
            Err(err) => {
                return Err(match failure.take() {
                    Some(solve) => solve.into(),
                    None => err.into(),
                });
            }
        };
        let delta = deviation
            .last_state()
            .ok_or_else(|| PerturbationError::InvalidInput("empty deviation integration".into()))?;

        let (r_osc, v_osc) = propagate_by_time(ctx, &r0, &v0, dt)?;
        r_ref = vector::add(&r_osc, &[delta[0], delta[1], delta[2]]);
        v_ref = vector::add(&v_osc, &[delta[3], delta[4], delta[5]]);
        t = t_next;

        samples.push(EnckeSample {
            t,
            elements: orbital_elements(ctx, &r_ref, &v_ref),
        });
    }

    log::debug!("encke: {} rectifications over {} s", samples.len() - 1, tf - t0);
    Ok(samples)
}
