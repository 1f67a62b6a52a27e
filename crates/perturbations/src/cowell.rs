//! Cowell's method: drag added to the two-body acceleration and integrated directly.

use serde::Serialize;

use astro_core::PhysicalContext;
use astro_core::series::extrema;
use astro_ode::{Rk45, Tolerances, Trajectory};

use crate::{PerturbationError, atmosphere, check_span};

/// Cowell drag run with the apoapsis and periapsis history extracted from the altitude.
#[derive(Debug, Clone, Serialize)]
pub struct DragPropagation {
    pub trajectory: Trajectory,
    /// Altitude above the equatorial radius at every sample (km).
    pub altitude: Vec<f64>,
    /// `(t, altitude)` of each apoapsis passage.
    pub apoapsides: Vec<(f64, f64)>,
    /// `(t, altitude)` of each periapsis passage.
    pub periapsides: Vec<(f64, f64)>,
    /// True when the run stopped on reaching the surface.
    pub decayed: bool,
}

/// Drag acceleration (km/s²) on the atmosphere-relative velocity.
///
/// `ballistic` is C_D·A/m in m²/kg.
pub fn drag_acceleration(ctx: &PhysicalContext, r: &[f64], v: &[f64], ballistic: f64) -> [f64; 3] {
    let w = ctx.rotation_rate;
    let v_rel = [v[0] + w * r[1], v[1] - w * r[0], v[2]];
    let speed = (v_rel[0] * v_rel[0] + v_rel[1] * v_rel[1] + v_rel[2] * v_rel[2]).sqrt();
    let r_m = (r[0] * r[0] + r[1] * r[1] + r[2] * r[2]).sqrt();
    // kg/m³ → kg/km³ and m²/kg → km²/kg.
    let rho = atmosphere::density(r_m - ctx.radius) * 1e9;
    let k = -0.5 * rho * speed * ballistic * 1e-6;
    [k * v_rel[0], k * v_rel[1], k * v_rel[2]]
}

/// Integrates the drag-perturbed two-body problem from the 6-state `y0`.
pub fn cowell_drag(
    ctx: &PhysicalContext,
    y0: &[f64; 6],
    ballistic: f64,
    t0: f64,
    tf: f64,
) -> Result<DragPropagation, PerturbationError> {
    check_span(t0, tf)?;
    let mu = ctx.mu;
    let rhs = |_t: f64, y: &[f64], dydt: &mut [f64]| {
        let r3 = (y[0] * y[0] + y[1] * y[1] + y[2] * y[2]).powf(1.5);
        let p = drag_acceleration(ctx, &y[0..3], &y[3..6], ballistic);
        dydt[0] = y[3];
        dydt[1] = y[4];
        dydt[2] = y[5];
        for k in 0..3 {
            dydt[3 + k] = -mu / r3 * y[k] + p[k];
        }
    };
    let radius = ctx.radius;
    let surface = |_t: f64, y: &[f64]| (y[0] * y[0] + y[1] * y[1] + y[2] * y[2]).sqrt() - radius;

    let trajectory = Rk45::new(Tolerances::new(1e-8, 1e-8)).integrate_until(&rhs, &surface, t0, y0, tf)?;
    let altitude: Vec<f64> = trajectory
        .y
        .iter()
        .map(|y| (y[0] * y[0] + y[1] * y[1] + y[2] * y[2]).sqrt() - radius)
        .collect();

    let peaks = extrema(&altitude);
    let apoapsides = peaks
        .max_indices
        .iter()
        .map(|&i| (trajectory.t[i], altitude[i]))
        .collect();
    let periapsides = peaks
        .min_indices
        .iter()
        .map(|&i| (trajectory.t[i], altitude[i]))
        .collect();
    let decayed = trajectory.event.is_some();
    if decayed {
        log::info!("orbit decayed to the surface after {:.1} days", trajectory.span() / 86_400.0);
    }

    Ok(DragPropagation {
        trajectory,
        altitude,
        apoapsides,
        periapsides,
        decayed,
    })
}
