//! Finite-burn targeting: search the burn time of a tangential thrust arc
//! until the coast orbit reaches a target radius or semi-major axis.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use astro_core::PhysicalContext;
use astro_core::vector::{self, Vector3};
use astro_orbits::lagrange::propagate_by_angle;
use astro_orbits::orbital_elements;
use astro_orbits::two_body::simulate_relative_motion_with_thrust;

use crate::LowThrustError;

/// Quantity driven to the target radius.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BurnTarget {
    /// Radius at the apse opposite the burn (coast to θ = π).
    #[default]
    ApoapsisRadius,
    SemiMajorAxis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonImpulsiveRequest {
    /// Burn-time guess (s); the first trial burns 10 s longer.
    pub initial_guess_s: f64,
    /// Initial burn-time increment (s), halved on every overshoot.
    pub step_s: f64,
    pub r0: Vector3,
    pub v0: Vector3,
    /// Target radius (km).
    pub target_radius: f64,
    pub mass_kg: f64,
    pub thrust_n: f64,
    pub isp_s: f64,
    pub target: BurnTarget,
    /// Accepted residual on the target (km).
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl NonImpulsiveRequest {
    pub fn new(r0: Vector3, v0: Vector3, target_radius: f64, mass_kg: f64, thrust_n: f64, isp_s: f64) -> Self {
        Self {
            initial_guess_s: 0.0,
            step_s: 10.0,
            r0,
            v0,
            target_radius,
            mass_kg,
            thrust_n,
            isp_s,
            target: BurnTarget::default(),
            tolerance: 1e-6,
            max_iterations: 200,
        }
    }

    pub fn with_target(mut self, target: BurnTarget) -> Self {
        self.target = target;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BurnSolution {
    pub burn_time: f64,
    /// `[r, v, m]` at the end of the burn (semi-major-axis target) or at the
    /// opposite apse of the coast orbit (radius target).
    pub state: Vec<f64>,
    pub residual: f64,
    pub iterations: usize,
}

// The first trial burn extends the guess by this much.
const FIRST_TRIAL_OFFSET_S: f64 = 10.0;

// Below this increment the burn time cannot be refined further.
const TIME_RESOLUTION_S: f64 = 1e-9;

/// Burn-time search with step halving on every sign change of the residual.
pub fn non_impulsive_maneuver(
    ctx: &PhysicalContext,
    request: &NonImpulsiveRequest,
) -> Result<BurnSolution, LowThrustError> {
    if request.step_s <= 0.0 {
        return Err(LowThrustError::InvalidInput(format!(
            "burn-time step must be positive, got {}",
            request.step_s
        )));
    }
    if request.initial_guess_s < 0.0 {
        return Err(LowThrustError::InvalidInput(format!(
            "burn-time guess must not be negative, got {}",
            request.initial_guess_s
        )));
    }

    let y0 = [
        request.r0[0],
        request.r0[1],
        request.r0[2],
        request.v0[0],
        request.v0[1],
        request.v0[2],
        request.mass_kg,
    ];
    let mut burn_time = request.initial_guess_s + FIRST_TRIAL_OFFSET_S;
    let mut step = request.step_s;
    let mut previous = 0.0;
    let mut residual = f64::NAN;

    for iteration in 1..=request.max_iterations {
        let trajectory =
            simulate_relative_motion_with_thrust(ctx, &y0, request.thrust_n, request.isp_s, 0.0, burn_time)?;
        let end = trajectory.last_state().ok_or_else(|| {
            LowThrustError::InvalidInput("thrust arc produced no samples".into())
        })?;
        let r = [end[0], end[1], end[2]];
        let v = [end[3], end[4], end[5]];
        let elements = orbital_elements(ctx, &r, &v);

        let state = match request.target {
            BurnTarget::SemiMajorAxis => {
                residual = elements.a - request.target_radius;
                end.to_vec()
            }
            BurnTarget::ApoapsisRadius => {
                let (r_f, v_f) = propagate_by_angle(ctx, &r, &v, PI - elements.true_anomaly);
                residual = vector::norm(&r_f) - request.target_radius;
                vec![r_f[0], r_f[1], r_f[2], v_f[0], v_f[1], v_f[2], end[6]]
            }
        };

        if residual.abs() < request.tolerance || step < TIME_RESOLUTION_S {
            log::debug!("burn time {burn_time} s after {iteration} iterations (residual {residual} km)");
            return Ok(BurnSolution {
                burn_time,
                state,
                residual,
                iterations: iteration,
            });
        }

        if previous != 0.0 && previous * residual < 0.0 {
            step /= 2.0;
        }
        if residual < 0.0 {
            burn_time += step;
        } else {
            burn_time -= step;
        }
        if burn_time <= 0.0 {
            return Err(LowThrustError::InvalidInput(
                "target is below the initial orbit; no positive burn reaches it".into(),
            ));
        }
        previous = residual;
    }

    log::warn!("burn-time search stopped at {burn_time} s with residual {residual} km");
    Err(LowThrustError::NonConvergent {
        iterations: request.max_iterations,
        residual,
    })
}
