//! Continuous-thrust manoeuvres: the constant tangential-thrust spiral and
//! finite-burn targeting on the integrated two-body problem.

pub mod burn;

use serde::Serialize;
use thiserror::Error;

use astro_core::PhysicalContext;
use astro_core::constants::G0_KM;
use astro_core::units::newtons_to_kg_km_s2;
use astro_orbits::OrbitError;

pub use burn::{BurnSolution, BurnTarget, NonImpulsiveRequest, non_impulsive_maneuver};

#[derive(Debug, Error)]
pub enum LowThrustError {
    #[error(transparent)]
    Orbit(#[from] OrbitError),
    #[error("burn-time search did not converge after {iterations} iterations (residual {residual} km)")]
    NonConvergent { iterations: usize, residual: f64 },
    #[error("invalid low-thrust input: {0}")]
    InvalidInput(String),
}

/// Spacecraft and engine for a slow tangential spiral starting on a circular orbit.
#[derive(Debug, Clone)]
pub struct SpiralInputs {
    /// Radius of the starting circular orbit (km).
    pub initial_radius: f64,
    pub initial_mass_kg: f64,
    pub thrust_n: f64,
    pub isp_s: f64,
}

impl SpiralInputs {
    fn validate(&self) -> Result<(), LowThrustError> {
        if self.initial_radius <= 0.0 || self.initial_mass_kg <= 0.0 || self.thrust_n <= 0.0 || self.isp_s <= 0.0 {
            return Err(LowThrustError::InvalidInput(format!(
                "radius, mass, thrust and Isp must be positive: {self:?}"
            )));
        }
        Ok(())
    }

    fn exhaust_speed(&self) -> f64 {
        self.isp_s * G0_KM
    }

    fn mass_flow(&self) -> f64 {
        newtons_to_kg_km_s2(self.thrust_n) / self.exhaust_speed()
    }
}

/// One quantity of a spiral (radius or flight time) with the propellant it costs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpiralLeg {
    pub value: f64,
    pub propellant: f64,
}

/// Per-sample telemetry of the spiral.
#[derive(Debug, Clone, Serialize)]
pub struct SpiralSample {
    pub time_s: f64,
    pub radius_km: f64,
    pub speed_km_s: f64,
    pub mass_kg: f64,
}

/// Radius reached after thrusting tangentially for `t` seconds.
pub fn tangential_thrust_radius_after(
    ctx: &PhysicalContext,
    inputs: &SpiralInputs,
    t: f64,
) -> Result<SpiralLeg, LowThrustError> {
    inputs.validate()?;
    let propellant = inputs.mass_flow() * t;
    if propellant >= inputs.initial_mass_kg {
        return Err(LowThrustError::InvalidInput(format!(
            "burn of {t} s needs {propellant} kg, more than the spacecraft mass"
        )));
    }
    let speed = (ctx.mu / inputs.initial_radius).sqrt()
        + inputs.exhaust_speed() * (1.0 - propellant / inputs.initial_mass_kg).ln();
    if speed <= 0.0 {
        return Err(LowThrustError::InvalidInput(format!(
            "burn of {t} s leaves no circular speed; the spiral escapes"
        )));
    }
    Ok(SpiralLeg {
        value: ctx.mu / (speed * speed),
        propellant,
    })
}

/// Thrusting time needed to spiral out to radius `r`.
pub fn tangential_thrust_time_to_radius(
    ctx: &PhysicalContext,
    inputs: &SpiralInputs,
    r: f64,
) -> Result<SpiralLeg, LowThrustError> {
    inputs.validate()?;
    let c = inputs.exhaust_speed();
    let dv = (ctx.mu / r).sqrt() - (ctx.mu / inputs.initial_radius).sqrt();
    let t = inputs.initial_mass_kg / inputs.mass_flow() * (1.0 - (dv / c).exp());
    Ok(SpiralLeg {
        value: t,
        propellant: inputs.mass_flow() * t,
    })
}

/// Samples the spiral every `step_s` up to `duration_s`.
pub fn spiral_profile(
    ctx: &PhysicalContext,
    inputs: &SpiralInputs,
    duration_s: f64,
    step_s: f64,
) -> Result<Vec<SpiralSample>, LowThrustError> {
    if step_s <= 0.0 {
        return Err(LowThrustError::InvalidInput(format!("sample step must be positive, got {step_s}")));
    }
    let mut samples = Vec::new();
    let mut time = 0.0;
    loop {
        let leg = tangential_thrust_radius_after(ctx, inputs, time)?;
        samples.push(SpiralSample {
            time_s: time,
            radius_km: leg.value,
            speed_km_s: (ctx.mu / leg.value).sqrt(),
            mass_kg: inputs.initial_mass_kg - leg.propellant,
        });
        if time + 1e-9 >= duration_s {
            break;
        }
        time = (time + step_s).min(duration_s);
    }
    Ok(samples)
}
