use serde::Serialize;

use astro_core::PhysicalContext;
use astro_core::constants::G0_KM;
use astro_core::series::finite_difference;
use astro_ode::{Directed, EventDirection, Rk45, Tolerances, Trajectory};

use crate::EntryError;
use crate::capsule::{Capsule, EntryAtmosphere, ParachuteState};

#[derive(Debug, Clone, Serialize)]
pub struct EntryResult {
    /// States `(V, γ, r, x, m)`; `event` is set when the capsule reached the ground.
    pub trajectory: Trajectory,
    /// dV/dt between consecutive samples (km/s²), one shorter than the trajectory.
    pub acceleration: Vec<f64>,
    /// Stagnation-point heat flux at every sample (W/m²).
    pub heat_flux: Vec<f64>,
    pub parachute_deployed_at: Option<f64>,
}

impl EntryResult {
    pub fn altitude(&self, radius: f64) -> Vec<f64> {
        self.trajectory.y.iter().map(|y| y[2] - radius).collect()
    }

    pub fn landed(&self) -> bool {
        self.trajectory.event.is_some()
    }
}

struct EntryDynamics<'a> {
    ctx: &'a PhysicalContext,
    capsule: &'a Capsule,
    atmosphere: &'a EntryAtmosphere,
    parachute: ParachuteState,
}

impl EntryDynamics<'_> {
    fn derivative(&self, t: f64, y: &[f64], dydt: &mut [f64]) {
        let (v, gamma, r, m) = (y[0], y[1], y[2], y[4]);
        let k = self.ctx.mu;
        let c = self.capsule;
        // Dynamic pressure times area in kg·km/s² per unit coefficient.
        let q_s = 0.5 * self.atmosphere.density(r - self.ctx.radius) * (v * 1e3).powi(2) * 1e-3;
        let lift = q_s * c.c_l * c.area_m2;
        let drag = q_s * c.c_d * c.area_m2;
        let chute = c
            .parachute
            .map(|p| q_s * p.c_d * p.area_m2 * p.drag_fraction(self.parachute, t))
            .unwrap_or(0.0);
        let thrust = c.thrust_n * 1e-3;
        let (sg, cg) = gamma.sin_cos();

        dydt[0] = thrust * c.thrust_angle.cos() / m - (drag + chute) / m - k / (r * r) * sg;
        dydt[1] = thrust * c.thrust_angle.sin() / (m * v) + lift / (m * v) - k / (r * r * v) * cg + v / r * cg;
        dydt[2] = v * sg;
        dydt[3] = self.ctx.radius * v / r * cg;
        dydt[4] = -thrust / (G0_KM * c.isp_s);
    }

    fn run(&self, event_altitude: f64, t0: f64, y0: &[f64], tf: f64) -> Result<Trajectory, EntryError> {
        let rhs = |t: f64, y: &[f64], dydt: &mut [f64]| self.derivative(t, y, dydt);
        let surface = self.ctx.radius + event_altitude;
        let event = Directed {
            function: |_t: f64, y: &[f64]| y[2] - surface,
            direction: EventDirection::Falling,
        };
        Ok(Rk45::new(Tolerances::new(1e-8, 1e-8)).integrate_until(&rhs, &event, t0, y0, tf)?)
    }
}

/// Integrates the entry from `y0 = (V, γ, z, x, m)` with `z` the altitude (km)
/// until ground impact or `tf`.
///
/// A capsule with a parachute first runs to the deployment altitude, then
/// restarts with the parachute deployed at that instant.
pub fn simulate_entry(
    ctx: &PhysicalContext,
    capsule: &Capsule,
    atmosphere: &EntryAtmosphere,
    y0: &[f64; 5],
    t0: f64,
    tf: f64,
) -> Result<EntryResult, EntryError> {
    if y0[0] <= 0.0 || y0[4] <= 0.0 {
        return Err(EntryError::InvalidInput(format!(
            "entry speed and mass must be positive, got {} km/s and {} kg",
            y0[0], y0[4]
        )));
    }
    if capsule.isp_s <= 0.0 {
        return Err(EntryError::InvalidInput(format!(
            "specific impulse must be positive, got {}",
            capsule.isp_s
        )));
    }

    let mut state = y0.to_vec();
    state[2] += ctx.radius;

    let mut dynamics = EntryDynamics {
        ctx,
        capsule,
        atmosphere,
        parachute: ParachuteState::Stowed,
    };
    let mut deployed_at = None;

    let trajectory = match capsule.parachute {
        Some(chute) if y0[2] <= chute.deploy_altitude_km => {
            dynamics.parachute = ParachuteState::Deployed { at: t0 };
            deployed_at = Some(t0);
            dynamics.run(0.0, t0, &state, tf)?
        }
        Some(chute) => {
            let mut descent = dynamics.run(chute.deploy_altitude_km, t0, &state, tf)?;
            match descent.event.take() {
                Some(hit) => {
                    log::info!("parachute deployed at t = {:.1} s", hit.t);
                    dynamics.parachute = ParachuteState::Deployed { at: hit.t };
                    deployed_at = Some(hit.t);
                    descent.extend(dynamics.run(0.0, hit.t, &hit.y, tf)?);
                }
                None => log::debug!("entry ended above the parachute deployment altitude"),
            }
            descent
        }
        None => dynamics.run(0.0, t0, &state, tf)?,
    };

    let v = trajectory.series(0);
    let heat_flux = trajectory
        .y
        .iter()
        .map(|y| atmosphere.heat_flux(y[2] - ctx.radius, y[0], capsule.nose_radius_m))
        .collect();
    let acceleration = finite_difference(&trajectory.t, &v);

    log::debug!(
        "entry: {} samples over {:.1} s, final speed {:.4} km/s",
        trajectory.len(),
        trajectory.span(),
        v.last().copied().unwrap_or(f64::NAN)
    );

    Ok(EntryResult {
        trajectory,
        acceleration,
        heat_flux,
        parachute_deployed_at: deployed_at,
    })
}
