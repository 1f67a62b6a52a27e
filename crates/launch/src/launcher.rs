use serde::Serialize;

use astro_core::PhysicalContext;
use astro_core::series::finite_difference;
use astro_ode::{Directed, EventDirection, Rk45, Tolerances, Trajectory};

use crate::LaunchError;
use crate::stage::Stage;

/// Ascent trajectory with the along-track acceleration between samples (km/s²).
#[derive(Debug, Clone, Default, Serialize)]
pub struct LaunchResult {
    /// States `(V, γ, r, x, m, ΔV_drag, ΔV_gravity)`.
    pub trajectory: Trajectory,
    pub acceleration: Vec<f64>,
}

impl LaunchResult {
    fn from_trajectory(trajectory: Trajectory) -> Self {
        let acceleration = finite_difference(&trajectory.t, &trajectory.series(0));
        Self {
            trajectory,
            acceleration,
        }
    }

    /// Drag and gravity losses accumulated at the last sample (km/s, positive).
    pub fn losses(&self) -> (f64, f64) {
        self.trajectory
            .last_state()
            .map(|y| (-y[5], -y[6]))
            .unwrap_or((0.0, 0.0))
    }
}

/// Powered ascent of one stage through an exponential atmosphere.
#[derive(Debug, Clone, PartialEq)]
pub struct Launcher<'a> {
    ctx: &'a PhysicalContext,
    pub surface_density: f64,
    pub scale_height_km: f64,
}

impl<'a> Launcher<'a> {
    pub fn new(ctx: &'a PhysicalContext) -> Self {
        Self {
            ctx,
            surface_density: 1.225,
            scale_height_km: 7.5,
        }
    }

    fn derivative(&self, stage: &Stage, t0: f64, pitchover_km: f64, t: f64, y: &[f64], dydt: &mut [f64]) {
        let (v, gamma, r, m) = (y[0], y[1], y[2], y[4]);
        let z = r - self.ctx.radius;
        if z < 0.0 {
            dydt.fill(0.0);
            return;
        }
        let k = self.ctx.mu;
        let burning = t - t0 <= stage.burn_time;
        let thrust = if burning { stage.thrust(z) * 1e-3 } else { 0.0 };
        let mass_flow = if burning { stage.mass_flow } else { 0.0 };

        let rho = self.surface_density * (-z / self.scale_height_km).exp();
        let q_s = 0.5 * rho * (v * 1e3).powi(2) * stage.area_m2 * 1e-3;
        let lift = q_s * stage.c_l;
        let drag = q_s * stage.c_d;
        let (sx, cx) = stage.thrust_angle.sin_cos();
        let (sg, cg) = gamma.sin_cos();

        if z <= pitchover_km && gamma > 0.0 {
            dydt[0] = thrust * cx / m - drag / m - k / (r * r);
            dydt[1] = if v != 0.0 { (thrust * sx + lift) / (m * v) } else { 0.0 };
            dydt[2] = v;
            dydt[3] = 0.0;
            dydt[4] = -mass_flow;
            dydt[5] = -drag / m;
            dydt[6] = -k / (r * r);
        } else {
            dydt[0] = thrust * cx / m - drag / m - k / (r * r) * sg;
            dydt[1] = thrust * sx / (m * v) + lift / (m * v) - k / (r * r * v) * cg + v / r * cg;
            dydt[2] = v * sg;
            dydt[3] = self.ctx.radius * v / r * cg;
            dydt[4] = -mass_flow;
            dydt[5] = -drag / m;
            dydt[6] = -k / (r * r) * sg;
        }
    }

    /// Integrates from a state whose `r` is already a radius; mass is reset to
    /// the stage's lift-off mass and the motor burns from `t0`.
    fn run(
        &self,
        stage: &Stage,
        state: &[f64],
        pitchover_height_m: f64,
        t0: f64,
        tf: f64,
    ) -> Result<Trajectory, LaunchError> {
        if stage.total_mass <= 0.0 {
            return Err(LaunchError::InvalidInput(
                "stage has no mass; call calc() before launching".into(),
            ));
        }
        let mut y0 = state.to_vec();
        y0[4] = stage.total_mass;
        let pitchover_km = pitchover_height_m * 1e-3;
        let rhs = |t: f64, y: &[f64], dydt: &mut [f64]| self.derivative(stage, t0, pitchover_km, t, y, dydt);

        let radius = self.ctx.radius;
        let ground = Directed {
            function: |_t: f64, y: &[f64]| if y[2] - radius <= 0.0 && y[1] < 0.0 { -1.0 } else { 1.0 },
            direction: EventDirection::Falling,
        };
        Ok(Rk45::new(Tolerances::new(1e-8, 1e-8)).integrate_until(&rhs, &ground, t0, &y0, tf)?)
    }

    /// Ascent of `stage` from `y0` (index 2 holds the altitude in km) between
    /// `t0` and `tf`, pitching over above `pitchover_height_m`.
    pub fn simulate_launch(
        &self,
        stage: &Stage,
        y0: &[f64; 7],
        pitchover_height_m: f64,
        t0: f64,
        tf: f64,
    ) -> Result<LaunchResult, LaunchError> {
        let mut state = y0.to_vec();
        state[2] += self.ctx.radius;
        let trajectory = self.run(stage, &state, pitchover_height_m, t0, tf)?;
        Ok(LaunchResult::from_trajectory(trajectory))
    }
}

/// Flies `stages` in order from `y0` (altitude in km at index 2) until `tf`.
///
/// Each stage starts where the previous one ended, with its own lift-off mass;
/// only the first stage flies the vertical rise below `pitchover_height_m`.
pub fn simulate_ascent(
    ctx: &PhysicalContext,
    stages: &[Stage],
    y0: &[f64; 7],
    pitchover_height_m: f64,
    tf: f64,
) -> Result<LaunchResult, LaunchError> {
    let launcher = Launcher::new(ctx);
    let mut state = y0.to_vec();
    state[2] += ctx.radius;
    let mut trajectory = Trajectory::default();
    let mut t0 = 0.0;
    let mut burn_end = 0.0;
    let mut pitchover = pitchover_height_m;

    for (index, stage) in stages.iter().enumerate() {
        burn_end += stage.burn_time;
        let t_stage = tf.min(burn_end);
        if t_stage <= t0 {
            break;
        }
        let leg = launcher.run(stage, &state, pitchover, t0, t_stage)?;
        let landed = leg.event.is_some();
        if let (Some(t), Some(y)) = (leg.last_time(), leg.last_state()) {
            log::debug!(
                "stage {} burnout at t = {t:.1} s: V = {:.3} km/s, h = {:.1} km",
                index + 1,
                y[0],
                y[2] - ctx.radius
            );
            t0 = t;
            state = y.to_vec();
        }
        trajectory.extend(leg);
        if landed {
            log::warn!("vehicle returned to the ground during stage {}", index + 1);
            break;
        }
        pitchover = 0.0;
    }

    Ok(LaunchResult::from_trajectory(trajectory))
}
