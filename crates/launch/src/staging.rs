use serde::{Deserialize, Serialize};

use astro_core::NewtonOptions;
use astro_core::constants::{G0, G0_KM};
use astro_core::solve::{bisect, newton};

use crate::LaunchError;
use crate::stage::Stage;

/// Vehicle sizing inputs; every list holds one entry per stage, bottom stage first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagingRequest {
    pub payload_kg: f64,
    /// Velocity to reach at final burnout (km/s), shared equally by the stages.
    pub burnout_velocity_km_s: f64,
    /// Lift-off thrust-to-weight ratio ψ of each stage.
    pub thrust_to_weight: Vec<f64>,
    pub isp_s: Vec<f64>,
    /// Mean flight-path angle over each burn (rad).
    pub gamma_avg: Vec<f64>,
    /// Structure over structure plus propellant.
    pub structural_fraction: Vec<f64>,
}

impl StagingRequest {
    fn check(&self, stages: usize) -> Result<(), LaunchError> {
        let lists: [(&'static str, usize); 4] = [
            ("thrust_to_weight", self.thrust_to_weight.len()),
            ("isp_s", self.isp_s.len()),
            ("gamma_avg", self.gamma_avg.len()),
            ("structural_fraction", self.structural_fraction.len()),
        ];
        for (field, actual) in lists {
            if actual != stages {
                return Err(LaunchError::StageCountMismatch {
                    field,
                    expected: stages,
                    actual,
                });
            }
        }
        if stages == 0 {
            return Err(LaunchError::InvalidInput("a vehicle needs at least one stage".into()));
        }
        if self.payload_kg <= 0.0 || self.burnout_velocity_km_s <= 0.0 {
            return Err(LaunchError::InvalidInput(format!(
                "payload and burnout velocity must be positive, got {} kg and {} km/s",
                self.payload_kg, self.burnout_velocity_km_s
            )));
        }
        Ok(())
    }
}

/// Burn time giving `dv` (km/s) for a stage of thrust-to-weight `psi`,
/// specific impulse `isp` and mean flight-path angle `gamma`.
fn burn_time(stage: usize, dv: f64, psi: f64, isp: f64, gamma: f64) -> Result<f64, LaunchError> {
    if psi <= 0.0 || isp <= 0.0 {
        return Err(LaunchError::InfeasibleStaging {
            stage,
            reason: format!("thrust-to-weight {psi} and specific impulse {isp} must be positive"),
        });
    }
    // Propellant runs out at t = Isp/ψ.
    let t_max = isp / psi;
    let gravity = G0_KM * gamma.sin();
    let f = |t: f64| isp * G0_KM * (1.0 / (1.0 - psi * t / isp)).ln() - gravity * t - dv;
    let df = |t: f64| G0_KM * psi / (1.0 - psi * t / isp) - gravity;
    let options = NewtonOptions::default().with_tolerance(1e-12).with_max_iterations(200);

    let t_b = match newton(f, df, 0.5 * t_max, options) {
        Ok(t) if t > 0.0 && t < t_max => t,
        _ => {
            log::debug!("stage {stage}: newton left (0, {t_max:.3}) s, bisecting");
            let hi = t_max * (1.0 - 1e-12);
            if f(hi) <= 0.0 {
                return Err(LaunchError::InfeasibleStaging {
                    stage,
                    reason: format!("cannot deliver {dv:.4} km/s even by burning all of its mass"),
                });
            }
            bisect(f, 0.0, hi, options)?
        }
    };
    Ok(t_b)
}

/// Sizes a vehicle with `stages` stages for `request` and returns them bottom first.
///
/// Stages are sized from the top down: each stage's lift-off mass becomes the
/// payload of the stage beneath it.
pub fn stage_vehicle_to_orbit(request: &StagingRequest, stages: usize) -> Result<Vec<Stage>, LaunchError> {
    request.check(stages)?;
    let dv = request.burnout_velocity_km_s / stages as f64;
    let mut payload = request.payload_kg;
    let mut vehicle = Vec::with_capacity(stages);

    for i in (0..stages).rev() {
        let number = i + 1;
        let psi = request.thrust_to_weight[i];
        let isp = request.isp_s[i];
        let k_s = request.structural_fraction[i];
        if !(0.0..1.0).contains(&k_s) {
            return Err(LaunchError::InfeasibleStaging {
                stage: number,
                reason: format!("structural fraction {k_s} is outside [0, 1)"),
            });
        }

        let t_b = burn_time(number, dv, psi, isp, request.gamma_avg[i])?;
        let lambda = psi * t_b / isp;
        let denominator = 1.0 - lambda / (1.0 - k_s);
        if denominator <= 0.0 {
            return Err(LaunchError::InfeasibleStaging {
                stage: number,
                reason: format!(
                    "propellant fraction {lambda:.4} leaves no room for structure at k_s = {k_s}"
                ),
            });
        }
        let m0 = payload / denominator;
        let m_p = lambda * m0;
        let m_s = k_s / (1.0 - k_s) * m_p;

        let stage = Stage::default()
            .mass(m_s, m_p, payload)
            .motor(psi * m0 * G0, isp, 0.0)
            .calc()?;
        log::info!(
            "stage {number}: burn {t_b:.1} s, propellant {m_p:.1} kg, structure {m_s:.1} kg, lift-off {m0:.1} kg"
        );
        vehicle.push(stage);
        payload = m0;
    }

    vehicle.reverse();
    Ok(vehicle)
}

pub fn single_stage_to_orbit(request: &StagingRequest) -> Result<Stage, LaunchError> {
    let mut vehicle = stage_vehicle_to_orbit(request, 1)?;
    vehicle
        .pop()
        .ok_or_else(|| LaunchError::InvalidInput("sizing produced no stage".into()))
}

pub fn two_stage_to_orbit(request: &StagingRequest) -> Result<Vec<Stage>, LaunchError> {
    stage_vehicle_to_orbit(request, 2)
}

pub fn three_stage_to_orbit(request: &StagingRequest) -> Result<Vec<Stage>, LaunchError> {
    stage_vehicle_to_orbit(request, 3)
}
