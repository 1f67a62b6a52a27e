use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use astro_core::constants::G0;

use crate::LaunchError;

/// Scale height of the nozzle back-pressure model (km).
const BACK_PRESSURE_SCALE_HEIGHT_KM: f64 = 7.16;

/// One launcher stage: mass budget, motor, nozzle and aerodynamic reference data.
///
/// Inputs are set with [`Stage::mass`], [`Stage::motor`], [`Stage::nozzle`] and
/// [`Stage::aerodynamics`]; [`Stage::calc`] fills in the derived quantities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stage {
    /// Structure and engine mass (kg).
    pub structural_mass: f64,
    pub propellant_mass: f64,
    /// Everything carried above this stage (kg).
    pub payload_mass: f64,
    pub thrust_vac_n: f64,
    pub isp_vac_s: f64,
    /// Thrust direction from the velocity vector (rad).
    pub thrust_angle: f64,
    /// Ratio of specific heats of the exhaust.
    pub gamma: f64,
    pub expansion_ratio: f64,
    /// Combustion chamber pressure (atm).
    pub chamber_pressure_atm: f64,
    pub diameter_m: f64,
    pub c_d: f64,
    pub c_l: f64,

    /// Nozzle function Γ(γ).
    #[serde(skip_deserializing)]
    pub nozzle_factor: f64,
    #[serde(skip_deserializing)]
    pub area_m2: f64,
    /// Structural plus propellant mass (kg).
    #[serde(skip_deserializing)]
    pub gross_mass: f64,
    /// Lift-off mass including payload (kg).
    #[serde(skip_deserializing)]
    pub total_mass: f64,
    #[serde(skip_deserializing)]
    pub mass_flow: f64,
    #[serde(skip_deserializing)]
    pub burn_time: f64,
}

impl Stage {
    pub fn mass(mut self, structural: f64, propellant: f64, payload: f64) -> Self {
        self.structural_mass = structural;
        self.propellant_mass = propellant;
        self.payload_mass = payload;
        self
    }

    pub fn motor(mut self, thrust_vac_n: f64, isp_vac_s: f64, thrust_angle: f64) -> Self {
        self.thrust_vac_n = thrust_vac_n;
        self.isp_vac_s = isp_vac_s;
        self.thrust_angle = thrust_angle;
        self
    }

    pub fn nozzle(mut self, gamma: f64, expansion_ratio: f64, chamber_pressure_atm: f64) -> Self {
        self.gamma = gamma;
        self.expansion_ratio = expansion_ratio;
        self.chamber_pressure_atm = chamber_pressure_atm;
        self.nozzle_factor = if gamma == 0.0 {
            0.0
        } else {
            let gm1 = gamma - 1.0;
            1.0 / gamma * (gm1 * 0.5).powf(gamma / gm1) * ((gamma + 1.0) / gm1).powf((gamma + 1.0) / (2.0 * gm1))
        };
        self
    }

    pub fn aerodynamics(mut self, diameter_m: f64, c_d: f64, c_l: f64) -> Self {
        self.diameter_m = diameter_m;
        self.area_m2 = PI * diameter_m * diameter_m / 4.0;
        self.c_d = c_d;
        self.c_l = c_l;
        self
    }

    /// Derives masses, propellant flow and burn time from the inputs.
    pub fn calc(mut self) -> Result<Self, LaunchError> {
        if self.thrust_vac_n <= 0.0 || self.isp_vac_s <= 0.0 {
            return Err(LaunchError::InvalidInput(format!(
                "stage needs positive thrust and specific impulse, got {} N and {} s",
                self.thrust_vac_n, self.isp_vac_s
            )));
        }
        // Inputs deserialized from a config never ran the setters.
        self = self
            .nozzle(self.gamma, self.expansion_ratio, self.chamber_pressure_atm)
            .aerodynamics(self.diameter_m, self.c_d, self.c_l);
        self.gross_mass = self.structural_mass + self.propellant_mass;
        self.total_mass = self.gross_mass + self.payload_mass;
        self.mass_flow = self.thrust_vac_n / (self.isp_vac_s * G0);
        self.burn_time = self.propellant_mass / self.mass_flow;
        Ok(self)
    }

    /// Thrust (N) at altitude `z_km`, reduced by the nozzle back pressure.
    pub fn thrust(&self, z_km: f64) -> f64 {
        let isp_ratio = if self.chamber_pressure_atm != 0.0 {
            1.0 - self.nozzle_factor * self.expansion_ratio * (-z_km / BACK_PRESSURE_SCALE_HEIGHT_KM).exp()
                / self.chamber_pressure_atm
        } else {
            1.0
        };
        self.thrust_vac_n * isp_ratio
    }

    /// Vacuum thrust over lift-off weight.
    pub fn thrust_to_weight(&self) -> f64 {
        self.thrust_vac_n / (self.total_mass * G0)
    }

    /// Propellant over lift-off mass.
    pub fn propellant_fraction(&self) -> f64 {
        self.propellant_mass / self.total_mass
    }

    /// Structure over structure plus propellant.
    pub fn structural_fraction(&self) -> f64 {
        self.structural_mass / self.gross_mass
    }
}
