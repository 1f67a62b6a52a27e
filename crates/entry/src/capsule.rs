use serde::{Deserialize, Serialize};

use astro_core::constants::DEFAULT_ISP_S;

/// Drag parachute opened once the capsule descends through `deploy_altitude_km`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parachute {
    pub c_d: f64,
    pub area_m2: f64,
    pub deploy_altitude_km: f64,
    /// Time over which the drag ramps linearly to its full value (s).
    pub opening_time_s: f64,
}

impl Default for Parachute {
    fn default() -> Self {
        Self {
            c_d: 1.4,
            area_m2: 70.0,
            deploy_altitude_km: 5.0,
            opening_time_s: 3.0,
        }
    }
}

impl Parachute {
    /// Fraction of the full parachute drag acting at time `t`.
    pub fn drag_fraction(&self, state: ParachuteState, t: f64) -> f64 {
        match state {
            ParachuteState::Stowed => 0.0,
            ParachuteState::Deployed { at } => {
                let elapsed = t - at;
                if elapsed < 0.0 {
                    0.0
                } else if self.opening_time_s > 0.0 && elapsed <= self.opening_time_s {
                    elapsed / self.opening_time_s
                } else {
                    1.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub enum ParachuteState {
    #[default]
    Stowed,
    Deployed {
        at: f64,
    },
}

/// Entry vehicle aerodynamics and optional retro/side thrust.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capsule {
    pub thrust_n: f64,
    pub isp_s: f64,
    /// Thrust direction from the velocity vector (rad).
    pub thrust_angle: f64,
    pub c_l: f64,
    pub c_d: f64,
    pub area_m2: f64,
    pub nose_radius_m: f64,
    pub parachute: Option<Parachute>,
}

impl Default for Capsule {
    fn default() -> Self {
        Self {
            thrust_n: 0.0,
            isp_s: DEFAULT_ISP_S,
            thrust_angle: 0.0,
            c_l: 0.0,
            c_d: 1.0,
            area_m2: 1.0,
            nose_radius_m: 0.3,
            parachute: None,
        }
    }
}

impl Capsule {
    /// Unpowered ballistic capsule.
    pub fn ballistic(c_d: f64, area_m2: f64) -> Self {
        Self {
            c_d,
            area_m2,
            ..Self::default()
        }
    }

    pub fn with_lift(mut self, c_l: f64) -> Self {
        self.c_l = c_l;
        self
    }

    pub fn with_thrust(mut self, thrust_n: f64, isp_s: f64, thrust_angle: f64) -> Self {
        self.thrust_n = thrust_n;
        self.isp_s = isp_s;
        self.thrust_angle = thrust_angle;
        self
    }

    pub fn with_parachute(mut self, parachute: Parachute) -> Self {
        self.parachute = Some(parachute);
        self
    }

    pub fn with_nose_radius(mut self, nose_radius_m: f64) -> Self {
        self.nose_radius_m = nose_radius_m;
        self
    }
}

/// Exponential atmosphere used by the entry equations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryAtmosphere {
    /// Surface density driving lift and drag (kg/m³).
    pub surface_density: f64,
    /// Surface density in the stagnation-point heat-flux correlation (kg/m³).
    pub heat_flux_density: f64,
    pub scale_height_km: f64,
}

impl Default for EntryAtmosphere {
    fn default() -> Self {
        Self {
            surface_density: 1.5,
            heat_flux_density: 1.225,
            scale_height_km: 6.9,
        }
    }
}

impl EntryAtmosphere {
    pub fn density(&self, altitude_km: f64) -> f64 {
        self.surface_density * (-altitude_km / self.scale_height_km).exp()
    }

    /// Stagnation-point convective heat flux (W/m²) at speed `v` (km/s).
    pub fn heat_flux(&self, altitude_km: f64, v: f64, nose_radius_m: f64) -> f64 {
        let rho = self.heat_flux_density * (-altitude_km / self.scale_height_km).exp();
        1.7415e-4 / nose_radius_m.sqrt() * rho.sqrt() * (v * 1e3).powi(3)
    }
}
