//! Configuration models and loaders for mission scenarios.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use astro_core::{CelestialBody, PhysicalContext, UnknownBody};
use astro_entry::{Capsule, EntryAtmosphere, Parachute};
use astro_launch::{LaunchError, Stage};

/// Central body parsed from a catalog: either a known body, optionally with
/// overridden constants, or a fully custom one.
#[derive(Debug, Deserialize, Clone)]
pub struct BodyConfig {
    pub name: String,
    /// Known body whose constants fill every field left out.
    #[serde(default)]
    pub preset: Option<CelestialBody>,
    #[serde(default)]
    pub mu_km3_s2: Option<f64>,
    #[serde(default)]
    pub radius_km: Option<f64>,
    #[serde(default)]
    pub j2: Option<f64>,
    #[serde(default)]
    pub flattening: Option<f64>,
    #[serde(default)]
    pub rotation_rate_rad_s: Option<f64>,
    #[serde(default)]
    pub surface_gravity_m_s2: Option<f64>,
}

impl BodyConfig {
    pub fn to_context(&self) -> Result<PhysicalContext, ConfigError> {
        let mut ctx = match self.preset {
            Some(body) => PhysicalContext::of(body),
            None => {
                let (Some(mu), Some(radius)) = (self.mu_km3_s2, self.radius_km) else {
                    return Err(ConfigError::Invalid(format!(
                        "body '{}' has no preset, so mu_km3_s2 and radius_km are required",
                        self.name
                    )));
                };
                PhysicalContext {
                    body: None,
                    name: self.name.clone(),
                    mu,
                    radius,
                    j2: 0.0,
                    flattening: 0.0,
                    rotation_rate: 0.0,
                    surface_gravity: mu / (radius * radius),
                }
            }
        };
        ctx.name = self.name.clone();
        if let Some(mu) = self.mu_km3_s2 {
            ctx.mu = mu;
        }
        if let Some(radius) = self.radius_km {
            ctx.radius = radius;
        }
        if let Some(j2) = self.j2 {
            ctx.j2 = j2;
        }
        if let Some(flattening) = self.flattening {
            ctx.flattening = flattening;
        }
        if let Some(rate) = self.rotation_rate_rad_s {
            ctx.rotation_rate = rate;
        }
        if let Some(g) = self.surface_gravity_m_s2 {
            ctx.surface_gravity = g * 1e-3;
        }
        if ctx.mu <= 0.0 || ctx.radius <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "body '{}' needs positive mu and radius, got {} and {}",
                self.name, ctx.mu, ctx.radius
            )));
        }
        Ok(ctx)
    }
}

/// Nozzle data of a stage; stages without it fly at vacuum thrust.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct NozzleConfig {
    pub gamma: f64,
    pub expansion_ratio: f64,
    pub chamber_pressure_atm: f64,
}

/// Launcher stage parsed from a catalog.
#[derive(Debug, Deserialize, Clone)]
pub struct StageConfig {
    #[serde(default)]
    pub name: String,
    pub structural_mass_kg: f64,
    pub propellant_mass_kg: f64,
    #[serde(default)]
    pub payload_mass_kg: f64,
    pub thrust_vac_n: f64,
    pub isp_vac_s: f64,
    #[serde(default)]
    pub thrust_angle_deg: f64,
    #[serde(default)]
    pub nozzle: Option<NozzleConfig>,
    pub diameter_m: f64,
    pub c_d: f64,
    #[serde(default)]
    pub c_l: f64,
}

impl StageConfig {
    pub fn to_stage(&self) -> Result<Stage, ConfigError> {
        let nozzle = self.nozzle.unwrap_or(NozzleConfig {
            gamma: 0.0,
            expansion_ratio: 0.0,
            chamber_pressure_atm: 0.0,
        });
        Ok(Stage::default()
            .mass(self.structural_mass_kg, self.propellant_mass_kg, self.payload_mass_kg)
            .motor(self.thrust_vac_n, self.isp_vac_s, self.thrust_angle_deg.to_radians())
            .nozzle(nozzle.gamma, nozzle.expansion_ratio, nozzle.chamber_pressure_atm)
            .aerodynamics(self.diameter_m, self.c_d, self.c_l)
            .calc()?)
    }
}

/// Entry capsule parsed from a catalog.
#[derive(Debug, Deserialize, Clone)]
pub struct CapsuleConfig {
    #[serde(default)]
    pub name: String,
    pub c_d: f64,
    pub area_m2: f64,
    #[serde(default)]
    pub c_l: f64,
    #[serde(default)]
    pub thrust_n: f64,
    #[serde(default)]
    pub isp_s: Option<f64>,
    #[serde(default)]
    pub thrust_angle_deg: f64,
    #[serde(default)]
    pub nose_radius_m: Option<f64>,
    #[serde(default)]
    pub parachute: Option<Parachute>,
}

impl CapsuleConfig {
    pub fn to_capsule(&self) -> Capsule {
        let mut capsule = Capsule::ballistic(self.c_d, self.area_m2).with_lift(self.c_l);
        if self.thrust_n != 0.0 || self.isp_s.is_some() {
            capsule = capsule.with_thrust(
                self.thrust_n,
                self.isp_s.unwrap_or(capsule.isp_s),
                self.thrust_angle_deg.to_radians(),
            );
        }
        if let Some(r_n) = self.nose_radius_m {
            capsule = capsule.with_nose_radius(r_n);
        }
        if let Some(parachute) = self.parachute {
            capsule = capsule.with_parachute(parachute);
        }
        capsule
    }
}

fn default_earth() -> String {
    "earth".to_string()
}

fn default_launch_angle_deg() -> f64 {
    89.85
}

/// Powered ascent scenario: the stages fly bottom first.
#[derive(Debug, Deserialize, Clone)]
pub struct LaunchScenarioConfig {
    pub name: String,
    #[serde(default = "default_earth")]
    pub body: String,
    pub stages: Vec<StageConfig>,
    #[serde(default = "default_launch_angle_deg")]
    pub flight_path_angle_deg: f64,
    #[serde(default)]
    pub pitchover_height_m: f64,
    /// End of the simulation; defaults to the burnout of the last stage.
    #[serde(default)]
    pub final_time_s: Option<f64>,
}

impl LaunchScenarioConfig {
    pub fn build_stages(&self) -> Result<Vec<Stage>, ConfigError> {
        if self.stages.is_empty() {
            return Err(ConfigError::Invalid(format!("launch '{}' has no stages", self.name)));
        }
        self.stages.iter().map(StageConfig::to_stage).collect()
    }

    /// Launch state `(V, γ, z, x, m, ΔV_drag, ΔV_gravity)` at lift-off.
    pub fn initial_state(&self) -> [f64; 7] {
        [0.0, self.flight_path_angle_deg.to_radians(), 0.0, 0.0, 0.0, 0.0, 0.0]
    }
}

/// Atmospheric entry scenario.
#[derive(Debug, Deserialize, Clone)]
pub struct EntryScenarioConfig {
    pub name: String,
    #[serde(default = "default_earth")]
    pub body: String,
    pub capsule: CapsuleConfig,
    #[serde(default)]
    pub atmosphere: Option<EntryAtmosphere>,
    pub speed_km_s: f64,
    pub flight_path_angle_deg: f64,
    pub altitude_km: f64,
    pub mass_kg: f64,
    pub final_time_s: f64,
}

impl EntryScenarioConfig {
    /// Entry state `(V, γ, z, x, m)` at the interface.
    pub fn initial_state(&self) -> [f64; 5] {
        [
            self.speed_km_s,
            self.flight_path_angle_deg.to_radians(),
            self.altitude_km,
            0.0,
            self.mass_kg,
        ]
    }
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    UnknownBody(#[from] UnknownBody),
    #[error(transparent)]
    Stage(#[from] LaunchError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Resolves `name` against a custom catalog first, then the known bodies.
pub fn resolve_body(name: &str, catalog: &[BodyConfig]) -> Result<PhysicalContext, ConfigError> {
    match catalog.iter().find(|b| b.name.eq_ignore_ascii_case(name)) {
        Some(body) => body.to_context(),
        None => Ok(PhysicalContext::of(name.parse::<CelestialBody>()?)),
    }
}

/// Load body definitions from a YAML list, a TOML file, or a directory of TOML files.
pub fn load_bodies<P: AsRef<Path>>(path: P) -> Result<Vec<BodyConfig>, ConfigError> {
    let bodies: Vec<BodyConfig> = load_records(path)?;
    for body in &bodies {
        body.to_context()?;
    }
    Ok(bodies)
}

pub fn load_stages<P: AsRef<Path>>(path: P) -> Result<Vec<StageConfig>, ConfigError> {
    load_records(path)
}

pub fn load_capsules<P: AsRef<Path>>(path: P) -> Result<Vec<CapsuleConfig>, ConfigError> {
    load_records(path)
}

pub fn load_launch_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<LaunchScenarioConfig>, ConfigError> {
    load_records(path)
}

pub fn load_entry_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<EntryScenarioConfig>, ConfigError> {
    load_records(path)
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let records: Vec<T> = if path.is_dir() {
        read_dir_records(path)?
    } else if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        vec![toml::from_str(&contents)?]
    } else {
        let reader = File::open(path)?;
        serde_yaml::from_reader(reader)?
    };
    log::debug!("loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "toml").unwrap_or(false))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}
