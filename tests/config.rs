use std::fs;
use std::path::PathBuf;

use approx::assert_relative_eq;

use astro_mission_engine::config::{
    ConfigError, load_bodies, load_capsules, load_entry_scenarios, load_launch_scenarios, load_stages, resolve_body,
};
use astro_mission_engine::core::{CelestialBody, PhysicalContext};

fn sample(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("configs").join(name)
}

#[test]
fn sample_bodies_resolve() {
    let bodies = load_bodies(sample("bodies.yaml")).expect("bodies");
    assert_eq!(bodies.len(), 2);

    let spherical = resolve_body("Earth-Spherical", &bodies).expect("custom earth");
    let earth = PhysicalContext::of(CelestialBody::Earth);
    assert_eq!(spherical.name, "earth-spherical");
    assert_eq!(spherical.body, Some(CelestialBody::Earth));
    assert_eq!(spherical.j2, 0.0);
    assert_eq!(spherical.flattening, 0.0);
    assert_relative_eq!(spherical.mu, earth.mu);
    assert_relative_eq!(spherical.radius, earth.radius);

    let ceres = resolve_body("ceres", &bodies).expect("ceres");
    assert_eq!(ceres.body, None);
    assert_relative_eq!(ceres.surface_gravity, 62.63 / (469.7 * 469.7), max_relative = 1e-12);
    assert_relative_eq!(ceres.rotation_rate, 1.923e-4);

    let mars = resolve_body("MARS", &bodies).expect("known body");
    assert_eq!(mars.body, Some(CelestialBody::Mars));
}

#[test]
fn unknown_body_is_reported() {
    let err = resolve_body("vulcan", &[]).expect_err("no such body");
    assert!(matches!(err, ConfigError::UnknownBody(_)));
}

#[test]
fn custom_body_without_constants_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bodies.yaml");
    fs::write(&path, "- name: rogue\n  radius_km: 100.0\n").expect("write");
    let err = load_bodies(&path).expect_err("mu missing");
    assert!(matches!(err, ConfigError::Invalid(_)), "{err}");

    fs::write(&path, "- name: hollow\n  preset: moon\n  radius_km: -1.0\n").expect("write");
    assert!(matches!(load_bodies(&path), Err(ConfigError::Invalid(_))));
}

#[test]
fn overrides_convert_surface_gravity_to_km() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bodies.yaml");
    fs::write(&path, "- name: heavy-mars\n  preset: mars\n  surface_gravity_m_s2: 4.0\n").expect("write");
    let bodies = load_bodies(&path).expect("bodies");
    let ctx = bodies[0].to_context().expect("context");
    assert_relative_eq!(ctx.surface_gravity, 4.0e-3);
    assert_relative_eq!(ctx.mu, CelestialBody::Mars.mu());
}

#[test]
fn sample_launch_scenarios_build_stages() {
    let scenarios = load_launch_scenarios(sample("launch.yaml")).expect("launch scenarios");
    let single = scenarios.iter().find(|s| s.name == "single-stage").expect("single-stage");
    let stages = single.build_stages().expect("stages");
    assert_eq!(stages.len(), 1);
    assert_relative_eq!(stages[0].burn_time, 259.911, epsilon = 1e-2);
    assert_relative_eq!(single.initial_state()[1], 89.85f64.to_radians());
    assert_eq!(single.final_time_s, None);

    let two = scenarios.iter().find(|s| s.name == "two-stage").expect("two-stage");
    let stages = two.build_stages().expect("stages");
    assert_eq!(stages.len(), 2);
    assert_relative_eq!(stages[0].total_mass, 162_000.0);
    assert!(stages[0].gamma > 0.0 && stages[0].nozzle_factor > 0.0);
    assert_eq!(stages[1].gamma, 0.0);
    assert_relative_eq!(stages[0].area_m2, std::f64::consts::PI * 3.7 * 3.7 / 4.0);
}

#[test]
fn stage_without_thrust_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("launch.yaml");
    fs::write(
        &path,
        "- name: dud\n  stages:\n    - structural_mass_kg: 100.0\n      propellant_mass_kg: 900.0\n      \
         thrust_vac_n: 0.0\n      isp_vac_s: 300.0\n      diameter_m: 1.0\n      c_d: 0.5\n",
    )
    .expect("write");
    let scenarios = load_launch_scenarios(&path).expect("parses");
    assert_eq!(scenarios[0].body, "earth");
    assert!(matches!(scenarios[0].build_stages(), Err(ConfigError::Stage(_))));

    fs::write(&path, "- name: empty\n  stages: []\n").expect("write");
    let scenarios = load_launch_scenarios(&path).expect("parses");
    assert!(matches!(scenarios[0].build_stages(), Err(ConfigError::Invalid(_))));
}

#[test]
fn sample_entry_scenarios_parse() {
    let scenarios = load_entry_scenarios(sample("entry.yaml")).expect("entry scenarios");
    assert_eq!(scenarios.len(), 3);

    let plain = &scenarios[0];
    let capsule = plain.capsule.to_capsule();
    assert_relative_eq!(capsule.c_d, 1.096);
    assert_relative_eq!(capsule.nose_radius_m, 0.3);
    assert_eq!(capsule.thrust_n, 0.0);
    assert!(capsule.parachute.is_none());
    assert!(plain.atmosphere.is_none());
    let y0 = plain.initial_state();
    assert_relative_eq!(y0[1], (-9.0f64).to_radians());
    assert_relative_eq!(y0[4], 26.27);

    let chute = scenarios[1].capsule.to_capsule().parachute.expect("parachute");
    assert_relative_eq!(chute.area_m2, 70.0);
    assert_relative_eq!(chute.deploy_altitude_km, 5.0);

    let lifting = &scenarios[2];
    assert_relative_eq!(lifting.capsule.to_capsule().c_l, 0.3);
    let atmosphere = lifting.atmosphere.expect("atmosphere");
    assert_relative_eq!(atmosphere.scale_height_km, 7.5);
}

#[test]
fn toml_directories_load_in_name_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("b_retro.toml"),
        "name = \"retro\"\nc_d = 1.2\narea_m2 = 3.0\nthrust_n = 500.0\nthrust_angle_deg = 180.0\n",
    )
    .expect("write");
    fs::write(dir.path().join("a_plain.toml"), "name = \"plain\"\nc_d = 1.0\narea_m2 = 2.0\n").expect("write");
    fs::write(dir.path().join("notes.txt"), "ignored").expect("write");

    let capsules = load_capsules(dir.path()).expect("capsules");
    assert_eq!(capsules.len(), 2);
    assert_eq!(capsules[0].name, "plain");
    let retro = capsules[1].to_capsule();
    assert_relative_eq!(retro.thrust_n, 500.0);
    assert_relative_eq!(retro.thrust_angle, std::f64::consts::PI);
    assert_relative_eq!(retro.isp_s, 300.0);
}

#[test]
fn single_toml_stage_loads() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("upper.toml");
    fs::write(
        &path,
        "name = \"upper\"\nstructural_mass_kg = 2500.0\npropellant_mass_kg = 25000.0\n\
         thrust_vac_n = 450000.0\nisp_vac_s = 345.0\ndiameter_m = 3.7\nc_d = 0.5\n",
    )
    .expect("write");
    let stages = load_stages(&path).expect("stages");
    assert_eq!(stages.len(), 1);
    let stage = stages[0].to_stage().expect("stage");
    assert_relative_eq!(stage.gross_mass, 27_500.0);
}

#[test]
fn malformed_files_report_parse_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let yaml = dir.path().join("broken.yaml");
    fs::write(&yaml, "- name: [unterminated\n").expect("write");
    assert!(matches!(load_capsules(&yaml), Err(ConfigError::Parse(_))));

    let toml = dir.path().join("broken.toml");
    fs::write(&toml, "name = ").expect("write");
    assert!(matches!(load_capsules(&toml), Err(ConfigError::Toml(_))));

    assert!(matches!(
        load_capsules(dir.path().join("missing.yaml")),
        Err(ConfigError::Io(_))
    ));
}
