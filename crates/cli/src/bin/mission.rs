use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow, bail};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};

use astro_mission_engine::config::{
    BodyConfig, EntryScenarioConfig, LaunchScenarioConfig, load_bodies, load_entry_scenarios, load_launch_scenarios,
    resolve_body,
};
use astro_mission_engine::core::series::extrema;
use astro_mission_engine::core::{PhysicalContext, Planet};
use astro_mission_engine::entry::simulate_entry;
use astro_mission_engine::export::{sidecar, trajectory, writer_for_path};
use astro_mission_engine::impulsive::{ApseOrbit, HohmannDirection, ManeuverPlanner, Propulsion};
use astro_mission_engine::interplanetary::{TransferRequest, optimal_transfer};
use astro_mission_engine::launch::simulate_ascent;
use astro_mission_engine::orbits::three_d::ground_track;
use astro_mission_engine::orbits::{orbital_elements, orbital_parameters};

#[derive(Parser)]
#[command(author, version, about = "Mission analysis CLI: orbits, manoeuvres, entry, launch and transfers")]
struct Cli {
    /// Body catalog (YAML list, TOML file or directory of TOML files)
    #[arg(long, global = true)]
    bodies: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Orbital elements and conic parameters of a state vector
    Elements {
        #[arg(long, default_value = "earth")]
        body: String,
        /// Position x,y,z (km)
        #[arg(long, num_args = 3, value_delimiter = ',', allow_hyphen_values = true)]
        r: Vec<f64>,
        /// Velocity x,y,z (km/s)
        #[arg(long, num_args = 3, value_delimiter = ',', allow_hyphen_values = true)]
        v: Vec<f64>,
    },
    /// Hohmann transfer between two coaxial orbits given by their apse altitudes
    Hohmann {
        #[arg(long, default_value = "earth")]
        body: String,
        /// Initial periapsis and apoapsis altitudes (km)
        #[arg(long, num_args = 2, value_delimiter = ',')]
        from: Vec<f64>,
        /// Target periapsis and apoapsis altitudes (km)
        #[arg(long, num_args = 2, value_delimiter = ',')]
        to: Vec<f64>,
        /// Burn at the initial apoapsis instead of the periapsis
        #[arg(long, default_value_t = false)]
        from_apoapsis: bool,
        #[arg(long, default_value_t = 1000.0)]
        mass: f64,
        #[arg(long, default_value_t = 300.0)]
        isp: f64,
    },
    /// Atmospheric entry scenario from a catalog
    Entry {
        #[arg(long, default_value = "configs/entry.yaml")]
        scenario: PathBuf,
        /// Scenario name (defaults to the first one)
        #[arg(long)]
        name: Option<String>,
        /// Trajectory CSV (use '-' for stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Multi-stage ascent scenario from a catalog
    Launch {
        #[arg(long, default_value = "configs/launch.yaml")]
        scenario: PathBuf,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Ground track of an orbit including J2 drift of the node and periapsis
    GroundTrack {
        #[arg(long, default_value = "earth")]
        body: String,
        #[arg(long)]
        perigee_altitude: f64,
        #[arg(long)]
        apogee_altitude: f64,
        /// Inclination (deg)
        #[arg(long, default_value_t = 0.0)]
        inclination: f64,
        #[arg(long, default_value_t = 0.0)]
        raan: f64,
        #[arg(long, default_value_t = 0.0)]
        arg_periapsis: f64,
        #[arg(long, default_value_t = 0.0)]
        true_anomaly: f64,
        #[arg(long, default_value_t = 3.0)]
        orbits: f64,
        /// Sampling step (s)
        #[arg(long, default_value_t = 60.0)]
        step: f64,
        #[arg(long, default_value = "-")]
        output: PathBuf,
    },
    /// Two-impulse planet-to-planet transfer on fixed dates
    Transfer {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Departure date (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)
        #[arg(long)]
        depart: String,
        #[arg(long)]
        arrive: String,
        /// Parking orbit altitude at the origin (km)
        #[arg(long, default_value_t = 300.0)]
        parking_altitude: f64,
        /// Capture periapsis altitude (km); omitted picks the cheapest capture
        #[arg(long)]
        capture_altitude: Option<f64>,
        /// Capture orbit period (hours)
        #[arg(long, default_value_t = 48.0)]
        capture_period: f64,
        #[arg(long, default_value_t = 2000.0)]
        mass: f64,
        #[arg(long, default_value_t = 300.0)]
        isp: f64,
        /// JSON file receiving the full plan
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let catalog = match &cli.bodies {
        Some(path) => load_bodies(path)?,
        None => Vec::new(),
    };

    match cli.command {
        Command::Elements { body, r, v } => run_elements(&resolve_body(&body, &catalog)?, &r, &v),
        Command::Hohmann {
            body,
            from,
            to,
            from_apoapsis,
            mass,
            isp,
        } => {
            let ctx = resolve_body(&body, &catalog)?;
            let initial = ApseOrbit::new(ctx.radius + from[0], ctx.radius + from[1]);
            let target = ApseOrbit::new(ctx.radius + to[0], ctx.radius + to[1]);
            let direction = if from_apoapsis {
                HohmannDirection::ApoapsisToPeriapsis
            } else {
                HohmannDirection::PeriapsisToApoapsis
            };
            let result = ManeuverPlanner::new(&ctx)
                .with_isp(isp)
                .hohmann_transfer(&initial, &target, direction, mass);
            println!("=== Hohmann transfer around {} ===", ctx.name);
            println!("Δv total       : {:.4} km/s", result.dv);
            println!("Transfer time  : {:.1} s ({:.3} h)", result.dt, result.dt / 3600.0);
            println!("Propellant     : {:.2} kg", result.dm);
            println!("Transfer e     : {:.6}", result.elements.e);
            Ok(())
        }
        Command::Entry { scenario, name, output } => {
            let scenarios = load_entry_scenarios(&scenario)?;
            let chosen = select(&scenarios, name.as_deref(), |s| &s.name)?;
            run_entry(chosen, &catalog, output.as_deref())
        }
        Command::Launch { scenario, name, output } => {
            let scenarios = load_launch_scenarios(&scenario)?;
            let chosen = select(&scenarios, name.as_deref(), |s| &s.name)?;
            run_launch(chosen, &catalog, output.as_deref())
        }
        Command::GroundTrack {
            body,
            perigee_altitude,
            apogee_altitude,
            inclination,
            raan,
            arg_periapsis,
            true_anomaly,
            orbits,
            step,
            output,
        } => {
            let ctx = resolve_body(&body, &catalog)?;
            let apses = ApseOrbit::new(ctx.radius + perigee_altitude, ctx.radius + apogee_altitude);
            let mut elements = apses.elements(ctx.mu, true_anomaly.to_radians());
            elements.i = inclination.to_radians();
            elements.raan = raan.to_radians();
            elements.arg_periapsis = arg_periapsis.to_radians();
            let track = ground_track(&ctx, &elements, step, orbits)?
                .ok_or_else(|| anyhow!("open orbits have no ground track"))?;
            let mut writer = writer_for_path(&output)?;
            trajectory::write_columns(writer.as_mut(), &[("ra_deg", track.ra.as_slice()), ("dec_deg", track.dec.as_slice())])?;
            writer.flush()?;
            log::info!("ground track: {} samples", track.len());
            Ok(())
        }
        Command::Transfer {
            from,
            to,
            depart,
            arrive,
            parking_altitude,
            capture_altitude,
            capture_period,
            mass,
            isp,
            output,
        } => {
            let origin: Planet = from.parse()?;
            let destination: Planet = to.parse()?;
            let origin_ctx = PhysicalContext::of(origin.body());
            let destination_ctx = PhysicalContext::of(destination.body());
            let request = TransferRequest {
                origin,
                destination,
                departure: parse_epoch(&depart)?,
                arrival: parse_epoch(&arrive)?,
                parking_radius: origin_ctx.radius + parking_altitude,
                capture_periapsis: capture_altitude.map(|z| destination_ctx.radius + z),
                capture_period: capture_period * 3600.0,
                mass,
                propulsion: Propulsion::new(isp),
            };
            let plan = optimal_transfer(&request)?;

            println!("=== {origin} → {destination} ===");
            println!("Time of flight : {:.2} days", plan.time_of_flight_days);
            println!("C3             : {:.4} km²/s²", plan.c3());
            println!(
                "Departure burn : Δv = {:.4} km/s, propellant = {:.1} kg",
                plan.departure.dv, plan.departure.dm
            );
            println!(
                "Arrival burn   : Δv = {:.4} km/s, propellant = {:.1} kg",
                plan.arrival.dv, plan.arrival.dm
            );
            println!(
                "Total          : Δv = {:.4} km/s, propellant = {:.1} kg",
                plan.total_dv(),
                plan.total_propellant()
            );
            if let Some(path) = output {
                let mut writer = writer_for_path(&path)?;
                sidecar::write_pretty(writer.as_mut(), &plan)?;
            }
            Ok(())
        }
    }
}

fn run_elements(ctx: &PhysicalContext, r: &[f64], v: &[f64]) -> anyhow::Result<()> {
    let r = [r[0], r[1], r[2]];
    let v = [v[0], v[1], v[2]];
    let elements = orbital_elements(ctx, &r, &v).to_degrees();
    let params = orbital_parameters(ctx, &r, &v);
    println!("=== Orbit around {} ===", ctx.name);
    println!("Regime         : {:?}", params.regime);
    println!("h              : {:.3} km²/s", elements.h);
    println!("e              : {:.6}", elements.e);
    println!("i              : {:.4} deg", elements.i);
    println!("RAAN           : {:.4} deg", elements.raan);
    println!("ω              : {:.4} deg", elements.arg_periapsis);
    println!("θ              : {:.4} deg", elements.true_anomaly);
    println!("a              : {:.3} km", elements.a);
    println!("Energy         : {:.6} km²/s²", params.energy);
    if params.period.is_finite() {
        println!("Period         : {:.2} s", params.period);
        println!("Apses          : r_p = {:.3} km, r_a = {:.3} km", params.r_p, params.r_a);
    } else {
        println!("Periapsis      : r_p = {:.3} km", params.r_p);
    }
    Ok(())
}

fn run_entry(scenario: &EntryScenarioConfig, catalog: &[BodyConfig], output: Option<&Path>) -> anyhow::Result<()> {
    let ctx = resolve_body(&scenario.body, catalog)?;
    let capsule = scenario.capsule.to_capsule();
    let atmosphere = scenario.atmosphere.unwrap_or_default();
    let result = simulate_entry(
        &ctx,
        &capsule,
        &atmosphere,
        &scenario.initial_state(),
        0.0,
        scenario.final_time_s,
    )?;

    let deceleration: Vec<f64> = result.acceleration.iter().map(|a| -a).collect();
    let peak_deceleration = deceleration.iter().copied().fold(0.0, f64::max);
    let pulses = extrema(&deceleration).maxima.len();
    let peak_heat = result.heat_flux.iter().copied().fold(0.0, f64::max);
    let last = result
        .trajectory
        .last_state()
        .ok_or_else(|| anyhow!("entry produced no samples"))?;
    println!("=== Entry '{}' at {} ===", scenario.name, ctx.name);
    println!("Duration        : {:.1} s", result.trajectory.span());
    println!("Final speed     : {:.4} km/s", last[0]);
    println!("Final altitude  : {:.3} km", last[2] - ctx.radius);
    println!("Downrange       : {:.1} km", last[3]);
    println!(
        "Peak decel.     : {:.2} g ({pulses} deceleration pulses)",
        peak_deceleration / ctx.surface_gravity.max(f64::MIN_POSITIVE)
    );
    println!("Peak heat flux  : {peak_heat:.3e} W/m²");
    match result.parachute_deployed_at {
        Some(t) => println!("Parachute       : deployed at t = {t:.1} s"),
        None => println!("Parachute       : not deployed"),
    }
    println!("Landed          : {}", result.landed());

    if let Some(path) = output {
        let mut writer = writer_for_path(path)?;
        trajectory::write_csv(
            writer.as_mut(),
            &["v_km_s", "gamma_rad", "r_km", "x_km", "m_kg"],
            &result.trajectory,
            &[
                ("accel_km_s2", result.acceleration.as_slice()),
                ("heat_flux_w_m2", result.heat_flux.as_slice()),
            ],
        )?;
        writer.flush()?;
    }
    Ok(())
}

fn run_launch(scenario: &LaunchScenarioConfig, catalog: &[BodyConfig], output: Option<&Path>) -> anyhow::Result<()> {
    let ctx = resolve_body(&scenario.body, catalog)?;
    let stages = scenario.build_stages()?;
    let burnout: f64 = stages.iter().map(|s| s.burn_time).sum();
    let tf = scenario.final_time_s.unwrap_or(burnout);
    let result = simulate_ascent(
        &ctx,
        &stages,
        &scenario.initial_state(),
        scenario.pitchover_height_m,
        tf,
    )?;

    let last = result
        .trajectory
        .last_state()
        .ok_or_else(|| anyhow!("ascent produced no samples"))?;
    let (drag_loss, gravity_loss) = result.losses();
    println!("=== Launch '{}' from {} ===", scenario.name, ctx.name);
    println!("Stages          : {}", stages.len());
    println!("Flight time     : {:.1} s", result.trajectory.span());
    println!("Speed           : {:.4} km/s", last[0]);
    println!("Flight path     : {:.3} deg", last[1].to_degrees());
    println!("Altitude        : {:.3} km", last[2] - ctx.radius);
    println!("Downrange       : {:.2} km", last[3]);
    println!("Drag loss       : {drag_loss:.4} km/s");
    println!("Gravity loss    : {gravity_loss:.4} km/s");

    if let Some(path) = output {
        let mut writer = writer_for_path(path)?;
        trajectory::write_csv(
            writer.as_mut(),
            &["v_km_s", "gamma_rad", "r_km", "x_km", "m_kg", "dv_drag_km_s", "dv_gravity_km_s"],
            &result.trajectory,
            &[("accel_km_s2", result.acceleration.as_slice())],
        )?;
        writer.flush()?;
        if path != Path::new("-") {
            let written = sidecar::write_json(path, "stages", &stages)?;
            log::info!("stage summary written to {}", written.display());
        }
    }
    Ok(())
}

fn select<'a, T>(items: &'a [T], name: Option<&str>, key: impl Fn(&T) -> &String) -> anyhow::Result<&'a T> {
    match name {
        Some(wanted) => items
            .iter()
            .find(|item| key(item).eq_ignore_ascii_case(wanted))
            .ok_or_else(|| anyhow!("scenario '{wanted}' not found in catalog")),
        None => items.first().ok_or_else(|| anyhow!("scenario catalog is empty")),
    }
}

fn parse_epoch(text: &str) -> anyhow::Result<NaiveDateTime> {
    if let Ok(t) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Ok(t);
    }
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").with_context(|| format!("invalid date '{text}'"))?;
    match date.and_hms_opt(0, 0, 0) {
        Some(t) => Ok(t),
        None => bail!("invalid date '{text}'"),
    }
}
