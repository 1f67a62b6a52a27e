use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, bail};
use chrono::NaiveDate;
use clap::Parser;

use astro_mission_engine::core::Planet;
use astro_mission_engine::export::{porkchop as export_porkchop, writer_for_path};
use astro_mission_engine::interplanetary::{DateWindow, PorkchopRequest, porkchop};

/// Generate porkchop data (CSV) by sweeping departure and arrival dates.
#[derive(Parser, Debug)]
#[command(author, version, about = "Porkchop CSV generator (prograde Lambert transfers)")]
struct Cli {
    /// Departure planet name (case-insensitive)
    #[arg(long)]
    from: String,

    /// Destination planet name (case-insensitive)
    #[arg(long)]
    to: String,

    /// Departure window start (YYYY-MM-DD)
    #[arg(long)]
    depart_start: NaiveDate,

    /// Departure window end (YYYY-MM-DD)
    #[arg(long)]
    depart_end: NaiveDate,

    /// Arrival window start (YYYY-MM-DD)
    #[arg(long)]
    arrive_start: NaiveDate,

    /// Arrival window end (YYYY-MM-DD)
    #[arg(long)]
    arrive_end: NaiveDate,

    /// Grid step in days
    #[arg(long, default_value_t = 5)]
    step_days: i64,

    /// Output CSV file (use '-' for stdout)
    #[arg(long, default_value = "artifacts/porkchop.csv")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if cli.step_days <= 0 {
        bail!("--step-days must be positive, got {}", cli.step_days);
    }
    if cli.depart_end < cli.depart_start || cli.arrive_end < cli.arrive_start {
        bail!("window end dates must not precede their start dates");
    }

    let request = PorkchopRequest {
        origin: cli.from.parse::<Planet>()?,
        destination: cli.to.parse::<Planet>()?,
        departure_window: DateWindow::new(cli.depart_start, cli.depart_end),
        arrival_window: DateWindow::new(cli.arrive_start, cli.arrive_end),
        step_days: cli.step_days,
    };
    log::info!(
        "sweeping {} → {} departures {}..{} arrivals {}..{} every {} days",
        request.origin,
        request.destination,
        cli.depart_start,
        cli.depart_end,
        cli.arrive_start,
        cli.arrive_end,
        cli.step_days
    );

    let grid = porkchop(&request)?;
    let mut writer = writer_for_path(&cli.output)?;
    export_porkchop::write_csv(writer.as_mut(), &grid)?;
    writer.flush()?;

    let best = grid
        .best()
        .ok_or_else(|| anyhow!("no feasible transfer in the requested windows"))?;
    let feasible = grid.points.iter().filter(|p| p.feasible).count();
    eprintln!(
        "{feasible}/{} feasible cells; best: depart {} arrive {} ({:.1} days), v∞ {:.4} + {:.4} km/s, C3 {:.3} km²/s²",
        grid.points.len(),
        best.departure,
        best.arrival,
        best.tof_days,
        best.vinf_depart_km_s,
        best.vinf_arrive_km_s,
        best.c3_km2_s2
    );
    Ok(())
}
