//! Pork-chop grids: prograde Lambert transfers for every pair of departure
//! and arrival dates in two windows.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use astro_core::calendar::{date_range, date_range_len};
use astro_core::vector;
use astro_core::{PhysicalContext, Planet};
use astro_determination::{OrbitDirection, solve_lambert};

use crate::InterplanetaryError;
use crate::ephemeris::{PlanetState, ephemeris_at};

/// Inclusive range of calendar dates (midnight UT).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PorkchopRequest {
    pub origin: Planet,
    pub destination: Planet,
    pub departure_window: DateWindow,
    pub arrival_window: DateWindow,
    #[serde(default = "default_step_days")]
    pub step_days: i64,
}

fn default_step_days() -> i64 {
    1
}

/// One departure/arrival pair. Excess speeds are zero when `feasible` is false.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PorkchopPoint {
    pub departure: NaiveDate,
    pub arrival: NaiveDate,
    pub tof_days: f64,
    pub vinf_depart_km_s: f64,
    pub vinf_arrive_km_s: f64,
    pub c3_km2_s2: f64,
    pub feasible: bool,
}

impl PorkchopPoint {
    pub fn total_vinf(&self) -> f64 {
        self.vinf_depart_km_s + self.vinf_arrive_km_s
    }
}

/// Grid stored departure-major: all arrivals for the first departure date come first.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PorkchopGrid {
    pub departures: usize,
    pub arrivals: usize,
    pub points: Vec<PorkchopPoint>,
}

impl PorkchopGrid {
    pub fn get(&self, departure: usize, arrival: usize) -> Option<&PorkchopPoint> {
        if departure >= self.departures || arrival >= self.arrivals {
            return None;
        }
        self.points.get(departure * self.arrivals + arrival)
    }

    /// Feasible point with the smallest summed excess speed.
    pub fn best(&self) -> Option<&PorkchopPoint> {
        self.points
            .iter()
            .filter(|p| p.feasible)
            .min_by(|a, b| a.total_vinf().total_cmp(&b.total_vinf()))
    }
}

struct EphemerisSample {
    date: NaiveDate,
    state: Option<PlanetState>,
}

fn build_samples(planet: Planet, window: &DateWindow, step_days: i64) -> Vec<EphemerisSample> {
    date_range(window.start, window.end, step_days)
        .map(|date| {
            let state = ephemeris_at(planet, midnight(date)).ok();
            if state.is_none() {
                log::warn!("no ephemeris for {planet} on {date}");
            }
            EphemerisSample { date, state }
        })
        .collect()
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN)
}

fn evaluate(sun: &PhysicalContext, dep: &PlanetState, arr: &PlanetState, dt: f64) -> Option<(f64, f64)> {
    let solution = solve_lambert(sun, &dep.r, &arr.r, dt, OrbitDirection::Prograde).ok()?;
    let vinf_dep = vector::norm(&vector::sub(&solution.v1, &dep.v));
    let vinf_arr = vector::norm(&vector::sub(&solution.v2, &arr.v));
    (vinf_dep.is_finite() && vinf_arr.is_finite()).then_some((vinf_dep, vinf_arr))
}

/// Evaluates every (departure, arrival) pair; a pair whose Lambert problem has
/// no solution is kept as an infeasible point instead of aborting the grid.
pub fn porkchop(request: &PorkchopRequest) -> Result<PorkchopGrid, InterplanetaryError> {
    let dw = &request.departure_window;
    let aw = &request.arrival_window;
    if dw.end < dw.start || aw.end < aw.start {
        return Err(InterplanetaryError::InvalidInput("date window ends before it starts".into()));
    }
    if request.step_days < 1 {
        return Err(InterplanetaryError::InvalidInput(format!(
            "step must be at least one day, got {}",
            request.step_days
        )));
    }

    let departures = build_samples(request.origin, dw, request.step_days);
    let arrivals = build_samples(request.destination, aw, request.step_days);
    debug_assert_eq!(departures.len(), date_range_len(dw.start, dw.end, request.step_days));

    let sun = PhysicalContext::sun();
    let mut points = Vec::with_capacity(departures.len() * arrivals.len());
    for (row, dep) in departures.iter().enumerate() {
        log::debug!("pork-chop row {}/{} ({})", row + 1, departures.len(), dep.date);
        for arr in &arrivals {
            let dt = (arr.date - dep.date).num_seconds() as f64;
            let result = match (&dep.state, &arr.state) {
                (Some(d), Some(a)) if dt > 0.0 => evaluate(&sun, d, a, dt),
                _ => None,
            };
            let (vinf_dep, vinf_arr) = result.unwrap_or((0.0, 0.0));
            points.push(PorkchopPoint {
                departure: dep.date,
                arrival: arr.date,
                tof_days: dt / 86_400.0,
                vinf_depart_km_s: vinf_dep,
                vinf_arrive_km_s: vinf_arr,
                c3_km2_s2: vinf_dep * vinf_dep,
                feasible: result.is_some(),
            });
        }
    }

    let feasible = points.iter().filter(|p| p.feasible).count();
    log::info!(
        "pork-chop {} -> {}: {} of {} cells feasible",
        request.origin,
        request.destination,
        feasible,
        points.len()
    );

    Ok(PorkchopGrid {
        departures: departures.len(),
        arrivals: arrivals.len(),
        points,
    })
}
