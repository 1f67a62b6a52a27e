//! Two-impulse transfer between planets on given dates: Lambert arc around
//! the Sun, escape hyperbola at departure and capture hyperbola at arrival.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use astro_core::vector::{self, Vector3};
use astro_core::{PhysicalContext, Planet};
use astro_determination::{OrbitDirection, solve_lambert};
use astro_impulsive::{ManeuverResult, Propulsion};
use astro_orbits::OrbitalElements;

use crate::InterplanetaryError;
use crate::ephemeris::ephemeris_at;
use crate::hyperbola::{capture, escape};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub origin: Planet,
    pub destination: Planet,
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
    /// Circular parking orbit radius at the origin (km).
    pub parking_radius: f64,
    /// Capture periapsis at the destination (km); `None` picks the cheapest.
    pub capture_periapsis: Option<f64>,
    /// Period of the capture orbit (s).
    pub capture_period: f64,
    /// Spacecraft mass before the departure burn (kg).
    pub mass: f64,
    #[serde(default)]
    pub propulsion: Propulsion,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransferPlan {
    pub departure: ManeuverResult,
    /// Capture burn; its propellant is drawn from the mass left after departure.
    pub arrival: ManeuverResult,
    /// Heliocentric transfer orbit at departure.
    pub transfer: OrbitalElements,
    /// Heliocentric true anomaly at arrival (rad).
    pub arrival_true_anomaly: f64,
    pub v_inf_departure: Vector3,
    pub v_inf_arrival: Vector3,
    pub time_of_flight_days: f64,
}

impl TransferPlan {
    pub fn total_dv(&self) -> f64 {
        self.departure.dv + self.arrival.dv
    }

    pub fn total_propellant(&self) -> f64 {
        self.departure.dm + self.arrival.dm
    }

    /// Launch energy C3 = v∞² at departure (km²/s²).
    pub fn c3(&self) -> f64 {
        vector::dot(&self.v_inf_departure, &self.v_inf_departure)
    }
}

pub fn optimal_transfer(request: &TransferRequest) -> Result<TransferPlan, InterplanetaryError> {
    let dt = (request.arrival - request.departure).num_milliseconds() as f64 * 1e-3;
    if dt <= 0.0 {
        return Err(InterplanetaryError::InvalidInput(format!(
            "arrival {} does not follow departure {}",
            request.arrival, request.departure
        )));
    }

    let origin = ephemeris_at(request.origin, request.departure)?;
    let destination = ephemeris_at(request.destination, request.arrival)?;

    let sun = PhysicalContext::sun();
    let lambert = solve_lambert(&sun, &origin.r, &destination.r, dt, OrbitDirection::Prograde)?;
    let v_inf_departure = vector::sub(&lambert.v1, &origin.v);
    let v_inf_arrival = vector::sub(&lambert.v2, &destination.v);

    let departure = escape(
        &PhysicalContext::of(request.origin.body()),
        request.parking_radius,
        vector::norm(&v_inf_departure),
        request.mass,
        request.propulsion,
    )?;

    let destination_ctx = PhysicalContext::of(request.destination.body());
    let arrival = capture(
        &destination_ctx,
        vector::norm(&v_inf_arrival),
        request.capture_periapsis,
        request.capture_period,
        request.mass - departure.dm,
        request.propulsion,
    )?;

    log::info!(
        "{} -> {} in {:.1} days: dv {:.4} + {:.4} km/s",
        request.origin,
        request.destination,
        dt / 86_400.0,
        departure.dv,
        arrival.dv
    );

    Ok(TransferPlan {
        departure,
        arrival,
        transfer: lambert.elements,
        arrival_true_anomaly: lambert.arrival_true_anomaly,
        v_inf_departure,
        v_inf_arrival,
        time_of_flight_days: dt / 86_400.0,
    })
}
