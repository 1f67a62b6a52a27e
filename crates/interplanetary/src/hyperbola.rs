//! Planetocentric hyperbolas at either end of a heliocentric Hohmann leg.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use astro_core::{CelestialBody, PhysicalContext};
use astro_impulsive::{ManeuverResult, Propulsion};
use astro_orbits::{OrbitalElements, hyperbola};

use crate::InterplanetaryError;

/// Heliocentric Hohmann leg between circular orbits of radii `r1` and `r2` (km).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HohmannLeg {
    pub r1: f64,
    pub r2: f64,
}

impl HohmannLeg {
    pub fn new(r1: f64, r2: f64) -> Self {
        Self { r1, r2 }
    }

    /// Leg between the mean orbits of two planets.
    pub fn between(departure: CelestialBody, arrival: CelestialBody) -> Self {
        Self::new(departure.semi_major_axis(), arrival.semi_major_axis())
    }

    /// Hyperbolic excess speed leaving the departure planet.
    pub fn departure_excess_speed(&self) -> f64 {
        let mu_sun = CelestialBody::Sun.mu();
        (mu_sun / self.r1).sqrt() * ((2.0 * self.r2 / (self.r1 + self.r2)).sqrt() - 1.0)
    }

    /// Hyperbolic excess speed on reaching the arrival planet.
    pub fn arrival_excess_speed(&self) -> f64 {
        let mu_sun = CelestialBody::Sun.mu();
        (mu_sun / self.r2).sqrt() * (1.0 - (2.0 * self.r1 / (self.r1 + self.r2)).sqrt())
    }

    fn validate(&self) -> Result<(), InterplanetaryError> {
        if self.r1 <= 0.0 || self.r2 <= 0.0 {
            return Err(InterplanetaryError::InvalidInput(format!(
                "orbit radii must be positive, got {} and {}",
                self.r1, self.r2
            )));
        }
        Ok(())
    }
}

/// Side of the planet the flyby periapsis lies on, seen from the Sun.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlybySide {
    #[default]
    Dark,
    Sunlit,
}

fn hyperbola_elements(mu: f64, r_p: f64, v_inf: f64) -> OrbitalElements {
    OrbitalElements {
        h: r_p * hyperbola::periapsis_speed(mu, r_p, v_inf),
        e: hyperbola::eccentricity(mu, r_p, v_inf),
        ..Default::default()
    }
}

/// Escape burn from a circular parking orbit of radius `parking_radius`
/// around `planet` onto the leg's departure hyperbola.
pub fn departure(
    planet: &PhysicalContext,
    parking_radius: f64,
    leg: &HohmannLeg,
    mass: f64,
    propulsion: Propulsion,
) -> Result<ManeuverResult, InterplanetaryError> {
    leg.validate()?;
    escape(planet, parking_radius, leg.departure_excess_speed().abs(), mass, propulsion)
}

/// Burn from a circular orbit of radius `parking_radius` onto a hyperbola with excess speed `v_inf`.
pub(crate) fn escape(
    planet: &PhysicalContext,
    parking_radius: f64,
    v_inf: f64,
    mass: f64,
    propulsion: Propulsion,
) -> Result<ManeuverResult, InterplanetaryError> {
    if parking_radius <= 0.0 {
        return Err(InterplanetaryError::InvalidInput(format!(
            "parking radius must be positive, got {parking_radius}"
        )));
    }
    let mu = planet.mu;
    let elements = hyperbola_elements(mu, parking_radius, v_inf);
    let v_p = elements.h / parking_radius;
    let v_c = (mu / parking_radius).sqrt();
    let dv = (v_p - v_c).abs();
    log::debug!(
        "departure from {}: v_inf={v_inf:.4} km/s, dv={dv:.4} km/s, beta={:.2} deg",
        planet.name,
        (1.0 / elements.e).acos().to_degrees()
    );

    Ok(ManeuverResult {
        dv,
        dt: 0.0,
        dm: propulsion.propellant_mass(mass, dv),
        elements,
    })
}

/// Capture orbit of period `period` reached from a hyperbola with excess speed `v_inf`.
///
/// With `periapsis` unset, the periapsis radius minimising the capture burn is used.
pub(crate) fn capture(
    planet: &PhysicalContext,
    v_inf: f64,
    periapsis: Option<f64>,
    period: f64,
    mass: f64,
    propulsion: Propulsion,
) -> Result<ManeuverResult, InterplanetaryError> {
    if period <= 0.0 {
        return Err(InterplanetaryError::InvalidInput(format!(
            "capture period must be positive, got {period}"
        )));
    }
    let mu = planet.mu;
    let a = (period * mu.sqrt() / (2.0 * PI)).powf(2.0 / 3.0);
    let (r_p, e) = match periapsis {
        Some(r_p) if r_p > 0.0 => (r_p, 1.0 - r_p / a),
        Some(r_p) => {
            return Err(InterplanetaryError::InvalidInput(format!(
                "capture periapsis must be positive, got {r_p}"
            )));
        }
        None => {
            let e = 2.0 * mu / (a * v_inf * v_inf) - 1.0;
            (2.0 * mu / (v_inf * v_inf) * (1.0 - e) / (1.0 + e), e)
        }
    };
    if !(0.0..1.0).contains(&e) {
        return Err(InterplanetaryError::InvalidInput(format!(
            "capture orbit eccentricity {e:.4} is not elliptical"
        )));
    }

    let v_c = (mu * (1.0 + e) / r_p).sqrt();
    let elements = hyperbola_elements(mu, r_p, v_inf);
    let v_p = elements.h / r_p;
    let dv = (v_p - v_c).abs();
    log::debug!(
        "capture at {}: r_p={r_p:.1} km, r_a={:.1} km, aiming radius={:.1} km, dv={dv:.4} km/s",
        planet.name,
        2.0 * a - r_p,
        hyperbola::aiming_radius(mu, r_p, v_inf)
    );

    Ok(ManeuverResult {
        dv,
        dt: 0.0,
        dm: propulsion.propellant_mass(mass, dv),
        elements,
    })
}

/// Capture burn at the arrival planet of the leg into an orbit of period `period`.
pub fn rendezvous(
    planet: &PhysicalContext,
    periapsis: Option<f64>,
    period: f64,
    leg: &HohmannLeg,
    mass: f64,
    propulsion: Propulsion,
) -> Result<ManeuverResult, InterplanetaryError> {
    leg.validate()?;
    capture(planet, leg.arrival_excess_speed().abs(), periapsis, period, mass, propulsion)
}

/// Unpowered flyby of the leg's arrival planet and the heliocentric orbit it leaves on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlybyResult {
    /// Zero velocity change; `elements` holds the post-flyby heliocentric `h` and `e`.
    pub maneuver: ManeuverResult,
    /// Post-flyby true anomaly at the planet (rad).
    pub true_anomaly: f64,
    /// Post-flyby perihelion radius (km).
    pub perihelion: f64,
    pub turn_angle: f64,
    pub aiming_radius: f64,
    /// Incoming and outgoing excess velocity in the planet's (along-track, sunward) frame.
    pub v_inf_in: [f64; 2],
    pub v_inf_out: [f64; 2],
}

/// Flyby of a planet on a circular orbit of radius `leg.r2` by a spacecraft
/// arriving at heliocentric true anomaly `theta_1` on an ellipse through
/// `leg.r1`, with planetocentric periapsis radius `r_p`.
pub fn flyby(
    planet: &PhysicalContext,
    leg: &HohmannLeg,
    theta_1: f64,
    r_p: f64,
    side: FlybySide,
) -> Result<FlybyResult, InterplanetaryError> {
    leg.validate()?;
    if r_p <= 0.0 {
        return Err(InterplanetaryError::InvalidInput(format!(
            "flyby periapsis must be positive, got {r_p}"
        )));
    }
    let mu_sun = CelestialBody::Sun.mu();
    let mu = planet.mu;
    let (r1, r2) = (leg.r1, leg.r2);

    let e1 = (r1 - r2) / (r1 + r2 * theta_1.cos());
    let h1 = (mu_sun * r1 * (1.0 - e1)).sqrt();
    let v_t1 = mu_sun / h1 * (1.0 + e1 * theta_1.cos());
    let v_r1 = mu_sun / h1 * e1 * theta_1.sin();

    let planet_speed = (mu_sun / r2).sqrt();
    let v_inf_in = [v_t1 - planet_speed, -v_r1];
    let v_inf = v_inf_in[0].hypot(v_inf_in[1]);

    let e = hyperbola::eccentricity(mu, r_p, v_inf);
    let delta = hyperbola::turn_angle(e);
    let phi_1 = v_inf_in[1].atan2(v_inf_in[0]);
    let phi_2 = match side {
        FlybySide::Dark => phi_1 + delta,
        FlybySide::Sunlit => phi_1 - delta,
    };
    let v_inf_out = [v_inf * phi_2.cos(), v_inf * phi_2.sin()];

    let v_t2 = planet_speed + v_inf_out[0];
    let v_r2 = -v_inf_out[1];
    let h2 = r2 * v_t2;
    let e_cos = h2 * h2 / (mu_sun * r2) - 1.0;
    let e_sin = v_r2 * h2 / mu_sun;
    let theta_2 = e_sin.atan2(e_cos);
    let e2 = e_sin.hypot(e_cos);

    Ok(FlybyResult {
        maneuver: ManeuverResult {
            elements: OrbitalElements {
                h: h2,
                e: e2,
                true_anomaly: theta_2,
                ..Default::default()
            },
            ..Default::default()
        },
        true_anomaly: theta_2,
        perihelion: h2 * h2 / mu_sun / (1.0 + e2),
        turn_angle: delta,
        aiming_radius: r_p * ((e + 1.0) / (e - 1.0)).sqrt(),
        v_inf_in,
        v_inf_out,
    })
}
