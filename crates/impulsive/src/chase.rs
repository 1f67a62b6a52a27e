//! Co-orbital rendezvous solved as a Lambert problem.

use serde::Serialize;

use astro_core::vector::{self, Vector3};
use astro_determination::{OrbitDirection, solve_lambert};
use astro_orbits::{OrbitalElements, time};

use crate::{ApseOrbit, ManeuverError, ManeuverPlanner, ManeuverResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChaseResult {
    pub maneuver: ManeuverResult,
    /// Transfer orbit at the chaser's departure point.
    pub transfer: OrbitalElements,
    /// True anomaly of the rendezvous point on the transfer orbit.
    pub arrival_true_anomaly: f64,
}

fn perifocal_state(mu: f64, h: f64, e: f64, theta: f64) -> (Vector3, Vector3) {
    let (s, c) = theta.sin_cos();
    let r = vector::scale(&[c, s, 0.0], h * h / mu / (1.0 + e * c));
    let v = vector::scale(&[-s, e + c, 0.0], mu / h);
    (r, v)
}

impl ManeuverPlanner<'_> {
    /// Chaser at `theta_chaser` intercepts a target at `theta_target` on the
    /// same orbit after `dt` seconds.
    pub fn chase_maneuver(
        &self,
        orbit: &ApseOrbit,
        theta_chaser: f64,
        theta_target: f64,
        dt: f64,
        m: f64,
    ) -> Result<ChaseResult, ManeuverError> {
        if dt <= 0.0 {
            return Err(ManeuverError::InvalidInput(format!("chase time must be positive, got {dt}")));
        }
        let mu = self.mu();
        let e = orbit.eccentricity();
        let h = orbit.angular_momentum(mu);
        let period = orbit.period(mu);

        let (r_c, v_c) = perifocal_state(mu, h, e, theta_chaser);

        let t_target = time::elliptical_time(period, e, theta_target) + dt;
        let theta_meet = time::elliptical_anomaly(period, e, t_target)?;
        let (r_t, v_t) = perifocal_state(mu, h, e, theta_meet);

        let lambert = solve_lambert(self.ctx, &r_c, &r_t, dt, OrbitDirection::Prograde)?;
        let dv1 = vector::norm(&vector::sub(&lambert.v1, &v_c));
        let dv2 = vector::norm(&vector::sub(&v_t, &lambert.v2));
        log::debug!("chase: departure impulse {dv1} km/s, arrival impulse {dv2} km/s");

        Ok(ChaseResult {
            maneuver: ManeuverResult {
                dv: dv1 + dv2,
                dt,
                dm: self.propulsion.chained_propellant(m, &[dv1, dv2]),
                elements: lambert.elements,
            },
            transfer: lambert.elements,
            arrival_true_anomaly: lambert.arrival_true_anomaly,
        })
    }
}
