//! Coplanar transfers between coaxial ellipses and phasing orbits.
//!
//! Each calculator returns the total delta-v, the time spent on the transfer
//! orbit and the propellant chained across the burns.

use serde::{Deserialize, Serialize};

use astro_orbits::time;

use crate::{ApseOrbit, ManeuverError, ManeuverPlanner, ManeuverResult, impulse_between};

/// Which apse of the initial orbit the first burn happens at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HohmannDirection {
    /// Burn at the initial periapsis, arrive at the final apoapsis.
    #[default]
    PeriapsisToApoapsis,
    /// Burn at the initial apoapsis, arrive at the final periapsis.
    ApoapsisToPeriapsis,
}

impl ManeuverPlanner<'_> {
    /// Two-impulse Hohmann transfer between coaxial ellipses.
    pub fn hohmann_transfer(
        &self,
        initial: &ApseOrbit,
        target: &ApseOrbit,
        direction: HohmannDirection,
        m: f64,
    ) -> ManeuverResult {
        let mu = self.mu();
        let h1 = initial.angular_momentum(mu);
        let h2 = target.angular_momentum(mu);

        let (transfer, dv1, dv2) = match direction {
            HohmannDirection::PeriapsisToApoapsis => {
                let transfer = ApseOrbit::new(initial.r_p, target.r_a);
                let h_t = transfer.angular_momentum(mu);
                let dv1 = (h_t / initial.r_p - h1 / initial.r_p).abs();
                let dv2 = (h2 / target.r_a - h_t / target.r_a).abs();
                (transfer, dv1, dv2)
            }
            HohmannDirection::ApoapsisToPeriapsis => {
                let transfer = ApseOrbit::new(target.r_p, initial.r_a);
                let h_t = transfer.angular_momentum(mu);
                let dv1 = (h_t / initial.r_a - h1 / initial.r_a).abs();
                let dv2 = (h2 / target.r_p - h_t / target.r_p).abs();
                (transfer, dv1, dv2)
            }
        };

        ManeuverResult {
            dv: dv1 + dv2,
            dt: 0.5 * transfer.period(mu),
            dm: self.propulsion.chained_propellant(m, &[dv1, dv2]),
            elements: transfer.elements(mu, 0.0),
        }
    }

    /// Bi-elliptic transfer through an intermediate apoapsis `r_3`, as two
    /// Hohmann legs; the second leg starts with the mass the first one left.
    pub fn bi_elliptic_hohmann_transfer(
        &self,
        initial: &ApseOrbit,
        target: &ApseOrbit,
        r_3: f64,
        m: f64,
    ) -> [ManeuverResult; 2] {
        let intermediate = ApseOrbit::new(initial.r_p, r_3);
        let first = self.hohmann_transfer(initial, &intermediate, HohmannDirection::PeriapsisToApoapsis, m);
        let second = self.hohmann_transfer(
            &intermediate,
            target,
            HohmannDirection::ApoapsisToPeriapsis,
            m - first.dm,
        );
        [first, second]
    }

    /// Phasing manoeuvre from periapsis to meet a target at true anomaly
    /// `theta_target` after `revolutions` laps of the phasing orbit.
    pub fn phasing_maneuver(
        &self,
        orbit: &ApseOrbit,
        theta_target: f64,
        revolutions: f64,
        m: f64,
    ) -> Result<ManeuverResult, ManeuverError> {
        if revolutions <= 0.0 {
            return Err(ManeuverError::InvalidInput(format!(
                "phasing needs a positive number of revolutions, got {revolutions}"
            )));
        }
        let mu = self.mu();
        let period = orbit.period(mu);
        let speed = orbit.angular_momentum(mu) / orbit.r_p;

        let t_ab = time::elliptical_time(period, orbit.eccentricity(), theta_target);
        let phasing_period = period - t_ab / revolutions;
        let a2 = (mu.sqrt() * phasing_period / (2.0 * std::f64::consts::PI)).powf(2.0 / 3.0);
        let phasing = ApseOrbit::new(orbit.r_p, 2.0 * a2 - orbit.r_p);
        let phasing = if phasing.r_a < phasing.r_p {
            ApseOrbit::new(phasing.r_a, phasing.r_p)
        } else {
            phasing
        };
        let speed_phasing = (mu * (2.0 / orbit.r_p - 1.0 / a2)).sqrt();

        let dv1 = (speed_phasing - speed).abs();
        let dv2 = (speed - speed_phasing).abs();

        Ok(ManeuverResult {
            dv: dv1 + dv2,
            dt: revolutions * phasing_period,
            dm: self.propulsion.chained_propellant(m, &[dv1, dv2]),
            elements: phasing.elements(mu, 0.0),
        })
    }

    /// Single-impulse transfer from true anomaly `theta_1` of `initial` onto
    /// the orbit sharing its apse line that passes through radius `r_2` at `theta_2`.
    pub fn non_hohmann_transfer(
        &self,
        initial: &ApseOrbit,
        theta_1: f64,
        r_2: f64,
        theta_2: f64,
        m: f64,
    ) -> Result<ManeuverResult, ManeuverError> {
        let mu = self.mu();
        let r_1 = initial.radius_at(mu, theta_1);
        let (vr1, vt1) = initial.velocity_components(mu, theta_1);

        let denom = r_2 * theta_2.cos() - r_1 * theta_1.cos();
        if denom == 0.0 {
            return Err(ManeuverError::InvalidInput(
                "transfer orbit is undefined for these radii and anomalies".into(),
            ));
        }
        let e2 = -(r_2 - r_1) / denom;
        let h2 = (mu * r_1 * r_2).sqrt() * ((theta_2.cos() - theta_1.cos()) / denom).sqrt();
        if !h2.is_finite() || e2 >= 1.0 {
            return Err(ManeuverError::InvalidInput(format!(
                "transfer orbit is not a closed ellipse (e = {e2})"
            )));
        }

        let vt2 = h2 / r_1;
        let vr2 = mu / h2 * e2 * theta_1.sin();
        let dv = impulse_between(
            vr1.hypot(vt1),
            (vr1 / vt1).atan(),
            vr2.hypot(vt2),
            (vr2 / vt2).atan(),
        );

        let transfer = ApseOrbit::new(h2 * h2 / mu / (1.0 + e2), h2 * h2 / mu / (1.0 - e2));
        let period = transfer.period(mu);
        let t1 = time::elliptical_time(period, e2, theta_1);

        Ok(ManeuverResult {
            dv,
            dt: period - t1,
            dm: self.propulsion.propellant_mass(m, dv),
            elements: astro_orbits::OrbitalElements {
                h: h2,
                e: e2,
                true_anomaly: theta_1,
                a: transfer.semi_major_axis(),
                ..Default::default()
            },
        })
    }
}
