//! Apse-line rotation manoeuvres.

use serde::{Deserialize, Serialize};

use astro_orbits::OrbitalElements;

use crate::{ApseOrbit, ManeuverPlanner, ManeuverResult, impulse_between};

/// Which of the two intersection points of the rotated orbits hosts the burn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntersectionPoint {
    #[default]
    First,
    Second,
}

/// Orbit produced by an impulse applied at a given true anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ApseRotation {
    pub r_p: f64,
    pub r_a: f64,
    /// Rotation of the apse line (rad).
    pub eta: f64,
    pub dt: f64,
    pub dm: f64,
}

impl ManeuverPlanner<'_> {
    /// Single impulse joining `initial` to `target`, whose apse line is rotated by `eta`.
    ///
    /// The returned elements only carry the true anomaly of the burn on the initial orbit.
    pub fn apse_line_rotation_from_eta(
        &self,
        initial: &ApseOrbit,
        target: &ApseOrbit,
        eta: f64,
        point: IntersectionPoint,
        m: f64,
    ) -> ManeuverResult {
        let mu = self.mu();
        let (e1, e2) = (initial.eccentricity(), target.eccentricity());
        let (h1, h2) = (initial.angular_momentum(mu), target.angular_momentum(mu));

        let a = e1 * h2 * h2 - e2 * h1 * h1 * eta.cos();
        let b = -e2 * h1 * h1 * eta.sin();
        let c = h1 * h1 - h2 * h2;
        let phi = (b / a).atan();
        let offset = (c / a * phi.cos()).clamp(-1.0, 1.0).acos();
        let theta = match point {
            IntersectionPoint::First => phi + offset,
            IntersectionPoint::Second => phi - offset,
        };

        let r = initial.radius_at(mu, theta);
        let (vt1, vr1) = (h1 / r, mu / h1 * e1 * theta.sin());
        let (vt2, vr2) = (h2 / r, mu / h2 * e2 * (theta - eta).sin());
        let dv = impulse_between(
            vr1.hypot(vt1),
            (vr1 / vt1).atan(),
            vr2.hypot(vt2),
            (vr2 / vt2).atan(),
        );

        ManeuverResult {
            dv,
            dt: 0.0,
            dm: self.propulsion.propellant_mass(m, dv),
            elements: OrbitalElements {
                true_anomaly: theta,
                ..OrbitalElements::default()
            },
        }
    }

    /// Orbit reached after an impulse `dv` at flight-path angle `phi`, applied at
    /// true anomaly `theta_1` of `initial`.
    pub fn apse_line_rotation_from_true_anomaly(
        &self,
        initial: &ApseOrbit,
        theta_1: f64,
        dv: f64,
        phi: f64,
        m: f64,
    ) -> ApseRotation {
        let mu = self.mu();
        let e1 = initial.eccentricity();
        let h1 = initial.angular_momentum(mu);
        let r1 = initial.radius_at(mu, theta_1);
        let (vr1, vt1) = initial.velocity_components(mu, theta_1);

        let dv_t = dv * phi.cos();
        let dv_r = dv * phi.sin();

        let h2 = h1 + r1 * dv_t;
        let num = (vt1 + dv_t) * (vr1 + dv_r) * vt1 * vt1 / (mu / r1);
        let den = (vt1 + dv_t).powi(2) * e1 * theta_1.cos() + (2.0 * vt1 + dv_t) * dv_t;
        let theta_2 = (num / den).atan();

        let e2 = ((h1 + r1 * dv_t).powi(2) * e1 * theta_1.cos() + (2.0 * h1 + r1 * dv_t) * r1 * dv_t)
            / (h1 * h1 * theta_2.cos());

        ApseRotation {
            r_p: h2 * h2 / mu / (1.0 + e2),
            r_a: h2 * h2 / mu / (1.0 - e2),
            eta: theta_1 - theta_2,
            dt: 0.0,
            dm: self.propulsion.propellant_mass(m, dv),
        }
    }
}
