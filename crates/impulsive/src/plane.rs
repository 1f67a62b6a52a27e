//! Plane-change manoeuvres.

use std::f64::consts::PI;

use astro_orbits::OrbitalElements;

use crate::{ApseOrbit, ManeuverError, ManeuverPlanner, ManeuverResult};

impl ManeuverPlanner<'_> {
    /// Combined plane change and orbit change at a shared node: the burn at
    /// `theta_1` on `initial` places the spacecraft at `theta_2` on `target`,
    /// whose plane is tilted by the dihedral angle `delta`.
    pub fn plane_change_maneuver(
        &self,
        (initial, theta_1): (&ApseOrbit, f64),
        (target, theta_2): (&ApseOrbit, f64),
        delta: f64,
        m: f64,
    ) -> ManeuverResult {
        let mu = self.mu();
        let (vr1, vt1) = initial.velocity_components(mu, theta_1);
        let (vr2, vt2) = target.velocity_components(mu, theta_2);

        let dv = ((vr2 - vr1).powi(2) + vt1 * vt1 + vt2 * vt2 - 2.0 * vt1 * vt2 * delta.cos()).sqrt();
        ManeuverResult {
            dv,
            dt: 0.0,
            dm: self.propulsion.propellant_mass(m, dv),
            elements: OrbitalElements::default(),
        }
    }

    /// Pure plane change from (Ω₁, i₁) to (Ω₂, i₂) at the intersection of the
    /// two planes, located by spherical trigonometry.
    ///
    /// The result carries the new inclination, RAAN and argument of periapsis
    /// along with the true anomaly of the burn.
    pub fn plane_change_from_nodes(
        &self,
        orbit: &ApseOrbit,
        (raan_1, arg_periapsis_1, i_1): (f64, f64, f64),
        (raan_2, i_2): (f64, f64),
        m: f64,
    ) -> Result<ManeuverResult, ManeuverError> {
        let d_raan = raan_2 - raan_1;
        let d_i = i_2 - i_1;

        let delta = (i_1.cos() * i_2.cos() + i_1.sin() * i_2.sin() * d_raan.cos())
            .clamp(-1.0, 1.0)
            .acos();
        if delta.sin().abs() < 1e-12 || i_1.sin() == 0.0 || i_2.sin() == 0.0 {
            return Err(ManeuverError::InvalidInput(
                "orbit planes coincide or are equatorial; the node line is undefined".into(),
            ));
        }

        let sin_u1 = d_raan.sin() * i_2.sin() / delta.sin();
        let sin_u2 = d_raan.sin() * i_1.sin() / delta.sin();
        let (theta_1, arg_periapsis_2) = if d_raan * d_i > 0.0 {
            let cos_u1 = (-i_2.cos() + delta.cos() * i_1.cos()) / (delta.sin() * i_1.sin());
            let cos_u2 = (i_1.cos() - delta.cos() * i_2.cos()) / (delta.sin() * i_2.sin());
            let u1 = sin_u1.atan2(cos_u1);
            let u2 = sin_u2.atan2(cos_u2);
            let theta_1 = u1 - arg_periapsis_1;
            (theta_1, theta_1 + u2)
        } else {
            let cos_u1 = (i_2.cos() - delta.cos() * i_1.cos()) / (delta.sin() * i_1.sin());
            let cos_u2 = (-i_1.cos() + delta.cos() * i_2.cos()) / (delta.sin() * i_2.sin());
            let u1 = sin_u1.atan2(cos_u1);
            let u2 = sin_u2.atan2(cos_u2);
            let theta_1 = 2.0 * PI - u1 - arg_periapsis_1;
            (theta_1, 2.0 * PI - u2 - theta_1)
        };

        let mu = self.mu();
        let (_, vt1) = orbit.velocity_components(mu, theta_1);
        let dv = 2.0 * vt1 * (delta / 2.0).sin();

        Ok(ManeuverResult {
            dv,
            dt: 0.0,
            dm: self.propulsion.propellant_mass(m, dv),
            elements: OrbitalElements {
                i: i_2,
                raan: raan_2,
                arg_periapsis: arg_periapsis_2,
                true_anomaly: theta_1,
                ..OrbitalElements::default()
            },
        })
    }
}
