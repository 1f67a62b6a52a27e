use std::f64::consts::PI;

use approx::assert_relative_eq;

use astro_mission_engine::core::PhysicalContext;
use astro_mission_engine::core::vector;
use astro_mission_engine::orbits::hyperbola::{eccentricity, escape_delta_v, turn_angle};
use astro_mission_engine::orbits::lagrange::{propagate_by_angle, propagate_by_time, stumpff_c, stumpff_s};
use astro_mission_engine::orbits::three_d::{geocentric_to_perifocal, ground_track};
use astro_mission_engine::orbits::time::{
    elliptical_anomaly, elliptical_time, hyperbolic_anomaly, hyperbolic_time, parabolic_anomaly, parabolic_time,
};
use astro_mission_engine::orbits::two_body::{simulate_relative_motion, simulate_relative_motion_with_thrust};
use astro_mission_engine::orbits::{
    OrbitRegime, OrbitalElements, orbital_elements, orbital_parameters, perifocal_to_geocentric,
};

fn earth() -> PhysicalContext {
    PhysicalContext::earth().with_mu(398_600.0)
}

#[test]
fn elements_from_state_match_curtis_example_4_3() {
    let ctx = earth();
    let r = [-6045.0, -3490.0, 2500.0];
    let v = [-3.457, 6.618, 2.533];
    let oe = orbital_elements(&ctx, &r, &v).to_degrees();
    assert_relative_eq!(oe.h, 58_310.0, max_relative = 1e-3);
    assert_relative_eq!(oe.e, 0.1712, max_relative = 2e-3);
    assert_relative_eq!(oe.i, 153.2, epsilon = 0.1);
    assert_relative_eq!(oe.raan, 255.3, epsilon = 0.1);
    assert_relative_eq!(oe.arg_periapsis, 20.07, epsilon = 0.1);
    assert_relative_eq!(oe.true_anomaly, 28.45, epsilon = 0.1);
    assert_relative_eq!(oe.a, 8788.0, max_relative = 1e-3);
}

#[test]
fn state_from_elements_matches_curtis_example_4_7() {
    let ctx = earth();
    let oe = OrbitalElements {
        h: 80_000.0,
        e: 1.4,
        i: 30f64.to_radians(),
        raan: 40f64.to_radians(),
        arg_periapsis: 60f64.to_radians(),
        true_anomaly: 30f64.to_radians(),
        a: 0.0,
    };
    let (r, v) = perifocal_to_geocentric(&ctx, &oe);
    let expected_r = [-4040.0, 4815.0, 3629.0];
    let expected_v = [-10.39, -4.772, 1.744];
    for k in 0..3 {
        assert_relative_eq!(r[k], expected_r[k], epsilon = 2.0);
        assert_relative_eq!(v[k], expected_v[k], epsilon = 5e-3);
    }

    let back = orbital_elements(&ctx, &r, &v);
    assert_relative_eq!(back.h, oe.h, max_relative = 1e-9);
    assert_relative_eq!(back.e, oe.e, max_relative = 1e-9);
    assert_relative_eq!(back.raan, oe.raan, epsilon = 1e-9);
    assert_relative_eq!(back.arg_periapsis, oe.arg_periapsis, epsilon = 1e-9);

    let (r_pf, _) = geocentric_to_perifocal(&ctx, &r, &v);
    assert!(r_pf[2].abs() < 1e-6, "perifocal position must lie in the orbit plane: {r_pf:?}");
}

#[test]
fn universal_variable_propagation_matches_curtis_example_3_7() {
    let ctx = earth();
    let (r, v) = propagate_by_time(&ctx, &[7000.0, -12_124.0, 0.0], &[2.6679, 4.6210, 0.0], 3600.0)
        .expect("propagate");
    assert_relative_eq!(r[0], -3297.8, epsilon = 1.0);
    assert_relative_eq!(r[1], 7413.4, epsilon = 1.0);
    assert_relative_eq!(v[0], -8.2977, epsilon = 1e-3);
    assert_relative_eq!(v[1], -0.96309, epsilon = 1e-3);
}

#[test]
fn angle_propagation_matches_curtis_example_2_13() {
    let ctx = earth();
    let (r, v) = propagate_by_angle(&ctx, &[8182.4, -6865.9, 0.0], &[0.47572, 8.8116, 0.0], 120f64.to_radians());
    assert_relative_eq!(r[0], 1454.9, epsilon = 1.0);
    assert_relative_eq!(r[1], 8251.6, epsilon = 1.0);
    assert_relative_eq!(v[0], -8.1323, epsilon = 1e-3);
    assert_relative_eq!(v[1], 5.6785, epsilon = 1e-3);
}

#[test]
fn stumpff_series_joins_closed_forms() {
    for z in [-2e-3_f64, -1e-3 + 1e-12, 1e-3 + 1e-12, 2e-3] {
        let closed_s = if z > 0.0 {
            (z.sqrt() - z.sqrt().sin()) / z.sqrt().powi(3)
        } else {
            ((-z).sqrt().sinh() - (-z).sqrt()) / (-z).sqrt().powi(3)
        };
        assert_relative_eq!(stumpff_s(z), closed_s, max_relative = 1e-6);
    }
    assert_relative_eq!(stumpff_c(0.0), 0.5);
    assert_relative_eq!(stumpff_s(0.0), 1.0 / 6.0);
}

#[test]
fn kepler_time_laws_match_curtis_example_3_1_and_invert() {
    let mu = 398_600.0;
    let (r_p, r_a) = (9600.0_f64, 21_000.0);
    let e = (r_a - r_p) / (r_a + r_p);
    let a = 0.5 * (r_a + r_p);
    let period = 2.0 * PI / f64::sqrt(mu) * a.powf(1.5);
    assert_relative_eq!(period, 18_834.0, epsilon = 2.0);

    let t = elliptical_time(period, e, 120f64.to_radians());
    assert_relative_eq!(t, 4077.0, epsilon = 2.0);
    let theta = elliptical_anomaly(period, e, t).expect("kepler");
    assert_relative_eq!(theta, 120f64.to_radians(), epsilon = 1e-9);

    let h = 100_000.0;
    let t_hyp = hyperbolic_time(mu, h, 2.7696, 100f64.to_radians());
    let theta_hyp = hyperbolic_anomaly(mu, h, 2.7696, t_hyp).expect("hyperbolic kepler");
    assert_relative_eq!(theta_hyp, 100f64.to_radians(), epsilon = 1e-9);

    let t_par = parabolic_time(mu, h, 150f64.to_radians());
    assert_relative_eq!(parabolic_anomaly(mu, h, t_par), 150f64.to_radians(), epsilon = 1e-9);
}

#[test]
fn orbital_parameters_classify_closed_and_open_orbits() {
    let ctx = earth();
    let r = [6678.0, 0.0, 0.0];
    let v_circ = (ctx.mu / 6678.0).sqrt();
    let closed = orbital_parameters(&ctx, &r, &[0.0, v_circ, 0.0]);
    assert!(closed.regime.is_closed());
    assert!(closed.period.is_finite());
    assert_relative_eq!(closed.period, 2.0 * PI * (6678.0_f64.powi(3) / ctx.mu).sqrt(), max_relative = 1e-6);
    assert_relative_eq!(closed.r_p, 6678.0, max_relative = 1e-6);
    assert!(closed.hyperbolic.is_none());

    let open = orbital_parameters(&ctx, &r, &[0.0, 15.0, 0.0]);
    assert_eq!(open.regime, OrbitRegime::Hyperbolic);
    assert!(open.period.is_infinite());
    let hyp = open.hyperbolic.expect("hyperbolic descriptors");
    let expected_vinf = (15.0_f64 * 15.0 - 2.0 * ctx.mu / 6678.0).sqrt();
    assert_relative_eq!(hyp.v_inf, expected_vinf, max_relative = 1e-9);
    assert_relative_eq!(hyp.c3, expected_vinf * expected_vinf, max_relative = 1e-9);
    assert_relative_eq!(open.r_p, 6678.0, max_relative = 1e-9);
}

#[test]
fn one_period_of_two_body_motion_closes_the_orbit() {
    let ctx = earth();
    let y0 = [7000.0, 0.0, 0.0, 0.0, 8.0, 1.0];
    let trajectory = simulate_relative_motion(&ctx, &y0, 0.0, None).expect("integrate");
    let last = trajectory.last_state().expect("samples");
    let drift = vector::norm(&vector::sub(&[last[0], last[1], last[2]], &[y0[0], y0[1], y0[2]]));
    assert!(drift < 1.0, "orbit did not close, drift = {drift} km");
}

#[test]
fn thrust_from_rest_only_burns_propellant() {
    let ctx = earth();
    let y0 = [7000.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1000.0];
    let trajectory = simulate_relative_motion_with_thrust(&ctx, &y0, 1000.0, 300.0, 0.0, 10.0).expect("integrate");
    assert!(trajectory.y.iter().flatten().all(|x| x.is_finite()));
    let last = trajectory.last_state().expect("samples");
    assert_relative_eq!(last[6], 1000.0 - 1000.0 / (300.0 * 9.806_65) * 10.0, max_relative = 1e-9);
    assert!(last[0] < 7000.0);
}

#[test]
fn ground_tracks_exist_for_closed_orbits_only() {
    let ctx = PhysicalContext::earth();
    let (r_p, r_a) = (ctx.radius + 500.0, ctx.radius + 5000.0);
    let elements = OrbitalElements {
        h: (2.0 * ctx.mu * r_a * r_p / (r_a + r_p)).sqrt(),
        e: (r_a - r_p) / (r_a + r_p),
        i: 57f64.to_radians(),
        raan: 0.0,
        arg_periapsis: 0.0,
        true_anomaly: 0.0,
        a: 0.5 * (r_a + r_p),
    };
    let track = ground_track(&ctx, &elements, 60.0, 2.0)
        .expect("ground track")
        .expect("closed orbit");
    assert!(track.len() > 100);
    assert!(track.dec.iter().all(|d| d.abs() <= 57.0 + 1e-6));
    assert!(track.ra.iter().all(|a| (0.0..=360.0).contains(a)));

    let open = OrbitalElements { e: 1.5, ..elements };
    assert!(ground_track(&ctx, &open, 60.0, 1.0).expect("open orbit").is_none());
    let parabolic = OrbitalElements { e: 1.0, ..elements };
    assert!(matches!(ground_track(&ctx, &parabolic, 60.0, 1.0), Ok(None)));
    assert!(ground_track(&ctx, &elements, 0.0, 1.0).is_err());
}

#[test]
fn hyperbola_helpers_match_curtis_example_8_4() {
    let mu = 398_600.0;
    let dv = escape_delta_v(mu, 6678.0, 2.943);
    assert_relative_eq!(dv, 3.590, epsilon = 2e-3);
    let e = eccentricity(mu, 6678.0, 2.943);
    assert_relative_eq!(e, 1.1451, epsilon = 1e-3);
    assert!(turn_angle(e) > 0.0 && turn_angle(e) < PI);
}
