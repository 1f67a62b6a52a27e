use std::f64::consts::PI;

use approx::assert_relative_eq;

use astro_mission_engine::core::PhysicalContext;
use astro_mission_engine::core::constants::{AU_KM, J2000_JD};
use astro_mission_engine::core::vector;
use astro_mission_engine::ode::IntegrationError;
use astro_mission_engine::orbits::{OrbitalElements, perifocal_to_geocentric};
use astro_mission_engine::perturbations::atmosphere::density;
use astro_mission_engine::perturbations::{
    EnckeOptions, GaussState, PerturbationError, PerturbationSet, cowell_drag, encke_j2, gauss_variational,
    moon_position, shadow, sun_position,
};

const DAY: f64 = 86_400.0;

fn state_of(ctx: &PhysicalContext, r_p: f64, r_a: f64, elements: OrbitalElements) -> [f64; 6] {
    let h = (2.0 * ctx.mu * r_p * r_a / (r_p + r_a)).sqrt();
    let e = (r_a - r_p) / (r_a + r_p);
    let (r, v) = perifocal_to_geocentric(ctx, &OrbitalElements { h, e, ..elements });
    [r[0], r[1], r[2], v[0], v[1], v[2]]
}

fn inclined() -> OrbitalElements {
    OrbitalElements {
        i: 28f64.to_radians(),
        raan: 45f64.to_radians(),
        arg_periapsis: 30f64.to_radians(),
        true_anomaly: 40f64.to_radians(),
        ..OrbitalElements::default()
    }
}

#[test]
fn density_follows_the_standard_atmosphere_table() {
    assert_eq!(density(0.0), 1.225);
    assert_relative_eq!(density(200.0), 2.541e-10, max_relative = 1e-12);
    assert!(density(225.0) < density(200.0) && density(225.0) > density(250.0));
    assert_eq!(density(-5.0), density(0.0));
    assert_eq!(density(5000.0), density(1000.0));
}

#[test]
fn drag_brings_down_a_low_orbit() {
    let ctx = PhysicalContext::earth();
    let y0 = state_of(&ctx, ctx.radius + 200.0, ctx.radius + 200.0, OrbitalElements::default());
    let run = cowell_drag(&ctx, &y0, 0.1, 0.0, 5.0 * DAY).expect("cowell");
    assert!(run.decayed);
    assert!(run.trajectory.last_time().expect("samples") < 5.0 * DAY);
    assert!(run.altitude.last().expect("samples").abs() < 1e-3);
}

#[test]
fn drag_lowers_successive_apoapsides() {
    let ctx = PhysicalContext::earth();
    let y0 = state_of(&ctx, ctx.radius + 300.0, ctx.radius + 600.0, OrbitalElements::default());
    let run = cowell_drag(&ctx, &y0, 0.1, 0.0, DAY).expect("cowell");
    assert!(!run.decayed);
    assert!(run.apoapsides.len() >= 14, "{} apoapsides", run.apoapsides.len());
    assert!(!run.periapsides.is_empty());
    let first = run.apoapsides[0].1;
    let last = run.apoapsides[run.apoapsides.len() - 1].1;
    assert!(last < first - 1.0, "apoapsis {first} -> {last}");
}

#[test]
fn drag_rejects_a_reversed_span() {
    let ctx = PhysicalContext::earth();
    let y0 = state_of(&ctx, 7000.0, 7000.0, OrbitalElements::default());
    let err = cowell_drag(&ctx, &y0, 0.01, 10.0, 0.0).unwrap_err();
    assert!(matches!(
        err,
        PerturbationError::Integration(IntegrationError::InvalidSpan { .. })
    ));
}

#[test]
fn j2_regresses_the_node_at_the_secular_rate() {
    let ctx = PhysicalContext::earth();
    let (r_p, r_a) = (6678.0, 9940.0);
    let a = 0.5 * (r_p + r_a);
    let e = (r_a - r_p) / (r_a + r_p);
    let elements = inclined();
    let initial = GaussState {
        h: (2.0 * ctx.mu * r_p * r_a / (r_p + r_a)).sqrt(),
        e,
        true_anomaly: elements.true_anomaly,
        raan: elements.raan,
        i: elements.i,
        arg_periapsis: elements.arg_periapsis,
    };
    let sources = PerturbationSet {
        j2: true,
        ..PerturbationSet::default()
    };
    let run = gauss_variational(&ctx, &initial, &sources, J2000_JD, 0.0, 10.0 * DAY).expect("variational");

    let k = -1.5 * ctx.mu.sqrt() * ctx.j2 * ctx.radius.powi(2) / ((1.0 - e * e).powi(2) * a.powf(3.5));
    let raan_drift = (k * elements.i.cos() * 10.0 * DAY).to_degrees();
    let argp_drift = (k * (2.5 * elements.i.sin().powi(2) - 2.0) * 10.0 * DAY).to_degrees();

    let last = run.t_days.len() - 1;
    assert_relative_eq!(run.t_days[last], 10.0, max_relative = 1e-12);
    assert_relative_eq!(run.raan_deg[last] - run.raan_deg[0], raan_drift, max_relative = 0.01);
    assert_relative_eq!(
        run.arg_periapsis_deg[last] - run.arg_periapsis_deg[0],
        argp_drift,
        max_relative = 0.03
    );
    // J2 is conservative and axisymmetric: no secular change in a, e or i.
    assert_relative_eq!(run.a[last], a, max_relative = 2e-3);
    assert_relative_eq!(run.i_deg[last], 28.0, epsilon = 0.05);
}

#[test]
fn encke_agrees_with_the_variational_equations() {
    let ctx = PhysicalContext::earth();
    let (r_p, r_a) = (6678.0, 9940.0);
    let elements = inclined();
    let y0 = state_of(&ctx, r_p, r_a, elements);

    let samples = encke_j2(&ctx, &y0, 0.0, DAY, EnckeOptions::default()).expect("encke");
    assert_eq!(samples.len(), 1001);
    let end = samples[samples.len() - 1];
    assert_relative_eq!(end.t, DAY, max_relative = 1e-12);

    let initial = GaussState {
        h: (2.0 * ctx.mu * r_p * r_a / (r_p + r_a)).sqrt(),
        e: (r_a - r_p) / (r_a + r_p),
        true_anomaly: elements.true_anomaly,
        raan: elements.raan,
        i: elements.i,
        arg_periapsis: elements.arg_periapsis,
    };
    let sources = PerturbationSet {
        j2: true,
        ..PerturbationSet::default()
    };
    let gauss = gauss_variational(&ctx, &initial, &sources, J2000_JD, 0.0, DAY).expect("variational");
    let last = gauss.t_days.len() - 1;

    assert_relative_eq!(end.elements.raan.to_degrees(), gauss.raan_deg[last], epsilon = 1e-3);
    assert_relative_eq!(end.elements.i.to_degrees(), gauss.i_deg[last], epsilon = 1e-3);
    assert_relative_eq!(end.elements.e, gauss.e[last], epsilon = 1e-5);
    assert_relative_eq!(end.elements.h, gauss.h[last], max_relative = 1e-6);
}

#[test]
fn encke_rejects_non_positive_intervals() {
    let ctx = PhysicalContext::earth();
    let y0 = state_of(&ctx, 7000.0, 8000.0, inclined());
    let options = EnckeOptions {
        rectification_interval: Some(0.0),
    };
    assert!(matches!(
        encke_j2(&ctx, &y0, 0.0, 100.0, options),
        Err(PerturbationError::InvalidInput(_))
    ));
    let single = encke_j2(&ctx, &y0, 50.0, 50.0, EnckeOptions::default()).expect("empty span");
    assert_eq!(single.len(), 1);
}

#[test]
fn variational_equations_reject_circular_and_equatorial_orbits() {
    let ctx = PhysicalContext::earth();
    let circular = GaussState {
        h: (ctx.mu * 7000.0).sqrt(),
        e: 0.0,
        i: 0.5,
        ..GaussState::default()
    };
    let equatorial = GaussState {
        e: 0.1,
        i: 0.0,
        ..circular
    };
    let sources = PerturbationSet::default();
    assert!(gauss_variational(&ctx, &circular, &sources, J2000_JD, 0.0, 100.0).is_err());
    assert!(gauss_variational(&ctx, &equatorial, &sources, J2000_JD, 0.0, 100.0).is_err());
}

#[test]
fn third_body_and_radiation_sources_perturb_a_high_orbit() {
    let ctx = PhysicalContext::earth();
    let initial = GaussState {
        h: (2.0 * ctx.mu * 7000.0 * 42_000.0 / 49_000.0).sqrt(),
        e: 35_000.0 / 49_000.0,
        true_anomaly: 0.0,
        raan: 0.3,
        i: 0.5,
        arg_periapsis: 1.0,
    };
    let quiet = gauss_variational(&ctx, &initial, &PerturbationSet::default(), J2000_JD, 0.0, DAY).expect("two-body");
    let sources = PerturbationSet {
        moon: true,
        sun: true,
        srp: Some(0.02),
        ..PerturbationSet::default()
    };
    let perturbed = gauss_variational(&ctx, &initial, &sources, J2000_JD, 0.0, DAY).expect("perturbed");

    let q = quiet.i_deg.len() - 1;
    let p = perturbed.i_deg.len() - 1;
    // Unperturbed elements stay put; the third bodies tilt the plane.
    assert_relative_eq!(quiet.i_deg[q], 0.5f64.to_degrees(), epsilon = 1e-9);
    assert_relative_eq!(quiet.h[q], initial.h, max_relative = 1e-9);
    assert!((perturbed.i_deg[p] - quiet.i_deg[q]).abs() > 1e-6);
}

#[test]
fn sun_and_moon_sit_at_their_expected_distances() {
    let sun = sun_position(J2000_JD);
    assert_relative_eq!(sun.ecliptic_longitude.to_degrees(), 280.375, epsilon = 1e-2);
    assert_relative_eq!(vector::norm(&sun.r) / AU_KM, 0.98331, epsilon = 1e-4);
    assert_relative_eq!(sun.obliquity.to_degrees(), 23.439, epsilon = 1e-6);

    for day in 0..30 {
        let moon = moon_position(6378.0, J2000_JD + f64::from(day));
        let distance = vector::norm(&moon);
        assert!((350_000.0..410_000.0).contains(&distance), "day {day}: {distance} km");
    }
}

#[test]
fn the_night_side_is_in_shadow() {
    let ctx = PhysicalContext::earth();
    let sun = [AU_KM, 0.0, 0.0];
    assert!(!shadow(&ctx, &[7000.0, 0.0, 0.0], &sun));
    assert!(shadow(&ctx, &[-7000.0, 0.0, 0.0], &sun));
    assert!(!shadow(&ctx, &[0.0, 7000.0, 0.0], &sun));
    let angle = PI - 0.1;
    assert!(shadow(&ctx, &[7000.0 * angle.cos(), 7000.0 * angle.sin(), 0.0], &sun));
}
