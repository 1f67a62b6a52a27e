use std::f64::consts::PI;

use approx::assert_relative_eq;

use astro_mission_engine::core::PhysicalContext;
use astro_mission_engine::impulsive::{
    ApseOrbit, HohmannDirection, IntersectionPoint, ManeuverError, ManeuverPlanner, Propulsion, propellant_mass,
};

fn earth() -> PhysicalContext {
    PhysicalContext::earth().with_mu(398_600.0).with_radius(6378.0)
}

#[test]
fn hohmann_matches_curtis_example_6_1() {
    let ctx = earth();
    let planner = ManeuverPlanner::new(&ctx).with_isp(300.0);
    let initial = ApseOrbit::new(ctx.radius + 480.0, ctx.radius + 800.0);
    let target = ApseOrbit::circular(ctx.radius + 16_000.0);
    let result = planner.hohmann_transfer(&initial, &target, HohmannDirection::PeriapsisToApoapsis, 2000.0);

    assert_relative_eq!(result.dv, 3.0522, epsilon = 1e-3);
    assert_relative_eq!(result.dt / 3600.0, 2.443, epsilon = 1e-3);
    // Chained burns spend exactly what one burn of the summed Δv would.
    assert_relative_eq!(result.dm, propellant_mass(2000.0, result.dv, 300.0), max_relative = 1e-12);
    assert_relative_eq!(result.elements.a, 0.5 * (initial.r_p + target.r_a), max_relative = 1e-12);
}

#[test]
fn hohmann_from_apoapsis_uses_the_apoapsis_burn() {
    let ctx = earth();
    let planner = ManeuverPlanner::new(&ctx);
    let initial = ApseOrbit::new(7000.0, 12_000.0);
    let target = ApseOrbit::circular(12_000.0);
    let result = planner.hohmann_transfer(&initial, &target, HohmannDirection::ApoapsisToPeriapsis, 1000.0);
    // Circularising at apoapsis takes a single burn.
    let v_apo = initial.angular_momentum(ctx.mu) / initial.r_a;
    let v_circ = (ctx.mu / 12_000.0).sqrt();
    assert_relative_eq!(result.dv, v_circ - v_apo, max_relative = 1e-9);
}

#[test]
fn hohmann_reversed_costs_the_same() {
    let ctx = earth();
    let planner = ManeuverPlanner::new(&ctx);
    let low = ApseOrbit::new(ctx.radius + 480.0, ctx.radius + 800.0);
    let high = ApseOrbit::circular(ctx.radius + 16_000.0);
    let up = planner.hohmann_transfer(&low, &high, HohmannDirection::PeriapsisToApoapsis, 2000.0);
    let down = planner.hohmann_transfer(&high, &low, HohmannDirection::ApoapsisToPeriapsis, 2000.0);
    assert_relative_eq!(up.dv, down.dv, max_relative = 1e-12);
    assert_relative_eq!(up.dt, down.dt, max_relative = 1e-12);
}

#[test]
fn propellant_grows_with_dv_and_stays_below_the_mass() {
    let one = propellant_mass(2000.0, 1.0, 300.0);
    let two = propellant_mass(2000.0, 2.0, 300.0);
    assert_relative_eq!(one, 576.3, epsilon = 0.1);
    assert!(one < two && two < 2000.0);
    assert_eq!(propellant_mass(2000.0, 0.0, 300.0), 0.0);
    // Past ~37 exhaust velocities the result rounds to the full mass.
    assert_eq!(propellant_mass(2000.0, 1e3, 300.0), 2000.0);
}

#[test]
fn bi_elliptic_beats_hohmann_for_large_ratios_curtis_example_6_3() {
    let ctx = earth();
    let planner = ManeuverPlanner::new(&ctx);
    let initial = ApseOrbit::circular(7000.0);
    let target = ApseOrbit::circular(105_000.0);
    let hohmann = planner.hohmann_transfer(&initial, &target, HohmannDirection::PeriapsisToApoapsis, 1000.0);
    let [first, second] = planner.bi_elliptic_hohmann_transfer(&initial, &target, 210_000.0, 1000.0);

    assert_relative_eq!(hohmann.dv, 3.9655, epsilon = 1e-3);
    assert_relative_eq!(first.dv + second.dv, 3.9336, epsilon = 1e-3);
    assert!(first.dv + second.dv < hohmann.dv);
    assert!(first.dt + second.dt > hohmann.dt);
}

#[test]
fn phasing_requires_positive_revolutions_and_shortens_the_period_to_catch_up() {
    let ctx = earth();
    let planner = ManeuverPlanner::new(&ctx);
    let orbit = ApseOrbit::new(6800.0, 13_600.0);
    let err = planner.phasing_maneuver(&orbit, 1.0, 0.0, 1000.0).unwrap_err();
    assert!(matches!(err, ManeuverError::InvalidInput(_)));

    let result = planner.phasing_maneuver(&orbit, 90f64.to_radians(), 1.0, 1000.0).expect("phasing");
    let phasing_period = result.dt;
    assert!(phasing_period < orbit.period(ctx.mu));
    assert!(result.dv > 0.0);
    assert_relative_eq!(result.elements.a, (ctx.mu.sqrt() * phasing_period / (2.0 * PI)).powf(2.0 / 3.0), max_relative = 1e-9);
}

#[test]
fn non_hohmann_reduces_to_the_first_hohmann_burn() {
    let ctx = earth();
    let planner = ManeuverPlanner::new(&ctx);
    let initial = ApseOrbit::circular(7000.0);
    let result = planner
        .non_hohmann_transfer(&initial, 0.0, 14_000.0, PI, 500.0)
        .expect("transfer");
    let hohmann = planner.hohmann_transfer(
        &initial,
        &ApseOrbit::circular(14_000.0),
        HohmannDirection::PeriapsisToApoapsis,
        500.0,
    );
    let transfer = ApseOrbit::new(7000.0, 14_000.0);
    let first_burn = transfer.angular_momentum(ctx.mu) / 7000.0 - (ctx.mu / 7000.0).sqrt();
    assert_relative_eq!(result.dv, first_burn, max_relative = 1e-9);
    assert!(result.dv < hohmann.dv);
    assert_relative_eq!(result.elements.e, 1.0 / 3.0, max_relative = 1e-9);
}

#[test]
fn apse_rotation_from_an_impulse_is_recovered_from_the_rotation_angle() {
    let ctx = earth();
    let planner = ManeuverPlanner::new(&ctx);
    let initial = ApseOrbit::new(8000.0, 16_000.0);
    let theta_1 = 30f64.to_radians();
    let rotated = planner.apse_line_rotation_from_true_anomaly(&initial, theta_1, 0.5, 10f64.to_radians(), 1000.0);
    assert!(rotated.eta > 0.0);
    assert!(rotated.r_a > initial.r_a);

    let target = ApseOrbit::new(rotated.r_p, rotated.r_a);
    let back = planner.apse_line_rotation_from_eta(&initial, &target, rotated.eta, IntersectionPoint::First, 1000.0);
    assert_relative_eq!(back.dv, 0.5, epsilon = 1e-8);
    assert_relative_eq!(back.elements.true_anomaly, theta_1, epsilon = 1e-8);
    assert_relative_eq!(back.dm, rotated.dm, max_relative = 1e-8);
}

#[test]
fn apse_rotation_without_impulse_keeps_the_orbit() {
    let ctx = earth();
    let planner = ManeuverPlanner::new(&ctx);
    let initial = ApseOrbit::new(8000.0, 16_000.0);
    let same = planner.apse_line_rotation_from_true_anomaly(&initial, 30f64.to_radians(), 0.0, 0.0, 1000.0);
    assert_relative_eq!(same.r_p, initial.r_p, max_relative = 1e-9);
    assert_relative_eq!(same.r_a, initial.r_a, max_relative = 1e-9);
    assert!(same.eta.abs() < 1e-9);
    assert_eq!(same.dm, 0.0);
}

#[test]
fn plane_changes_follow_the_isosceles_velocity_triangle() {
    let ctx = earth();
    let planner = ManeuverPlanner::new(&ctx);
    let orbit = ApseOrbit::circular(7000.0);
    let v = (ctx.mu / 7000.0).sqrt();

    let combined = planner.plane_change_maneuver((&orbit, 0.0), (&orbit, 0.0), 60f64.to_radians(), 1000.0);
    assert_relative_eq!(combined.dv, v, max_relative = 1e-9);

    let pure = planner
        .plane_change_from_nodes(
            &orbit,
            (0.0, 0.0, 30f64.to_radians()),
            (0.0, 40f64.to_radians()),
            1000.0,
        )
        .expect("plane change");
    assert_relative_eq!(pure.dv, 2.0 * v * 5f64.to_radians().sin(), max_relative = 1e-9);
    assert_relative_eq!(pure.elements.i, 40f64.to_radians());

    let coincident = planner.plane_change_from_nodes(&orbit, (0.3, 0.0, 0.5), (0.3, 0.5), 1000.0);
    assert!(coincident.is_err());
}

#[test]
fn chasing_a_co_located_target_needs_no_impulse() {
    let ctx = earth();
    let planner = ManeuverPlanner::new(&ctx);
    let orbit = ApseOrbit::new(8100.0, 18_900.0);
    let chase = planner.chase_maneuver(&orbit, 0.3, 0.3, 1800.0, 1000.0).expect("chase");
    assert!(chase.maneuver.dv < 1e-6, "dv = {}", chase.maneuver.dv);
    assert_relative_eq!(chase.transfer.e, orbit.eccentricity(), epsilon = 1e-6);

    assert!(planner.chase_maneuver(&orbit, 0.3, 0.5, 0.0, 1000.0).is_err());
}

#[test]
fn propulsion_defaults_to_the_standard_specific_impulse() {
    let propulsion = Propulsion::default();
    assert_eq!(propulsion.isp_s, 300.0);
    let spent = propulsion.chained_propellant(1000.0, &[1.0, 0.5]);
    assert_relative_eq!(spent, propellant_mass(1000.0, 1.5, 300.0), max_relative = 1e-12);
}
