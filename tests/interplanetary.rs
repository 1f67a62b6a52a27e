use approx::assert_relative_eq;
use chrono::{NaiveDate, NaiveDateTime};

use astro_mission_engine::core::vector;
use astro_mission_engine::core::{CelestialBody, PhysicalContext, Planet};
use astro_mission_engine::impulsive::Propulsion;
use astro_mission_engine::interplanetary::{
    DateWindow, FlybySide, HohmannLeg, InterplanetaryError, PorkchopRequest, TransferRequest, departure,
    ephemeris_at, flyby, optimal_transfer, porkchop, rendezvous, synodic_period, wait_time,
};
use astro_mission_engine::orbits::hyperbola;

const DAY: f64 = 86_400.0;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn at(y: i32, m: u32, d: u32, hour: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(hour, 0, 0).expect("valid time")
}

#[test]
fn earth_mars_alignment_repeats_every_synodic_period() {
    let synodic = synodic_period(CelestialBody::Earth, CelestialBody::Mars);
    assert_relative_eq!(synodic / DAY, 779.94, epsilon = 0.01);
    assert_relative_eq!(
        synodic,
        synodic_period(CelestialBody::Mars, CelestialBody::Earth),
        max_relative = 1e-12
    );

    let wait = wait_time(CelestialBody::Earth, CelestialBody::Mars).expect("wait time");
    assert_relative_eq!(wait.wait / DAY, 454.35, epsilon = 0.01);
    assert_relative_eq!(wait.departure_phase.to_degrees(), 44.35, epsilon = 0.01);
    assert_relative_eq!(wait.return_phase, -wait.arrival_phase);

    assert!(matches!(
        wait_time(CelestialBody::Venus, CelestialBody::Venus),
        Err(InterplanetaryError::InvalidInput(_))
    ));
}

#[test]
fn hohmann_escape_from_a_parking_orbit_curtis_example_8_3() {
    let earth = PhysicalContext::earth();
    let leg = HohmannLeg::between(CelestialBody::Earth, CelestialBody::Mars);
    assert_relative_eq!(leg.departure_excess_speed(), 2.9447, epsilon = 1e-4);

    let burn = departure(&earth, earth.radius + 300.0, &leg, 2000.0, Propulsion::default()).expect("departure");
    assert_relative_eq!(burn.dv, 3.590, epsilon = 1e-3);
    assert!(burn.elements.e > 1.0);
    assert_relative_eq!(burn.dm, Propulsion::default().propellant_mass(2000.0, burn.dv), max_relative = 1e-12);

    assert!(departure(&earth, 0.0, &leg, 2000.0, Propulsion::default()).is_err());
    assert!(departure(&earth, 7000.0, &HohmannLeg::new(-1.0, 1.0), 2000.0, Propulsion::default()).is_err());
}

#[test]
fn capture_with_free_periapsis_minimises_the_burn() {
    let mars = PhysicalContext::of(CelestialBody::Mars);
    let leg = HohmannLeg::between(CelestialBody::Earth, CelestialBody::Mars);
    let v_inf = leg.arrival_excess_speed().abs();
    assert_relative_eq!(v_inf, 2.6489, epsilon = 1e-4);

    let period = 7.0 * 3600.0;
    let optimal = rendezvous(&mars, None, period, &leg, 1000.0, Propulsion::default()).expect("optimal capture");
    let a = (period * mars.mu.sqrt() / (2.0 * std::f64::consts::PI)).powf(2.0 / 3.0);
    let e = 2.0 * mars.mu / (a * v_inf * v_inf) - 1.0;
    assert_relative_eq!(optimal.dv, v_inf * ((1.0 - e) / 2.0).sqrt(), max_relative = 1e-9);

    for altitude in [200.0, 1000.0, 3000.0] {
        let fixed = rendezvous(&mars, Some(mars.radius + altitude), period, &leg, 1000.0, Propulsion::default())
            .expect("capture");
        assert!(fixed.dv >= optimal.dv, "{altitude} km: {} < {}", fixed.dv, optimal.dv);
    }

    assert!(rendezvous(&mars, Some(-5.0), period, &leg, 1000.0, Propulsion::default()).is_err());
    assert!(rendezvous(&mars, None, 0.0, &leg, 1000.0, Propulsion::default()).is_err());
}

#[test]
fn flyby_keeps_the_excess_speed_and_turns_it() {
    let venus = PhysicalContext::of(CelestialBody::Venus);
    let leg = HohmannLeg::between(CelestialBody::Earth, CelestialBody::Venus);
    let r_p = venus.radius + 300.0;

    let dark = flyby(&venus, &leg, 0.0, r_p, FlybySide::Dark).expect("dark-side flyby");
    let sunlit = flyby(&venus, &leg, 0.0, r_p, FlybySide::Sunlit).expect("sunlit flyby");

    // A Hohmann arrival meets the planet with a purely along-track excess velocity.
    assert!(dark.v_inf_in[1].abs() < 1e-9);
    let v_inf = dark.v_inf_in[0].hypot(dark.v_inf_in[1]);
    assert_relative_eq!(v_inf, leg.arrival_excess_speed().abs(), max_relative = 1e-9);
    assert_relative_eq!(dark.v_inf_out[0].hypot(dark.v_inf_out[1]), v_inf, max_relative = 1e-12);

    let e = hyperbola::eccentricity(venus.mu, r_p, v_inf);
    assert_relative_eq!(dark.turn_angle, hyperbola::turn_angle(e));
    assert_eq!(dark.maneuver.dv, 0.0);
    assert_relative_eq!(dark.v_inf_out[0], sunlit.v_inf_out[0], max_relative = 1e-12);
    assert_relative_eq!(dark.v_inf_out[1], -sunlit.v_inf_out[1], max_relative = 1e-12);
    assert!(dark.aiming_radius > r_p);

    let mu_sun = CelestialBody::Sun.mu();
    let h = dark.maneuver.elements.h;
    assert_relative_eq!(
        dark.perihelion,
        h * h / mu_sun / (1.0 + dark.maneuver.elements.e),
        max_relative = 1e-12
    );

    assert!(flyby(&venus, &leg, 0.0, 0.0, FlybySide::Dark).is_err());
}

#[test]
fn planetary_ephemeris_curtis_example_8_7() {
    let earth = ephemeris_at(Planet::Earth, at(2003, 8, 27, 12)).expect("earth");
    let mars = ephemeris_at(Planet::Mars, at(2003, 8, 27, 12)).expect("mars");
    assert_relative_eq!(vector::norm(&earth.r), 1.51152e8, max_relative = 1e-4);
    assert_relative_eq!(vector::norm(&mars.r), 2.06665e8, max_relative = 1e-4);
    assert_relative_eq!(vector::norm(&earth.v), 29.3, epsilon = 0.5);
    assert_relative_eq!(mars.elements.i.to_degrees(), 1.85, epsilon = 0.01);
    // Close opposition: both planets on the same side of the Sun.
    let cos = vector::dot(&earth.r, &mars.r) / (vector::norm(&earth.r) * vector::norm(&mars.r));
    assert!(cos > 0.99);
}

fn mars_1996() -> TransferRequest {
    let mars = PhysicalContext::of(CelestialBody::Mars);
    TransferRequest {
        origin: Planet::Earth,
        destination: Planet::Mars,
        departure: at(1996, 11, 7, 0),
        arrival: at(1997, 9, 12, 0),
        parking_radius: PhysicalContext::earth().radius + 180.0,
        capture_periapsis: Some(mars.radius + 300.0),
        capture_period: 35.0 * 3600.0,
        mass: 2000.0,
        propulsion: Propulsion::default(),
    }
}

#[test]
fn earth_to_mars_transfer_curtis_example_8_8() {
    let request = mars_1996();
    let plan = optimal_transfer(&request).expect("transfer");

    assert_relative_eq!(plan.time_of_flight_days, 309.0, max_relative = 1e-12);
    let v_inf_dep = vector::norm(&plan.v_inf_departure);
    let v_inf_arr = vector::norm(&plan.v_inf_arrival);
    assert_relative_eq!(v_inf_dep, 3.1656, epsilon = 1e-3);
    assert_relative_eq!(v_inf_arr, 2.8852, epsilon = 1e-3);
    assert_relative_eq!(plan.c3(), v_inf_dep * v_inf_dep, max_relative = 1e-12);

    let earth = PhysicalContext::earth();
    let r_park = request.parking_radius;
    let escape = (v_inf_dep * v_inf_dep + 2.0 * earth.mu / r_park).sqrt() - (earth.mu / r_park).sqrt();
    assert_relative_eq!(plan.departure.dv, escape, max_relative = 1e-9);

    // The capture burn spends from the mass left after departure.
    let remaining = request.mass - plan.departure.dm;
    assert_relative_eq!(
        plan.arrival.dm,
        request.propulsion.propellant_mass(remaining, plan.arrival.dv),
        max_relative = 1e-12
    );
    assert_relative_eq!(plan.total_dv(), plan.departure.dv + plan.arrival.dv);
    assert_relative_eq!(plan.total_propellant(), plan.departure.dm + plan.arrival.dm);
    assert!(plan.transfer.e > 0.0 && plan.transfer.e < 1.0);
}

#[test]
fn transfer_rejects_arrival_before_departure() {
    let mut request = mars_1996();
    std::mem::swap(&mut request.departure, &mut request.arrival);
    assert!(matches!(
        optimal_transfer(&request),
        Err(InterplanetaryError::InvalidInput(_))
    ));
}

#[test]
fn porkchop_grid_is_departure_major_with_the_cheapest_cell_marked() {
    let request = PorkchopRequest {
        origin: Planet::Earth,
        destination: Planet::Mars,
        departure_window: DateWindow::new(date(2005, 7, 1), date(2005, 8, 20)),
        arrival_window: DateWindow::new(date(2006, 1, 1), date(2006, 3, 1)),
        step_days: 10,
    };
    let grid = porkchop(&request).expect("grid");
    assert_eq!(grid.departures, 6);
    assert_eq!(grid.arrivals, 6);
    assert_eq!(grid.points.len(), 36);
    assert!(grid.points.iter().filter(|p| p.feasible).count() > 30);

    let cell = grid.get(1, 2).expect("cell");
    assert_eq!(cell.departure, date(2005, 7, 11));
    assert_eq!(cell.arrival, date(2006, 1, 21));
    assert_relative_eq!(cell.c3_km2_s2, cell.vinf_depart_km_s.powi(2), max_relative = 1e-12);
    assert!(grid.get(6, 0).is_none());

    let best = grid.best().expect("best cell");
    assert!(grid.points.iter().filter(|p| p.feasible).all(|p| p.total_vinf() >= best.total_vinf()));
    assert_eq!(best.departure, date(2005, 8, 10));
    assert_eq!(best.arrival, date(2006, 2, 20));
    assert_relative_eq!(best.total_vinf(), 7.207, epsilon = 1e-2);
}

#[test]
fn porkchop_keeps_impossible_cells_as_infeasible() {
    let request = PorkchopRequest {
        origin: Planet::Earth,
        destination: Planet::Mars,
        departure_window: DateWindow::new(date(2005, 8, 1), date(2005, 8, 3)),
        arrival_window: DateWindow::new(date(2005, 7, 30), date(2005, 8, 1)),
        step_days: 1,
    };
    let grid = porkchop(&request).expect("grid");
    assert_eq!(grid.points.len(), 9);
    assert!(grid.best().is_none());
    for point in &grid.points {
        assert!(!point.feasible);
        assert_eq!(point.vinf_depart_km_s, 0.0);
        assert_eq!(point.vinf_arrive_km_s, 0.0);
        assert_eq!(point.c3_km2_s2, 0.0);
    }

    let reversed = PorkchopRequest {
        departure_window: DateWindow::new(date(2005, 8, 3), date(2005, 8, 1)),
        ..request.clone()
    };
    assert!(porkchop(&reversed).is_err());
    let zero_step = PorkchopRequest { step_days: 0, ..request };
    assert!(porkchop(&zero_step).is_err());
}
