use approx::assert_relative_eq;

use astro_mission_engine::ode::{Directed, EventDirection, IntegrationError, Rk45, Tolerances, Trajectory};

#[test]
fn exponential_decay_matches_closed_form() {
    let rhs = |_t: f64, y: &[f64], dydt: &mut [f64]| dydt[0] = -0.5 * y[0];
    let trajectory = Rk45::new(Tolerances::new(1e-10, 1e-12))
        .integrate(&rhs, 0.0, &[2.0], 10.0)
        .expect("integrate");
    assert_eq!(trajectory.last_time(), Some(10.0));
    let last = trajectory.last_state().expect("samples")[0];
    assert_relative_eq!(last, 2.0 * (-5.0_f64).exp(), max_relative = 1e-8);
    assert!(trajectory.t.windows(2).all(|w| w[1] > w[0]), "times must increase");
}

#[test]
fn harmonic_oscillator_conserves_energy() {
    let rhs = |_t: f64, y: &[f64], dydt: &mut [f64]| {
        dydt[0] = y[1];
        dydt[1] = -y[0];
    };
    let trajectory = Rk45::new(Tolerances::new(1e-10, 1e-10))
        .integrate(&rhs, 0.0, &[1.0, 0.0], 20.0)
        .expect("integrate");
    for state in &trajectory.y {
        assert_relative_eq!(state[0] * state[0] + state[1] * state[1], 1.0, epsilon = 1e-7);
    }
    let x = trajectory.series(0);
    assert_relative_eq!(*x.last().expect("samples"), 20.0_f64.cos(), epsilon = 1e-7);
}

#[test]
fn falling_event_stops_at_the_ground() {
    // Ball dropped from 100 m under 9.81 m/s².
    let rhs = |_t: f64, y: &[f64], dydt: &mut [f64]| {
        dydt[0] = y[1];
        dydt[1] = -9.81;
    };
    let ground = Directed {
        function: |_t: f64, y: &[f64]| y[0],
        direction: EventDirection::Falling,
    };
    let trajectory = Rk45::new(Tolerances::new(1e-10, 1e-10))
        .integrate_until(&rhs, &ground, 0.0, &[100.0, 0.0], 60.0)
        .expect("integrate");
    let hit = trajectory.event.as_ref().expect("ground event");
    let expected = (2.0 * 100.0 / 9.81_f64).sqrt();
    assert_relative_eq!(hit.t, expected, epsilon = 1e-6);
    assert!(hit.y[0].abs() < 1e-6);
    assert_relative_eq!(trajectory.last_time().expect("samples"), hit.t, epsilon = 1e-9);
}

#[test]
fn rising_event_ignores_falling_crossings() {
    let rhs = |_t: f64, _y: &[f64], dydt: &mut [f64]| dydt[0] = -1.0;
    let rising = Directed {
        function: |_t: f64, y: &[f64]| y[0],
        direction: EventDirection::Rising,
    };
    let trajectory = Rk45::new(Tolerances::new(1e-8, 1e-8))
        .integrate_until(&rhs, &rising, 0.0, &[1.0], 3.0)
        .expect("integrate");
    assert!(trajectory.event.is_none());
    assert_eq!(trajectory.last_time(), Some(3.0));
}

#[test]
fn reversed_span_is_rejected() {
    let rhs = |_t: f64, _y: &[f64], dydt: &mut [f64]| dydt[0] = 0.0;
    let err = Rk45::new(Tolerances::new(1e-8, 1e-8))
        .integrate(&rhs, 5.0, &[0.0], 1.0)
        .unwrap_err();
    assert_eq!(err, IntegrationError::InvalidSpan { t0: 5.0, tf: 1.0 });
}

#[test]
fn extend_drops_the_repeated_junction_sample() {
    let mut first = Trajectory {
        t: vec![0.0, 1.0],
        y: vec![vec![0.0], vec![1.0]],
        event: None,
    };
    let second = Trajectory {
        t: vec![1.0, 2.0],
        y: vec![vec![1.0], vec![4.0]],
        event: None,
    };
    first.extend(second);
    assert_eq!(first.t, vec![0.0, 1.0, 2.0]);
    assert_eq!(first.len(), 3);
    assert_eq!(first.span(), 2.0);
}
