use std::f64::consts::PI;

use approx::assert_relative_eq;

use astro_mission_engine::core::matrix::{self, Matrix3};
use astro_mission_engine::core::vector::norm;
use astro_mission_engine::core::{CelestialBody, PhysicalContext};
use astro_mission_engine::dynamics::attitude::{
    dcm_from_euler_angles, dcm_from_quaternion, dcm_from_yaw_pitch_roll, euler_angles_from_dcm, quaternion_from_dcm,
    yaw_pitch_roll_from_dcm,
};
use astro_mission_engine::dynamics::relative::{
    clohessy_wiltshire, clohessy_wiltshire_matrices, kinematics_geocentric, kinematics_lvlh, simulate_linearized,
};
use astro_mission_engine::dynamics::{
    AttitudeKinematics, CrtbpParameters, DynamicsError, PrincipalInertia, StateVector, crtbp, simulate_attitude,
    two_impulse_rendezvous,
};

fn earth() -> PhysicalContext {
    PhysicalContext::of(CelestialBody::Earth)
}

fn circular_target(ctx: &PhysicalContext, radius: f64) -> StateVector {
    let speed = (ctx.mu / radius).sqrt();
    StateVector::new([radius, 0.0, 0.0], [0.0, speed, 0.0])
}

fn assert_matrix_eq(a: &Matrix3, b: &Matrix3, epsilon: f64) {
    for (row_a, row_b) in a.iter().zip(b) {
        for (x, y) in row_a.iter().zip(row_b) {
            assert_relative_eq!(x, y, epsilon = epsilon);
        }
    }
}

const IDENTITY: Matrix3 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
const ZERO: Matrix3 = [[0.0; 3]; 3];

#[test]
fn clohessy_wiltshire_transition_starts_at_identity() {
    let phi = clohessy_wiltshire_matrices(1.1e-3, 0.0);
    assert_matrix_eq(&phi.rr, &IDENTITY, 1e-15);
    assert_matrix_eq(&phi.rv, &ZERO, 1e-15);
    assert_matrix_eq(&phi.vr, &ZERO, 1e-15);
    assert_matrix_eq(&phi.vv, &IDENTITY, 1e-15);
}

#[test]
fn co_orbiting_chaser_is_at_rest_in_lvlh() {
    let ctx = earth();
    let radius = 6_878.0;
    let target = circular_target(&ctx, radius);
    let lead = 0.01_f64;
    let speed = (ctx.mu / radius).sqrt();
    let chaser = StateVector::new(
        [radius * lead.cos(), radius * lead.sin(), 0.0],
        [-speed * lead.sin(), speed * lead.cos(), 0.0],
    );

    let rel = kinematics_lvlh(&ctx, &target, &chaser).expect("kinematics");
    assert_relative_eq!(rel.r[0], radius * (lead.cos() - 1.0), epsilon = 1e-9);
    assert_relative_eq!(rel.r[1], radius * lead.sin(), epsilon = 1e-9);
    assert!(norm(&rel.v) < 1e-12, "relative velocity {:?}", rel.v);
    assert!(norm(&rel.a) < 1e-12, "relative acceleration {:?}", rel.a);
    assert_relative_eq!(rel.omega[2], speed / radius, max_relative = 1e-12);
}

#[test]
fn geocentric_and_lvlh_kinematics_are_inverse() {
    let ctx = earth();
    let target = StateVector::new([-2_000.0, 6_500.0, 1_200.0], [-6.9, -1.8, 2.1]);
    let r_rel = [1.5, -4.0, 0.7];
    let v_rel = [0.002, -0.001, 0.0005];

    let chaser = kinematics_geocentric(&target, &r_rel, &v_rel).expect("geocentric");
    let back = kinematics_lvlh(&ctx, &target, &chaser).expect("lvlh");
    for i in 0..3 {
        assert_relative_eq!(back.r[i], r_rel[i], epsilon = 1e-9);
        assert_relative_eq!(back.v[i], v_rel[i], epsilon = 1e-12);
    }
}

#[test]
fn degenerate_target_is_rejected() {
    let ctx = earth();
    let target = StateVector::new([7_000.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
    let chaser = StateVector::new([7_001.0, 0.0, 0.0], [0.0, 7.5, 0.0]);
    assert!(matches!(
        kinematics_lvlh(&ctx, &target, &chaser),
        Err(DynamicsError::InvalidInput(_))
    ));
}

#[test]
fn linearised_motion_matches_clohessy_wiltshire_on_circular_orbit() {
    let ctx = earth();
    let radius = 6_778.0;
    let target = circular_target(&ctx, radius);
    let n = (ctx.mu / radius.powi(3)).sqrt();
    let dr0 = [0.5, -1.0, 0.2];
    let dv0 = [0.001, -0.0005, 0.0002];
    let mut y0 = [0.0; 12];
    y0[..3].copy_from_slice(&dr0);
    y0[3..6].copy_from_slice(&dv0);
    y0[6..9].copy_from_slice(&target.r);
    y0[9..].copy_from_slice(&target.v);

    let trajectory = simulate_linearized(&ctx, &y0, 0.0, 1_500.0).expect("integrates");
    let last = trajectory.last_state().expect("samples");
    let (dr, dv) = clohessy_wiltshire(&dr0, &dv0, n, 1_500.0);
    for i in 0..3 {
        assert_relative_eq!(last[i], dr[i], epsilon = 1e-4);
        assert_relative_eq!(last[3 + i], dv[i], epsilon = 1e-7);
    }
}

#[test]
fn two_impulse_rendezvous_closes_the_gap() {
    let ctx = earth();
    let radius = 6_778.0;
    let target = circular_target(&ctx, radius);
    let chaser = kinematics_geocentric(&target, &[20.0, -5.0, 1.0], &[0.0, 0.01, 0.0]).expect("chaser");

    let tf = 3_600.0;
    let plan = two_impulse_rendezvous(&ctx, &target, &chaser, tf).expect("plan");
    assert_relative_eq!(plan.mean_motion, (ctx.mu / radius.powi(3)).sqrt(), max_relative = 1e-12);
    assert_relative_eq!(plan.dr0[0], 20.0, epsilon = 1e-9);
    assert_relative_eq!(plan.dv0_minus[1], 0.01, epsilon = 1e-12);

    let (dr_f, dv_f) = clohessy_wiltshire(&plan.dr0, &plan.dv0_plus, plan.mean_motion, tf);
    assert!(norm(&dr_f) < 1e-9, "residual miss {dr_f:?}");
    assert_relative_eq!(norm(&dv_f), plan.arrival_dv, max_relative = 1e-12);
    assert_relative_eq!(plan.total_dv, plan.departure_dv + plan.arrival_dv, epsilon = 1e-15);
    assert!(plan.departure_dv > 0.0);
}

#[test]
fn rendezvous_after_one_period_is_singular() {
    let ctx = earth();
    let radius = 6_778.0;
    let target = circular_target(&ctx, radius);
    let chaser = kinematics_geocentric(&target, &[0.0, -10.0, 0.0], &[0.0, 0.0, 0.0]).expect("chaser");
    let period = 2.0 * PI * radius / (ctx.mu / radius).sqrt();

    assert!(matches!(
        two_impulse_rendezvous(&ctx, &target, &chaser, period),
        Err(DynamicsError::SingularTransition { .. })
    ));
    assert!(matches!(
        two_impulse_rendezvous(&ctx, &target, &chaser, 0.0),
        Err(DynamicsError::InvalidInput(_))
    ));
}

#[test]
fn earth_moon_lagrange_points() {
    let params = crtbp::parameters(CelestialBody::Earth, CelestialBody::Moon, None).expect("parameters");
    let d = params.separation;
    assert_relative_eq!(d, CelestialBody::Moon.semi_major_axis(), epsilon = 1e-9);
    assert_relative_eq!(params.omega, 2.665e-6, max_relative = 1e-3);
    assert_relative_eq!(params.pi_1 + params.pi_2, 1.0, epsilon = 1e-15);
    assert_relative_eq!(params.x_2 - params.x_1, d, max_relative = 1e-12);

    let [l1, l2, l3, l4, l5] = params.lagrange;
    assert_relative_eq!(l1[0] / d, 0.8369, epsilon = 1e-3);
    assert_relative_eq!(l2[0] / d, 1.1557, epsilon = 1e-3);
    assert_relative_eq!(l3[0] / d, -1.0051, epsilon = 1e-3);
    assert!(params.x_1 < l1[0] && l1[0] < params.x_2);
    assert!(l2[0] > params.x_2 && l3[0] < params.x_1);

    assert_relative_eq!(l4[0], l5[0]);
    assert_relative_eq!(l4[1], -l5[1]);
    let to_primary = ((l4[0] - params.x_1).powi(2) + l4[1].powi(2)).sqrt();
    let to_secondary = ((l4[0] - params.x_2).powi(2) + l4[1].powi(2)).sqrt();
    assert_relative_eq!(to_primary, d, max_relative = 1e-12);
    assert_relative_eq!(to_secondary, d, max_relative = 1e-12);
}

#[test]
fn crtbp_conserves_the_jacobi_constant() {
    let params = crtbp::parameters(CelestialBody::Earth, CelestialBody::Moon, None).expect("parameters");
    let y0 = [-6_878.0 + params.x_1, 0.0, 0.0, 0.0, -10.0, 0.0];
    let trajectory = crtbp::simulate(&params, &y0, 0.0, 2.0 * 86_400.0).expect("integrates");
    let c0 = params.jacobi_constant(&y0);
    for y in &trajectory.y {
        assert_relative_eq!(params.jacobi_constant(y), c0, max_relative = 1e-5);
    }
}

#[test]
fn body_at_l4_stays_put() {
    let params = crtbp::parameters(CelestialBody::Earth, CelestialBody::Moon, None).expect("parameters");
    let l4 = params.lagrange[3];
    let y0 = [l4[0], l4[1], 0.0, 0.0, 0.0, 0.0];
    let trajectory = crtbp::simulate(&params, &y0, 0.0, 86_400.0).expect("integrates");
    let last = trajectory.last_state().expect("samples");
    let drift = ((last[0] - l4[0]).powi(2) + (last[1] - l4[1]).powi(2)).sqrt();
    assert!(drift < 1.0, "drifted {drift} km from L4");
}

#[test]
fn crtbp_rejects_non_positive_masses() {
    assert!(matches!(
        CrtbpParameters::from_masses(0.0, 1e22, 1e5),
        Err(DynamicsError::InvalidInput(_))
    ));
    assert!(CrtbpParameters::from_masses(5.0e24, 7.0e22, -1.0).is_err());
}

#[test]
fn direction_cosines_round_trip() {
    let euler = [0.3, 0.8, 0.5];
    let q = dcm_from_euler_angles(euler[0], euler[1], euler[2]);
    assert_matrix_eq(&matrix::mul(&q, &matrix::transpose(&q)), &IDENTITY, 1e-14);
    let back = euler_angles_from_dcm(&q);
    for i in 0..3 {
        assert_relative_eq!(back[i], euler[i], epsilon = 1e-12);
    }

    let ypr = yaw_pitch_roll_from_dcm(&q);
    assert_matrix_eq(&dcm_from_yaw_pitch_roll(ypr[0], ypr[1], ypr[2]), &q, 1e-14);
    assert!(ypr[1].abs() <= PI / 2.0);

    let quaternion = quaternion_from_dcm(&q);
    assert!(quaternion[3] >= 0.0);
    assert_relative_eq!(quaternion.iter().map(|x| x * x).sum::<f64>(), 1.0, epsilon = 1e-14);
    assert_matrix_eq(&dcm_from_quaternion(&quaternion), &q, 1e-14);
}

#[test]
fn quaternion_of_half_turn_uses_the_largest_component() {
    let half_turn_about_y = [[-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, -1.0]];
    let q = quaternion_from_dcm(&half_turn_about_y);
    assert_relative_eq!(q[1].abs(), 1.0, epsilon = 1e-15);
    assert_relative_eq!(q[3], 0.0, epsilon = 1e-15);
    assert_matrix_eq(&dcm_from_quaternion(&q), &half_turn_about_y, 1e-15);
}

fn inertia() -> PrincipalInertia {
    PrincipalInertia::new(1_000.0, 2_000.0, 3_000.0)
}

fn energy_and_momentum(inertia: &PrincipalInertia, w: &[f64]) -> (f64, f64) {
    let h = [inertia.a * w[0], inertia.b * w[1], inertia.c * w[2]];
    let energy = 0.5 * (h[0] * w[0] + h[1] * w[1] + h[2] * w[2]);
    (energy, norm(&h))
}

#[test]
fn torque_free_motion_conserves_energy_and_momentum() {
    let inertia = inertia();
    let w0 = [0.1, 0.02, 0.3];
    let q0 = quaternion_from_dcm(&dcm_from_euler_angles(0.3, 0.8, 0.5));
    let y0 = [w0[0], w0[1], w0[2], q0[0], q0[1], q0[2], q0[3]];

    let trajectory = simulate_attitude(&inertia, AttitudeKinematics::Quaternion, [0.0; 3], &y0, 0.0, 20.0)
        .expect("integrates");
    let last = trajectory.last_state().expect("samples");
    let (t0, h0) = energy_and_momentum(&inertia, &w0);
    let (t1, h1) = energy_and_momentum(&inertia, &last[..3]);
    assert_relative_eq!(t1, t0, max_relative = 1e-6);
    assert_relative_eq!(h1, h0, max_relative = 1e-6);
    assert_relative_eq!(last[3..].iter().map(|x| x * x).sum::<f64>(), 1.0, epsilon = 1e-6);

    // Angular momentum is fixed in inertial space.
    let h_body = |w: &[f64]| [inertia.a * w[0], inertia.b * w[1], inertia.c * w[2]];
    let inertial = |q: &[f64], w: &[f64]| {
        let dcm = dcm_from_quaternion(&[q[0], q[1], q[2], q[3]]);
        matrix::mul_vec(&matrix::transpose(&dcm), &h_body(w))
    };
    let before = inertial(&q0, &w0);
    let after = inertial(&last[3..], &last[..3]);
    for i in 0..3 {
        assert_relative_eq!(after[i], before[i], epsilon = 1e-3);
    }
}

#[test]
fn attitude_parameterisations_agree() {
    let inertia = inertia();
    let w0 = [0.1, 0.02, 0.3];
    let euler0 = [0.3, 0.8, 0.5];
    let dcm0 = dcm_from_euler_angles(euler0[0], euler0[1], euler0[2]);
    let q0 = quaternion_from_dcm(&dcm0);
    let ypr0 = yaw_pitch_roll_from_dcm(&dcm0);

    let run = |kinematics: AttitudeKinematics, attitude: &[f64]| {
        let mut y0 = w0.to_vec();
        y0.extend_from_slice(attitude);
        let trajectory =
            simulate_attitude(&inertia, kinematics, [0.0; 3], &y0, 0.0, 20.0).expect("integrates");
        trajectory.last_state().expect("samples").to_vec()
    };

    let by_euler = run(AttitudeKinematics::EulerAngles, &euler0);
    let by_ypr = run(AttitudeKinematics::YawPitchRoll, &ypr0);
    let by_quaternion = run(AttitudeKinematics::Quaternion, &q0);

    let dcm_quaternion = dcm_from_quaternion(&[by_quaternion[3], by_quaternion[4], by_quaternion[5], by_quaternion[6]]);
    assert_matrix_eq(&dcm_from_euler_angles(by_euler[3], by_euler[4], by_euler[5]), &dcm_quaternion, 1e-5);
    assert_matrix_eq(&dcm_from_yaw_pitch_roll(by_ypr[3], by_ypr[4], by_ypr[5]), &dcm_quaternion, 1e-5);
}

#[test]
fn constant_torque_spins_up_about_its_axis() {
    let inertia = inertia();
    let y0 = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0];
    let trajectory = simulate_attitude(&inertia, AttitudeKinematics::Quaternion, [0.0, 0.0, 30.0], &y0, 0.0, 10.0)
        .expect("integrates");
    let last = trajectory.last_state().expect("samples");
    assert_relative_eq!(last[2], 0.1, epsilon = 1e-9);
    let angle: f64 = 0.5 * 0.01 * 100.0;
    assert_relative_eq!(last[5], (angle / 2.0).sin(), epsilon = 1e-6);
    assert_relative_eq!(last[6], (angle / 2.0).cos(), epsilon = 1e-6);
}

#[test]
fn attitude_inputs_are_validated() {
    let inertia = inertia();
    assert!(matches!(
        simulate_attitude(&inertia, AttitudeKinematics::Quaternion, [0.0; 3], &[0.0; 6], 0.0, 1.0),
        Err(DynamicsError::InvalidInput(_))
    ));
    assert!(matches!(
        simulate_attitude(&inertia, AttitudeKinematics::EulerAngles, [0.0; 3], &[0.0; 7], 0.0, 1.0),
        Err(DynamicsError::InvalidInput(_))
    ));
    let flat = PrincipalInertia::new(1.0, 0.0, 1.0);
    assert!(simulate_attitude(&flat, AttitudeKinematics::YawPitchRoll, [0.0; 3], &[0.0; 6], 0.0, 1.0).is_err());
    assert_eq!(AttitudeKinematics::default().state_len(), 6);
}
