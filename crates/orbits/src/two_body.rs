//! Two-body problem: orbit classification and relative-motion integration.

use std::f64::consts::PI;

use astro_core::PhysicalContext;
use astro_core::constants::G0_KM;
use astro_core::units::newtons_to_kg_km_s2;
use astro_core::vector::{self, Vector3};
use astro_ode::{Rk45, Tolerances, Trajectory};
use serde::Serialize;

use crate::{OrbitError, OrbitRegime, time};

/// Hyperbola-only descriptors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HyperbolicParameters {
    /// True anomaly of the asymptote (rad).
    pub theta_inf: f64,
    /// Asymptote angle (rad).
    pub beta: f64,
    /// Turn angle (rad).
    pub delta: f64,
    /// Aiming radius (km).
    pub aiming_radius: f64,
    /// Hyperbolic excess speed (km/s).
    pub v_inf: f64,
    /// Characteristic energy (km²/s²).
    pub c3: f64,
}

/// Descriptive parameters of the conic through a state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbitalParameters {
    pub regime: OrbitRegime,
    pub h: f64,
    /// Specific mechanical energy (km²/s²).
    pub energy: f64,
    pub e: f64,
    /// Period (s); infinite for open orbits.
    pub period: f64,
    pub r_a: f64,
    pub r_p: f64,
    pub a: f64,
    pub b: f64,
    /// Escape speed at periapsis; zero for closed orbits.
    pub v_esc: f64,
    pub hyperbolic: Option<HyperbolicParameters>,
}

/// Classifies the orbit through `(r, v)` and derives its parameters.
pub fn orbital_parameters(ctx: &PhysicalContext, r: &Vector3, v: &Vector3) -> OrbitalParameters {
    let mu = ctx.mu;
    let r_m = vector::norm(r);
    let h = vector::norm(&vector::cross(r, v));
    let energy = vector::dot(v, v) / 2.0 - mu / r_m;
    let e = (2.0 * h * h * energy / (mu * mu) + 1.0).max(0.0).sqrt();
    let regime = OrbitRegime::classify(e);

    let base = OrbitalParameters {
        regime,
        h,
        energy,
        e,
        period: f64::INFINITY,
        r_a: 0.0,
        r_p: 0.0,
        a: 0.0,
        b: 0.0,
        v_esc: 0.0,
        hyperbolic: None,
    };

    match regime {
        OrbitRegime::Circular => OrbitalParameters {
            r_p: r_m,
            r_a: r_m,
            a: r_m,
            b: r_m,
            period: 2.0 * PI / mu.sqrt() * r_m.powf(1.5),
            ..base
        },
        OrbitRegime::Elliptical => {
            let r_p = h * h / mu / (1.0 + e);
            let r_a = h * h / mu / (1.0 - e);
            let a = (r_p + r_a) / 2.0;
            OrbitalParameters {
                r_p,
                r_a,
                a,
                b: a * (1.0 - e * e).sqrt(),
                period: 2.0 * PI / mu.sqrt() * a.powf(1.5),
                ..base
            }
        }
        OrbitRegime::Parabolic => {
            let r_p = h * h / mu / 2.0;
            OrbitalParameters {
                r_p,
                r_a: f64::INFINITY,
                a: f64::INFINITY,
                b: 0.0,
                v_esc: (2.0 * mu / r_p).sqrt(),
                ..base
            }
        }
        OrbitRegime::Hyperbolic => {
            let r_p = h * h / mu / (1.0 + e);
            let r_a = h * h / mu / (1.0 - e);
            let a = (r_a.abs() - r_p) / 2.0;
            let v_inf = (mu / a).sqrt();
            OrbitalParameters {
                r_p,
                r_a,
                a,
                b: a * (e * e - 1.0).sqrt(),
                v_esc: (2.0 * mu / r_p).sqrt(),
                hyperbolic: Some(HyperbolicParameters {
                    theta_inf: (-1.0 / e).acos(),
                    beta: (1.0 / e).acos(),
                    delta: 2.0 * (1.0 / e).asin(),
                    aiming_radius: a * (e * e - 1.0).sqrt(),
                    v_inf,
                    c3: v_inf * v_inf,
                }),
                ..base
            }
        }
    }
}

fn integrator() -> Rk45 {
    Rk45::new(Tolerances::new(1e-8, 1e-8))
}

/// Integrates r̈ = −μ r / |r|³ from the 6-state `y0`.
///
/// With `tf = None` a closed orbit runs for one period and an open orbit until
/// the true anomaly reaches 99.9 % of the asymptote.
pub fn simulate_relative_motion(
    ctx: &PhysicalContext,
    y0: &[f64; 6],
    t0: f64,
    tf: Option<f64>,
) -> Result<Trajectory, OrbitError> {
    let r0 = [y0[0], y0[1], y0[2]];
    let v0 = [y0[3], y0[4], y0[5]];
    let params = orbital_parameters(ctx, &r0, &v0);
    let tf = match tf {
        Some(tf) => tf,
        None => default_final_time(ctx, &params, t0),
    };

    let mu = ctx.mu;
    let rhs = |_t: f64, y: &[f64], dydt: &mut [f64]| {
        let r3 = (y[0] * y[0] + y[1] * y[1] + y[2] * y[2]).powf(1.5);
        dydt[0] = y[3];
        dydt[1] = y[4];
        dydt[2] = y[5];
        dydt[3] = -mu / r3 * y[0];
        dydt[4] = -mu / r3 * y[1];
        dydt[5] = -mu / r3 * y[2];
    };
    Ok(integrator().integrate(&rhs, t0, y0, tf)?)
}

fn default_final_time(ctx: &PhysicalContext, params: &OrbitalParameters, t0: f64) -> f64 {
    match (params.regime, params.hyperbolic) {
        (OrbitRegime::Hyperbolic, Some(hyp)) => t0 + time::hyperbolic_time(ctx.mu, params.h, params.e, 0.999 * hyp.theta_inf),
        (OrbitRegime::Parabolic, _) => t0 + time::parabolic_time(ctx.mu, params.h, 0.999 * PI),
        _ => t0 + params.period,
    }
}

/// Two-body motion with a constant thrust `thrust_n` (N) along the velocity.
///
/// The state is `[r, v, m]`; mass depletes at `T / (Isp g0)`.
pub fn simulate_relative_motion_with_thrust(
    ctx: &PhysicalContext,
    y0: &[f64; 7],
    thrust_n: f64,
    isp_s: f64,
    t0: f64,
    tf: f64,
) -> Result<Trajectory, OrbitError> {
    if isp_s <= 0.0 {
        return Err(OrbitError::InvalidInput(format!("specific impulse must be positive, got {isp_s}")));
    }
    let mu = ctx.mu;
    let thrust = newtons_to_kg_km_s2(thrust_n);
    let rhs = move |_t: f64, y: &[f64], dydt: &mut [f64]| {
        let r3 = (y[0] * y[0] + y[1] * y[1] + y[2] * y[2]).powf(1.5);
        let v = (y[3] * y[3] + y[4] * y[4] + y[5] * y[5]).sqrt();
        let m = y[6];
        dydt[0] = y[3];
        dydt[1] = y[4];
        dydt[2] = y[5];
        // Tangential thrust has no direction at rest.
        let push = if v > 0.0 { thrust / (m * v) } else { 0.0 };
        for k in 0..3 {
            dydt[3 + k] = -mu / r3 * y[k] + push * y[3 + k];
        }
        dydt[6] = -thrust / (isp_s * G0_KM);
    };
    Ok(integrator().integrate(&rhs, t0, y0, tf)?)
}
