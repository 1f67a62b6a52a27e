//! Gauss's method of preliminary orbit determination from three optical sightings.

use astro_core::PhysicalContext;
use astro_core::solve::{self, NewtonOptions, SolveError};
use astro_core::vector::{self, Vector3};
use astro_orbits::lagrange::{lagrange_coefficients, universal_anomaly};
use astro_orbits::{OrbitalElements, orbital_elements};
use serde::{Deserialize, Serialize};

use crate::DeterminationError;
use crate::topocentric::ObservationSite;

const POLYNOMIAL_SEED_KM: f64 = 10_000.0;
const RANGE_TOLERANCE_KM: f64 = 1e-6;
const MAX_REFINEMENTS: usize = 1000;

/// One topocentric sighting. Angles in radians, time in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GaussObservation {
    pub sidereal_time: f64,
    pub right_ascension: f64,
    pub declination: f64,
    pub t: f64,
}

impl GaussObservation {
    fn direction(&self) -> Vector3 {
        let (sd, cd) = self.declination.sin_cos();
        let (sa, ca) = self.right_ascension.sin_cos();
        [cd * ca, cd * sa, sd]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GaussSolution {
    /// Position at the middle sighting (km).
    pub r2: Vector3,
    /// Velocity at the middle sighting (km/s).
    pub v2: Vector3,
    pub elements: OrbitalElements,
    /// Slant ranges to the three sightings (km).
    pub slant_ranges: [f64; 3],
    /// Refinement passes performed; zero for the basic method.
    pub iterations: usize,
}

struct Setup {
    site: [Vector3; 3],
    rho_hat: [Vector3; 3],
    tau1: f64,
    tau3: f64,
    tau: f64,
    d0: f64,
    d: [[f64; 3]; 3],
}

impl Setup {
    fn new(ctx: &PhysicalContext, site: &ObservationSite, obs: &[GaussObservation; 3]) -> Self {
        let site_r = obs.map(|o| site.position(ctx, o.sidereal_time));
        let rho_hat = obs.map(|o| o.direction());
        let tau1 = obs[0].t - obs[1].t;
        let tau3 = obs[2].t - obs[1].t;

        let p = [
            vector::cross(&rho_hat[1], &rho_hat[2]),
            vector::cross(&rho_hat[0], &rho_hat[2]),
            vector::cross(&rho_hat[0], &rho_hat[1]),
        ];
        let d0 = vector::dot(&rho_hat[0], &p[0]);
        let mut d = [[0.0; 3]; 3];
        for (i, row) in d.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = vector::dot(&site_r[i], &p[j]);
            }
        }

        Self {
            site: site_r,
            rho_hat,
            tau1,
            tau3,
            tau: tau3 - tau1,
            d0,
            d,
        }
    }

    fn positions(&self, rho: [f64; 3]) -> [Vector3; 3] {
        [0, 1, 2].map(|i| vector::add(&self.site[i], &vector::scale(&self.rho_hat[i], rho[i])))
    }
}

fn middle_velocity(r1: &Vector3, r3: &Vector3, f1: f64, g1: f64, f3: f64, g3: f64) -> Vector3 {
    vector::scale(
        &vector::add(&vector::scale(r1, -f3), &vector::scale(r3, f1)),
        1.0 / (f1 * g3 - f3 * g1),
    )
}

fn basic(ctx: &PhysicalContext, s: &Setup) -> Result<GaussSolution, SolveError> {
    let mu = ctx.mu;
    let (tau1, tau3, tau, d0, d) = (s.tau1, s.tau3, s.tau, s.d0, &s.d);

    let a = (-d[0][1] * tau3 / tau + d[1][1] + d[2][1] * tau1 / tau) / d0;
    let b = (d[0][1] * (tau3 * tau3 - tau * tau) * tau3 / tau + d[2][1] * (tau * tau - tau1 * tau1) * tau1 / tau)
        / (6.0 * d0);
    let e = vector::dot(&s.site[1], &s.rho_hat[1]);
    let r2_sq = vector::dot(&s.site[1], &s.site[1]);

    let pa = -(a * a + 2.0 * a * e + r2_sq);
    let pb = -2.0 * mu * b * (a + e);
    let pc = -(mu * b).powi(2);
    let x = solve::newton(
        |x| x.powi(8) + pa * x.powi(6) + pb * x.powi(3) + pc,
        |x| 8.0 * x.powi(7) + 6.0 * pa * x.powi(5) + 3.0 * pb * x * x,
        POLYNOMIAL_SEED_KM,
        NewtonOptions::default().with_max_iterations(500),
    )?;
    let x3 = x.powi(3);

    let rho1 = ((6.0 * (d[2][0] * tau1 / tau3 + d[1][0] * tau / tau3) * x3
        + mu * d[2][0] * (tau * tau - tau1 * tau1) * tau1 / tau3)
        / (6.0 * x3 + mu * (tau * tau - tau3 * tau3))
        - d[0][0])
        / d0;
    let rho2 = a + mu * b / x3;
    let rho3 = ((6.0 * (d[0][2] * tau3 / tau1 - d[1][2] * tau / tau1) * x3
        + mu * d[0][2] * (tau * tau - tau3 * tau3) * tau3 / tau1)
        / (6.0 * x3 + mu * (tau * tau - tau1 * tau1))
        - d[2][2])
        / d0;

    let rho = [rho1, rho2, rho3];
    let [r1, r2, r3] = s.positions(rho);
    let f1 = 1.0 - 0.5 * mu * tau1 * tau1 / x3;
    let f3 = 1.0 - 0.5 * mu * tau3 * tau3 / x3;
    let g1 = tau1 - mu * tau1.powi(3) / (6.0 * x3);
    let g3 = tau3 - mu * tau3.powi(3) / (6.0 * x3);
    let v2 = middle_velocity(&r1, &r3, f1, g1, f3, g3);

    Ok(GaussSolution {
        r2,
        v2,
        elements: orbital_elements(ctx, &r2, &v2),
        slant_ranges: rho,
        iterations: 0,
    })
}

/// Gauss's method without iterative improvement (Algorithm 5.5).
pub fn gauss(
    ctx: &PhysicalContext,
    site: &ObservationSite,
    observations: &[GaussObservation; 3],
) -> Result<GaussSolution, DeterminationError> {
    Ok(basic(ctx, &Setup::new(ctx, site, observations))?)
}

/// Gauss's method refined with universal-variable Lagrange coefficients until
/// the slant ranges settle (Algorithm 5.6).
pub fn gauss_extended(
    ctx: &PhysicalContext,
    site: &ObservationSite,
    observations: &[GaussObservation; 3],
) -> Result<GaussSolution, DeterminationError> {
    let s = Setup::new(ctx, site, observations);
    let first = basic(ctx, &s)?;
    let mu = ctx.mu;
    let d = &s.d;

    let (mut r2, mut v2) = (first.r2, first.v2);
    let mut rho = first.slant_ranges;
    let (mut f1, mut g1, mut f3, mut g3) = (
        1.0 - 0.5 * mu * s.tau1 * s.tau1 / vector::norm(&r2).powi(3),
        s.tau1 - mu * s.tau1.powi(3) / (6.0 * vector::norm(&r2).powi(3)),
        1.0 - 0.5 * mu * s.tau3 * s.tau3 / vector::norm(&r2).powi(3),
        s.tau3 - mu * s.tau3.powi(3) / (6.0 * vector::norm(&r2).powi(3)),
    );

    for iteration in 1..=MAX_REFINEMENTS {
        let r2_m = vector::norm(&r2);
        let v2_m = vector::norm(&v2);
        let alpha = 2.0 / r2_m - v2_m * v2_m / mu;
        let vr2 = vector::dot(&v2, &r2) / r2_m;

        let chi1 = universal_anomaly(ctx, r2_m, vr2, alpha, s.tau1)?;
        let chi3 = universal_anomaly(ctx, r2_m, vr2, alpha, s.tau3)?;
        let (ff1, gg1) = lagrange_coefficients(ctx, r2_m, alpha, s.tau1, chi1);
        let (ff3, gg3) = lagrange_coefficients(ctx, r2_m, alpha, s.tau3, chi3);

        f1 = 0.5 * (f1 + ff1);
        g1 = 0.5 * (g1 + gg1);
        f3 = 0.5 * (f3 + ff3);
        g3 = 0.5 * (g3 + gg3);

        let det = f1 * g3 - f3 * g1;
        let c1 = g3 / det;
        let c3 = -g1 / det;

        let next = [
            (-d[0][0] + d[1][0] / c1 - d[2][0] * c3 / c1) / s.d0,
            (-c1 * d[0][1] + d[1][1] - c3 * d[2][1]) / s.d0,
            (-d[0][2] * c1 / c3 + d[1][2] / c3 - d[2][2]) / s.d0,
        ];
        let [r1, r2_next, r3] = s.positions(next);
        r2 = r2_next;
        v2 = middle_velocity(&r1, &r3, f1, g1, f3, g3);

        let settled = (0..3).all(|k| (next[k] - rho[k]).abs() < RANGE_TOLERANCE_KM);
        rho = next;
        if settled {
            log::debug!("gauss refinement settled after {iteration} iterations");
            return Ok(GaussSolution {
                r2,
                v2,
                elements: orbital_elements(ctx, &r2, &v2),
                slant_ranges: rho,
                iterations: iteration,
            });
        }
    }

    log::warn!("gauss refinement did not settle after {MAX_REFINEMENTS} iterations");
    Err(SolveError::NonConvergent {
        iterations: MAX_REFINEMENTS,
        last: rho[1],
    }
    .into())
}
