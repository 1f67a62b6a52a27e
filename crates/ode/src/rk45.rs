use crate::{EventDirection, EventFunction, EventHit, IntegrationError, OdeSystem, Trajectory};

const C: [f64; 6] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0];

const A: [[f64; 5]; 6] = [
    [0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0],
    [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0],
    [19372.0 / 6561.0, -25360.0 / 2187.0, 64448.0 / 6561.0, -212.0 / 729.0, 0.0],
    [9017.0 / 3168.0, -355.0 / 33.0, 46732.0 / 5247.0, 49.0 / 176.0, -5103.0 / 18656.0],
];

const B: [f64; 6] = [35.0 / 384.0, 0.0, 500.0 / 1113.0, 125.0 / 192.0, -2187.0 / 6784.0, 11.0 / 84.0];

// Difference between the 5th and embedded 4th order weights; the last entry
// multiplies the FSAL stage.
const E: [f64; 7] = [
    71.0 / 57600.0,
    0.0,
    -71.0 / 16695.0,
    71.0 / 1920.0,
    -17253.0 / 339200.0,
    22.0 / 525.0,
    -1.0 / 40.0,
];

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 10.0;
const ERROR_EXPONENT: f64 = -1.0 / 5.0;

/// Relative and absolute error tolerances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub rtol: f64,
    pub atol: f64,
}

impl Tolerances {
    pub fn new(rtol: f64, atol: f64) -> Self {
        Self { rtol, atol }
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self::new(1e-8, 1e-8)
    }
}

/// Dormand–Prince 5(4) integrator with step-size control.
#[derive(Debug, Clone)]
pub struct Rk45 {
    pub tolerances: Tolerances,
    pub max_steps: usize,
    /// Upper bound on |h|; `f64::INFINITY` leaves it unconstrained.
    pub max_step: f64,
}

impl Default for Rk45 {
    fn default() -> Self {
        Self {
            tolerances: Tolerances::default(),
            max_steps: 1_000_000,
            max_step: f64::INFINITY,
        }
    }
}

struct Step {
    t: f64,
    y: Vec<f64>,
    f: Vec<f64>,
}

impl Rk45 {
    pub fn new(tolerances: Tolerances) -> Self {
        Self {
            tolerances,
            ..Self::default()
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_max_step(mut self, max_step: f64) -> Self {
        self.max_step = max_step;
        self
    }

    /// Integrate from `t0` to `tf`, recording every accepted step.
    pub fn integrate<S>(&self, system: &S, t0: f64, y0: &[f64], tf: f64) -> Result<Trajectory, IntegrationError>
    where
        S: OdeSystem + ?Sized,
    {
        self.run(system, None::<&fn(f64, &[f64]) -> f64>, t0, y0, tf)
    }

    /// Integrate from `t0` to `tf`, stopping at the first zero crossing of `event`.
    pub fn integrate_until<S, E>(
        &self,
        system: &S,
        event: &E,
        t0: f64,
        y0: &[f64],
        tf: f64,
    ) -> Result<Trajectory, IntegrationError>
    where
        S: OdeSystem + ?Sized,
        E: EventFunction + ?Sized,
    {
        self.run(system, Some(event), t0, y0, tf)
    }

    fn run<S, E>(
        &self,
        system: &S,
        event: Option<&E>,
        t0: f64,
        y0: &[f64],
        tf: f64,
    ) -> Result<Trajectory, IntegrationError>
    where
        S: OdeSystem + ?Sized,
        E: EventFunction + ?Sized,
    {
        if tf < t0 {
            return Err(IntegrationError::InvalidSpan { t0, tf });
        }
        if y0.iter().any(|v| !v.is_finite()) {
            return Err(IntegrationError::NonFinite { t: t0 });
        }

        let n = y0.len();
        let mut f0 = vec![0.0; n];
        system.derivative(t0, y0, &mut f0);

        let mut trajectory = Trajectory {
            t: vec![t0],
            y: vec![y0.to_vec()],
            event: None,
        };
        if tf == t0 {
            return Ok(trajectory);
        }

        let mut current = Step {
            t: t0,
            y: y0.to_vec(),
            f: f0,
        };
        let mut g_prev = event.map(|e| e.value(t0, y0));
        let mut h = self.initial_step(system, &current, tf);
        let mut stages = vec![vec![0.0; n]; 7];
        let mut steps = 0usize;

        while current.t < tf {
            steps += 1;
            if steps > self.max_steps {
                log::warn!("rk45 step limit {} reached at t = {}", self.max_steps, current.t);
                return Err(IntegrationError::StepLimit {
                    max_steps: self.max_steps,
                    t: current.t,
                });
            }

            let min_step = 10.0 * f64::EPSILON * current.t.abs().max(1.0);
            let mut rejected = false;
            let next = loop {
                if h < min_step {
                    return Err(IntegrationError::StepSizeUnderflow { t: current.t });
                }
                let h_try = h.min(tf - current.t);
                let (y_new, f_new, error) = self.try_step(system, &current, h_try, &mut stages);

                if !error.is_finite() || y_new.iter().any(|v| !v.is_finite()) {
                    // Shrink on overflow before declaring the state non-finite.
                    h = h_try * MIN_FACTOR;
                    rejected = true;
                    if h < min_step {
                        return Err(IntegrationError::NonFinite { t: current.t });
                    }
                    continue;
                }

                if error < 1.0 {
                    let factor = if error == 0.0 {
                        MAX_FACTOR
                    } else {
                        (SAFETY * error.powf(ERROR_EXPONENT)).min(MAX_FACTOR)
                    };
                    let factor = if rejected { factor.min(1.0) } else { factor };
                    h = (h_try * factor).min(self.max_step);
                    break Step {
                        t: if h_try == tf - current.t { tf } else { current.t + h_try },
                        y: y_new,
                        f: f_new,
                    };
                }
                h = h_try * (SAFETY * error.powf(ERROR_EXPONENT)).max(MIN_FACTOR);
                rejected = true;
            };

            if let (Some(event), Some(g0)) = (event, g_prev) {
                let g1 = event.value(next.t, &next.y);
                if crosses(g0, g1, event.direction()) {
                    let hit = self.locate_event(system, event, &current, next.t - current.t, g0, &mut stages);
                    trajectory.t.push(hit.t);
                    trajectory.y.push(hit.y.clone());
                    trajectory.event = Some(hit);
                    log::debug!("rk45 terminal event after {steps} steps");
                    return Ok(trajectory);
                }
                g_prev = Some(g1);
            }

            trajectory.t.push(next.t);
            trajectory.y.push(next.y.clone());
            current = next;
        }

        log::debug!("rk45 reached tf = {tf} after {steps} steps");
        Ok(trajectory)
    }

    fn try_step<S>(&self, system: &S, current: &Step, h: f64, k: &mut [Vec<f64>]) -> (Vec<f64>, Vec<f64>, f64)
    where
        S: OdeSystem + ?Sized,
    {
        let n = current.y.len();
        k[0].copy_from_slice(&current.f);
        let mut y_stage = vec![0.0; n];
        for s in 1..6 {
            for j in 0..n {
                let mut acc = 0.0;
                for (m, a) in A[s].iter().enumerate().take(s) {
                    acc += a * k[m][j];
                }
                y_stage[j] = current.y[j] + h * acc;
            }
            system.derivative(current.t + C[s] * h, &y_stage, &mut k[s]);
        }

        let mut y_new = vec![0.0; n];
        for j in 0..n {
            let acc: f64 = (0..6).map(|s| B[s] * k[s][j]).sum();
            y_new[j] = current.y[j] + h * acc;
        }
        let mut f_new = vec![0.0; n];
        system.derivative(current.t + h, &y_new, &mut f_new);
        k[6].copy_from_slice(&f_new);

        let mut sum = 0.0;
        for j in 0..n {
            let err: f64 = h * (0..7).map(|s| E[s] * k[s][j]).sum::<f64>();
            let scale = self.tolerances.atol + current.y[j].abs().max(y_new[j].abs()) * self.tolerances.rtol;
            sum += (err / scale).powi(2);
        }
        let error = (sum / n.max(1) as f64).sqrt();
        (y_new, f_new, error)
    }

    fn initial_step<S>(&self, system: &S, start: &Step, tf: f64) -> f64
    where
        S: OdeSystem + ?Sized,
    {
        let Tolerances { rtol, atol } = self.tolerances;
        let n = start.y.len().max(1) as f64;
        let scale: Vec<f64> = start.y.iter().map(|y| atol + y.abs() * rtol).collect();
        let rms = |v: &[f64]| (v.iter().zip(&scale).map(|(x, s)| (x / s).powi(2)).sum::<f64>() / n).sqrt();

        let d0 = rms(&start.y);
        let d1 = rms(&start.f);
        let h0 = if d0 < 1e-5 || d1 < 1e-5 { 1e-6 } else { 0.01 * d0 / d1 };

        let y1: Vec<f64> = start.y.iter().zip(&start.f).map(|(y, f)| y + h0 * f).collect();
        let mut f1 = vec![0.0; start.y.len()];
        system.derivative(start.t + h0, &y1, &mut f1);
        let diff: Vec<f64> = f1.iter().zip(&start.f).map(|(a, b)| a - b).collect();
        let d2 = rms(&diff) / h0;

        let h1 = if d1 <= 1e-15 && d2 <= 1e-15 {
            (h0 * 1e-3).max(1e-6)
        } else {
            (0.01 / d1.max(d2)).powf(1.0 / 5.0)
        };
        let h = (100.0 * h0).min(h1).min(tf - start.t).min(self.max_step);
        if h.is_finite() && h > 0.0 { h } else { 1e-6 }
    }

    /// Bisects the accepted step on the step length until the crossing is bracketed
    /// to machine precision in time.
    fn locate_event<S, E>(&self, system: &S, event: &E, start: &Step, h: f64, g0: f64, k: &mut [Vec<f64>]) -> EventHit
    where
        S: OdeSystem + ?Sized,
        E: EventFunction + ?Sized,
    {
        let (mut lo, mut hi) = (0.0, h);
        let (y_hi, _, _) = self.try_step(system, start, h, k);
        let mut best = EventHit {
            t: start.t + h,
            y: y_hi,
        };
        for _ in 0..100 {
            if hi - lo <= 4.0 * f64::EPSILON * (start.t + hi).abs().max(1.0) {
                break;
            }
            let mid = 0.5 * (lo + hi);
            let (y_mid, _, _) = self.try_step(system, start, mid, k);
            let g_mid = event.value(start.t + mid, &y_mid);
            if crosses(g0, g_mid, event.direction()) {
                hi = mid;
                best = EventHit {
                    t: start.t + mid,
                    y: y_mid,
                };
            } else {
                lo = mid;
            }
        }
        best
    }
}

fn crosses(g0: f64, g1: f64, direction: EventDirection) -> bool {
    let rising = g0 < 0.0 && g1 >= 0.0;
    let falling = g0 > 0.0 && g1 <= 0.0;
    match direction {
        EventDirection::Any => rising || falling,
        EventDirection::Rising => rising,
        EventDirection::Falling => falling,
    }
}
