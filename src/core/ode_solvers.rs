//! Explicit ODE solvers

use nalgebra::SVector;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub fn rk4_method_step<F, const D: usize>(
    dt: f64,
    t: f64,
    x: SVector<f64, D>,
    dynamics: &F,
) -> SVector<f64, D>
where
    F: Fn(f64, SVector<f64, D>) -> SVector<f64, D>,
{
    let t_mid = t + 0.5 * dt;
    let t_next = t + dt;
    let k1 = dt * dynamics(t, x);
    let k2 = dt * dynamics(t_mid, x + 0.5 * k1);
    let k3 = dt * dynamics(t_mid, x + 0.5 * k2);
    let k4 = dt * dynamics(t_next, x + k3);
    const ONE_BY_SIX: f64 = 1.0 / 6.0;
    let x_delta = ONE_BY_SIX * (k1 + 2.0 * k2 + 2.0 * k3 + k4);
    x + x_delta
}

pub fn rk4_simulate<F, const D: usize>(
    t_begin: f64,
    t_final: f64,
    n_steps: u32,
    x0: SVector<f64, D>,
    dynamics: &F,
) -> SVector<f64, D>
where
    F: Fn(f64, SVector<f64, D>) -> SVector<f64, D>,
{
    let dt = (t_final - t_begin) / (n_steps as f64);
    let mut x = x0;
    for i_step in 0..n_steps {
        let alpha = (i_step as f64) / (n_steps as f64);
        let t = t_begin + alpha * (t_final - t_begin);
        x = rk4_method_step(dt, t, x, dynamics);
    }
    x
}

/// Error tolerances and work limits for the adaptive solver.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AdaptiveStepOptions {
    pub relative_tolerance: f64,
    pub absolute_tolerance: f64,
    /// Total number of attempted steps (accepted + rejected) before giving up.
    #[serde(default = "default_max_step_count")]
    pub max_step_count: u64,
}

fn default_max_step_count() -> u64 {
    1_000_000
}

impl Default for AdaptiveStepOptions {
    fn default() -> Self {
        AdaptiveStepOptions {
            relative_tolerance: 1e-8,
            absolute_tolerance: 1e-10,
            max_step_count: default_max_step_count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrationError {
    #[error("step size underflow at t = {t}: step {step:e} is below machine resolution")]
    StepSizeUnderflow { t: f64, step: f64 },

    #[error("exceeded the step budget of {max_step_count} at t = {t}")]
    MaxStepsExceeded { t: f64, max_step_count: u64 },

    #[error("state became non-finite at t = {t}")]
    NonFiniteState { t: f64 },

    #[error("sample times must be non-empty, finite and strictly increasing")]
    InvalidSampleTimes,
}

/// Work counters collected over one call to `dopri5_simulate_sampled`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverStatistics {
    pub accepted_steps: u64,
    pub rejected_steps: u64,
    pub function_evaluations: u64,
}

#[derive(Debug, Clone)]
pub struct SampledSolution<const D: usize> {
    pub states: Vec<SVector<f64, D>>,
    pub statistics: SolverStatistics,
}

// Dormand-Prince 5(4) tableau.
const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// Fifth order weights, also the last row of `A` (first-same-as-last).
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// Difference between the fifth and fourth order weights.
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 10.0;
const ERROR_EXPONENT: f64 = -1.0 / 5.0;

/// Root-mean-square of `v / scale`, the norm used for step-size control.
fn scaled_rms_norm<const D: usize>(v: &SVector<f64, D>, scale: &SVector<f64, D>) -> f64 {
    let sum_sq: f64 = v
        .iter()
        .zip(scale.iter())
        .map(|(value, s)| (value / s).powi(2))
        .sum();
    (sum_sq / (D as f64)).sqrt()
}

fn is_finite<const D: usize>(x: &SVector<f64, D>) -> bool {
    x.iter().all(|v| v.is_finite())
}

/// Starting step size heuristic from Hairer, Norsett & Wanner (II.4).
fn select_initial_step<F, const D: usize>(
    t0: f64,
    x0: &SVector<f64, D>,
    f0: &SVector<f64, D>,
    dynamics: &F,
    options: &AdaptiveStepOptions,
) -> f64
where
    F: Fn(f64, SVector<f64, D>) -> SVector<f64, D>,
{
    let scale = x0.map(|v| options.absolute_tolerance + v.abs() * options.relative_tolerance);
    let d0 = scaled_rms_norm(x0, &scale);
    let d1 = scaled_rms_norm(f0, &scale);
    let h0 = if d0 < 1e-5 || d1 < 1e-5 {
        1e-6
    } else {
        0.01 * d0 / d1
    };

    let x1 = *x0 + h0 * *f0;
    let f1 = dynamics(t0 + h0, x1);
    let d2 = scaled_rms_norm(&(f1 - *f0), &scale) / h0;

    let h1 = if d1 <= 1e-15 && d2 <= 1e-15 {
        (h0 * 1e-3).max(1e-6)
    } else {
        (0.01 / d1.max(d2)).powf(1.0 / 5.0)
    };
    (100.0 * h0).min(h1)
}

/**
 * Integrates `dynamics` with the Dormand-Prince 5(4) embedded pair and returns the
 * state at each of the `sample_times`. The first sample time is the initial time,
 * and the first returned state is `x0` itself.
 *
 * Steps are clipped so that the integrator lands exactly on every sample time,
 * so no dense-output interpolation is involved. After landing on a sample the
 * previously proposed (unclipped) step size is restored.
 */
pub fn dopri5_simulate_sampled<F, const D: usize>(
    sample_times: &[f64],
    x0: SVector<f64, D>,
    dynamics: &F,
    options: &AdaptiveStepOptions,
) -> Result<SampledSolution<D>, IntegrationError>
where
    F: Fn(f64, SVector<f64, D>) -> SVector<f64, D>,
{
    if sample_times.is_empty()
        || sample_times.iter().any(|t| !t.is_finite())
        || sample_times.windows(2).any(|pair| pair[1] <= pair[0])
    {
        return Err(IntegrationError::InvalidSampleTimes);
    }
    let t_begin = sample_times[0];
    if !is_finite(&x0) {
        return Err(IntegrationError::NonFiniteState { t: t_begin });
    }

    let mut statistics = SolverStatistics::default();
    let mut states = Vec::with_capacity(sample_times.len());
    states.push(x0);

    let mut t = t_begin;
    let mut x = x0;
    let mut f = dynamics(t, x);
    statistics.function_evaluations += 1;
    let mut h = if sample_times.len() > 1 {
        let h = select_initial_step(t, &x, &f, dynamics, options);
        statistics.function_evaluations += 1;
        h
    } else {
        0.0
    };

    for &t_target in sample_times.iter().skip(1) {
        while t < t_target {
            if statistics.accepted_steps + statistics.rejected_steps >= options.max_step_count {
                return Err(IntegrationError::MaxStepsExceeded {
                    t,
                    max_step_count: options.max_step_count,
                });
            }

            let min_step = 10.0 * f64::EPSILON * t.abs().max(f64::MIN_POSITIVE);
            if h < min_step {
                return Err(IntegrationError::StepSizeUnderflow { t, step: h });
            }

            let remaining = t_target - t;
            let clipped = h >= remaining;
            let dt = if clipped { remaining } else { h };

            let k1 = f;
            let k2 = dynamics(t + C2 * dt, x + dt * (A21 * k1));
            let k3 = dynamics(t + C3 * dt, x + dt * (A31 * k1 + A32 * k2));
            let k4 = dynamics(t + C4 * dt, x + dt * (A41 * k1 + A42 * k2 + A43 * k3));
            let k5 = dynamics(
                t + C5 * dt,
                x + dt * (A51 * k1 + A52 * k2 + A53 * k3 + A54 * k4),
            );
            let k6 = dynamics(
                t + dt,
                x + dt * (A61 * k1 + A62 * k2 + A63 * k3 + A64 * k4 + A65 * k5),
            );
            let x_next = x + dt * (B1 * k1 + B3 * k3 + B4 * k4 + B5 * k5 + B6 * k6);
            let t_next = if clipped { t_target } else { t + dt };
            let k7 = dynamics(t_next, x_next);
            statistics.function_evaluations += 6;

            let error = dt * (E1 * k1 + E3 * k3 + E4 * k4 + E5 * k5 + E6 * k6 + E7 * k7);
            let scale = SVector::<f64, D>::from_fn(|i, _| {
                options.absolute_tolerance + x[i].abs().max(x_next[i].abs()) * options.relative_tolerance
            });
            let error_norm = scaled_rms_norm(&error, &scale);

            if error_norm.is_finite() && error_norm < 1.0 {
                if !is_finite(&x_next) {
                    return Err(IntegrationError::NonFiniteState { t: t_next });
                }
                statistics.accepted_steps += 1;
                let factor = if error_norm == 0.0 {
                    MAX_FACTOR
                } else {
                    (SAFETY * error_norm.powf(ERROR_EXPONENT)).min(MAX_FACTOR)
                };
                // A clipped step says nothing about how large the next step may be.
                if !clipped {
                    h = dt * factor;
                } else if factor < 1.0 {
                    h = h.min(dt * factor);
                }
                t = t_next;
                x = x_next;
                f = k7;
            } else {
                statistics.rejected_steps += 1;
                let factor = if error_norm.is_finite() {
                    (SAFETY * error_norm.powf(ERROR_EXPONENT)).max(MIN_FACTOR)
                } else {
                    MIN_FACTOR
                };
                h = dt * factor;
            }
        }
        states.push(x);
    }

    Ok(SampledSolution { states, statistics })
}
