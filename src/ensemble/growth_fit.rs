use serde::{Deserialize, Serialize};

use crate::core::regression::{least_squares_fit, LinearFit};

use super::error::EnsembleError;

/// Fit of `value ~ exp(intercept + slope * t)` over a window of samples.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExponentialFit {
    /// Growth rate. For the mean separation of a chaotic ensemble this
    /// approximates the maximal Lyapunov exponent.
    pub slope: f64,
    pub intercept: f64,
    pub times: Vec<f64>,
    /// `exp(intercept + slope * t)` at each of `times`.
    pub curve: Vec<f64>,
}

/**
 * Fits a straight line to `(t, ln(value))` by least squares. Every value must
 * be strictly positive (and finite); the first offending sample is reported
 * rather than skipped.
 */
pub fn fit_exponential_growth(times: &[f64], values: &[f64]) -> Result<ExponentialFit, EnsembleError> {
    if times.len() != values.len() {
        return Err(EnsembleError::ShapeMismatch {
            member: 0,
            expected: times.len(),
            actual: values.len(),
        });
    }
    let log_values = values
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            if value > 0.0 && value.is_finite() {
                Ok(value.ln())
            } else {
                Err(EnsembleError::NonPositiveLogInput { index, value })
            }
        })
        .collect::<Result<Vec<f64>, _>>()?;

    let line: LinearFit = least_squares_fit(times, &log_values).ok_or(EnsembleError::DegenerateFit {
        points: times.len(),
    })?;

    Ok(ExponentialFit {
        slope: line.slope,
        intercept: line.intercept,
        times: times.to_vec(),
        curve: times.iter().map(|&t| line.evaluate(t).exp()).collect(),
    })
}

/// Growth fit over the first `window` samples only, before the separation
/// saturates.
pub fn fit_growth_window(
    time_grid: &[f64],
    values: &[f64],
    window: usize,
) -> Result<ExponentialFit, EnsembleError> {
    if window > time_grid.len() || window > values.len() {
        return Err(EnsembleError::invalid_parameter(format!(
            "growth fit window {} exceeds the series length {}",
            window,
            time_grid.len().min(values.len())
        )));
    }
    fit_exponential_growth(&time_grid[..window], &values[..window])
}
