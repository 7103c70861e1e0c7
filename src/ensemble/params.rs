use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::core::ode_solvers::AdaptiveStepOptions;

use super::error::EnsembleError;

/// Full description of one ensemble run, loaded from a JSON parameter file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EnsembleParams {
    /// Baseline state that every member's initial condition perturbs.
    pub initial_mean: Vector3<f64>,
    /// Per-component variance of the Gaussian perturbation (zero covariance
    /// across components).
    pub initial_variance: f64,
    pub member_count: usize,
    pub t_begin: f64,
    pub t_final: f64,
    /// Number of evenly spaced output times, including both end points.
    pub sample_count: usize,
    pub solver: AdaptiveStepOptions,
    /// The growth-rate fit uses only the first `growth_fit_window` samples of
    /// the mean distance, before the separation saturates at the attractor size.
    pub growth_fit_window: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    /// Integrate members on the rayon thread pool. Output order is unchanged.
    #[serde(default)]
    pub parallel: bool,
    #[serde(default = "default_displacement_export_count")]
    pub displacement_export_count: usize,
}

fn default_displacement_export_count() -> usize {
    5
}

impl Default for EnsembleParams {
    fn default() -> Self {
        EnsembleParams {
            initial_mean: Vector3::new(2.0, 3.0, -14.0),
            initial_variance: 1e-18,
            member_count: 10,
            t_begin: 0.0,
            t_final: 35.0,
            sample_count: 2000,
            solver: AdaptiveStepOptions::default(),
            growth_fit_window: 1500,
            seed: None,
            parallel: false,
            displacement_export_count: default_displacement_export_count(),
        }
    }
}

impl EnsembleParams {
    pub fn validate(&self) -> Result<(), EnsembleError> {
        if self.member_count < 2 {
            return Err(EnsembleError::degenerate_ensemble(2, self.member_count));
        }
        if self.sample_count < 2 {
            return Err(EnsembleError::invalid_parameter(format!(
                "sample_count must be at least 2, got {}",
                self.sample_count
            )));
        }
        if !self.t_begin.is_finite() || !self.t_final.is_finite() || self.t_final <= self.t_begin {
            return Err(EnsembleError::invalid_parameter(format!(
                "time span must be finite and increasing, got [{}, {}]",
                self.t_begin, self.t_final
            )));
        }
        if !self.initial_mean.iter().all(|v| v.is_finite()) {
            return Err(EnsembleError::invalid_parameter(
                "initial_mean must be finite",
            ));
        }
        if !(self.initial_variance >= 0.0) || !self.initial_variance.is_finite() {
            return Err(EnsembleError::invalid_parameter(format!(
                "initial_variance must be finite and non-negative, got {}",
                self.initial_variance
            )));
        }
        if !(self.solver.relative_tolerance > 0.0) || !(self.solver.absolute_tolerance > 0.0) {
            return Err(EnsembleError::invalid_parameter(
                "solver tolerances must be positive",
            ));
        }
        if self.growth_fit_window < 2 || self.growth_fit_window > self.sample_count {
            return Err(EnsembleError::invalid_parameter(format!(
                "growth_fit_window must be in [2, {}], got {}",
                self.sample_count, self.growth_fit_window
            )));
        }
        Ok(())
    }

    pub fn covariance_diagonal(&self) -> Vector3<f64> {
        Vector3::repeat(self.initial_variance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_are_valid() {
        let params = EnsembleParams::default();
        params.validate().unwrap();
        assert_eq!(params.covariance_diagonal(), Vector3::repeat(1e-18));
    }

    #[test]
    fn test_minimal_json_uses_defaults() {
        let text = r#"{
            "initial_mean": [2.0, 3.0, -14.0],
            "initial_variance": 1e-18,
            "member_count": 10,
            "t_begin": 0.0,
            "t_final": 35.0,
            "sample_count": 2000,
            "solver": { "relative_tolerance": 1e-8, "absolute_tolerance": 1e-10 },
            "growth_fit_window": 1500
        }"#;
        let params: EnsembleParams = serde_json::from_str(text).unwrap();
        assert_eq!(params, EnsembleParams::default());
    }

    #[test]
    fn test_invalid_params_are_rejected() {
        let mutations: [fn(&mut EnsembleParams); 9] = [
            |p: &mut EnsembleParams| p.member_count = 1,
            |p: &mut EnsembleParams| p.sample_count = 1,
            |p: &mut EnsembleParams| p.t_final = p.t_begin,
            |p: &mut EnsembleParams| p.t_final = f64::INFINITY,
            |p: &mut EnsembleParams| p.initial_variance = -1.0,
            |p: &mut EnsembleParams| p.initial_mean[1] = f64::NAN,
            |p: &mut EnsembleParams| p.solver.absolute_tolerance = 0.0,
            |p: &mut EnsembleParams| p.growth_fit_window = 2001,
            |p: &mut EnsembleParams| p.growth_fit_window = 1,
        ];
        for mutate in mutations.iter() {
            let mut params = EnsembleParams::default();
            mutate(&mut params);
            assert!(params.validate().is_err(), "{:?}", params);
        }
    }
}
