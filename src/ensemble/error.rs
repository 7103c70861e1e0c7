//! Error types for ensemble analysis.

use rand_distr::NormalError;
use thiserror::Error;

use crate::core::ode_solvers::IntegrationError;

/// Errors that can occur while generating or analyzing an ensemble.
#[derive(Debug, Error)]
pub enum EnsembleError {
    /// The solver could not produce a trajectory for one member. The whole
    /// ensemble run fails; partial ensembles are never returned.
    #[error("integration failed for ensemble member {member}: {source}")]
    IntegrationFailure {
        member: usize,
        source: IntegrationError,
    },

    /// Too few members for the requested statistic.
    #[error("degenerate ensemble: required at least {required} members, actual {actual}")]
    DegenerateEnsemble { required: usize, actual: usize },

    /// The growth fit takes a logarithm, which needs strictly positive values.
    #[error("cannot take the logarithm of value {value} at index {index}")]
    NonPositiveLogInput { index: usize, value: f64 },

    /// Members of a collection do not share the same number of samples.
    #[error("shape mismatch: member {member} has {actual} samples, expected {expected}")]
    ShapeMismatch {
        member: usize,
        expected: usize,
        actual: usize,
    },

    /// The regression window cannot determine a line.
    #[error("cannot fit a line through {points} points with a constant time axis or mismatched lengths")]
    DegenerateFit { points: usize },

    #[error("invalid parameter: {message}")]
    InvalidParameter { message: String },

    #[error("invalid initial condition covariance: {0}")]
    InvalidCovariance(#[from] NormalError),
}

impl EnsembleError {
    pub fn degenerate_ensemble(required: usize, actual: usize) -> Self {
        Self::DegenerateEnsemble { required, actual }
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }
}
