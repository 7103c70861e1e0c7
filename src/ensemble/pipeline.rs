use nalgebra::Vector3;
use rand::Rng;

use crate::core::{sampling::sample_diagonal_gaussian, stopwatch::Stopwatch};

use super::{
    distance::{pairwise_displacements, pairwise_distances},
    error::EnsembleError,
    growth_fit::{fit_growth_window, ExponentialFit},
    integrator::{integrate_ensemble, Ensemble},
    params::EnsembleParams,
    statistics::{ensemble_statistics, EnsembleStatistics},
    Trajectory,
};

/// Everything a renderer needs from one ensemble run.
#[derive(Debug, Clone)]
pub struct EnsembleAnalysis {
    pub ensemble: Ensemble,
    pub state_statistics: EnsembleStatistics<Vector3<f64>>,
    /// One series per pair, in `pair_indices` order.
    pub distances: Vec<Vec<f64>>,
    pub distance_statistics: EnsembleStatistics<f64>,
    pub growth_fit: ExponentialFit,
}

impl EnsembleAnalysis {
    /// The first `count` pairwise displacement trajectories (fewer if the
    /// ensemble has fewer pairs).
    pub fn leading_displacements(&self, count: usize) -> Result<Vec<Trajectory>, EnsembleError> {
        let mut displacements = pairwise_displacements(&self.ensemble.trajectories)?;
        displacements.truncate(count);
        Ok(displacements)
    }
}

pub fn sample_initial_conditions<R: Rng + ?Sized>(
    rng: &mut R,
    params: &EnsembleParams,
) -> Result<Vec<Vector3<f64>>, EnsembleError> {
    Ok(sample_diagonal_gaussian(
        rng,
        &params.initial_mean,
        &params.covariance_diagonal(),
        params.member_count,
    )?)
}

/**
 * Runs the full analysis:
 *
 *   sample initial conditions -> integrate ensemble -> state statistics
 *   -> pairwise distances -> distance statistics -> growth-rate fit
 *
 * Each stage is a separate function over plain data; this only wires them
 * together and records the stage timings in `stopwatch`.
 */
pub fn analyze_ensemble<R: Rng + ?Sized>(
    params: &EnsembleParams,
    rng: &mut R,
    stopwatch: &mut Stopwatch,
) -> Result<EnsembleAnalysis, EnsembleError> {
    params.validate()?;

    let initial_conditions = sample_initial_conditions(rng, params)?;
    stopwatch.record_split("sample_initial_conditions");

    tracing::info!(
        members = params.member_count,
        samples = params.sample_count,
        parallel = params.parallel,
        "integrating ensemble"
    );
    let ensemble = integrate_ensemble(
        &initial_conditions,
        params.t_begin,
        params.t_final,
        params.sample_count,
        &params.solver,
        params.parallel,
    )?;
    stopwatch.record_split("integrate_ensemble");

    let state_statistics = ensemble_statistics(&ensemble.trajectories)?;
    stopwatch.record_split("state_statistics");

    let distances = pairwise_distances(&ensemble.trajectories)?;
    let distance_statistics = ensemble_statistics(&distances)?;
    stopwatch.record_split("pairwise_distances");

    let growth_fit = fit_growth_window(
        &ensemble.time_grid,
        &distance_statistics.mean,
        params.growth_fit_window,
    )?;
    stopwatch.record_split("growth_fit");
    tracing::info!(
        growth_rate = growth_fit.slope,
        intercept = growth_fit.intercept,
        "approximate maximal Lyapunov exponent: {:.6}",
        growth_fit.slope
    );

    Ok(EnsembleAnalysis {
        ensemble,
        state_statistics,
        distances,
        distance_statistics,
        growth_fit,
    })
}
