use nalgebra::Vector3;
use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};

use crate::core::{
    dynamical_systems::lorenz_dynamics,
    ode_solvers::{dopri5_simulate_sampled, AdaptiveStepOptions},
};

use super::{error::EnsembleError, Trajectory};

/// Trajectories of every member on a common time grid, in the same order as
/// the initial conditions that produced them.
#[derive(Debug, Clone)]
pub struct Ensemble {
    pub time_grid: Vec<f64>,
    pub initial_conditions: Vec<Vector3<f64>>,
    pub trajectories: Vec<Trajectory>,
}

impl Ensemble {
    pub fn member_count(&self) -> usize {
        self.trajectories.len()
    }
}

/// `sample_count` evenly spaced times from `t_begin` to `t_final` inclusive.
pub fn uniform_time_grid(t_begin: f64, t_final: f64, sample_count: usize) -> Vec<f64> {
    let mut grid: Vec<f64> = iter_num_tools::lin_space(t_begin..=t_final, sample_count).collect();
    // Pin the end point, it can be off by an ulp after the repeated step sum.
    if let Some(last) = grid.last_mut() {
        *last = t_final;
    }
    grid
}

fn integrate_member(
    member: usize,
    x0: &Vector3<f64>,
    time_grid: &[f64],
    options: &AdaptiveStepOptions,
) -> Result<Trajectory, EnsembleError> {
    let solution = dopri5_simulate_sampled(time_grid, *x0, &lorenz_dynamics, options)
        .map_err(|source| EnsembleError::IntegrationFailure { member, source })?;
    tracing::debug!(
        member,
        accepted = solution.statistics.accepted_steps,
        rejected = solution.statistics.rejected_steps,
        evaluations = solution.statistics.function_evaluations,
        "integrated ensemble member"
    );
    Ok(solution.states)
}

/**
 * Integrates the Lorenz system from each initial condition over
 * `[t_begin, t_final]`, sampled at `sample_count` shared output times.
 *
 * A member that fails to integrate fails the whole ensemble. With `parallel`
 * set the members are spread over the rayon thread pool; the trajectories are
 * still returned in initial-condition order.
 */
pub fn integrate_ensemble(
    initial_conditions: &[Vector3<f64>],
    t_begin: f64,
    t_final: f64,
    sample_count: usize,
    options: &AdaptiveStepOptions,
    parallel: bool,
) -> Result<Ensemble, EnsembleError> {
    let time_grid = uniform_time_grid(t_begin, t_final, sample_count);

    let trajectories = if parallel {
        initial_conditions
            .par_iter()
            .enumerate()
            .map(|(member, x0)| integrate_member(member, x0, &time_grid, options))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        initial_conditions
            .iter()
            .enumerate()
            .map(|(member, x0)| integrate_member(member, x0, &time_grid, options))
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok(Ensemble {
        time_grid,
        initial_conditions: initial_conditions.to_vec(),
        trajectories,
    })
}
