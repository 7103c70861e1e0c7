use super::{error::EnsembleError, Trajectory};

/// Member index pairs `(i, j)` with `j < i`, in the order every pairwise
/// series is produced: `(1,0), (2,0), (2,1), (3,0), ...`.
pub fn pair_indices(member_count: usize) -> Vec<(usize, usize)> {
    (0..member_count)
        .flat_map(|i| (0..i).map(move |j| (i, j)))
        .collect()
}

fn check_pairable(trajectories: &[Trajectory]) -> Result<usize, EnsembleError> {
    if trajectories.len() < 2 {
        return Err(EnsembleError::degenerate_ensemble(2, trajectories.len()));
    }
    let expected = trajectories[0].len();
    match trajectories.iter().position(|t| t.len() != expected) {
        Some(member) => Err(EnsembleError::ShapeMismatch {
            member,
            expected,
            actual: trajectories[member].len(),
        }),
        None => Ok(expected),
    }
}

/// Difference trajectory `trajectories[i] - trajectories[j]` for every pair
/// from `pair_indices`.
pub fn pairwise_displacements(trajectories: &[Trajectory]) -> Result<Vec<Trajectory>, EnsembleError> {
    check_pairable(trajectories)?;
    Ok(pair_indices(trajectories.len())
        .into_iter()
        .map(|(i, j)| {
            trajectories[i]
                .iter()
                .zip(trajectories[j].iter())
                .map(|(a, b)| a - b)
                .collect()
        })
        .collect())
}

/// Euclidean distance between members `i` and `j` at every time sample, for
/// every pair from `pair_indices`. Produces `N * (N - 1) / 2` series.
pub fn pairwise_distances(trajectories: &[Trajectory]) -> Result<Vec<Vec<f64>>, EnsembleError> {
    check_pairable(trajectories)?;
    Ok(pair_indices(trajectories.len())
        .into_iter()
        .map(|(i, j)| {
            trajectories[i]
                .iter()
                .zip(trajectories[j].iter())
                .map(|(a, b)| (a - b).norm())
                .collect()
        })
        .collect())
}
