//! Cross-member statistics, evaluated independently at every time sample.

use std::ops::{Add, Div, Sub};

use nalgebra::Vector3;

use super::error::EnsembleError;

/// A value stored at one time sample of a member series: a full state vector
/// for trajectories, a scalar for distance series.
pub trait SampleValue:
    Copy + Add<Output = Self> + Sub<Output = Self> + Div<f64, Output = Self>
{
    fn component_square(self) -> Self;
    fn component_sqrt(self) -> Self;
}

impl SampleValue for f64 {
    fn component_square(self) -> Self {
        self * self
    }

    fn component_sqrt(self) -> Self {
        self.sqrt()
    }
}

impl SampleValue for Vector3<f64> {
    fn component_square(self) -> Self {
        self.component_mul(&self)
    }

    fn component_sqrt(self) -> Self {
        self.map(|v| v.sqrt())
    }
}

/// Per-time mean and dispersion of a collection of member series.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleStatistics<V> {
    pub mean: Vec<V>,
    pub dispersion: Vec<V>,
}

/// Number of samples shared by every member, or the first offending member.
fn common_length<V>(members: &[Vec<V>]) -> Result<usize, EnsembleError> {
    let expected = members
        .first()
        .map(|member| member.len())
        .ok_or_else(|| EnsembleError::degenerate_ensemble(1, 0))?;
    match members.iter().position(|member| member.len() != expected) {
        Some(index) => Err(EnsembleError::ShapeMismatch {
            member: index,
            expected,
            actual: members[index].len(),
        }),
        None => Ok(expected),
    }
}

/// Element-wise `sum / N` across members.
pub fn ensemble_mean<V: SampleValue>(members: &[Vec<V>]) -> Result<Vec<V>, EnsembleError> {
    let len = common_length(members)?;
    let count = members.len() as f64;
    Ok((0..len)
        .map(|k| {
            let sum = members[1..]
                .iter()
                .fold(members[0][k], |acc, member| acc + member[k]);
            sum / count
        })
        .collect())
}

/**
 * Element-wise `sqrt(sum((y - mean)^2)) / (N - 1)` across members.
 *
 * Note: this is NOT the sample standard deviation, which would be
 * `sqrt(sum((y - mean)^2) / (N - 1))`. The square root is taken before the
 * division, so the result shrinks like `1 / sqrt(N)` relative to the
 * canonical value. It is kept in this order so that results match the
 * reference data set; treat absolute magnitudes with care.
 *
 * A single member has no spread to measure, so `N < 2` is an error rather
 * than a division by zero.
 */
pub fn ensemble_dispersion<V: SampleValue>(
    members: &[Vec<V>],
    mean: &[V],
) -> Result<Vec<V>, EnsembleError> {
    let len = common_length(members)?;
    if members.len() < 2 {
        return Err(EnsembleError::degenerate_ensemble(2, members.len()));
    }
    if mean.len() != len {
        return Err(EnsembleError::ShapeMismatch {
            member: 0,
            expected: len,
            actual: mean.len(),
        });
    }
    let denominator = (members.len() - 1) as f64;
    Ok(mean
        .iter()
        .enumerate()
        .map(|(k, &mu)| {
            let sum_sq = members[1..].iter().fold(
                (members[0][k] - mu).component_square(),
                |acc, member| acc + (member[k] - mu).component_square(),
            );
            sum_sq.component_sqrt() / denominator
        })
        .collect())
}

pub fn ensemble_statistics<V: SampleValue>(
    members: &[Vec<V>],
) -> Result<EnsembleStatistics<V>, EnsembleError> {
    let mean = ensemble_mean(members)?;
    let dispersion = ensemble_dispersion(members, &mean)?;
    Ok(EnsembleStatistics { mean, dispersion })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_single_member_mean_is_exact() {
        let member = vec![
            Vector3::new(2.0, 3.0, -14.0),
            Vector3::new(0.1, 0.2, 0.3),
            Vector3::new(-1e-9, 1e9, 7.0),
        ];
        let members = vec![member.clone()];
        assert_eq!(ensemble_mean(&members).unwrap(), member);
    }

    #[test]
    fn test_single_member_dispersion_is_degenerate() {
        let members = vec![vec![1.0, 2.0, 3.0]];
        let mean = ensemble_mean(&members).unwrap();
        assert!(matches!(
            ensemble_dispersion(&members, &mean),
            Err(EnsembleError::DegenerateEnsemble {
                required: 2,
                actual: 1
            })
        ));
        assert!(ensemble_statistics(&members).is_err());
    }

    #[test]
    fn test_empty_collection_is_degenerate() {
        let members: Vec<Vec<f64>> = Vec::new();
        assert!(matches!(
            ensemble_mean(&members),
            Err(EnsembleError::DegenerateEnsemble {
                required: 1,
                actual: 0
            })
        ));
    }

    #[test]
    fn test_mismatched_lengths_are_reported() {
        let members = vec![vec![1.0, 2.0], vec![1.0, 2.0], vec![1.0]];
        assert!(matches!(
            ensemble_mean(&members),
            Err(EnsembleError::ShapeMismatch {
                member: 2,
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_scalar_statistics_by_hand() {
        // At each time: values {1, 2, 6}, mean 3, squared deviations {4, 1, 9}.
        // sqrt(14) / 2, not the sample standard deviation sqrt(14 / 2).
        let members = vec![vec![1.0, 10.0], vec![2.0, 10.0], vec![6.0, 10.0]];
        let stats = ensemble_statistics(&members).unwrap();
        assert_eq!(stats.mean, vec![3.0, 10.0]);
        assert_relative_eq!(stats.dispersion[0], 14.0_f64.sqrt() / 2.0, epsilon = 1e-15);
        assert_eq!(stats.dispersion[1], 0.0);
    }

    #[test]
    fn test_vector_statistics_are_component_wise() {
        let members = vec![
            vec![Vector3::new(1.0, 0.0, 5.0)],
            vec![Vector3::new(3.0, 0.0, 5.0)],
        ];
        let stats = ensemble_statistics(&members).unwrap();
        assert_eq!(stats.mean[0], Vector3::new(2.0, 0.0, 5.0));
        assert_relative_eq!(
            stats.dispersion[0],
            Vector3::new(2.0_f64.sqrt(), 0.0, 0.0),
            epsilon = 1e-15
        );
    }
}
