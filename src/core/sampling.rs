use nalgebra::SVector;
use rand::Rng;
use rand_distr::{Distribution, Normal, NormalError};

/**
 * Draws `count` independent samples from a multivariate Gaussian with the given
 * mean and a diagonal covariance matrix (independent components, variance per
 * component given by `covariance_diagonal`).
 *
 * The random source is passed in explicitly so that a seeded generator yields a
 * reproducible set of samples.
 */
pub fn sample_diagonal_gaussian<R, const D: usize>(
    rng: &mut R,
    mean: &SVector<f64, D>,
    covariance_diagonal: &SVector<f64, D>,
    count: usize,
) -> Result<Vec<SVector<f64, D>>, NormalError>
where
    R: Rng + ?Sized,
{
    let components = mean
        .iter()
        .zip(covariance_diagonal.iter())
        .map(|(&mu, &variance)| Normal::new(mu, variance.sqrt()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((0..count)
        .map(|_| SVector::<f64, D>::from_fn(|i, _| components[i].sample(&mut *rng)))
        .collect())
}
