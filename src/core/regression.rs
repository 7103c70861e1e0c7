use serde::{Deserialize, Serialize};

/// `y = intercept + slope * x`
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn evaluate(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/**
 * Ordinary least-squares line through the paired samples `(x[i], y[i])`.
 *
 * Uses the mean-centered normal equations, which keeps the slope accurate
 * when `x` sits far from the origin. Returns `None` if there are fewer than
 * two pairs, the inputs differ in length, or `x` is constant.
 */
pub fn least_squares_fit(x: &[f64], y: &[f64]) -> Option<LinearFit> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let n = x.len() as f64;
    let x_mean = x.iter().sum::<f64>() / n;
    let y_mean = y.iter().sum::<f64>() / n;

    let (s_xx, s_xy) = x
        .iter()
        .zip(y.iter())
        .fold((0.0, 0.0), |(s_xx, s_xy), (&xi, &yi)| {
            let dx = xi - x_mean;
            (s_xx + dx * dx, s_xy + dx * (yi - y_mean))
        });

    if !(s_xx > 0.0) {
        return None;
    }
    let slope = s_xy / s_xx;
    Some(LinearFit {
        slope,
        intercept: y_mean - slope * x_mean,
    })
}
