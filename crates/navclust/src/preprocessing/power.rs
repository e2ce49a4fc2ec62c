//! Yeo-Johnson power transform.
//!
//! Each column gets its own exponent `lambda`, estimated by maximizing the
//! Yeo-Johnson log-likelihood of the column. Unlike Box-Cox, the transform is
//! defined for zero and negative inputs, which matters here because the
//! columns are already standardized when they reach this stage.

use ndarray::{Array1, Array2, Axis};
use statrs::statistics::Statistics;

use crate::error::ClusteringError;
use crate::optimize::brent;
use crate::preprocessing::scaler::StandardScaler;

/// Columns with a smaller variance are left untouched (`lambda = 1`).
const MIN_COLUMN_VARIANCE: f64 = 1e-12;

/// Apply the Yeo-Johnson transform with exponent `lambda` to one value.
pub fn yeo_johnson(x: f64, lambda: f64) -> f64 {
    if x >= 0.0 {
        if lambda.abs() < f64::EPSILON {
            x.ln_1p()
        } else {
            ((x + 1.0).powf(lambda) - 1.0) / lambda
        }
    } else if (lambda - 2.0).abs() > f64::EPSILON {
        -((-x + 1.0).powf(2.0 - lambda) - 1.0) / (2.0 - lambda)
    } else {
        -(-x).ln_1p()
    }
}

/// Invert [`yeo_johnson`].
pub fn yeo_johnson_inverse(y: f64, lambda: f64) -> f64 {
    if y >= 0.0 {
        if lambda.abs() < f64::EPSILON {
            y.exp_m1()
        } else {
            (y * lambda + 1.0).powf(1.0 / lambda) - 1.0
        }
    } else if (lambda - 2.0).abs() > f64::EPSILON {
        1.0 - (-(2.0 - lambda) * y + 1.0).powf(1.0 / (2.0 - lambda))
    } else {
        -(-y).exp_m1()
    }
}

/// Negative Yeo-Johnson log-likelihood of `column` under `lambda`.
fn neg_log_likelihood(column: &[f64], lambda: f64) -> f64 {
    let n = column.len() as f64;
    let variance = column
        .iter()
        .map(|&x| yeo_johnson(x, lambda))
        .population_variance();
    if variance.is_nan() || variance < f64::MIN_POSITIVE {
        return f64::INFINITY;
    }
    let jacobian: f64 = column
        .iter()
        .map(|&x| x.signum() * x.abs().ln_1p())
        .sum();
    n / 2.0 * variance.ln() - (lambda - 1.0) * jacobian
}

/// Maximum-likelihood estimate of the Yeo-Johnson exponent for one column.
pub fn fit_lambda(column: &[f64]) -> f64 {
    let finite: Vec<f64> = column.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.len() < 2 || finite.iter().population_variance() < MIN_COLUMN_VARIANCE {
        return 1.0;
    }
    brent(|lambda| neg_log_likelihood(&finite, lambda), -2.0, 2.0)
}

/// Fitted Yeo-Johnson transform: one exponent per column, optionally
/// followed by standardization of the transformed columns.
#[derive(Clone, Debug, PartialEq)]
pub struct PowerTransformer {
    pub lambdas: Array1<f64>,
    pub scaler: Option<StandardScaler>,
}

impl PowerTransformer {
    /// Estimate per-column exponents on `x`. With `standardize`, the
    /// transformed output is also rescaled to zero mean and unit variance.
    pub fn fit(x: &Array2<f64>, standardize: bool) -> Result<Self, ClusteringError> {
        if x.nrows() == 0 {
            return Err(ClusteringError::EmptyInput);
        }

        let lambdas: Array1<f64> = x
            .axis_iter(Axis(1))
            .map(|column| fit_lambda(&column.to_vec()))
            .collect();
        log::debug!("Yeo-Johnson lambdas: {:?}", lambdas.to_vec());

        let scaler = if standardize {
            Some(StandardScaler::fit(&apply(x, &lambdas, yeo_johnson))?)
        } else {
            None
        };

        Ok(PowerTransformer { lambdas, scaler })
    }

    pub fn n_features(&self) -> usize {
        self.lambdas.len()
    }

    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>, ClusteringError> {
        self.check_width(x)?;
        let out = apply(x, &self.lambdas, yeo_johnson);
        match &self.scaler {
            Some(scaler) => scaler.transform(&out),
            None => Ok(out),
        }
    }

    pub fn inverse_transform(&self, x: &Array2<f64>) -> Result<Array2<f64>, ClusteringError> {
        self.check_width(x)?;
        let unscaled = match &self.scaler {
            Some(scaler) => scaler.inverse_transform(x)?,
            None => x.to_owned(),
        };
        Ok(apply(&unscaled, &self.lambdas, yeo_johnson_inverse))
    }

    fn check_width(&self, x: &Array2<f64>) -> Result<(), ClusteringError> {
        if x.ncols() != self.n_features() {
            return Err(ClusteringError::ShapeMismatch {
                expected: self.n_features(),
                found: x.ncols(),
            });
        }
        Ok(())
    }
}

fn apply(x: &Array2<f64>, lambdas: &Array1<f64>, f: fn(f64, f64) -> f64) -> Array2<f64> {
    let mut out = x.to_owned();
    for (mut column, &lambda) in out.axis_iter_mut(Axis(1)).zip(lambdas.iter()) {
        column.mapv_inplace(|v| f(v, lambda));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn lambda_one_is_identity() {
        for &x in &[-3.0, -0.5, 0.0, 0.25, 4.0] {
            assert!((yeo_johnson(x, 1.0) - x).abs() < 1e-12);
        }
    }

    #[test]
    fn special_exponents_use_log_branches() {
        assert!((yeo_johnson(1.0, 0.0) - 2f64.ln()).abs() < 1e-12);
        assert!((yeo_johnson(-1.0, 2.0) + 2f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn inverse_round_trips_all_branches() {
        for &lambda in &[-1.5, 0.0, 0.5, 1.0, 2.0, 2.7] {
            for &x in &[-4.0, -1.0, -0.1, 0.0, 0.3, 2.0, 9.0] {
                let back = yeo_johnson_inverse(yeo_johnson(x, lambda), lambda);
                assert!(
                    (back - x).abs() < 1e-9,
                    "lambda {} x {} -> {}",
                    lambda,
                    x,
                    back
                );
            }
        }
    }

    #[test]
    fn transform_is_monotonic() {
        for &lambda in &[-1.0, 0.0, 0.8, 2.0, 3.0] {
            let mut prev = f64::NEG_INFINITY;
            for i in -20..=20 {
                let y = yeo_johnson(i as f64 * 0.25, lambda);
                assert!(y > prev);
                prev = y;
            }
        }
    }

    #[test]
    fn right_skewed_column_gets_lambda_below_one() {
        let column = vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 2.0, 3.0, 8.0, 20.0];
        let lambda = fit_lambda(&column);
        assert!(lambda < 1.0, "lambda = {}", lambda);
    }

    #[test]
    fn fitted_lambda_minimizes_likelihood() {
        let column = vec![-1.2, -0.4, -0.3, 0.0, 0.1, 0.2, 0.9, 1.5, 3.8];
        let lambda = fit_lambda(&column);
        let best = neg_log_likelihood(&column, lambda);
        for delta in [-0.1, 0.1] {
            assert!(best <= neg_log_likelihood(&column, lambda + delta) + 1e-9);
        }
    }

    #[test]
    fn constant_column_keeps_identity() {
        assert_eq!(fit_lambda(&[0.0, 0.0, 0.0]), 1.0);
    }

    #[test]
    fn standardized_output_has_zero_mean() {
        let x = array![[0.0, 1.0], [1.0, 1.0], [2.0, 5.0], [10.0, 2.0], [0.0, 9.0]];
        let pt = PowerTransformer::fit(&x, true).unwrap();
        let t = pt.transform(&x).unwrap();
        for column in t.axis_iter(Axis(1)) {
            assert!(column.iter().mean().abs() < 1e-9);
            assert!((column.iter().population_variance() - 1.0).abs() < 1e-6);
        }
        let back = pt.inverse_transform(&t).unwrap();
        for (a, b) in x.iter().zip(back.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }
}
