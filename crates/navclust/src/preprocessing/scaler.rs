//! Per-column standardization.

use ndarray::{Array1, Array2, Axis, Zip};
use statrs::statistics::Statistics;

use crate::error::ClusteringError;

/// Standard scaler fitted on a batch: per-column mean and standard deviation.
#[derive(Clone, Debug, PartialEq)]
pub struct StandardScaler {
    pub mean: Array1<f64>,
    pub std: Array1<f64>,
}

impl StandardScaler {
    /// Columns with a smaller standard deviation are treated as constant
    /// and only centered.
    const MIN_STD: f64 = 1e-12;

    /// Fit on `x` (rows are samples, columns are features) using the
    /// population standard deviation.
    pub fn fit(x: &Array2<f64>) -> Result<Self, ClusteringError> {
        if x.nrows() == 0 {
            return Err(ClusteringError::EmptyInput);
        }

        let mut mean = Array1::zeros(x.ncols());
        let mut std = Array1::ones(x.ncols());
        for (c, column) in x.axis_iter(Axis(1)).enumerate() {
            mean[c] = column.iter().mean();
            let sd = column.iter().population_std_dev();
            std[c] = if sd.is_finite() && sd >= Self::MIN_STD {
                sd
            } else {
                1.0
            };
        }

        Ok(StandardScaler { mean, std })
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Return `(x - mean) / std` column-wise.
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>, ClusteringError> {
        self.check_width(x)?;
        let mut out = x.to_owned();
        for mut row in out.rows_mut() {
            Zip::from(&mut row)
                .and(&self.mean)
                .and(&self.std)
                .for_each(|v, &m, &s| *v = (*v - m) / s);
        }
        Ok(out)
    }

    /// Return `x * std + mean` column-wise.
    pub fn inverse_transform(&self, x: &Array2<f64>) -> Result<Array2<f64>, ClusteringError> {
        self.check_width(x)?;
        let mut out = x.to_owned();
        for mut row in out.rows_mut() {
            Zip::from(&mut row)
                .and(&self.mean)
                .and(&self.std)
                .for_each(|v, &m, &s| *v = *v * s + m);
        }
        Ok(out)
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

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn fit_computes_mean_and_std() {
        let x = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0], [4.0, 40.0]];
        let sc = StandardScaler::fit(&x).unwrap();
        assert!((sc.mean[0] - 2.5).abs() < 1e-12);
        assert!((sc.mean[1] - 25.0).abs() < 1e-12);
        assert!((sc.std[0] - 1.25f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn transform_gives_zero_mean_unit_variance() {
        let x = array![[1.0, 100.0], [2.0, 250.0], [3.0, 300.0], [6.0, 400.0]];
        let sc = StandardScaler::fit(&x).unwrap();
        let t = sc.transform(&x).unwrap();
        for column in t.axis_iter(Axis(1)) {
            assert!(column.iter().mean().abs() < 1e-12);
            assert!((column.iter().population_variance() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn constant_column_is_centered_only() {
        let x = array![[5.0, 1.0], [5.0, 2.0], [5.0, 3.0]];
        let sc = StandardScaler::fit(&x).unwrap();
        assert_eq!(sc.std[0], 1.0);
        let t = sc.transform(&x).unwrap();
        assert!(t.column(0).iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn inverse_transform_round_trips() {
        let x = array![[0.0, 3.0, 1.0], [2.0, 0.0, 1.0], [7.0, 1.0, 4.0]];
        let sc = StandardScaler::fit(&x).unwrap();
        let back = sc.inverse_transform(&sc.transform(&x).unwrap()).unwrap();
        for (a, b) in x.iter().zip(back.iter()) {
            assert!((a - b).abs() < 1e-10);
        }
    }

    #[test]
    fn empty_input_is_rejected() {
        let x = Array2::<f64>::zeros((0, 3));
        assert_eq!(StandardScaler::fit(&x), Err(ClusteringError::EmptyInput));
    }

    #[test]
    fn width_mismatch_is_rejected() {
        let sc = StandardScaler::fit(&array![[1.0, 2.0], [3.0, 4.0]]).unwrap();
        let err = sc.transform(&array![[1.0, 2.0, 3.0]]).unwrap_err();
        assert_eq!(
            err,
            ClusteringError::ShapeMismatch {
                expected: 2,
                found: 3
            }
        );
    }
}
