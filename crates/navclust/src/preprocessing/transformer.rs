//! Composite normalization of the session count matrix.

use ndarray::Array2;

use crate::error::ClusteringError;
use crate::preprocessing::power::PowerTransformer;
use crate::preprocessing::scaler::StandardScaler;

#[derive(Clone, Debug, PartialEq)]
struct FittedFrequencyTransform {
    scaler: StandardScaler,
    power: PowerTransformer,
}

/// Standardization followed by a Yeo-Johnson power transform, applied to
/// every one of the `n_features` frequency columns.
///
/// The fitted parameters are computed once by [`FrequencyTransformer::fit`]
/// and reused by every later `transform` call.
#[derive(Clone, Debug, PartialEq)]
pub struct FrequencyTransformer {
    n_features: usize,
    standardize_output: bool,
    fitted: Option<FittedFrequencyTransform>,
}

impl FrequencyTransformer {
    pub fn new(n_features: usize) -> Self {
        Self {
            n_features,
            standardize_output: true,
            fitted: None,
        }
    }

    /// Whether the power transform output is rescaled to zero mean and
    /// unit variance (default `true`).
    pub fn with_standardized_output(mut self, standardize: bool) -> Self {
        self.standardize_output = standardize;
        self
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    pub fn scaler(&self) -> Option<&StandardScaler> {
        self.fitted.as_ref().map(|f| &f.scaler)
    }

    pub fn power_transformer(&self) -> Option<&PowerTransformer> {
        self.fitted.as_ref().map(|f| &f.power)
    }

    /// Fit both stages on `x`, replacing any previously fitted state.
    pub fn fit(&mut self, x: &Array2<f64>) -> Result<&mut Self, ClusteringError> {
        self.check_input(x)?;
        let scaler = StandardScaler::fit(x)?;
        let scaled = scaler.transform(x)?;
        let power = PowerTransformer::fit(&scaled, self.standardize_output)?;
        self.fitted = Some(FittedFrequencyTransform { scaler, power });
        Ok(self)
    }

    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>, ClusteringError> {
        let fitted = self.fitted()?;
        self.check_input(x)?;
        fitted.power.transform(&fitted.scaler.transform(x)?)
    }

    pub fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>, ClusteringError> {
        self.fit(x)?;
        self.transform(x)
    }

    /// Map normalized rows (e.g. cluster centers) back to count space.
    pub fn inverse_transform(&self, x: &Array2<f64>) -> Result<Array2<f64>, ClusteringError> {
        let fitted = self.fitted()?;
        self.check_width(x)?;
        fitted
            .scaler
            .inverse_transform(&fitted.power.inverse_transform(x)?)
    }

    fn fitted(&self) -> Result<&FittedFrequencyTransform, ClusteringError> {
        self.fitted
            .as_ref()
            .ok_or(ClusteringError::NotFitted("FrequencyTransformer"))
    }

    fn check_input(&self, x: &Array2<f64>) -> Result<(), ClusteringError> {
        if x.nrows() == 0 {
            return Err(ClusteringError::EmptyInput);
        }
        self.check_width(x)
    }

    fn check_width(&self, x: &Array2<f64>) -> Result<(), ClusteringError> {
        if x.ncols() != self.n_features {
            return Err(ClusteringError::ShapeMismatch {
                expected: self.n_features,
                found: x.ncols(),
            });
        }
        Ok(())
    }
}
