use ndarray::Array2;

use crate::error::ClusteringError;

/// Contract shared by the centroid clustering models.
///
/// A model starts unfit; `fit` computes centers and training labels and
/// replaces anything a previous fit produced. Accessors fail with
/// [`ClusteringError::NotFitted`] until the first successful fit.
pub trait ClusterModel {
    /// Fit the model on `x` (rows are samples).
    fn fit(&mut self, x: &Array2<f64>) -> Result<(), ClusteringError>;

    /// Index of the nearest center for each row of `x`.
    fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>, ClusteringError>;

    /// `(K, V)` matrix of cluster centers.
    fn cluster_centers(&self) -> Result<&Array2<f64>, ClusteringError>;

    /// Labels assigned to the training rows by the last fit.
    fn labels(&self) -> Result<&[usize], ClusteringError>;

    /// Sum of squared distances of the training rows to their centers.
    fn inertia(&self) -> Result<f64, ClusteringError>;

    fn n_clusters(&self) -> usize;

    fn fit_predict(&mut self, x: &Array2<f64>) -> Result<Vec<usize>, ClusteringError> {
        self.fit(x)?;
        Ok(self.labels()?.to_vec())
    }

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "cluster_model"
    }
}
