//! High-level clustering entry point.
//!
//! [`KMeansClusterer`] ties model construction, the optional cluster-count
//! sweep and the final fit together. It starts unfit; `fit` builds a fresh
//! model (discarding any previous one) at the swept best count when a sweep
//! has run, or at the configured default count otherwise.

use ndarray::Array2;

use crate::config::ModelConfig;
use crate::error::ClusteringError;
use crate::models::factory::build_model;
use crate::models::ClusterModel;
use crate::selection::{select_cluster_count, CandidateScore, ClusterRange};
use crate::stats::{cluster_sizes, silhouette_score};

/// Summary statistics of a fitted partition.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterEvaluation {
    pub n_clusters: usize,
    pub silhouette: f64,
    pub inertia: f64,
    pub cluster_sizes: Vec<usize>,
}

pub struct KMeansClusterer {
    n_clusters: usize,
    config: ModelConfig,
    parallel_sweep: bool,
    best_params: Option<CandidateScore>,
    model: Option<Box<dyn ClusterModel>>,
}

impl KMeansClusterer {
    /// Create an unfit clusterer that defaults to `n_clusters` clusters.
    pub fn new(n_clusters: usize, config: ModelConfig) -> Self {
        Self {
            n_clusters,
            config,
            parallel_sweep: true,
            best_params: None,
            model: None,
        }
    }

    /// Mini-batch k-means clusterer with the given batch size.
    pub fn minibatch(n_clusters: usize, batch_size: usize) -> Self {
        Self::new(n_clusters, ModelConfig::minibatch(batch_size))
    }

    /// Evaluate sweep candidates sequentially instead of on the rayon pool.
    pub fn with_parallel_sweep(mut self, parallel: bool) -> Self {
        self.parallel_sweep = parallel;
        self
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Best candidate found by the last sweep, if any.
    pub fn best_params(&self) -> Option<CandidateScore> {
        self.best_params
    }

    /// Cluster count the next `fit` will use.
    pub fn target_clusters(&self) -> usize {
        self.best_params
            .map(|best| best.n_clusters)
            .unwrap_or(self.n_clusters)
    }

    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    /// Sweep `cluster_range`, remember the best count and return all scores
    /// in ascending cluster-count order.
    pub fn find_optimal_clusters(
        &mut self,
        x: &Array2<f64>,
        cluster_range: impl Into<ClusterRange>,
    ) -> Result<Vec<CandidateScore>, ClusteringError> {
        let selection = select_cluster_count(x, cluster_range, &self.config, self.parallel_sweep)?;
        self.best_params = Some(selection.best);
        Ok(selection.scores)
    }

    /// Fit at the swept best count, or the default count if no sweep ran.
    pub fn fit(&mut self, x: &Array2<f64>) -> Result<&mut Self, ClusteringError> {
        self.fit_with_clusters(x, self.target_clusters())
    }

    /// Fit at an explicit cluster count, ignoring any sweep result.
    pub fn fit_with_clusters(
        &mut self,
        x: &Array2<f64>,
        n_clusters: usize,
    ) -> Result<&mut Self, ClusteringError> {
        self.model = None;
        let mut model = build_model(&self.config, n_clusters);
        model.fit(x)?;
        let inertia = model.inertia()?;
        log::info!(
            "Fitted {} with {} clusters on {} rows (inertia {:.4})",
            model.name(),
            n_clusters,
            x.nrows(),
            inertia
        );
        self.model = Some(model);
        Ok(self)
    }

    fn model(&self) -> Result<&dyn ClusterModel, ClusteringError> {
        self.model
            .as_deref()
            .ok_or(ClusteringError::NotFitted("KMeansClusterer"))
    }

    /// `(K, V)` matrix of centers in normalized feature space.
    pub fn get_cluster_centers(&self) -> Result<&Array2<f64>, ClusteringError> {
        self.model()?.cluster_centers()
    }

    /// Labels of the rows the model was fitted on.
    pub fn training_labels(&self) -> Result<&[usize], ClusteringError> {
        self.model()?.labels()
    }

    /// Nearest-center label in `[0, K)` for each row of `x`.
    pub fn get_labels(&self, x: &Array2<f64>) -> Result<Vec<usize>, ClusteringError> {
        self.model()?.predict(x)
    }

    /// Silhouette score of the partition the fitted model induces on `x`.
    ///
    /// A single-cluster model (K = 1) yields
    /// [`ClusteringError::InvalidLabelCount`], as does any labeling with
    /// fewer than 2 or more than `N - 1` distinct clusters.
    pub fn get_silhouette(&self, x: &Array2<f64>) -> Result<f64, ClusteringError> {
        let labels = self.get_labels(x)?;
        silhouette_score(x, &labels)
    }

    /// Silhouette, inertia and cluster sizes of the partition induced on `x`.
    pub fn evaluate_clustering(&self, x: &Array2<f64>) -> Result<ClusterEvaluation, ClusteringError> {
        let model = self.model()?;
        let labels = model.predict(x)?;
        let centers = model.cluster_centers()?;
        Ok(ClusterEvaluation {
            n_clusters: centers.nrows(),
            silhouette: silhouette_score(x, &labels)?,
            inertia: crate::stats::inertia(x, centers, &labels),
            cluster_sizes: cluster_sizes(&labels, centers.nrows()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn blobs() -> Array2<f64> {
        array![
            [0.0, 0.0],
            [0.2, 0.1],
            [0.1, 0.3],
            [6.0, 6.0],
            [6.2, 5.9],
            [5.8, 6.1],
        ]
    }

    #[test]
    fn centers_before_fit_is_an_error() {
        let clusterer = KMeansClusterer::minibatch(2, 16);
        assert_eq!(
            clusterer.get_cluster_centers().unwrap_err(),
            ClusteringError::NotFitted("KMeansClusterer")
        );
        assert!(clusterer.get_labels(&blobs()).is_err());
        assert!(clusterer.get_silhouette(&blobs()).is_err());
    }

    #[test]
    fn fit_uses_default_count_without_sweep() {
        let mut clusterer = KMeansClusterer::minibatch(2, 16);
        clusterer.fit(&blobs()).unwrap();
        assert_eq!(clusterer.get_cluster_centers().unwrap().shape(), &[2, 2]);
        let labels = clusterer.get_labels(&blobs()).unwrap();
        assert!(labels.iter().all(|&l| l < 2));
        assert!(clusterer.get_silhouette(&blobs()).unwrap() > 0.8);
    }

    #[test]
    fn single_cluster_fit_has_undefined_silhouette() {
        let mut clusterer = KMeansClusterer::minibatch(1, 16);
        clusterer.fit(&blobs()).unwrap();
        assert_eq!(clusterer.get_labels(&blobs()).unwrap(), vec![0; 6]);
        assert_eq!(
            clusterer.get_silhouette(&blobs()).unwrap_err(),
            ClusteringError::InvalidLabelCount {
                n_labels: 1,
                n_samples: 6
            }
        );
    }

    #[test]
    fn failed_refit_leaves_clusterer_unfit() {
        let mut clusterer = KMeansClusterer::minibatch(2, 16);
        clusterer.fit(&blobs()).unwrap();
        assert!(clusterer.fit_with_clusters(&blobs(), 10).is_err());
        assert!(!clusterer.is_fitted());
    }

    #[test]
    fn evaluation_reports_sizes() {
        let mut clusterer = KMeansClusterer::minibatch(2, 16);
        clusterer.fit(&blobs()).unwrap();
        let eval = clusterer.evaluate_clustering(&blobs()).unwrap();
        assert_eq!(eval.n_clusters, 2);
        let mut sizes = eval.cluster_sizes.clone();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![3, 3]);
        assert!(eval.inertia > 0.0);
    }
}
