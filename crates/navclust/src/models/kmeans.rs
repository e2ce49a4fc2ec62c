//! Full-batch k-means (Lloyd's algorithm).

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::ClusteringError;
use crate::models::cluster_trait::ClusterModel;
use crate::models::init::kmeans_plusplus;
use crate::models::{assign_labels, scaled_tolerance, validate_fit_input, FittedClusters};

/// K-Means clustering with k-means++ initialization.
///
/// Every iteration assigns all rows to their nearest center and moves each
/// center to the mean of its rows; a center that loses all of its rows keeps
/// its previous position. The best of `n_init` seeded runs (lowest inertia)
/// is kept.
///
/// Time complexity: O(n * k * d * iterations * n_init).
#[derive(Debug, Clone)]
pub struct KMeans {
    n_clusters: usize,
    max_iter: usize,
    n_init: usize,
    tol: f64,
    random_state: u64,
    fitted: Option<FittedClusters>,
}

impl KMeans {
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            max_iter: 300,
            n_init: 3,
            tol: 1e-4,
            random_state: 42,
            fitted: None,
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter.max(1);
        self
    }

    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init.max(1);
        self
    }

    /// Relative tolerance on the squared center shift, scaled by the mean
    /// column variance of the data.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    pub fn n_iter(&self) -> Option<usize> {
        self.fitted.as_ref().map(|f| f.n_iter)
    }

    fn fitted(&self) -> Result<&FittedClusters, ClusteringError> {
        self.fitted.as_ref().ok_or(ClusteringError::NotFitted("KMeans"))
    }

    fn single_run(&self, x: &Array2<f64>, rng: &mut StdRng, tol: f64) -> FittedClusters {
        let mut centers = kmeans_plusplus(x, self.n_clusters, rng);
        let mut n_iter = 0;

        for iter in 0..self.max_iter {
            let (labels, _) = assign_labels(x, &centers);
            let new_centers = update_centers(x, &labels, &centers);
            let shift: f64 = (&new_centers - &centers).mapv(|d| d * d).sum();
            centers = new_centers;
            n_iter = iter + 1;
            if shift <= tol {
                break;
            }
        }

        let (labels, inertia) = assign_labels(x, &centers);
        FittedClusters {
            centers,
            labels,
            inertia,
            n_iter,
        }
    }
}

/// Mean of the rows assigned to each center; empty clusters keep `previous`.
fn update_centers(x: &Array2<f64>, labels: &[usize], previous: &Array2<f64>) -> Array2<f64> {
    let mut sums = Array2::<f64>::zeros(previous.raw_dim());
    let mut counts = vec![0usize; previous.nrows()];
    for (i, &label) in labels.iter().enumerate() {
        counts[label] += 1;
        let mut row = sums.row_mut(label);
        row += &x.row(i);
    }

    let mut centers = previous.clone();
    for (k, &count) in counts.iter().enumerate() {
        if count > 0 {
            let mean = &sums.row(k) / count as f64;
            centers.row_mut(k).assign(&mean);
        }
    }
    centers
}

impl ClusterModel for KMeans {
    fn fit(&mut self, x: &Array2<f64>) -> Result<(), ClusteringError> {
        validate_fit_input(x, self.n_clusters)?;
        let tol = scaled_tolerance(x, self.tol);
        let mut rng = StdRng::seed_from_u64(self.random_state);

        let mut best: Option<FittedClusters> = None;
        for run in 0..self.n_init {
            let candidate = self.single_run(x, &mut rng, tol);
            log::trace!(
                "KMeans init {}: inertia {:.4} after {} iterations",
                run,
                candidate.inertia,
                candidate.n_iter
            );
            if best.as_ref().map_or(true, |b| candidate.inertia < b.inertia) {
                best = Some(candidate);
            }
        }

        self.fitted = best;
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>, ClusteringError> {
        let fitted = self.fitted()?;
        if x.ncols() != fitted.centers.ncols() {
            return Err(ClusteringError::ShapeMismatch {
                expected: fitted.centers.ncols(),
                found: x.ncols(),
            });
        }
        Ok(assign_labels(x, &fitted.centers).0)
    }

    fn cluster_centers(&self) -> Result<&Array2<f64>, ClusteringError> {
        Ok(&self.fitted()?.centers)
    }

    fn labels(&self) -> Result<&[usize], ClusteringError> {
        Ok(&self.fitted()?.labels)
    }

    fn inertia(&self) -> Result<f64, ClusteringError> {
        Ok(self.fitted()?.inertia)
    }

    fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    fn name(&self) -> &str {
        "kmeans"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn blobs() -> Array2<f64> {
        array![
            [1.0, 2.0],
            [1.5, 1.8],
            [1.0, 0.6],
            [8.0, 8.0],
            [9.0, 11.0],
            [8.5, 9.5],
        ]
    }

    #[test]
    fn separates_two_blobs() {
        let mut km = KMeans::new(2);
        km.fit(&blobs()).unwrap();
        let labels = km.labels().unwrap();
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_ne!(labels[0], labels[3]);
        assert_eq!(km.predict(&blobs()).unwrap(), labels.to_vec());
    }

    #[test]
    fn unfit_accessors_fail() {
        let km = KMeans::new(2);
        assert_eq!(
            km.cluster_centers().unwrap_err(),
            ClusteringError::NotFitted("KMeans")
        );
        assert!(km.predict(&blobs()).is_err());
    }

    #[test]
    fn too_many_clusters_fail() {
        let mut km = KMeans::new(7);
        assert_eq!(
            km.fit(&blobs()),
            Err(ClusteringError::InvalidClusterCount {
                n_clusters: 7,
                n_samples: 6
            })
        );
    }

    #[test]
    fn centers_are_cluster_means() {
        let mut km = KMeans::new(2).with_tol(0.0);
        km.fit(&blobs()).unwrap();
        let centers = km.cluster_centers().unwrap();
        let low = if centers[(0, 0)] < centers[(1, 0)] { 0 } else { 1 };
        assert!((centers[(low, 0)] - 3.5 / 3.0).abs() < 1e-9);
        assert!((centers[(low, 1)] - 4.4 / 3.0).abs() < 1e-9);
    }
}
