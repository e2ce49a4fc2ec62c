pub mod cluster_trait;
pub mod factory;
pub mod init;
pub mod kmeans;
pub mod minibatch;

pub use cluster_trait::ClusterModel;
pub use kmeans::KMeans;
pub use minibatch::MiniBatchKMeans;

use ndarray::Array2;
use rayon::prelude::*;

use crate::error::ClusteringError;
use crate::stats::squared_euclidean_distance;

/// State of a fitted centroid model. Replaced wholesale on every fit.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedClusters {
    pub centers: Array2<f64>,
    pub labels: Vec<usize>,
    pub inertia: f64,
    pub n_iter: usize,
}

/// Index of the nearest center for every row of `x`, plus the summed
/// squared distance to those centers.
pub fn assign_labels(x: &Array2<f64>, centers: &Array2<f64>) -> (Vec<usize>, f64) {
    let assigned: Vec<(usize, f64)> = (0..x.nrows())
        .into_par_iter()
        .map(|i| nearest_center(x, i, centers))
        .collect();
    let inertia = assigned.iter().map(|&(_, d)| d).sum();
    (assigned.into_iter().map(|(label, _)| label).collect(), inertia)
}

fn nearest_center(x: &Array2<f64>, row: usize, centers: &Array2<f64>) -> (usize, f64) {
    let point = x.row(row);
    let mut best = (0, f64::INFINITY);
    for (k, center) in centers.rows().into_iter().enumerate() {
        let dist = squared_euclidean_distance(point, center);
        if dist < best.1 {
            best = (k, dist);
        }
    }
    best
}

/// Check that `n_clusters` can be fit on `x`.
pub(crate) fn validate_fit_input(x: &Array2<f64>, n_clusters: usize) -> Result<(), ClusteringError> {
    if x.nrows() == 0 {
        return Err(ClusteringError::EmptyInput);
    }
    if n_clusters == 0 || n_clusters > x.nrows() {
        return Err(ClusteringError::InvalidClusterCount {
            n_clusters,
            n_samples: x.nrows(),
        });
    }
    Ok(())
}

/// Absolute center-shift tolerance: `tol` scaled by the mean column variance.
pub(crate) fn scaled_tolerance(x: &Array2<f64>, tol: f64) -> f64 {
    if tol == 0.0 || x.nrows() == 0 {
        return 0.0;
    }
    let variances = x.var_axis(ndarray::Axis(0), 0.0);
    variances.mean().unwrap_or(0.0) * tol
}
