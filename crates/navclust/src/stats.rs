//! Cluster validity statistics.
//!
//! The silhouette computation is exact and costs O(N^2 * V) distance
//! evaluations for N rows of width V. Rows are processed in parallel, but
//! callers should still cap N (the training pipeline subsamples to 30,000
//! rows) before scoring many candidate partitions.

use std::collections::BTreeSet;

use ndarray::{Array2, ArrayView1};
use rayon::prelude::*;

use crate::error::ClusteringError;

/// Euclidean distance between two rows.
pub fn euclidean_distance(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    squared_euclidean_distance(a, b).sqrt()
}

pub fn squared_euclidean_distance(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Sum of squared distances of each row to its assigned center.
pub fn inertia(x: &Array2<f64>, centers: &Array2<f64>, labels: &[usize]) -> f64 {
    labels
        .iter()
        .enumerate()
        .map(|(i, &label)| squared_euclidean_distance(x.row(i), centers.row(label)))
        .sum()
}

/// Number of rows assigned to each of `n_clusters` clusters.
pub fn cluster_sizes(labels: &[usize], n_clusters: usize) -> Vec<usize> {
    let mut sizes = vec![0usize; n_clusters];
    for &label in labels {
        if label < n_clusters {
            sizes[label] += 1;
        }
    }
    sizes
}

/// Silhouette coefficient of every row.
///
/// For row `i` with mean intra-cluster distance `a` and smallest mean
/// distance to another cluster `b`, the coefficient is
/// `(b - a) / max(a, b)`. Rows alone in their cluster score 0.
///
/// Fails unless the labels contain between 2 and `N - 1` distinct values.
pub fn silhouette_samples(x: &Array2<f64>, labels: &[usize]) -> Result<Vec<f64>, ClusteringError> {
    let n_samples = x.nrows();
    if labels.len() != n_samples {
        return Err(ClusteringError::ShapeMismatch {
            expected: n_samples,
            found: labels.len(),
        });
    }

    let distinct: BTreeSet<usize> = labels.iter().copied().collect();
    let n_labels = distinct.len();
    if n_labels < 2 || n_labels + 1 > n_samples {
        return Err(ClusteringError::InvalidLabelCount {
            n_labels,
            n_samples,
        });
    }

    // compact label ids so per-row sums can live in a dense vector
    let max_label = distinct.iter().next_back().copied().unwrap_or(0);
    let mut dense = vec![usize::MAX; max_label + 1];
    for (idx, label) in distinct.iter().enumerate() {
        dense[*label] = idx;
    }
    let compact: Vec<usize> = labels.iter().map(|&l| dense[l]).collect();
    let sizes = cluster_sizes(&compact, n_labels);

    let scores = (0..n_samples)
        .into_par_iter()
        .map(|i| {
            let own = compact[i];
            if sizes[own] <= 1 {
                return 0.0;
            }

            let mut sums = vec![0.0f64; n_labels];
            let row = x.row(i);
            for (j, &label) in compact.iter().enumerate() {
                if j != i {
                    sums[label] += euclidean_distance(row, x.row(j));
                }
            }

            let a = sums[own] / (sizes[own] - 1) as f64;
            let b = sums
                .iter()
                .zip(sizes.iter())
                .enumerate()
                .filter(|&(k, _)| k != own)
                .map(|(_, (&sum, &size))| sum / size as f64)
                .fold(f64::INFINITY, f64::min);

            let denom = a.max(b);
            if denom > 0.0 {
                (b - a) / denom
            } else {
                0.0
            }
        })
        .collect::<Vec<f64>>();

    Ok(scores)
}

/// Mean silhouette coefficient over all rows, in `[-1, 1]`.
pub fn silhouette_score(x: &Array2<f64>, labels: &[usize]) -> Result<f64, ClusteringError> {
    let samples = silhouette_samples(x, labels)?;
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn two_blobs() -> Array2<f64> {
        array![[0.0, 0.0], [0.1, 0.1], [5.0, 5.0], [5.1, 5.1]]
    }

    #[test]
    fn well_separated_clusters_score_high() {
        let score = silhouette_score(&two_blobs(), &[0, 0, 1, 1]).unwrap();
        assert!(score > 0.9, "score = {}", score);
    }

    #[test]
    fn bad_partition_scores_low() {
        let score = silhouette_score(&two_blobs(), &[0, 1, 0, 1]).unwrap();
        assert!(score < 0.0, "score = {}", score);
    }

    #[test]
    fn matches_hand_computed_value() {
        let x = array![[0.0], [1.0], [4.0]];
        // row 0: a = 1, b = 4 -> 0.75; row 1: a = 1, b = 3 -> 2/3; row 2 alone -> 0
        let score = silhouette_score(&x, &[0, 0, 1]).unwrap();
        let expected = (0.75 + 2.0 / 3.0 + 0.0) / 3.0;
        assert!((score - expected).abs() < 1e-12);
    }

    #[test]
    fn label_values_need_not_be_contiguous() {
        let a = silhouette_score(&two_blobs(), &[0, 0, 1, 1]).unwrap();
        let b = silhouette_score(&two_blobs(), &[7, 7, 3, 3]).unwrap();
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn single_cluster_is_rejected() {
        let err = silhouette_score(&two_blobs(), &[0, 0, 0, 0]).unwrap_err();
        assert_eq!(
            err,
            ClusteringError::InvalidLabelCount {
                n_labels: 1,
                n_samples: 4
            }
        );
    }

    #[test]
    fn one_cluster_per_row_is_rejected() {
        assert!(silhouette_score(&two_blobs(), &[0, 1, 2, 3]).is_err());
    }

    #[test]
    fn inertia_and_sizes() {
        let x = two_blobs();
        let centers = array![[0.05, 0.05], [5.05, 5.05]];
        let labels = [0, 0, 1, 1];
        assert!((inertia(&x, &centers, &labels) - 4.0 * 0.005).abs() < 1e-12);
        assert_eq!(cluster_sizes(&labels, 3), vec![2, 2, 0]);
    }
}
