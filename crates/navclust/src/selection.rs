//! Choosing the number of clusters by silhouette sweep.
//!
//! Every candidate count is fitted and scored independently, so the sweep
//! runs as a rayon map followed by a max-by-score reduction. Each candidate
//! costs one model fit plus one exact silhouette computation (O(N^2 * V)),
//! which dominates for large N: subsample the matrix before sweeping (see
//! [`crate::data_handling::subsample_rows`]).

use std::cmp::Ordering;
use std::ops::RangeInclusive;

use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::error::ClusteringError;
use crate::models::factory::build_model;
use crate::stats::silhouette_score;

/// Silhouette score obtained for one candidate cluster count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub n_clusters: usize,
    pub score: f64,
}

/// Outcome of a sweep: every evaluated candidate in ascending order, and the
/// winner.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub scores: Vec<CandidateScore>,
    pub best: CandidateScore,
}

/// Inclusive range of candidate cluster counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterRange {
    pub min: usize,
    pub max: usize,
}

impl Default for ClusterRange {
    fn default() -> Self {
        Self { min: 4, max: 12 }
    }
}

impl ClusterRange {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn candidates(&self) -> RangeInclusive<usize> {
        self.min..=self.max
    }
}

impl From<RangeInclusive<usize>> for ClusterRange {
    fn from(range: RangeInclusive<usize>) -> Self {
        Self {
            min: *range.start(),
            max: *range.end(),
        }
    }
}

/// Ordering used to pick the winner: higher score first, then smaller K.
fn rank(a: &CandidateScore, b: &CandidateScore) -> Ordering {
    a.score
        .total_cmp(&b.score)
        .then_with(|| b.n_clusters.cmp(&a.n_clusters))
}

/// Better of two candidates. Commutative and associative, so it can be used
/// as a parallel reduction.
pub fn better_candidate(a: CandidateScore, b: CandidateScore) -> CandidateScore {
    if rank(&a, &b) == Ordering::Less {
        b
    } else {
        a
    }
}

/// Highest-scoring candidate; equal scores go to the smaller cluster count.
pub fn best_candidate(scores: &[CandidateScore]) -> Option<CandidateScore> {
    scores.iter().copied().reduce(better_candidate)
}

/// Fit and score a single candidate cluster count.
pub fn evaluate_candidate(
    x: &Array2<f64>,
    n_clusters: usize,
    config: &ModelConfig,
) -> Result<CandidateScore, ClusteringError> {
    let n_samples = x.nrows();
    if n_clusters < 2 || n_clusters >= n_samples {
        return Err(ClusteringError::InvalidClusterCount {
            n_clusters,
            n_samples,
        });
    }

    let mut model = build_model(config, n_clusters);
    model.fit(x)?;
    let labels = model.predict(x)?;
    let score = silhouette_score(x, &labels)?;
    log::debug!(
        "{} with {} clusters: silhouette {:.4}",
        model.name(),
        n_clusters,
        score
    );
    Ok(CandidateScore { n_clusters, score })
}

/// Sweep `candidates`, scoring each with the silhouette coefficient.
///
/// Candidates that cannot be evaluated (fewer than 2 clusters, at least as
/// many clusters as rows, ...) are skipped with a warning. Fails only when no
/// candidate could be scored. With `parallel`, candidates run concurrently on
/// the rayon pool; the result is identical either way.
pub fn select_cluster_count(
    x: &Array2<f64>,
    candidates: impl Into<ClusterRange>,
    config: &ModelConfig,
    parallel: bool,
) -> Result<Selection, ClusteringError> {
    if x.nrows() == 0 {
        return Err(ClusteringError::EmptyInput);
    }
    let range: ClusterRange = candidates.into();
    let ks: Vec<usize> = range.candidates().collect();
    log::info!(
        "Evaluating {} candidate cluster counts ({}..={}) on {} rows",
        ks.len(),
        range.min,
        range.max,
        x.nrows()
    );

    let evaluate = |&k: &usize| (k, evaluate_candidate(x, k, config));
    let results: Vec<(usize, Result<CandidateScore, ClusteringError>)> = if parallel {
        ks.par_iter().map(evaluate).collect()
    } else {
        ks.iter().map(evaluate).collect()
    };

    let mut scores = Vec::with_capacity(results.len());
    for (k, result) in results {
        match result {
            Ok(score) => scores.push(score),
            Err(e) => log::warn!("Skipping {} clusters: {}", k, e),
        }
    }

    let best = best_candidate(&scores).ok_or(ClusteringError::NoValidCandidates)?;
    log::info!(
        "Best number of clusters: {} (silhouette {:.4})",
        best.n_clusters,
        best.score
    );
    Ok(Selection { scores, best })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cs(n_clusters: usize, score: f64) -> CandidateScore {
        CandidateScore { n_clusters, score }
    }

    #[test]
    fn best_prefers_higher_score() {
        let scores = [cs(4, 0.2), cs(5, 0.5), cs(6, 0.3)];
        assert_eq!(best_candidate(&scores), Some(cs(5, 0.5)));
    }

    #[test]
    fn ties_go_to_smaller_k() {
        let scores = [cs(4, 0.1), cs(6, 0.5), cs(9, 0.5), cs(11, 0.2)];
        assert_eq!(best_candidate(&scores), Some(cs(6, 0.5)));
        // independent of iteration order
        let reversed: Vec<_> = scores.iter().rev().copied().collect();
        assert_eq!(best_candidate(&reversed), Some(cs(6, 0.5)));
    }

    #[test]
    fn reduction_is_commutative() {
        let a = cs(3, 0.4);
        let b = cs(7, 0.4);
        assert_eq!(better_candidate(a, b), better_candidate(b, a));
    }

    #[test]
    fn empty_scores_have_no_best() {
        assert_eq!(best_candidate(&[]), None);
    }

    #[test]
    fn range_conversion() {
        let range: ClusterRange = (2..=5).into();
        assert_eq!(range, ClusterRange::new(2, 5));
        assert_eq!(range.candidates().count(), 4);
        assert_eq!(ClusterRange::default(), ClusterRange::new(4, 12));
    }
}
