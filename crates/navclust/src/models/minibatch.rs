//! Mini-batch k-means.

use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};

use crate::error::ClusteringError;
use crate::models::cluster_trait::ClusterModel;
use crate::models::init::kmeans_plusplus;
use crate::models::{assign_labels, scaled_tolerance, validate_fit_input, FittedClusters};

/// Incremental k-means that updates the centers from random mini-batches.
///
/// # Algorithm
///
/// 1. `n_init` times: draw `3 * batch_size` rows (at least `k`), seed centers
///    with k-means++ on them and keep the seeding with the lowest inertia on
///    that subsample.
/// 2. For `max_iter * n / batch_size` steps: draw `batch_size` rows with
///    replacement, assign them to the nearest center and move each center
///    towards the mean of its batch rows with a per-center learning rate of
///    `1 / (rows seen so far)`.
/// 3. Stop early when the exponentially weighted batch inertia has not
///    improved for `max_no_improvement` steps, or when the squared center
///    shift falls below `tol` (scaled by the mean column variance).
///
/// All randomness comes from a `StdRng` seeded with `random_state`, so two
/// fits on the same data give identical centers.
#[derive(Debug, Clone)]
pub struct MiniBatchKMeans {
    n_clusters: usize,
    batch_size: usize,
    max_iter: usize,
    max_no_improvement: usize,
    n_init: usize,
    tol: f64,
    random_state: u64,
    fitted: Option<FittedClusters>,
}

impl MiniBatchKMeans {
    pub fn new(n_clusters: usize, batch_size: usize) -> Self {
        Self {
            n_clusters,
            batch_size: batch_size.max(1),
            max_iter: 100,
            max_no_improvement: 10,
            n_init: 3,
            tol: 0.0,
            random_state: 42,
            fitted: None,
        }
    }

    /// Maximum number of passes over the data (in units of `n / batch_size`
    /// mini-batch steps).
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter.max(1);
        self
    }

    /// Steps without improvement of the smoothed inertia before stopping;
    /// 0 disables this criterion.
    pub fn with_max_no_improvement(mut self, steps: usize) -> Self {
        self.max_no_improvement = steps;
        self
    }

    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init.max(1);
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Number of mini-batch steps run by the last fit.
    pub fn n_steps(&self) -> Option<usize> {
        self.fitted.as_ref().map(|f| f.n_iter)
    }

    fn fitted(&self) -> Result<&FittedClusters, ClusteringError> {
        self.fitted
            .as_ref()
            .ok_or(ClusteringError::NotFitted("MiniBatchKMeans"))
    }

    /// Best k-means++ seeding over `n_init` random subsamples.
    fn init_centers(&self, x: &Array2<f64>, batch_size: usize, rng: &mut StdRng) -> Array2<f64> {
        let n_samples = x.nrows();
        let mut init_size = 3 * batch_size;
        if init_size < self.n_clusters {
            init_size = 3 * self.n_clusters;
        }
        let init_size = init_size.min(n_samples);

        let mut best: Option<(Array2<f64>, f64)> = None;
        for run in 0..self.n_init {
            let idx = sample(rng, n_samples, init_size).into_vec();
            let subset = x.select(Axis(0), &idx);
            let centers = kmeans_plusplus(&subset, self.n_clusters, rng);
            let (_, inertia) = assign_labels(&subset, &centers);
            log::trace!("MiniBatchKMeans init {}: inertia {:.4}", run, inertia);
            if best.as_ref().map_or(true, |(_, b)| inertia < *b) {
                best = Some((centers, inertia));
            }
        }

        match best {
            Some((centers, _)) => centers,
            None => kmeans_plusplus(x, self.n_clusters, rng),
        }
    }
}

impl ClusterModel for MiniBatchKMeans {
    fn fit(&mut self, x: &Array2<f64>) -> Result<(), ClusteringError> {
        validate_fit_input(x, self.n_clusters)?;
        let n_samples = x.nrows();
        let batch_size = self.batch_size.min(n_samples);
        let tol = scaled_tolerance(x, self.tol);
        let mut rng = StdRng::seed_from_u64(self.random_state);

        let mut centers = self.init_centers(x, batch_size, &mut rng);
        let mut weight_sums = vec![0.0f64; self.n_clusters];

        let n_steps = (self.max_iter * n_samples + batch_size - 1) / batch_size;
        let alpha = (batch_size as f64 * 2.0 / (n_samples as f64 + 1.0)).min(1.0);
        let mut ewa_inertia: Option<f64> = None;
        let mut ewa_inertia_min = f64::INFINITY;
        let mut no_improvement = 0usize;
        let mut steps_run = 0usize;

        for step in 0..n_steps {
            let idx: Vec<usize> = (0..batch_size)
                .map(|_| rng.gen_range(0..n_samples))
                .collect();
            let batch = x.select(Axis(0), &idx);
            let (labels, batch_inertia) = assign_labels(&batch, &centers);

            let previous = if tol > 0.0 { Some(centers.clone()) } else { None };

            let mut sums = Array2::<f64>::zeros(centers.raw_dim());
            let mut counts = vec![0usize; self.n_clusters];
            for (row, &label) in batch.rows().into_iter().zip(labels.iter()) {
                counts[label] += 1;
                let mut acc = sums.row_mut(label);
                acc += &row;
            }
            for k in 0..self.n_clusters {
                if counts[k] == 0 {
                    continue;
                }
                let count = counts[k] as f64;
                weight_sums[k] += count;
                let step_size = 1.0 / weight_sums[k];
                let delta = (&sums.row(k) - &(&centers.row(k) * count)) * step_size;
                let mut center = centers.row_mut(k);
                center += &delta;
            }
            steps_run = step + 1;

            if let Some(previous) = previous {
                let shift: f64 = (&centers - &previous).mapv(|d| d * d).sum();
                if shift <= tol {
                    log::debug!(
                        "MiniBatchKMeans converged (center shift) at step {}/{}",
                        steps_run,
                        n_steps
                    );
                    break;
                }
            }

            let batch_inertia = batch_inertia / batch_size as f64;
            let ewa = match ewa_inertia {
                None => batch_inertia,
                Some(prev) => prev * (1.0 - alpha) + batch_inertia * alpha,
            };
            ewa_inertia = Some(ewa);

            if ewa < ewa_inertia_min {
                no_improvement = 0;
                ewa_inertia_min = ewa;
            } else {
                no_improvement += 1;
            }
            if self.max_no_improvement > 0 && no_improvement >= self.max_no_improvement {
                log::debug!(
                    "MiniBatchKMeans stopped after {} steps without improvement (step {}/{})",
                    no_improvement,
                    steps_run,
                    n_steps
                );
                break;
            }
        }

        let (labels, inertia) = assign_labels(x, &centers);
        self.fitted = Some(FittedClusters {
            centers,
            labels,
            inertia,
            n_iter: steps_run,
        });
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
        "minibatch_kmeans"
    }
}
