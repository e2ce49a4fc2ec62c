//! Greedy k-means++ seeding.

use ndarray::{Array2, ArrayView1, Axis};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::stats::squared_euclidean_distance;

/// Pick `n_clusters` rows of `x` as initial centers.
///
/// The first center is drawn uniformly. Each following center is the best
/// of `2 + ln(k)` candidates drawn with probability proportional to their
/// squared distance to the closest center chosen so far, where "best" means
/// the lowest resulting potential (sum of squared distances).
pub fn kmeans_plusplus<R: Rng>(
    x: &Array2<f64>,
    n_clusters: usize,
    rng: &mut R,
) -> Array2<f64> {
    let n_samples = x.nrows();
    let n_local_trials = 2 + (n_clusters as f64).ln().floor() as usize;

    let mut chosen = Vec::with_capacity(n_clusters);
    chosen.push(rng.gen_range(0..n_samples));

    let mut closest = distances_to(x, x.row(chosen[0]));
    let mut potential: f64 = closest.iter().sum();

    while chosen.len() < n_clusters {
        let candidates: Vec<usize> = match WeightedIndex::new(&closest) {
            Ok(dist) => (0..n_local_trials).map(|_| dist.sample(rng)).collect(),
            // every row already coincides with a center
            Err(_) => (0..n_local_trials)
                .map(|_| rng.gen_range(0..n_samples))
                .collect(),
        };

        let mut best: Option<(usize, f64, Vec<f64>)> = None;
        for candidate in candidates {
            let updated: Vec<f64> = distances_to(x, x.row(candidate))
                .into_iter()
                .zip(closest.iter())
                .map(|(d, &c)| d.min(c))
                .collect();
            let candidate_potential: f64 = updated.iter().sum();
            if best
                .as_ref()
                .map_or(true, |(_, pot, _)| candidate_potential < *pot)
            {
                best = Some((candidate, candidate_potential, updated));
            }
        }

        if let Some((candidate, candidate_potential, updated)) = best {
            chosen.push(candidate);
            potential = candidate_potential;
            closest = updated;
        }
    }

    log::trace!(
        "k-means++ picked rows {:?} (potential {:.4})",
        chosen,
        potential
    );
    x.select(Axis(0), &chosen)
}

fn distances_to(x: &Array2<f64>, center: ArrayView1<f64>) -> Vec<f64> {
    x.rows()
        .into_iter()
        .map(|row| squared_euclidean_distance(row, center))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn picks_distinct_far_apart_rows() {
        let x = array![[0.0, 0.0], [0.1, 0.0], [10.0, 10.0], [10.1, 10.0]];
        let mut rng = StdRng::seed_from_u64(7);
        let centers = kmeans_plusplus(&x, 2, &mut rng);
        assert_eq!(centers.nrows(), 2);
        let gap = squared_euclidean_distance(centers.row(0), centers.row(1));
        assert!(gap > 100.0, "centers too close: {:?}", centers);
    }

    #[test]
    fn same_seed_same_centers() {
        let x = array![[0.0], [1.0], [2.0], [8.0], [9.0], [20.0]];
        let a = kmeans_plusplus(&x, 3, &mut StdRng::seed_from_u64(42));
        let b = kmeans_plusplus(&x, 3, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn duplicate_rows_do_not_panic() {
        let x = array![[1.0, 1.0], [1.0, 1.0], [1.0, 1.0]];
        let centers = kmeans_plusplus(&x, 3, &mut StdRng::seed_from_u64(1));
        assert_eq!(centers.shape(), &[3, 2]);
    }
}
