//! Row sampling helpers used before the quadratic-cost cluster sweep.
use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Shuffle the rows of `x` and keep at most `max_rows` of them.
///
/// Returns the sampled matrix together with the original row indices, in the
/// shuffled order. The shuffle is seeded so repeated runs pick the same rows.
pub fn subsample_rows(x: &Array2<f64>, max_rows: usize, seed: u64) -> (Array2<f64>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..x.nrows()).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    indices.truncate(max_rows);

    log::debug!("Sampled {} of {} rows", indices.len(), x.nrows());
    (x.select(Axis(0), &indices), indices)
}
