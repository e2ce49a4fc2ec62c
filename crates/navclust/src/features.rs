//! Session -> count-vector featurization.

use ndarray::Array2;

use crate::error::ClusteringError;
use crate::vocabulary::Vocabulary;

/// Count how often each vocabulary category occurs in `session`.
///
/// Component `i` holds the count of category id `i + 1`, so the components
/// always sum to `session.len()`. Ids outside `1..=V` are rejected.
pub fn create_feature_vector(
    session: &[u32],
    vocabulary: &Vocabulary,
) -> Result<Vec<u32>, ClusteringError> {
    let mut counts = vec![0u32; vocabulary.len()];
    for &category in session {
        if !vocabulary.contains(category) {
            return Err(ClusteringError::UnknownCategory {
                category,
                vocabulary_size: vocabulary.len(),
            });
        }
        counts[category as usize - 1] += 1;
    }
    Ok(counts)
}

/// Stack the feature vectors of `sessions` into an `(N, V)` matrix.
pub fn feature_matrix<S: AsRef<[u32]>>(
    sessions: &[S],
    vocabulary: &Vocabulary,
) -> Result<Array2<f64>, ClusteringError> {
    let mut x = Array2::<f64>::zeros((sessions.len(), vocabulary.len()));
    for (mut row, session) in x.rows_mut().into_iter().zip(sessions) {
        let counts = create_feature_vector(session.as_ref(), vocabulary)?;
        for (dst, count) in row.iter_mut().zip(counts) {
            *dst = f64::from(count);
        }
    }
    Ok(x)
}
