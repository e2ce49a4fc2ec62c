use std::error::Error;
use std::fmt;

/// Errors raised by the feature, preprocessing and clustering stages.
#[derive(Debug, Clone, PartialEq)]
pub enum ClusteringError {
    /// No rows left to work with (e.g. every session was filtered out).
    EmptyInput,
    ShapeMismatch { expected: usize, found: usize },
    UnknownCategory { category: u32, vocabulary_size: usize },
    InvalidVocabulary(String),
    /// An accessor or transform was used before `fit`.
    NotFitted(&'static str),
    InvalidClusterCount { n_clusters: usize, n_samples: usize },
    InvalidLabelCount { n_labels: usize, n_samples: usize },
    NoValidCandidates,
}

impl fmt::Display for ClusteringError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClusteringError::EmptyInput => write!(f, "Input contains no sessions to process"),
            ClusteringError::ShapeMismatch { expected, found } => write!(
                f,
                "Shape mismatch: expected {} but found {}",
                expected, found
            ),
            ClusteringError::UnknownCategory {
                category,
                vocabulary_size,
            } => write!(
                f,
                "Category id {} is outside the vocabulary range 1..={}",
                category, vocabulary_size
            ),
            ClusteringError::InvalidVocabulary(msg) => write!(f, "Invalid vocabulary: {}", msg),
            ClusteringError::NotFitted(what) => {
                write!(f, "{} is not fitted yet. Call fit() first.", what)
            }
            ClusteringError::InvalidClusterCount {
                n_clusters,
                n_samples,
            } => write!(
                f,
                "Cannot fit {} clusters on {} samples",
                n_clusters, n_samples
            ),
            ClusteringError::InvalidLabelCount {
                n_labels,
                n_samples,
            } => write!(
                f,
                "Number of labels is {}. Valid values are 2 to n_samples - 1 ({} samples)",
                n_labels, n_samples
            ),
            ClusteringError::NoValidCandidates => {
                write!(f, "No candidate cluster count could be evaluated")
            }
        }
    }
}

impl Error for ClusteringError {}
