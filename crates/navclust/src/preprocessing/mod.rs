//! Session filtering and feature normalization.
//!
//! Sessions are filtered by [`SessionFilter`], vectorized into category
//! counts, then normalized column-wise by a [`FrequencyTransformer`]
//! (standardization followed by a Yeo-Johnson power transform). The
//! transformer owns its fitted parameters so the same state can be reused
//! on new rows.
pub mod filter;
pub mod power;
pub mod scaler;
pub mod transformer;

use ndarray::Array2;

pub use filter::{FilterReport, SessionFilter};
pub use power::PowerTransformer;
pub use scaler::StandardScaler;
pub use transformer::FrequencyTransformer;

use crate::error::ClusteringError;
use crate::features::feature_matrix;
use crate::vocabulary::Vocabulary;

/// Turns raw sessions into the normalized matrix that gets clustered.
#[derive(Debug, Clone)]
pub struct SessionProcessor {
    vocabulary: Vocabulary,
    transformer: FrequencyTransformer,
    last_report: Option<FilterReport>,
}

impl SessionProcessor {
    pub fn new(vocabulary: Vocabulary) -> Self {
        let transformer = FrequencyTransformer::new(vocabulary.len());
        Self {
            vocabulary,
            transformer,
            last_report: None,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn transformer(&self) -> &FrequencyTransformer {
        &self.transformer
    }

    /// Sessions kept / dropped by the most recent preprocessing run.
    pub fn last_filter_report(&self) -> Option<FilterReport> {
        self.last_report
    }

    /// Filter `sessions`, vectorize the survivors and fit the normalization
    /// on them, returning the normalized matrix.
    pub fn preprocess_sequences<S>(
        &mut self,
        sessions: &[S],
        filter: &SessionFilter,
    ) -> Result<Array2<f64>, ClusteringError>
    where
        S: AsRef<[u32]> + Clone,
    {
        let (kept, report) = filter.filter(sessions);
        self.last_report = Some(report);
        if kept.is_empty() {
            return Err(ClusteringError::EmptyInput);
        }

        let x = feature_matrix(&kept, &self.vocabulary)?;
        log::debug!("Feature matrix shape: {:?}", x.shape());
        self.transformer.fit_transform(&x)
    }

    /// Shorthand for [`SessionProcessor::preprocess_sequences`] with explicit
    /// thresholds.
    pub fn preprocess<S>(
        &mut self,
        sessions: &[S],
        min_sequence_length: usize,
        max_category_ratio: f64,
    ) -> Result<Array2<f64>, ClusteringError>
    where
        S: AsRef<[u32]> + Clone,
    {
        let filter = SessionFilter::new(min_sequence_length, max_category_ratio);
        self.preprocess_sequences(sessions, &filter)
    }

    /// Vectorize and normalize new sessions with the already fitted state.
    pub fn transform_sequences<S: AsRef<[u32]>>(
        &self,
        sessions: &[S],
    ) -> Result<Array2<f64>, ClusteringError> {
        let x = feature_matrix(sessions, &self.vocabulary)?;
        self.transformer.transform(&x)
    }
}
