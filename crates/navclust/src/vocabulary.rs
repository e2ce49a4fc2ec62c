//! Category vocabulary: the fixed, ordered set of category ids a pipeline
//! understands, each with a human readable label.
use std::collections::BTreeMap;

use crate::error::ClusteringError;

/// Ordered mapping from category id (`1..=V`) to label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    labels: Vec<String>,
}

const MSNBC_CATEGORIES: [&str; 17] = [
    "frontpage",
    "news",
    "tech",
    "local",
    "opinion",
    "on-air",
    "misc",
    "weather",
    "health",
    "living",
    "business",
    "sports",
    "summary",
    "bbs",
    "travel",
    "msn-news",
    "msn-sports",
];

impl Vocabulary {
    /// Build a vocabulary from an id -> label mapping.
    ///
    /// Ids must form the contiguous range `1..=V`.
    pub fn new(mapping: BTreeMap<u32, String>) -> Result<Self, ClusteringError> {
        if mapping.is_empty() {
            return Err(ClusteringError::InvalidVocabulary(
                "vocabulary must contain at least one category".to_string(),
            ));
        }
        for (expected, id) in (1u32..).zip(mapping.keys()) {
            if *id != expected {
                return Err(ClusteringError::InvalidVocabulary(format!(
                    "category ids must be contiguous starting at 1, found {} where {} was expected",
                    id, expected
                )));
            }
        }
        Ok(Self {
            labels: mapping.into_values().collect(),
        })
    }

    /// Build a vocabulary from labels; the i-th label gets id `i + 1`.
    pub fn from_labels<I, S>(labels: I) -> Result<Self, ClusteringError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            return Err(ClusteringError::InvalidVocabulary(
                "vocabulary must contain at least one category".to_string(),
            ));
        }
        Ok(Self { labels })
    }

    /// The 17 page categories of the MSNBC.com anonymous web data.
    pub fn msnbc() -> Self {
        Self {
            labels: MSNBC_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Number of categories (V).
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn contains(&self, category: u32) -> bool {
        category >= 1 && (category as usize) <= self.labels.len()
    }

    pub fn label(&self, category: u32) -> Option<&str> {
        if self.contains(category) {
            Some(self.labels[category as usize - 1].as_str())
        } else {
            None
        }
    }

    /// Labels in column order of the feature matrix.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Count vector of `session` over this vocabulary.
    pub fn create_feature_vector(&self, session: &[u32]) -> Result<Vec<u32>, ClusteringError> {
        crate::features::create_feature_vector(session, self)
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::msnbc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn msnbc_vocabulary_has_17_categories() {
        let vocab = Vocabulary::msnbc();
        assert_eq!(vocab.len(), 17);
        assert_eq!(vocab.label(1), Some("frontpage"));
        assert_eq!(vocab.label(17), Some("msn-sports"));
        assert_eq!(vocab.label(0), None);
        assert_eq!(vocab.label(18), None);
    }

    #[test]
    fn feature_vector_from_vocabulary() {
        let vocab = Vocabulary::from_labels(vec!["a", "b", "c"]).unwrap();
        assert_eq!(vocab.create_feature_vector(&[3, 1, 3]).unwrap(), vec![1, 0, 2]);
    }

    #[test]
    fn new_rejects_gaps() {
        let mut mapping = BTreeMap::new();
        mapping.insert(1, "a".to_string());
        mapping.insert(3, "c".to_string());
        assert!(matches!(
            Vocabulary::new(mapping),
            Err(ClusteringError::InvalidVocabulary(_))
        ));
    }

    #[test]
    fn new_keeps_id_order() {
        let mut mapping = BTreeMap::new();
        mapping.insert(2, "second".to_string());
        mapping.insert(1, "first".to_string());
        let vocab = Vocabulary::new(mapping).unwrap();
        assert_eq!(vocab.labels(), &["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn empty_vocabulary_is_rejected() {
        assert!(Vocabulary::new(BTreeMap::new()).is_err());
        assert!(Vocabulary::from_labels(Vec::<String>::new()).is_err());
    }
}
