//! Removal of sessions that carry little clustering signal.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Thresholds for dropping degenerate sessions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionFilter {
    /// Sessions shorter than this are dropped.
    pub min_sequence_length: usize,
    /// Sessions where the most frequent category makes up more than this
    /// share of the visits are dropped.
    pub max_category_ratio: f64,
}

impl Default for SessionFilter {
    fn default() -> Self {
        Self {
            min_sequence_length: 3,
            max_category_ratio: 0.9,
        }
    }
}

/// Number of sessions before and after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterReport {
    pub before: usize,
    pub after: usize,
}

impl FilterReport {
    pub fn dropped(&self) -> usize {
        self.before - self.after
    }
}

impl SessionFilter {
    pub fn new(min_sequence_length: usize, max_category_ratio: f64) -> Self {
        Self {
            min_sequence_length,
            max_category_ratio,
        }
    }

    /// Whether `session` survives both the length and dominance checks.
    pub fn keep(&self, session: &[u32]) -> bool {
        if session.is_empty() || session.len() < self.min_sequence_length {
            return false;
        }
        dominant_category_ratio(session) <= self.max_category_ratio
    }

    /// Return the sessions that pass [`SessionFilter::keep`], preserving order.
    pub fn filter<S>(&self, sessions: &[S]) -> (Vec<S>, FilterReport)
    where
        S: AsRef<[u32]> + Clone,
    {
        let kept: Vec<S> = sessions
            .iter()
            .filter(|s| self.keep(s.as_ref()))
            .cloned()
            .collect();
        let report = FilterReport {
            before: sessions.len(),
            after: kept.len(),
        };
        log::info!(
            "Reduced the number of sequences from {} to {}",
            report.before,
            report.after
        );
        (kept, report)
    }
}

/// Count of the most frequent category divided by the session length.
pub fn dominant_category_ratio(session: &[u32]) -> f64 {
    if session.is_empty() {
        return 0.0;
    }
    let mut counts: HashMap<u32, usize> = HashMap::new();
    for &category in session {
        *counts.entry(category).or_insert(0) += 1;
    }
    let most_common = counts.values().copied().max().unwrap_or(0);
    most_common as f64 / session.len() as f64
}
