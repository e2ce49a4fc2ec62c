//! IO utilities for session logs and clustering outputs.

pub mod output;
pub mod sequences;

pub use output::{write_centers, write_cluster_scores, write_labels};
pub use sequences::{parse_sequences, read_sequences, read_sequences_with_config, SequenceReaderConfig};
