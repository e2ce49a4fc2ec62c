//! navclust: behavioral clustering of click-stream navigation sessions.
//!
//! Sessions (ordered lists of category codes) are turned into per-category
//! count vectors, normalized with a standardization + Yeo-Johnson power
//! transform, and partitioned with mini-batch k-means. The number of clusters
//! can be picked automatically by sweeping candidate counts and keeping the
//! best silhouette score.
//!
//! The library only depends on in-memory data. File reading, output writers
//! and plotly reports live in `io` and `report` so the CLI and examples can
//! share them.
pub mod clusterer;
pub mod config;
pub mod data_handling;
pub mod error;
pub mod features;
pub mod io;
pub mod models;
pub mod optimize;
pub mod preprocessing;
pub mod report;
pub mod selection;
pub mod stats;
pub mod vocabulary;

pub use error::ClusteringError;

/// One browsing session: category ids in visit order.
pub type Session = Vec<u32>;
