use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Central configuration for clustering models in the crate.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    /// Seed for every random choice made while fitting (initialization
    /// subsamples, k-means++ draws, mini-batches).
    pub random_state: u64,

    pub model_type: ModelType,
}

/// Supported clustering algorithms and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum ModelType {
    MiniBatchKMeans {
        batch_size: usize,
        max_iter: usize,
        max_no_improvement: usize,
        n_init: usize,
        tol: f64,
    },
    KMeans {
        max_iter: usize,
        n_init: usize,
        tol: f64,
    },
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::MiniBatchKMeans {
            batch_size: 1024,
            max_iter: 100,
            max_no_improvement: 10,
            n_init: 3,
            tol: 0.0,
        }
    }
}

impl ModelType {
    /// Short identifier used in file names and logs.
    pub fn name(&self) -> &'static str {
        match self {
            ModelType::MiniBatchKMeans { .. } => "minibatch_kmeans",
            ModelType::KMeans { .. } => "kmeans",
        }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "minibatch" | "minibatch_kmeans" | "mini-batch-kmeans" => Ok(ModelType::default()),
            "kmeans" => Ok(ModelType::KMeans {
                max_iter: 300,
                n_init: 3,
                tol: 1e-4,
            }),
            _ => Err(format!(
                "Unknown model type: {}. Expected one of: minibatch, kmeans",
                s
            )),
        }
    }
}

impl ModelConfig {
    pub fn new(random_state: u64, model_type: ModelType) -> Self {
        Self {
            random_state,
            model_type,
        }
    }

    /// Mini-batch k-means with the given batch size and default settings
    /// otherwise.
    pub fn minibatch(batch_size: usize) -> Self {
        Self {
            model_type: ModelType::MiniBatchKMeans {
                batch_size,
                max_iter: 100,
                max_no_improvement: 10,
                n_init: 3,
                tol: 0.0,
            },
            ..Self::default()
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            random_state: 42,
            model_type: ModelType::default(),
        }
    }
}
