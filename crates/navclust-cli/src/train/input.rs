use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};

use navclust::config::ModelConfig;
use navclust::preprocessing::SessionFilter;
use navclust::selection::ClusterRange;
use navclust::vocabulary::Vocabulary;

/// Parameters of a `navclust train` run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub data_file: String,
    pub output_dir: String,
    /// Category labels in id order; the MSNBC categories when absent.
    pub categories: Option<Vec<String>>,
    pub comment_marker: String,
    pub filter: SessionFilter,
    pub model: ModelConfig,
    /// Cluster count used when the sweep is disabled.
    pub n_clusters: usize,
    pub sweep: bool,
    pub cluster_range: ClusterRange,
    pub parallel_sweep: bool,
    /// Rows kept (after a seeded shuffle) for the sweep and the final fit.
    pub max_rows: Option<usize>,
    pub shuffle_seed: u64,
    pub report: bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            data_file: String::new(),
            output_dir: String::from("navclust_output"),
            categories: None,
            comment_marker: String::from("%"),
            filter: SessionFilter::default(),
            model: ModelConfig::minibatch(8192),
            n_clusters: 8,
            sweep: true,
            cluster_range: ClusterRange::default(),
            parallel_sweep: true,
            max_rows: Some(30_000),
            shuffle_seed: 42,
            report: true,
        }
    }
}

impl TrainConfig {
    /// Load the JSON config and apply command line overrides.
    pub fn from_arguments(config_path: &PathBuf, matches: &ArgMatches) -> Result<Self> {
        let mut config = load_train_config(config_path)?;

        if let Some(data_file) = matches.get_one::<String>("data_file") {
            config.data_file = data_file.clone();
        }
        validate_data_file(&config.data_file)?;

        if let Some(output_dir) = matches.get_one::<String>("output_dir") {
            config.output_dir = output_dir.clone();
        }

        if let Some(&n_clusters) = matches.get_one::<usize>("n_clusters") {
            config.n_clusters = n_clusters;
        }

        if matches.get_flag("no_sweep") {
            config.sweep = false;
        }

        if matches.get_flag("no_report") {
            config.report = false;
        }

        Ok(config)
    }

    pub fn vocabulary(&self) -> Result<Vocabulary> {
        match &self.categories {
            Some(labels) => Vocabulary::from_labels(labels.iter().cloned())
                .context("Invalid category list in config"),
            None => Ok(Vocabulary::msnbc()),
        }
    }
}

pub fn load_train_config<P: AsRef<Path>>(path: P) -> Result<TrainConfig> {
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: TrainConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

pub fn validate_data_file(path: &str) -> Result<()> {
    if path.is_empty() {
        anyhow::bail!("No session data file given (set `data_file` or pass --data)");
    }
    if !Path::new(path).is_file() {
        anyhow::bail!("File does not exist: {}", path);
    }
    Ok(())
}
