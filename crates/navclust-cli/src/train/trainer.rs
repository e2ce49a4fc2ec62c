use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use maud::html;
use ndarray::Array2;

use navclust::clusterer::{ClusterEvaluation, KMeansClusterer};
use navclust::data_handling::subsample_rows;
use navclust::io::{read_sequences_with_config, write_centers, write_cluster_scores, write_labels, SequenceReaderConfig};
use navclust::preprocessing::SessionProcessor;
use navclust::report::plots::{plot_cluster_profiles, plot_cluster_sizes, plot_silhouette_sweep};
use navclust::report::{Report, ReportSection};
use navclust::selection::CandidateScore;

use super::input::TrainConfig;

/// What a training run produced.
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub n_sessions: usize,
    pub n_kept: usize,
    pub n_sampled: usize,
    pub n_clusters: usize,
    pub scores: Vec<CandidateScore>,
    pub evaluation: Option<ClusterEvaluation>,
}

pub fn run_training(config: &TrainConfig) -> Result<TrainingSummary> {
    let start_time = std::time::Instant::now();
    let vocabulary = config.vocabulary()?;

    let reader_config = SequenceReaderConfig {
        comment_marker: config.comment_marker.clone(),
    };
    let sessions = read_sequences_with_config(&config.data_file, &reader_config)?;

    let mut processor = SessionProcessor::new(vocabulary);
    let x = processor
        .preprocess_sequences(&sessions, &config.filter)
        .context("Failed to preprocess sessions")?;
    let n_kept = x.nrows();

    let train_x = match config.max_rows {
        Some(max_rows) if max_rows < n_kept => {
            let (sample, _) = subsample_rows(&x, max_rows, config.shuffle_seed);
            log::info!("Using {} of {} sessions for training", sample.nrows(), n_kept);
            sample
        }
        _ => x.clone(),
    };

    let mut clusterer = KMeansClusterer::new(config.n_clusters, config.model.clone())
        .with_parallel_sweep(config.parallel_sweep);

    let scores = if config.sweep {
        clusterer
            .find_optimal_clusters(&train_x, config.cluster_range)
            .context("Cluster count sweep failed")?
    } else {
        Vec::new()
    };

    let n_clusters = clusterer.target_clusters();
    clusterer
        .fit(&train_x)
        .with_context(|| format!("Failed to fit {} clusters", n_clusters))?;

    let evaluation = match clusterer.evaluate_clustering(&train_x) {
        Ok(evaluation) => {
            log::info!(
                "Silhouette score with {} clusters: {:.4}",
                evaluation.n_clusters,
                evaluation.silhouette
            );
            Some(evaluation)
        }
        Err(e) => {
            log::warn!("Could not evaluate clustering: {}", e);
            None
        }
    };

    let centers = clusterer.get_cluster_centers()?;
    let labels = clusterer.get_labels(&x)?;
    log::info!("Clustering completed in {:?}", start_time.elapsed());

    let output_dir = Path::new(&config.output_dir);
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    write_centers(centers, processor.vocabulary().labels(), output_dir.join("centers.tsv"))?;
    write_labels(&labels, output_dir.join("labels.tsv"))?;
    if !scores.is_empty() {
        write_cluster_scores(&scores, output_dir.join("cluster_scores.tsv"))?;
    }

    let json = serde_json::to_string_pretty(config)?;
    fs::write(output_dir.join("navclust_config.json"), &json)
        .context("Failed to write config")?;

    let summary = TrainingSummary {
        n_sessions: sessions.len(),
        n_kept,
        n_sampled: train_x.nrows(),
        n_clusters: centers.nrows(),
        scores,
        evaluation,
    };

    if config.report {
        let report = build_report(config, &summary, centers, &labels, &processor, &json)?;
        report.save_to_file(output_dir.join("navclust_report.html"))?;
    }

    log::info!("Results written to {}", output_dir.display());
    Ok(summary)
}

fn build_report(
    config: &TrainConfig,
    summary: &TrainingSummary,
    centers: &Array2<f64>,
    labels: &[usize],
    processor: &SessionProcessor,
    config_json: &str,
) -> Result<Report> {
    let mut report = Report::new("navclust Training Report", env!("CARGO_PKG_VERSION"));

    /* Section 1: Overview */
    {
        let mut overview_section = ReportSection::new("Overview");
        overview_section.add_content(html! {
            p {
                (summary.n_sessions) " sessions read, " (summary.n_kept)
                " kept after filtering, " (summary.n_sampled) " used for training."
            }
            @if let Some(evaluation) = &summary.evaluation {
                p {
                    (evaluation.n_clusters) " clusters, silhouette score "
                    (format!("{:.4}", evaluation.silhouette)) "."
                }
            }
        });

        if !summary.scores.is_empty() {
            overview_section.add_plot(plot_silhouette_sweep(&summary.scores).map_err(anyhow::Error::msg)?);
        }
        overview_section.add_plot(
            plot_cluster_profiles(centers, processor.vocabulary()).map_err(anyhow::Error::msg)?,
        );
        overview_section.add_plot(plot_cluster_sizes(labels, centers.nrows()).map_err(anyhow::Error::msg)?);
        report.add_section(overview_section);
    }

    /* Section 2: Configuration */
    {
        let mut config_section = ReportSection::new("Configuration");
        config_section.add_content(html! {
            p { "Data: " (config.data_file) }
            pre { code { (config_json) } }
        });
        report.add_section(config_section);
    }

    Ok(report)
}
