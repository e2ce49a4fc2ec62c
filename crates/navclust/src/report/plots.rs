use ndarray::Array2;
use plotly::common::{ColorScale, ColorScalePalette, Mode};
use plotly::layout::{Axis, Layout};
use plotly::{Bar, HeatMap, Plot, Scatter};

use crate::selection::CandidateScore;
use crate::stats::cluster_sizes;
use crate::vocabulary::Vocabulary;

/// Heatmap of the cluster centers: one row per cluster, one column per
/// category.
pub fn plot_cluster_profiles(centers: &Array2<f64>, vocabulary: &Vocabulary) -> Result<Plot, String> {
    if centers.ncols() != vocabulary.len() {
        return Err(format!(
            "Centers have {} columns but the vocabulary has {} categories",
            centers.ncols(),
            vocabulary.len()
        ));
    }

    let categories: Vec<String> = vocabulary.labels().to_vec();
    let clusters: Vec<String> = (0..centers.nrows()).map(|k| format!("Cluster {}", k)).collect();
    let z: Vec<Vec<f64>> = centers.rows().into_iter().map(|row| row.to_vec()).collect();

    let heatmap = HeatMap::new(categories, clusters, z)
        .color_scale(ColorScale::Palette(ColorScalePalette::YlOrRd))
        .name("Normalized frequency");

    let layout = Layout::new()
        .title("Cluster Profiles: Category frequencies")
        .x_axis(Axis::new().title("Category"))
        .y_axis(Axis::new().title("Cluster"));

    let mut plot = Plot::new();
    plot.add_trace(heatmap);
    plot.set_layout(layout);
    Ok(plot)
}

/// Bar chart of the number of sessions per cluster.
pub fn plot_cluster_sizes(labels: &[usize], n_clusters: usize) -> Result<Plot, String> {
    if let Some(&label) = labels.iter().find(|&&l| l >= n_clusters) {
        return Err(format!("Label {} is out of range for {} clusters", label, n_clusters));
    }

    let sizes = cluster_sizes(labels, n_clusters);
    let clusters: Vec<usize> = (0..n_clusters).collect();
    let bar = Bar::new(clusters, sizes).name("Sessions");

    let layout = Layout::new()
        .title("Cluster Size Distribution")
        .x_axis(Axis::new().title("Cluster"))
        .y_axis(Axis::new().title("Number of Sessions"));

    let mut plot = Plot::new();
    plot.add_trace(bar);
    plot.set_layout(layout);
    Ok(plot)
}

/// Silhouette score against the number of clusters for a sweep.
pub fn plot_silhouette_sweep(scores: &[CandidateScore]) -> Result<Plot, String> {
    if scores.is_empty() {
        return Err("No candidate scores to plot".to_string());
    }

    let ks: Vec<usize> = scores.iter().map(|s| s.n_clusters).collect();
    let values: Vec<f64> = scores.iter().map(|s| s.score).collect();
    let trace = Scatter::new(ks, values)
        .mode(Mode::LinesMarkers)
        .name("Silhouette");

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(
        Layout::new()
            .title("Silhouette Score by Number of Clusters")
            .x_axis(Axis::new().title("Number of Clusters"))
            .y_axis(Axis::new().title("Silhouette Score")),
    );
    Ok(plot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn profile_plot_checks_width() {
        let vocab = Vocabulary::from_labels(vec!["a".to_string(), "b".to_string()]).unwrap();
        assert!(plot_cluster_profiles(&array![[0.1, 0.2], [0.3, 0.4]], &vocab).is_ok());
        assert!(plot_cluster_profiles(&array![[0.1, 0.2, 0.3]], &vocab).is_err());
    }

    #[test]
    fn size_plot_rejects_out_of_range_labels() {
        assert!(plot_cluster_sizes(&[0, 1, 1], 2).is_ok());
        assert!(plot_cluster_sizes(&[0, 2], 2).is_err());
    }

    #[test]
    fn sweep_plot_needs_scores() {
        assert!(plot_silhouette_sweep(&[]).is_err());
        let scores = [CandidateScore {
            n_clusters: 4,
            score: 0.3,
        }];
        let html = plot_silhouette_sweep(&scores).unwrap().to_inline_html(Some("sweep"));
        assert!(html.contains("Silhouette"));
    }
}
