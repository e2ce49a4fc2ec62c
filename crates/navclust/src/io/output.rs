//! Tab-separated writers for clustering results.
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use ndarray::Array2;

use crate::selection::CandidateScore;

fn tsv_writer(path: &Path) -> Result<csv::Writer<BufWriter<File>>> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {:?}", path))?;
    Ok(csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(BufWriter::new(file)))
}

/// Write cluster centers: one row per cluster, one column per category label.
pub fn write_centers<P: AsRef<Path>>(centers: &Array2<f64>, labels: &[String], path: P) -> Result<()> {
    let path = path.as_ref();
    anyhow::ensure!(
        labels.len() == centers.ncols(),
        "{} category labels given for {} center columns",
        labels.len(),
        centers.ncols()
    );

    let mut writer = tsv_writer(path)?;
    let mut header = vec!["cluster".to_string()];
    header.extend(labels.iter().cloned());
    writer.write_record(&header)?;

    for (k, center) in centers.rows().into_iter().enumerate() {
        let mut record = vec![k.to_string()];
        record.extend(center.iter().map(|v| format!("{:.6}", v)));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write one `(row, cluster)` record per labeled row.
pub fn write_labels<P: AsRef<Path>>(labels: &[usize], path: P) -> Result<()> {
    let mut writer = tsv_writer(path.as_ref())?;
    writer.write_record(["row", "cluster"])?;
    for (row, label) in labels.iter().enumerate() {
        writer.write_record(&[row.to_string(), label.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the silhouette score of every evaluated cluster count.
pub fn write_cluster_scores<P: AsRef<Path>>(scores: &[CandidateScore], path: P) -> Result<()> {
    let mut writer = tsv_writer(path.as_ref())?;
    writer.write_record(["n_clusters", "silhouette"])?;
    for score in scores {
        writer.write_record(&[score.n_clusters.to_string(), format!("{:.6}", score.score)])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn centers_have_labeled_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("centers.tsv");
        let centers = array![[0.5, -1.0], [2.0, 0.25]];
        write_centers(&centers, &["news".to_string(), "tech".to_string()], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "cluster\tnews\ttech");
        assert_eq!(lines[1], "0\t0.500000\t-1.000000");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn centers_label_count_must_match() {
        let dir = tempfile::tempdir().unwrap();
        let centers = array![[0.5, -1.0]];
        assert!(write_centers(&centers, &["news".to_string()], dir.path().join("c.tsv")).is_err());
    }

    #[test]
    fn labels_and_scores_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let labels_path = dir.path().join("labels.tsv");
        write_labels(&[1, 0, 1], &labels_path).unwrap();
        let labels = std::fs::read_to_string(&labels_path).unwrap();
        assert_eq!(labels.lines().nth(3), Some("2\t1"));

        let scores_path = dir.path().join("scores.tsv");
        let scores = [CandidateScore {
            n_clusters: 4,
            score: 0.125,
        }];
        write_cluster_scores(&scores, &scores_path).unwrap();
        let scores = std::fs::read_to_string(&scores_path).unwrap();
        assert_eq!(scores.lines().nth(1), Some("4\t0.125000"));
    }
}
