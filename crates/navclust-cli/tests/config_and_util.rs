//! Integration tests for train config parsing and validation.

use navclust::config::ModelType;
use navclust_cli::train::input::{load_train_config, validate_data_file, TrainConfig};

// ---------------------------------------------------------------------------
// validate_data_file
// ---------------------------------------------------------------------------

#[test]
fn validate_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("msnbc990928.seq");
    std::fs::File::create(&path).unwrap();
    assert!(validate_data_file(path.to_str().unwrap()).is_ok());
}

#[test]
fn validate_empty_path_errors() {
    assert!(validate_data_file("").is_err());
}

#[test]
fn validate_nonexistent_file_errors() {
    assert!(validate_data_file("/nonexistent/path/sessions.seq").is_err());
}

#[test]
fn validate_directory_errors() {
    let dir = tempfile::tempdir().unwrap();
    assert!(validate_data_file(dir.path().to_str().unwrap()).is_err());
}

// ---------------------------------------------------------------------------
// TrainConfig defaults & serialization
// ---------------------------------------------------------------------------

#[test]
fn train_config_default_values() {
    let cfg = TrainConfig::default();
    assert_eq!(cfg.n_clusters, 8);
    assert!(cfg.sweep);
    assert!(cfg.report);
    assert_eq!(cfg.max_rows, Some(30_000));
    assert_eq!(cfg.cluster_range.min, 4);
    assert_eq!(cfg.cluster_range.max, 12);
    assert_eq!(cfg.filter.min_sequence_length, 3);
    assert!(matches!(
        cfg.model.model_type,
        ModelType::MiniBatchKMeans { batch_size: 8192, .. }
    ));
}

#[test]
fn train_config_round_trips_through_json() {
    let cfg = TrainConfig::default();
    let json = serde_json::to_string_pretty(&cfg).unwrap();
    let back: TrainConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.model, cfg.model);
    assert_eq!(back.cluster_range, cfg.cluster_range);
    assert_eq!(back.output_dir, cfg.output_dir);
}

#[test]
fn partial_config_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"data_file": "sessions.seq", "n_clusters": 5, "filter": {"min_sequence_length": 2}}"#,
    )
    .unwrap();

    let cfg = load_train_config(&path).unwrap();
    assert_eq!(cfg.data_file, "sessions.seq");
    assert_eq!(cfg.n_clusters, 5);
    assert_eq!(cfg.filter.min_sequence_length, 2);
    assert!((cfg.filter.max_category_ratio - 0.9).abs() < 1e-12);
    assert_eq!(cfg.comment_marker, "%");
}

#[test]
fn malformed_config_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = load_train_config(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config"));
}

#[test]
fn custom_categories_build_vocabulary() {
    let cfg = TrainConfig {
        categories: Some(vec!["home".to_string(), "cart".to_string()]),
        ..TrainConfig::default()
    };
    let vocab = cfg.vocabulary().unwrap();
    assert_eq!(vocab.len(), 2);
    assert_eq!(TrainConfig::default().vocabulary().unwrap().len(), 17);
}
