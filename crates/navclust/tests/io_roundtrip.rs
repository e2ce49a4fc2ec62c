use std::io::Write;

use navclust::io::{read_sequences, write_centers, write_labels};
use navclust::vocabulary::Vocabulary;
use ndarray::Array2;

#[test]
fn reads_msnbc_style_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "% Different categories found in input file:\n\n% Sequences:\n\n1 1 \n2 \n3 2 2 4 2 2 2 3 3 \n").unwrap();
    file.flush().unwrap();
    let sessions = read_sequences(file.path()).unwrap();
    assert_eq!(sessions, vec![vec![1, 1], vec![2], vec![3, 2, 2, 4, 2, 2, 2, 3, 3]]);
}

#[test]
fn uncommented_header_fails_to_parse() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "frontpage news tech").unwrap();
    writeln!(file, "1 2 3").unwrap();
    file.flush().unwrap();
    let err = read_sequences(file.path()).unwrap_err();
    assert!(format!("{:#}", err).contains("line 1"));
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_sequences(dir.path().join("missing.seq")).unwrap_err();
    assert!(err.to_string().contains("missing.seq"));
}

#[test]
fn writes_centers_and_labels() {
    let dir = tempfile::tempdir().unwrap();
    let vocab = Vocabulary::msnbc();
    let centers = Array2::<f64>::zeros((2, vocab.len()));
    write_centers(&centers, vocab.labels(), dir.path().join("centers.tsv")).unwrap();
    write_labels(&[0, 1, 1], dir.path().join("labels.tsv")).unwrap();

    let centers = std::fs::read_to_string(dir.path().join("centers.tsv")).unwrap();
    assert!(centers.starts_with("cluster\tfrontpage\tnews"));
    assert_eq!(centers.lines().count(), 3);
    let labels = std::fs::read_to_string(dir.path().join("labels.tsv")).unwrap();
    assert_eq!(labels.lines().count(), 4);
}
