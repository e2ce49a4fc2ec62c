//! Reader for plain-text session logs.
//!
//! One session per line, whitespace-separated integer category codes. Lines
//! starting with the comment marker (`%` in the MSNBC dump) are skipped, as
//! are lines without any code.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::Session;

/// Configuration for reading session log files.
#[derive(Debug, Clone)]
pub struct SequenceReaderConfig {
    /// Lines starting with this marker are ignored.
    pub comment_marker: String,
}

impl Default for SequenceReaderConfig {
    fn default() -> Self {
        Self {
            comment_marker: "%".to_string(),
        }
    }
}

/// Read a session log using the default configuration.
pub fn read_sequences<P: AsRef<Path>>(path: P) -> Result<Vec<Session>> {
    read_sequences_with_config(path, &SequenceReaderConfig::default())
}

/// Read a session log with a custom comment marker.
pub fn read_sequences_with_config<P: AsRef<Path>>(
    path: P,
    config: &SequenceReaderConfig,
) -> Result<Vec<Session>> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open session file: {}", path.as_ref().display()))?;
    let sessions = parse_sequences(BufReader::new(file), config)
        .with_context(|| format!("Failed to parse session file: {}", path.as_ref().display()))?;
    log::info!(
        "Loaded {} sessions from {}",
        sessions.len(),
        path.as_ref().display()
    );
    Ok(sessions)
}

/// Parse sessions from any buffered reader.
pub fn parse_sequences<R: BufRead>(reader: R, config: &SequenceReaderConfig) -> Result<Vec<Session>> {
    let mut sessions = Vec::new();
    for (line_idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_idx + 1))?;
        if !config.comment_marker.is_empty() && line.starts_with(&config.comment_marker) {
            continue;
        }

        let session = line
            .split_whitespace()
            .map(|token| {
                token.parse::<u32>().map_err(|e| {
                    anyhow!(
                        "Invalid category code '{}' at line {}: {}",
                        token,
                        line_idx + 1,
                        e
                    )
                })
            })
            .collect::<Result<Session>>()?;

        if !session.is_empty() {
            sessions.push(session);
        }
    }
    Ok(sessions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_comments_and_blank_lines() {
        let input = "% Different categories found in input file:\n\
                     % frontpage news tech\n\
                     1 1\n\
                     \n\
                     2\n\
                     3 2 2 4 2 2 2 3 3\n";
        let sessions = parse_sequences(input.as_bytes(), &SequenceReaderConfig::default()).unwrap();
        assert_eq!(
            sessions,
            vec![vec![1, 1], vec![2], vec![3, 2, 2, 4, 2, 2, 2, 3, 3]]
        );
    }

    #[test]
    fn handles_trailing_whitespace() {
        let sessions =
            parse_sequences("6 7 \t\n  8\n".as_bytes(), &SequenceReaderConfig::default()).unwrap();
        assert_eq!(sessions, vec![vec![6, 7], vec![8]]);
    }

    #[test]
    fn invalid_token_reports_line() {
        let err = parse_sequences("1 2\n3 x\n".as_bytes(), &SequenceReaderConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("line 2"), "{}", err);
    }

    #[test]
    fn custom_comment_marker() {
        let config = SequenceReaderConfig {
            comment_marker: "#".to_string(),
        };
        let sessions = parse_sequences("# header\n4 5\n".as_bytes(), &config).unwrap();
        assert_eq!(sessions, vec![vec![4, 5]]);
    }
}
