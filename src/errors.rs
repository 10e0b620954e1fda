// src/errors.rs

use std::path::PathBuf;

use thiserror::Error;

/// Errors of the analysis pipeline. All of them are local to one record or
/// one analysis call; there is no global error state and no retry.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("cannot read experiment log {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("channel '{0}' not found")]
    ChannelNotFound(String),

    #[error("data quality: {0}")]
    DataQuality(String),

    #[error("degenerate regression input: {0}")]
    DegenerateRegression(String),

    #[error("smoothing window {window} invalid for series of length {len}")]
    InvalidSmoothing { window: usize, len: usize },

    #[error("channel '{channel}' has {actual} samples, expected {expected}")]
    ChannelLengthMismatch {
        channel: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("malformed log table: {0}")]
    Csv(#[from] csv::Error),
}
