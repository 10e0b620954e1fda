// src/types.rs
// Shared type aliases used across data input and analysis.

use ndarray::Array1;

use crate::errors::AnalysisError;

/// Samples of one named channel.
pub type ChannelArray = Array1<f64>;

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Ordered (metric name, value) rows of a summary table.
pub type SummaryRows = Vec<(&'static str, f64)>;
