// src/data_analysis/regression.rs

use crate::errors::AnalysisError;
use crate::types::AnalysisResult;

/// Ordinary least-squares fit of `y = slope * x + intercept`.
///
/// Degenerate inputs (fewer than two points, mismatched lengths, zero
/// spread of the independent variable, non-finite samples) are rejected
/// instead of being allowed to produce NaN or infinite coefficients.
pub fn linear_fit(x: &[f64], y: &[f64]) -> AnalysisResult<(f64, f64)> {
    if x.len() != y.len() {
        return Err(AnalysisError::DegenerateRegression(format!(
            "length mismatch: {} x-values vs {} y-values",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(AnalysisError::DegenerateRegression(format!(
            "need at least 2 points, got {}",
            x.len()
        )));
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(AnalysisError::DegenerateRegression(
            "non-finite sample in regression input".to_string(),
        ));
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let sxx: f64 = x.iter().map(|&v| (v - mean_x).powi(2)).sum();
    if sxx == 0.0 {
        return Err(AnalysisError::DegenerateRegression(
            "independent variable has zero spread".to_string(),
        ));
    }
    let sxy: f64 = x
        .iter()
        .zip(y)
        .map(|(&xv, &yv)| (xv - mean_x) * (yv - mean_y))
        .sum();

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    Ok((slope, intercept))
}
