// src/data_analysis/outlier.rs

use ndarray::s;

use crate::types::ChannelArray;

/// Replaces samples that deviate from their local neighborhood by more than
/// `threshold` standard deviations with the neighborhood mean.
///
/// The window for index i is `[i - w/2, i + w/2)` clamped to the array
/// bounds, so windows near the edges are shorter; there is no padding and no
/// wraparound. The standard deviation is the population one (ddof = 0). A
/// window that degenerates to a single constant value has std = 0, so any
/// sample differing from that value gets replaced regardless of the
/// threshold. The input is never mutated; the result has the input's length.
pub fn clean_outliers(data: &ChannelArray, window_size: usize, threshold: f64) -> ChannelArray {
    let mut cleaned = data.clone();
    let half_window = window_size / 2;
    let n = data.len();

    for i in 0..n {
        let start = i.saturating_sub(half_window);
        let end = (i + half_window).min(n);
        let window = data.slice(s![start..end]);

        // An empty window yields NaN statistics; the comparison below is
        // then false and the sample is kept as-is.
        let count = window.len() as f64;
        let mean = window.sum() / count;
        let std = (window.mapv(|v| (v - mean).powi(2)).sum() / count).sqrt();

        if (data[i] - mean).abs() > threshold * std {
            cleaned[i] = mean;
        }
    }

    cleaned
}
