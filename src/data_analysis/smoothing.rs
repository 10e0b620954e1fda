// src/data_analysis/smoothing.rs

use log::debug;
use ndarray::Array1;

use crate::constants::{
    OPTIONAL_SMOOTH_POLYORDER, PRIMARY_SMOOTH_POLYORDER, PRIMARY_SMOOTH_WINDOW,
};
use crate::errors::AnalysisError;
use crate::types::{AnalysisResult, ChannelArray};

/// Savitzky-Golay smoothing: a polynomial of `polyorder` is fitted over each
/// centered window by least squares and evaluated at the window center.
///
/// Edge samples, where no full centered window exists, are evaluated from
/// polynomial fits over the first and last full window, so the output always
/// has the input's length. The window must be odd, larger than `polyorder`
/// and no larger than the series; violations are reported as
/// `InvalidSmoothing` instead of being silently swallowed.
pub fn savgol_filter(
    data: &ChannelArray,
    window_length: usize,
    polyorder: usize,
) -> AnalysisResult<ChannelArray> {
    let n = data.len();
    if window_length % 2 == 0 || window_length > n || polyorder >= window_length {
        return Err(AnalysisError::InvalidSmoothing {
            window: window_length,
            len: n,
        });
    }

    let half = window_length / 2;
    let offsets: Vec<f64> = (0..window_length)
        .map(|j| j as f64 - half as f64)
        .collect();
    let samples = data.to_vec();
    let mut smoothed = Array1::zeros(n);

    for i in half..n - half {
        let coeffs = polyfit(&offsets, &samples[i - half..=i + half], polyorder);
        smoothed[i] = coeffs[0]; // polynomial value at offset 0
    }

    // Head and tail: one fit per side over the nearest full window,
    // evaluated at the positions the centered loop cannot reach.
    let head = polyfit(&offsets, &samples[0..window_length], polyorder);
    for i in 0..half {
        smoothed[i] = polyval(&head, i as f64 - half as f64);
    }
    let tail = polyfit(&offsets, &samples[n - window_length..n], polyorder);
    for i in n - half..n {
        smoothed[i] = polyval(&tail, (i + window_length - n) as f64 - half as f64);
    }

    Ok(smoothed)
}

/// Primary temperature smoothing pass with the window clamped per call.
/// Series too short to support any window are returned unchanged.
pub fn primary_smooth(data: &ChannelArray) -> AnalysisResult<ChannelArray> {
    let window = effective_window(PRIMARY_SMOOTH_WINDOW, data.len());
    if window <= 1 {
        debug!(
            "series of length {} too short to smooth, returning raw data",
            data.len()
        );
        return Ok(data.clone());
    }
    let polyorder = PRIMARY_SMOOTH_POLYORDER.min(window - 1);
    savgol_filter(data, window, polyorder)
}

/// User-tunable first-order smoothing pass. A requested window of 0 is a
/// no-op; a requested window larger than the series is clamped. Other
/// invalid windows (even values) propagate as `InvalidSmoothing`.
pub fn optional_smooth(data: &ChannelArray, requested_window: usize) -> AnalysisResult<ChannelArray> {
    let window = effective_window(requested_window, data.len());
    if window <= 1 {
        return Ok(data.clone());
    }
    savgol_filter(data, window, OPTIONAL_SMOOTH_POLYORDER)
}

/// Largest usable window for a series of `len` samples: `min(W, len/2*2+1)`,
/// stepped down where that formula lands one past the end of an even-length
/// series. The result is odd (for odd `requested`) and never exceeds `len`.
fn effective_window(requested: usize, len: usize) -> usize {
    let mut window = requested.min(len / 2 * 2 + 1);
    if window > len {
        window = window.saturating_sub(2);
    }
    window
}

/// Smoothing windows for the display-preparation passes. A window of 0
/// leaves the corresponding channel untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmoothingOptions {
    pub time_smooth: usize,
    pub pressure_smooth: usize,
    pub temp_smooth: usize,
}

impl SmoothingOptions {
    /// Applies the configured passes, returning smoothed copies of the
    /// time, pressure and temperature series in that order.
    pub fn apply(
        &self,
        time: &ChannelArray,
        pressure: &ChannelArray,
        temp: &ChannelArray,
    ) -> AnalysisResult<(ChannelArray, ChannelArray, ChannelArray)> {
        Ok((
            optional_smooth(time, self.time_smooth)?,
            optional_smooth(pressure, self.pressure_smooth)?,
            optional_smooth(temp, self.temp_smooth)?,
        ))
    }
}

// Least-squares polynomial fit via the normal equations. The systems here
// are at most (polyorder + 1) x (polyorder + 1) with polyorder <= 3, so
// Gaussian elimination with partial pivoting is plenty.
fn polyfit(xs: &[f64], ys: &[f64], order: usize) -> Vec<f64> {
    let m = order + 1;
    let mut moments = vec![0.0; 2 * m - 1];
    let mut rhs = vec![0.0; m];
    for (&x, &y) in xs.iter().zip(ys) {
        let mut p = 1.0;
        for (k, moment) in moments.iter_mut().enumerate() {
            *moment += p;
            if k < m {
                rhs[k] += y * p;
            }
            p *= x;
        }
    }

    let mut aug = vec![vec![0.0; m + 1]; m];
    for r in 0..m {
        for c in 0..m {
            aug[r][c] = moments[r + c];
        }
        aug[r][m] = rhs[r];
    }

    for col in 0..m {
        let mut pivot = col;
        for r in col + 1..m {
            if aug[r][col].abs() > aug[pivot][col].abs() {
                pivot = r;
            }
        }
        aug.swap(pivot, col);
        for r in col + 1..m {
            let factor = aug[r][col] / aug[col][col];
            for c in col..=m {
                aug[r][c] -= factor * aug[col][c];
            }
        }
    }

    let mut coeffs = vec![0.0; m];
    for r in (0..m).rev() {
        let mut acc = aug[r][m];
        for c in r + 1..m {
            acc -= aug[r][c] * coeffs[c];
        }
        coeffs[r] = acc / aug[r][r];
    }
    coeffs
}

fn polyval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}
