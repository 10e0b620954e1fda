// src/data_analysis/electrochem.rs

use crate::data_analysis::regression::linear_fit;
use crate::errors::AnalysisError;
use crate::types::{AnalysisResult, ChannelArray};

/// One rotation-tagged cyclic voltammogram: a potential axis shared by the
/// forward ("pos") and reverse ("neg") current traces.
#[derive(Debug, Clone)]
pub struct CvSeries {
    pub potential: ChannelArray,   // V
    pub current_pos: ChannelArray, // A
    pub current_neg: ChannelArray, // A
    pub rotation: f64,             // rpm
    /// Electrode area in cm², when known; required for area normalization.
    pub area: Option<f64>,
}

impl CvSeries {
    pub fn new(
        potential: ChannelArray,
        current_pos: ChannelArray,
        current_neg: ChannelArray,
        rotation: f64,
    ) -> AnalysisResult<Self> {
        let expected = potential.len();
        for (channel, len) in [
            ("current_pos", current_pos.len()),
            ("current_neg", current_neg.len()),
        ] {
            if len != expected {
                return Err(AnalysisError::ChannelLengthMismatch {
                    channel,
                    expected,
                    actual: len,
                });
            }
        }
        Ok(Self {
            potential,
            current_pos,
            current_neg,
            rotation,
            area: None,
        })
    }

    pub fn with_area(mut self, area: f64) -> Self {
        self.area = Some(area);
        self
    }

    /// Index of the sample whose potential lies closest to `epot`.
    pub fn index_of_potential(&self, epot: f64) -> AnalysisResult<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &e) in self.potential.iter().enumerate() {
            let dist = (e - epot).abs();
            match best {
                Some((_, d)) if d <= dist => {}
                _ => best = Some((i, dist)),
            }
        }
        best.map(|(i, _)| i).ok_or_else(|| {
            AnalysisError::DataQuality("CV series has an empty potential axis".to_string())
        })
    }

    /// Forward and reverse currents at the sample closest to `epot`.
    pub fn current_at(&self, epot: f64) -> AnalysisResult<(f64, f64)> {
        let idx = self.index_of_potential(epot)?;
        Ok((self.current_pos[idx], self.current_neg[idx]))
    }

    /// Copy of this series with currents scaled to current density by the
    /// electrode area. The original series is left untouched.
    pub fn normalized_by_area(&self) -> AnalysisResult<CvSeries> {
        let area = self.area.ok_or_else(|| {
            AnalysisError::DataQuality(format!(
                "CV series at {} rpm has no electrode area to normalize by",
                self.rotation
            ))
        })?;
        let mut normalized = self.clone();
        normalized.current_pos = &self.current_pos / area;
        normalized.current_neg = &self.current_neg / area;
        Ok(normalized)
    }
}

/// Per-direction results of a rotation-series fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalFit {
    pub pos: f64,
    pub neg: f64,
}

/// Tafel fit of one series' forward sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TafelFit {
    pub rotation: f64,
    /// Fitted slope in decades per volt.
    pub slope: f64,
    /// Reciprocal slope in the conventional mV/decade units.
    pub mv_per_decade: f64,
}

/// Levich analysis: fits the current at `epot` against sqrt(rotation) for
/// each sweep direction. The slopes are the Levich constants B.
pub fn levich(
    series: &[CvSeries],
    epot: f64,
    normalize_by_area: bool,
) -> AnalysisResult<DirectionalFit> {
    let batch = prepared(series, normalize_by_area)?;
    let (x, y_pos, y_neg) = rotation_points(&batch, epot, f64::sqrt)?;
    let (m_pos, _) = linear_fit(&x, &y_pos)?;
    let (m_neg, _) = linear_fit(&x, &y_neg)?;
    Ok(DirectionalFit {
        pos: m_pos,
        neg: m_neg,
    })
}

/// Koutecky-Levich analysis: fits 1/current at `epot` against
/// 1/sqrt(rotation). By convention the reported B is the reciprocal slope.
pub fn koutecky_levich(
    series: &[CvSeries],
    epot: f64,
    normalize_by_area: bool,
) -> AnalysisResult<DirectionalFit> {
    let batch = prepared(series, normalize_by_area)?;
    let (x, y_pos, y_neg) = rotation_points(&batch, epot, |rot| 1.0 / rot.sqrt())?;
    let inv_pos: Vec<f64> = y_pos.iter().map(|&i| 1.0 / i).collect();
    let inv_neg: Vec<f64> = y_neg.iter().map(|&i| 1.0 / i).collect();
    let (m_pos, _) = linear_fit(&x, &inv_pos)?;
    let (m_neg, _) = linear_fit(&x, &inv_neg)?;
    if m_pos == 0.0 || m_neg == 0.0 {
        return Err(AnalysisError::DegenerateRegression(
            "Koutecky-Levich slope is zero, B undefined".to_string(),
        ));
    }
    Ok(DirectionalFit {
        pos: 1.0 / m_pos,
        neg: 1.0 / m_neg,
    })
}

/// Tafel analysis over the forward sweep of each series.
///
/// The diffusion-limited current is read at `e_for_idl`; the kinetic
/// current `1/(1/i - 1/i_dl)` is log-linearized and fitted against the
/// potential over the window bounded by `lims`.
pub fn tafel(
    series: &[CvSeries],
    e_for_idl: f64,
    lims: (f64, f64),
    normalize_by_area: bool,
) -> AnalysisResult<Vec<TafelFit>> {
    let batch = prepared(series, normalize_by_area)?;
    if batch.is_empty() {
        return Err(AnalysisError::DegenerateRegression(
            "Tafel analysis needs at least one CV series".to_string(),
        ));
    }

    let mut fits = Vec::with_capacity(batch.len());
    for cv in &batch {
        let (i_dl, _) = cv.current_at(e_for_idl)?;
        let lo = cv.index_of_potential(lims.0.min(lims.1))?;
        let hi = cv.index_of_potential(lims.0.max(lims.1))?;
        // The potential axis may run in either direction.
        let (lo, hi) = (lo.min(hi), lo.max(hi));
        if hi - lo < 1 {
            return Err(AnalysisError::DegenerateRegression(format!(
                "Tafel window [{}, {}] V covers fewer than 2 samples",
                lims.0, lims.1
            )));
        }

        let mut e = Vec::with_capacity(hi - lo + 1);
        let mut y = Vec::with_capacity(hi - lo + 1);
        for idx in lo..=hi {
            let i = cv.current_pos[idx];
            let kinetic = 1.0 / (1.0 / i - 1.0 / i_dl);
            let log_i = kinetic.abs().log10();
            if !log_i.is_finite() {
                return Err(AnalysisError::DataQuality(format!(
                    "non-finite Tafel ordinate at E = {} V (i = {}, i_dl = {})",
                    cv.potential[idx], i, i_dl
                )));
            }
            e.push(cv.potential[idx]);
            y.push(log_i);
        }

        let (slope, _) = linear_fit(&e, &y)?;
        if slope == 0.0 {
            return Err(AnalysisError::DegenerateRegression(
                "Tafel slope is zero, mV/decade undefined".to_string(),
            ));
        }
        fits.push(TafelFit {
            rotation: cv.rotation,
            slope,
            mv_per_decade: 1000.0 / slope,
        });
    }
    Ok(fits)
}

// Copies the batch before analysis so per-series normalization can never
// alias the caller's data.
fn prepared(series: &[CvSeries], normalize_by_area: bool) -> AnalysisResult<Vec<CvSeries>> {
    if normalize_by_area {
        series.iter().map(CvSeries::normalized_by_area).collect()
    } else {
        Ok(series.to_vec())
    }
}

// Builds the regression points of a rotation-series analysis: the derived
// independent variable plus the per-direction currents read at `epot`.
fn rotation_points(
    batch: &[CvSeries],
    epot: f64,
    x_of_rotation: impl Fn(f64) -> f64,
) -> AnalysisResult<(Vec<f64>, Vec<f64>, Vec<f64>)> {
    if batch.len() < 2 {
        return Err(AnalysisError::DegenerateRegression(format!(
            "need at least 2 rotation speeds, got {}",
            batch.len()
        )));
    }
    let mut x = Vec::with_capacity(batch.len());
    let mut y_pos = Vec::with_capacity(batch.len());
    let mut y_neg = Vec::with_capacity(batch.len());
    for cv in batch {
        if cv.rotation <= 0.0 {
            return Err(AnalysisError::DegenerateRegression(format!(
                "rotation speed must be positive, got {}",
                cv.rotation
            )));
        }
        let (i_p, i_n) = cv.current_at(epot)?;
        x.push(x_of_rotation(cv.rotation));
        y_pos.push(i_p);
        y_neg.push(i_n);
    }
    Ok((x, y_pos, y_neg))
}
