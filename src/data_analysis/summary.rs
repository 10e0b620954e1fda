// src/data_analysis/summary.rs

use ndarray_stats::QuantileExt;

use crate::constants::{OUTLIER_THRESHOLD, OUTLIER_WINDOW_SIZE, SET_TEMPERATURE_STEP};
use crate::data_analysis::outlier::clean_outliers;
use crate::data_analysis::smoothing::primary_smooth;
use crate::data_input::record::{ChannelKind, ExperimentRecord};
use crate::errors::AnalysisError;
use crate::types::{AnalysisResult, ChannelArray, SummaryRows};

/// Scalar metrics derived from one synthesis run. Field order mirrors the
/// published table order; units are baked into the row names.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryParameters {
    pub set_temperature: f64,
    pub max_temperature: f64,
    pub time_to_set_temperature: f64,
    pub heating_rate: f64,
    pub max_overpressure: f64,
    pub time_to_max_overpressure: f64,
    pub pressure_rise_rate: f64,
    pub rotation_rate: f64,
    pub total_time: f64,
}

impl SummaryParameters {
    /// Ordered (name, value) rows for tabular display.
    pub fn rows(&self) -> SummaryRows {
        vec![
            ("Set Temperature [°C]", self.set_temperature),
            ("Max Temperature of Reactor [°C]", self.max_temperature),
            ("Time to Set Temperature [min]", self.time_to_set_temperature),
            ("Heating Rate [°C/min]", self.heating_rate),
            ("Max Overpressure [bar]", self.max_overpressure),
            ("Time to Max Overpressure [min]", self.time_to_max_overpressure),
            ("Pressure Increase Rate [bar/min]", self.pressure_rise_rate),
            ("Rotation Rate [rpm]", self.rotation_rate),
            ("Time of Synthesis [min]", self.total_time),
        ]
    }
}

/// Nearest multiple-of-25 reactor set point for an observed peak
/// temperature. Ties round half-to-even: a peak of 112.5 °C resolves to
/// 100 °C, one of 137.5 °C to 150 °C.
pub fn set_temperature_for(max_temperature: f64) -> f64 {
    (max_temperature / SET_TEMPERATURE_STEP).round_ties_even() * SET_TEMPERATURE_STEP
}

/// First timestamp at which `series` reaches `level`. Runs that never reach
/// the level report the final timestamp instead, so the metric is always
/// defined.
pub fn time_to_reach(time: &ChannelArray, series: &ChannelArray, level: f64) -> f64 {
    for (i, &value) in series.iter().enumerate() {
        if value >= level {
            return time[i];
        }
    }
    time.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Derives the summary metrics of one run from its channels.
///
/// Expects time in minutes, temperature in °C and pressure in bar; the
/// channels must share one sample index (see `ExperimentRecord`). The
/// reactor temperature is outlier-cleaned and smoothed first; pressure,
/// rotation and time enter the metrics raw. Deterministic: identical
/// channels always produce identical rows.
pub fn summarize(
    time: &ChannelArray,
    temp_reactor: &ChannelArray,
    overpressure: &ChannelArray,
    rotation: &ChannelArray,
) -> AnalysisResult<SummaryParameters> {
    let cleaned = clean_outliers(temp_reactor, OUTLIER_WINDOW_SIZE, OUTLIER_THRESHOLD);
    let smoothed = primary_smooth(&cleaned)?;
    if smoothed.is_empty() || smoothed.iter().all(|v| v.is_nan()) {
        return Err(AnalysisError::DataQuality(
            "smoothed temperature series is empty or all-NaN".to_string(),
        ));
    }

    let max_temperature = round2(smoothed.iter().copied().fold(f64::NEG_INFINITY, f64::max));
    let set_temperature = set_temperature_for(max_temperature);

    let time_to_set = time_to_reach(time, &smoothed, set_temperature);
    if time_to_set == 0.0 {
        return Err(AnalysisError::DataQuality(
            "set temperature reached at time 0, heating rate undefined".to_string(),
        ));
    }
    let heating_rate = round2((set_temperature - smoothed[0]) / time_to_set);

    let max_overpressure = round2(
        overpressure
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max),
    );
    let argmax_pressure = overpressure.argmax().map_err(|_| {
        AnalysisError::DataQuality("overpressure series is empty or contains NaN".to_string())
    })?;
    let time_to_max_overpressure = round2(time[argmax_pressure]);
    if time_to_max_overpressure == 0.0 {
        return Err(AnalysisError::DataQuality(
            "maximum overpressure at time 0, rise rate undefined".to_string(),
        ));
    }
    let pressure_rise_rate =
        round2((max_overpressure - overpressure[0]) / time_to_max_overpressure);

    let rotation_rate = rotation
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max)
        .trunc();
    let total_time = round2(time.iter().copied().fold(f64::NEG_INFINITY, f64::max));

    Ok(SummaryParameters {
        set_temperature,
        max_temperature,
        time_to_set_temperature: round2(time_to_set),
        heating_rate,
        max_overpressure,
        time_to_max_overpressure,
        pressure_rise_rate,
        rotation_rate,
        total_time,
    })
}

/// Summary metrics of a loaded record, with the channels converted to the
/// table units (minutes, °C, bar) first.
pub fn summarize_record(record: &ExperimentRecord) -> AnalysisResult<SummaryParameters> {
    let time = record.channel(ChannelKind::TimeInMin);
    let temp = record.channel(ChannelKind::TempReactorInC);
    let pressure = record.channel(ChannelKind::OverpressureInBar);
    let rotation = record.channel(ChannelKind::Rotation);
    summarize(&time.data, &temp.data, &pressure.data, &rotation.data)
}

// Two-decimal rounding with the same tie handling as the set-point step.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
