// src/data_input/record.rs

use crate::constants::{K_TO_DEGC, PA_TO_BAR, S_TO_MIN};
use crate::errors::AnalysisError;
use crate::types::{AnalysisResult, ChannelArray};

/// Identifies one extractable channel, including its unit-converted views.
///
/// The set is closed: channel dispatch is an exhaustive match, and the only
/// place an unknown channel can surface is `from_name` at the string
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Time,
    TimeInMin,
    TempReactor,
    TempReactorInC,
    TempHotPlate,
    TempHotPlateInC,
    Overpressure,
    OverpressureInBar,
    Rotation,
}

impl ChannelKind {
    pub fn from_name(name: &str) -> AnalysisResult<Self> {
        match name {
            "Time" => Ok(Self::Time),
            "Time_in_min" => Ok(Self::TimeInMin),
            "T_Reactor" => Ok(Self::TempReactor),
            "T_Reactor_in_C" => Ok(Self::TempReactorInC),
            "T_HotPlate" => Ok(Self::TempHotPlate),
            "T_HotPlate_in_C" => Ok(Self::TempHotPlateInC),
            "P_Reactor" => Ok(Self::Overpressure),
            "P_Reactor_in_bar" => Ok(Self::OverpressureInBar),
            "Rot" => Ok(Self::Rotation),
            _ => Err(AnalysisError::ChannelNotFound(name.to_string())),
        }
    }
}

/// One extracted channel: samples plus the axis label and unit for display.
#[derive(Debug, Clone)]
pub struct Channel {
    pub data: ChannelArray,
    pub label: &'static str,
    pub unit: &'static str,
}

/// One autoclave run, fully materialized in memory.
///
/// All channels share a common sample index; equal lengths are validated at
/// construction. The record is never mutated after loading: every derived or
/// converted series is a computed copy.
#[derive(Debug, Clone)]
pub struct ExperimentRecord {
    pub name: String,
    pub metadata: Vec<(String, String)>,
    pub time: ChannelArray,         // seconds
    pub temp_reactor: ChannelArray, // Kelvin
    pub temp_hotplate: ChannelArray, // Kelvin
    pub overpressure: ChannelArray, // Pascal
    pub rotation: ChannelArray,     // rpm
}

impl ExperimentRecord {
    pub fn new(
        name: String,
        metadata: Vec<(String, String)>,
        time: ChannelArray,
        temp_reactor: ChannelArray,
        temp_hotplate: ChannelArray,
        overpressure: ChannelArray,
        rotation: ChannelArray,
    ) -> AnalysisResult<Self> {
        let expected = time.len();
        for (channel, len) in [
            ("T_Reactor", temp_reactor.len()),
            ("T_HotPlate", temp_hotplate.len()),
            ("P_Reactor", overpressure.len()),
            ("Rot", rotation.len()),
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
            name,
            metadata,
            time,
            temp_reactor,
            temp_hotplate,
            overpressure,
            rotation,
        })
    }

    /// Number of samples per channel.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// First metadata value stored under `key`, if any.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Extracts a channel, applying the unit conversion the kind asks for.
    /// Conversions are computed on demand; the stored channels stay in the
    /// instrument's raw units.
    pub fn channel(&self, kind: ChannelKind) -> Channel {
        match kind {
            ChannelKind::Time => Channel {
                data: self.time.clone(),
                label: "t",
                unit: "s",
            },
            ChannelKind::TimeInMin => Channel {
                data: &self.time / S_TO_MIN,
                label: "t",
                unit: "min",
            },
            ChannelKind::TempReactor => Channel {
                data: self.temp_reactor.clone(),
                label: "T",
                unit: "K",
            },
            ChannelKind::TempReactorInC => Channel {
                data: self.temp_reactor.mapv(|t| t - K_TO_DEGC),
                label: "T",
                unit: "°C",
            },
            ChannelKind::TempHotPlate => Channel {
                data: self.temp_hotplate.clone(),
                label: "T",
                unit: "K",
            },
            ChannelKind::TempHotPlateInC => Channel {
                data: self.temp_hotplate.mapv(|t| t - K_TO_DEGC),
                label: "T",
                unit: "°C",
            },
            ChannelKind::Overpressure => Channel {
                data: self.overpressure.clone(),
                label: "P",
                unit: "Pa",
            },
            ChannelKind::OverpressureInBar => Channel {
                data: &self.overpressure / PA_TO_BAR,
                label: "P",
                unit: "bar",
            },
            ChannelKind::Rotation => Channel {
                data: self.rotation.clone(),
                label: "v",
                unit: "rpm",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn record() -> ExperimentRecord {
        ExperimentRecord::new(
            "run".to_string(),
            vec![("area".to_string(), "0.196 cm^2".to_string())],
            array![0.0, 60.0, 120.0],
            array![293.15, 373.15, 473.15],
            array![298.15, 378.15, 478.15],
            array![0.0, 1.0e5, 2.5e5],
            array![0.0, 400.0, 400.0],
        )
        .unwrap()
    }

    #[test]
    fn converts_time_to_minutes() {
        let ch = record().channel(ChannelKind::TimeInMin);
        assert_eq!(ch.unit, "min");
        assert_eq!(ch.data, array![0.0, 1.0, 2.0]);
    }

    #[test]
    fn converts_kelvin_to_celsius() {
        let ch = record().channel(ChannelKind::TempReactorInC);
        assert_eq!(ch.unit, "°C");
        assert!((ch.data[1] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn converts_pascal_to_bar() {
        let ch = record().channel(ChannelKind::OverpressureInBar);
        assert_eq!(ch.unit, "bar");
        assert!((ch.data[2] - 2.5).abs() < 1e-12);
    }

    #[test]
    fn raw_channels_are_untouched_by_conversion() {
        let rec = record();
        let _ = rec.channel(ChannelKind::TempReactorInC);
        assert_eq!(rec.temp_reactor, array![293.15, 373.15, 473.15]);
    }

    #[test]
    fn unknown_channel_name_is_an_error() {
        let err = ChannelKind::from_name("T_Oven").unwrap_err();
        assert!(matches!(err, AnalysisError::ChannelNotFound(ref name) if name == "T_Oven"));
    }

    #[test]
    fn mismatched_channel_lengths_are_rejected() {
        let err = ExperimentRecord::new(
            "bad".to_string(),
            Vec::new(),
            array![0.0, 1.0],
            array![293.15],
            array![293.15, 294.15],
            array![0.0, 0.0],
            array![0.0, 0.0],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::ChannelLengthMismatch {
                channel: "T_Reactor",
                expected: 2,
                actual: 1,
            }
        ));
    }

    #[test]
    fn property_lookup() {
        assert_eq!(record().property("area"), Some("0.196 cm^2"));
        assert_eq!(record().property("operator"), None);
    }
}
