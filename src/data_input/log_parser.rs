// src/data_input/log_parser.rs

use csv::ReaderBuilder;
use log::{debug, warn};
use ndarray::Array1;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::data_input::record::ExperimentRecord;
use crate::errors::AnalysisError;
use crate::types::AnalysisResult;

/// Required channel columns of the DAQ channel export, in file order.
const TARGET_HEADERS: [&str; 5] = [
    "Time (s)",
    "T_Reactor (K)",
    "T_HotPlate (K)",
    "P_Reactor (Pa)",
    "Rot (rpm)",
];

/// Reads one exported synthesis log and materializes its channels.
///
/// The export starts with `key,value` metadata lines (the DAQ writes at
/// least a `name` property), followed by the channel header row and the
/// sample rows. The whole file is read in one shot; experiment logs are
/// small enough that streaming would buy nothing.
///
/// Rows with unparseable samples are skipped with a warning so that all
/// channels keep a common sample index.
pub fn parse_log_file(input_file_path: &Path) -> AnalysisResult<ExperimentRecord> {
    let open_err = |source| AnalysisError::FileAccess {
        path: input_file_path.to_path_buf(),
        source,
    };
    let file = File::open(input_file_path).map_err(open_err)?;
    let reader = BufReader::new(file);

    // First pass: split the file into metadata lines and the CSV table.
    let mut metadata: Vec<(String, String)> = Vec::new();
    let mut csv_lines: Vec<String> = Vec::new();
    let mut found_headers = false;
    for line_result in reader.lines() {
        let line = line_result.map_err(|source| AnalysisError::FileAccess {
            path: input_file_path.to_path_buf(),
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if !found_headers && trimmed.contains("Time") && trimmed.contains("T_Reactor") {
            found_headers = true;
            csv_lines.push(line);
            continue;
        }

        if found_headers {
            csv_lines.push(line);
        } else {
            // Metadata lines are key,value pairs, possibly quoted.
            let mut rdr = ReaderBuilder::new()
                .has_headers(false)
                .from_reader(trimmed.as_bytes());
            if let Some(Ok(record)) = rdr.records().next() {
                if record.len() >= 2 {
                    let key = record.get(0).unwrap_or("").trim().to_string();
                    let value = record.get(1).unwrap_or("").trim().to_string();
                    if !key.is_empty() {
                        metadata.push((key, value));
                    }
                }
            }
        }
    }

    if !found_headers {
        return Err(AnalysisError::DataQuality(format!(
            "no channel header row found in {}",
            input_file_path.display()
        )));
    }

    // Second pass: map the required headers to column indices and collect
    // the samples channel by channel.
    let csv_content = csv_lines.join("\n");
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(csv_content.as_bytes());
    let header_record = reader.headers()?.clone();

    let mut indices = [0usize; 5];
    for (slot, target) in TARGET_HEADERS.iter().enumerate() {
        indices[slot] = header_record
            .iter()
            .position(|h| h == *target)
            .ok_or_else(|| AnalysisError::ChannelNotFound((*target).to_string()))?;
    }

    let mut channels: [Vec<f64>; 5] = Default::default();
    for (row_idx, record_result) in reader.records().enumerate() {
        let record = record_result?;
        let mut row = [0.0f64; 5];
        let mut complete = true;
        for (slot, &col) in indices.iter().enumerate() {
            match record.get(col).and_then(|v| v.parse::<f64>().ok()) {
                Some(v) => row[slot] = v,
                None => {
                    complete = false;
                    break;
                }
            }
        }
        if complete {
            for (slot, &v) in row.iter().enumerate() {
                channels[slot].push(v);
            }
        } else {
            warn!(
                "{}: skipping row {} with missing or unparseable samples",
                input_file_path.display(),
                row_idx + 1
            );
        }
    }

    let name = metadata
        .iter()
        .find(|(k, _)| k == "name")
        .map(|(_, v)| v.clone())
        .unwrap_or_else(|| {
            input_file_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
    debug!(
        "parsed {} samples for '{}' ({} metadata entries)",
        channels[0].len(),
        name,
        metadata.len()
    );

    let [time, temp_reactor, temp_hotplate, overpressure, rotation] = channels;
    ExperimentRecord::new(
        name,
        metadata,
        Array1::from(time),
        Array1::from(temp_reactor),
        Array1::from(temp_hotplate),
        Array1::from(overpressure),
        Array1::from(rotation),
    )
}

// src/data_input/log_parser.rs
