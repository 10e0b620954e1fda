// tests/summary_pipeline_test.rs
// End-to-end: exported log file -> ExperimentRecord -> summary table.

use std::io::Write;

use autoclave_analysis::data_analysis::summary::summarize_record;
use autoclave_analysis::data_input::log_parser::parse_log_file;
use autoclave_analysis::data_input::metadata::extract_value_unit;
use autoclave_analysis::data_input::record::ChannelKind;
use autoclave_analysis::errors::AnalysisError;

/// Writes a synthetic DAQ export: metadata lines, header row, sample rows.
///
/// The run holds 176 °C for 101 samples at one-minute spacing starting at
/// t = 1 min, ramps the pressure from 0 to 5 bar and spins at 502.7 rpm.
/// Constant temperature passes through outlier cleaning and smoothing
/// unchanged, so every summary row has an exact expected value.
fn write_constant_run(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let _ = env_logger::builder().is_test(true).try_init();
    let path = dir.path().join("run_42.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "name,run_42").unwrap();
    writeln!(file, "operator,J. Doe").unwrap();
    writeln!(file, "area,0.196 cm^2").unwrap();
    writeln!(file).unwrap();
    writeln!(
        file,
        "Time (s),T_Reactor (K),T_HotPlate (K),P_Reactor (Pa),Rot (rpm)"
    )
    .unwrap();
    for i in 0..101u32 {
        let time_s = 60.0 * (1.0 + f64::from(i));
        let temp_k = 176.0 + 273.15;
        let hotplate_k = temp_k + 5.0;
        let pressure_pa = 5.0e5 * f64::from(i) / 100.0;
        writeln!(
            file,
            "{time_s},{temp_k},{hotplate_k},{pressure_pa},502.7"
        )
        .unwrap();
    }
    path
}

#[test]
fn parses_and_summarizes_a_constant_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_constant_run(&dir);

    let record = parse_log_file(&path).unwrap();
    assert_eq!(record.name, "run_42");
    assert_eq!(record.len(), 101);

    let summary = summarize_record(&record).unwrap();
    assert_eq!(summary.set_temperature, 175.0);
    assert_eq!(summary.max_temperature, 176.0);
    // 176 °C exceeds the 175 °C set point already at the first sample.
    assert_eq!(summary.time_to_set_temperature, 1.0);
    assert_eq!(summary.heating_rate, -1.0);
    assert_eq!(summary.max_overpressure, 5.0);
    assert_eq!(summary.time_to_max_overpressure, 101.0);
    assert_eq!(summary.pressure_rise_rate, 0.05); // 5 bar / 101 min
    assert_eq!(summary.rotation_rate, 502.0);
    assert_eq!(summary.total_time, 101.0);

    let rows = summary.rows();
    assert_eq!(rows[0], ("Set Temperature [°C]", 175.0));
    assert_eq!(rows[8], ("Time of Synthesis [min]", 101.0));
}

#[test]
fn summary_is_reproducible_across_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_constant_run(&dir);
    let first = summarize_record(&parse_log_file(&path).unwrap()).unwrap();
    let second = summarize_record(&parse_log_file(&path).unwrap()).unwrap();
    assert_eq!(first.rows(), second.rows());
}

#[test]
fn metadata_round_trips_with_units() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_constant_run(&dir);
    let record = parse_log_file(&path).unwrap();
    let (area, unit) = extract_value_unit(record.property("area").unwrap());
    assert_eq!(area, 0.196);
    assert_eq!(unit, "cm^2");
}

#[test]
fn channel_conversion_matches_the_raw_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_constant_run(&dir);
    let record = parse_log_file(&path).unwrap();

    let time_min = record.channel(ChannelKind::TimeInMin);
    assert_eq!(time_min.unit, "min");
    assert!((time_min.data[0] - 1.0).abs() < 1e-12);

    let pressure_bar = record.channel(ChannelKind::OverpressureInBar);
    assert!((pressure_bar.data[100] - 5.0).abs() < 1e-12);
}

#[test]
fn missing_file_is_a_file_access_error() {
    let err = parse_log_file(std::path::Path::new("/no/such/run.csv")).unwrap_err();
    assert!(matches!(err, AnalysisError::FileAccess { .. }));
}

#[test]
fn missing_channel_column_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no_rot.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "name,broken").unwrap();
    writeln!(file, "Time (s),T_Reactor (K),T_HotPlate (K),P_Reactor (Pa)").unwrap();
    writeln!(file, "0.0,300.0,300.0,0.0").unwrap();
    let err = parse_log_file(&path).unwrap_err();
    assert!(matches!(err, AnalysisError::ChannelNotFound(ref name) if name == "Rot (rpm)"));
}

#[test]
fn rows_with_bad_samples_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gappy.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "name,gappy").unwrap();
    writeln!(
        file,
        "Time (s),T_Reactor (K),T_HotPlate (K),P_Reactor (Pa),Rot (rpm)"
    )
    .unwrap();
    writeln!(file, "0.0,300.0,305.0,0.0,400.0").unwrap();
    writeln!(file, "60.0,not_a_number,305.0,1000.0,400.0").unwrap();
    writeln!(file, "120.0,301.0,305.0,2000.0,400.0").unwrap();
    let record = parse_log_file(&path).unwrap();
    assert_eq!(record.len(), 2);
    assert_eq!(record.time[1], 120.0);
}
