//! Integration tests for the CLI commands against real files.

use std::fs;
use std::process::ExitCode;

use loadsynth_cli::commands::generate::{self, GenerateOptions};
use loadsynth_cli::commands::{table, validate};
use loadsynth_backend_signal::OptimizeStrategy;
use loadsynth_spec::{LoadStore, PwmHarmonic};
use pretty_assertions::assert_eq;

const LOADS: &str = r#"[
    {
        "name": "sine-100hz",
        "group_name": "inlet",
        "end_time": 0.01,
        "delta_time": 0.0001,
        "input": {"mode": "expression", "expression": "1000*sin(2*pi*100*t)"}
    },
    {
        "name": "ramp",
        "end_time": 0.002,
        "delta_time": 0.0005,
        "input": {"mode": "tabular", "times": [0, 0.001, 0.002], "amplitudes": [0, 50, 0]}
    },
    {
        "name": "drive",
        "end_time": 0.02,
        "delta_time": 0.00001,
        "input": {"mode": "pwm", "harmonics": [{"frequency": 50, "amplitude": 1000}]}
    }
]"#;

fn write_loads(dir: &tempfile::TempDir, contents: &str) -> String {
    let path = dir.path().join("loads.json");
    fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_generate_writes_computed_arrays() {
    let tmp = tempfile::tempdir().unwrap();
    let spec = write_loads(&tmp, LOADS);
    let out = tmp.path().join("out.json");

    let options = GenerateOptions {
        out: Some(out.to_string_lossy().into_owned()),
        ..Default::default()
    };
    let code = generate::run(&spec, &options, false).unwrap();
    assert_eq!(code, ExitCode::SUCCESS);

    let store = LoadStore::from_json(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(store.count(), 3);

    let sine = store.get(0).unwrap();
    assert_eq!(sine.group_name, "inlet");
    assert_eq!(sine.computed.time.len(), 101);
    assert_eq!(sine.computed.amplitude[0], 0.0);
    assert_eq!(sine.computed.fft_frequency.len(), 51);

    let ramp = store.get(1).unwrap();
    assert!((ramp.computed.amplitude[1] - 25.0).abs() < 1e-9);
    assert_eq!(ramp.computed.target, None);

    let drive = store.get(2).unwrap();
    assert!(drive
        .computed
        .amplitude
        .iter()
        .all(|&v| v == 1000.0 || v == -1000.0));
    assert!(drive.computed.target.is_some());
}

#[test]
fn test_generate_with_optimize_rewrites_pwm_harmonics() {
    let tmp = tempfile::tempdir().unwrap();
    let spec = write_loads(&tmp, LOADS);
    let out = tmp.path().join("out.json");

    let options = GenerateOptions {
        out: Some(out.to_string_lossy().into_owned()),
        optimize: Some(3),
        strategy: OptimizeStrategy::FourierSeries,
    };
    let code = generate::run(&spec, &options, true).unwrap();
    assert_eq!(code, ExitCode::SUCCESS);

    let store = LoadStore::from_json(&fs::read_to_string(&out).unwrap()).unwrap();
    let harmonics: Vec<f64> = store
        .get(2)
        .unwrap()
        .pwm()
        .unwrap()
        .harmonics
        .iter()
        .map(|h| h.frequency)
        .collect();
    assert_eq!(harmonics, vec![50.0, 150.0, 250.0]);
}

#[test]
fn test_generated_non_finite_samples_can_be_read_back() {
    let tmp = tempfile::tempdir().unwrap();
    let spec = write_loads(
        &tmp,
        r#"{"name": "reciprocal", "end_time": 0.004, "delta_time": 0.001,
            "input": {"mode": "expression", "expression": "1/t"}}"#,
    );
    let out = tmp.path().join("out.json");
    let options = GenerateOptions {
        out: Some(out.to_string_lossy().into_owned()),
        optimize: None,
        strategy: OptimizeStrategy::default(),
    };
    assert_eq!(generate::run(&spec, &options, true).unwrap(), ExitCode::SUCCESS);

    let store = LoadStore::from_json(&fs::read_to_string(&out).unwrap()).unwrap();
    let amplitude = &store.get(0).unwrap().computed.amplitude;
    assert_eq!(amplitude.len(), 5);
    assert_eq!(amplitude[0], f64::INFINITY);
    assert!((amplitude[4] - 250.0).abs() < 1e-9);

    // the written file is itself a valid input
    let out_path = out.to_string_lossy().into_owned();
    let again = GenerateOptions {
        out: None,
        optimize: None,
        strategy: OptimizeStrategy::default(),
    };
    assert_eq!(generate::run(&out_path, &again, true).unwrap(), ExitCode::SUCCESS);
}

#[test]
fn test_generate_reports_failures_with_exit_code() {
    let tmp = tempfile::tempdir().unwrap();
    let spec = write_loads(
        &tmp,
        r#"{"name": "bad", "end_time": 1.0, "delta_time": 0.1,
            "input": {"mode": "expression", "expression": "2 * x"}}"#,
    );
    let code = generate::run(&spec, &GenerateOptions::default(), true).unwrap();
    assert_eq!(code, ExitCode::from(1));
}

#[test]
fn test_generate_missing_file() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = tmp.path().join("nope.json");
    let missing = missing.to_string_lossy();

    assert!(generate::run(&missing, &GenerateOptions::default(), false).is_err());
    let code = generate::run(&missing, &GenerateOptions::default(), true).unwrap();
    assert_eq!(code, ExitCode::from(1));
}

#[test]
fn test_validate_exit_codes() {
    let tmp = tempfile::tempdir().unwrap();
    let good = write_loads(&tmp, LOADS);
    assert_eq!(validate::run(&good, false).unwrap(), ExitCode::SUCCESS);
    assert_eq!(validate::run(&good, true).unwrap(), ExitCode::SUCCESS);

    let bad_path = tmp.path().join("bad.json");
    fs::write(
        &bad_path,
        r#"{"name": "p", "end_time": 0, "delta_time": 0.1,
            "input": {"mode": "pwm", "carrier_frequency": 0}}"#,
    )
    .unwrap();
    let bad = bad_path.to_string_lossy();
    assert_eq!(validate::run(&bad, false).unwrap(), ExitCode::from(1));
    assert_eq!(validate::run(&bad, true).unwrap(), ExitCode::from(1));
}

#[test]
fn test_table_command() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("table.txt");
    fs::write(&path, "0\t0\n0.001\t50\n0.002\t0\n").unwrap();
    let path = path.to_string_lossy();

    assert_eq!(table::run(&path, None, false).unwrap(), ExitCode::SUCCESS);
    assert_eq!(table::run(&path, Some(0.0005), true).unwrap(), ExitCode::SUCCESS);

    let bad = tmp.path().join("bad.txt");
    fs::write(&bad, "0 0\n0 1\n").unwrap();
    assert_eq!(
        table::run(&bad.to_string_lossy(), None, false).unwrap(),
        ExitCode::from(1)
    );
}

#[test]
fn test_optimized_harmonics_round_trip_through_json() {
    let harmonic = PwmHarmonic::new(150.0, 424.4, 0.0);
    let json = serde_json::to_string(&harmonic).unwrap();
    let back: PwmHarmonic = serde_json::from_str(&json).unwrap();
    assert_eq!(back, harmonic);
}
