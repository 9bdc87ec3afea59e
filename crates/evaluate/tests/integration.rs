use std::fs;

use approx::assert_relative_eq;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use rill_evaluate::{
    EvaluateConfig, EvaluateError, LogNse, MetricError, evaluate, evaluate_files, from_json,
    to_json,
};
use rill_io::ReaderConfig;
use rill_series::{SeriesError, TimeSeries};

fn hour(h: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2021, 3, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap()
        + TimeDelta::hours(h)
}

fn series(start: i64, values: &[f64]) -> TimeSeries {
    let times = (0..values.len() as i64).map(|i| hour(start + i)).collect();
    TimeSeries::new(times, values.to_vec()).unwrap()
}

#[test]
fn test_evaluate_identical_series() {
    let q = series(0, &[1.0, 4.0, 2.0, 8.0, 5.0, 3.0]);
    let bundle = evaluate(&q, &q, &EvaluateConfig::default()).unwrap();

    assert_relative_eq!(bundle.nse, 1.0, epsilon = 1e-12);
    assert_relative_eq!(bundle.kge, 1.0, epsilon = 1e-12);
    assert_relative_eq!(bundle.rmse, 0.0, epsilon = 1e-12);
    assert_relative_eq!(bundle.bias, 0.0, epsilon = 1e-12);
    assert_relative_eq!(bundle.r, 1.0, epsilon = 1e-12);
    match bundle.log_nse {
        Some(LogNse::Value(v)) => assert_relative_eq!(v, 1.0, epsilon = 1e-12),
        other => panic!("expected logNSE value, got {other:?}"),
    }
}

#[test]
fn test_evaluate_uses_shared_timestamps_only() {
    // obs covers hours 0..6, sim hours 2..8 with a gap at hour 3
    let obs = series(0, &[9.0, 9.0, 1.0, 2.0, 3.0, 4.0]);
    let sim = series(2, &[1.0, f64::NAN, 3.0, 4.0, 7.0, 7.0]);
    let bundle = evaluate(&obs, &sim, &EvaluateConfig::default()).unwrap();

    // Remaining pairs are identical.
    assert_relative_eq!(bundle.nse, 1.0, epsilon = 1e-12);
    assert_relative_eq!(bundle.rmse, 0.0, epsilon = 1e-12);
}

#[test]
fn test_evaluate_no_overlap() {
    let obs = series(0, &[1.0, 2.0, 3.0]);
    let sim = series(10, &[1.0, 2.0, 3.0]);
    let err = evaluate(&obs, &sim, &EvaluateConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        EvaluateError::Align(SeriesError::NoOverlap { .. })
    ));
}

#[test]
fn test_evaluate_zero_flow_keeps_other_metrics() {
    let obs = series(0, &[0.0, 1.0, 3.0, 2.0, 0.5]);
    let sim = series(0, &[0.1, 1.2, 2.7, 2.1, 0.4]);
    let bundle = evaluate(&obs, &sim, &EvaluateConfig::default()).unwrap();

    assert_eq!(bundle.log_nse, Some(LogNse::Undefined));
    assert!(bundle.nse > 0.9);
    assert!(bundle.r > 0.9);
}

#[test]
fn test_evaluate_constant_observed_fails() {
    let obs = series(0, &[2.0, 2.0, 2.0, 2.0]);
    let sim = series(0, &[1.0, 2.0, 3.0, 4.0]);
    let err = evaluate(&obs, &sim, &EvaluateConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        EvaluateError::Metric(MetricError::DegenerateInput { .. })
    ));
}

#[test]
fn test_evaluate_files_and_json() {
    let dir = tempfile::tempdir().unwrap();
    let obs_path = dir.path().join("obs.csv");
    let sim_path = dir.path().join("sim.csv");
    fs::write(
        &obs_path,
        "date,discharge\n2021-03-01,1.0\n2021-03-02,2.0\n2021-03-03,4.0\n2021-03-04,3.0\n",
    )
    .unwrap();
    fs::write(
        &sim_path,
        "time,q_sim,other\n2021-03-04,3.5,0\n2021-03-02,2.0,0\n2021-03-03,3.5,0\n2021-03-01,1.0,0\n",
    )
    .unwrap();

    let sim_reader = ReaderConfig::default().with_value_column(Some("q_sim"));
    let bundle = evaluate_files(
        &obs_path,
        &ReaderConfig::default(),
        &sim_path,
        &sim_reader,
        &EvaluateConfig::default(),
    )
    .unwrap();
    assert!(bundle.nse > 0.8 && bundle.nse < 1.0);

    let back = from_json(&to_json(&bundle).unwrap()).unwrap();
    assert_relative_eq!(back.nse, bundle.nse, epsilon = 1e-12);
    assert_eq!(back.log_nse.is_some(), bundle.log_nse.is_some());
}

#[test]
fn test_evaluate_files_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.csv");
    let err = evaluate_files(
        &missing,
        &ReaderConfig::default(),
        &missing,
        &ReaderConfig::default(),
        &EvaluateConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        EvaluateError::Io(rill_io::IoError::FileNotFound { .. })
    ));
}
