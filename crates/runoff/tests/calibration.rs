use approx::assert_relative_eq;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use rill_runoff::{
    CalibrationConfig, CalibrationRecord, K_MIN, LinearReservoir, calibrate, simulate_series,
};
use rill_series::TimeSeries;

fn day(d: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2015, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap()
        + TimeDelta::days(d)
}

fn daily(values: Vec<f64>) -> TimeSeries {
    let times = (0..values.len() as i64).map(day).collect();
    TimeSeries::new(times, values).unwrap()
}

/// Storm bursts of varying depth every few days.
fn storms(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| match i % 9 {
            0 => 12.0 + (i % 5) as f64,
            1 => 4.0,
            5 => 6.5,
            _ => 0.0,
        })
        .collect()
}

#[test]
fn test_recovers_k_with_evapotranspiration() {
    let k_true = 0.65;
    let precip = storms(365);
    let aet: Vec<f64> = (0..365).map(|i| 1.0 + (i % 3) as f64 * 0.5).collect();

    let p = daily(precip);
    let e = daily(aet);
    // q0 equal to the first simulated value pins obs[0] to q0
    let q0 = simulate_series(&p, Some(&e), k_true, 0.0).unwrap().values()[0] / k_true;
    let q = simulate_series(&p, Some(&e), k_true, q0).unwrap();
    assert_relative_eq!(q.values()[0], q0, epsilon = 1e-9);

    let fit = calibrate(&q, &p, Some(&e), &CalibrationConfig::default()).unwrap();
    assert!((fit.k - k_true).abs() < 0.01, "k = {}", fit.k);
    assert!(fit.metrics.nse > 0.99);
    assert_eq!(fit.simulated.times(), q.times());
}

#[test]
fn test_record_persists_fit() {
    let p = daily(storms(120));
    let q = simulate_series(&p, None, 0.4, 2.0).unwrap();
    let fit = calibrate(&q, &p, None, &CalibrationConfig::default()).unwrap();

    let json = fit.record().to_json().unwrap();
    let back = CalibrationRecord::from_json(&json).unwrap();
    assert_eq!(back.k, fit.k);
    assert_eq!(back.success, fit.success);
    assert_eq!(back.message, fit.message);
    assert_eq!(back.iterations, fit.iterations);

    // the report reader unwraps the nested bundle
    let metrics = rill_evaluate::from_json(&json).unwrap();
    assert_relative_eq!(metrics.nse, fit.metrics.nse, epsilon = 1e-12);
}

#[test]
fn test_calibrates_on_joint_overlap() {
    let k_true = 0.2;
    let mut precip = storms(200);
    precip[0] = 3.0;
    let q = LinearReservoir::new(k_true).simulate(&precip, 3.0);

    // observations end early and have a gap; precipitation runs longer
    let mut obs_values = q[..150].to_vec();
    obs_values[70] = f64::NAN;
    let obs = daily(obs_values);
    let p = daily(precip);

    let fit = calibrate(&obs, &p, None, &CalibrationConfig::default()).unwrap();
    assert_eq!(fit.simulated.len(), 149);
    assert_eq!(fit.simulated.start(), Some(day(0)));
    assert!(fit.metrics.nse > 0.95);
    assert!(fit.k >= K_MIN && fit.k <= 1.0);
}

#[test]
fn test_flat_response_prefers_small_k() {
    // Observed flow barely responds to rain: best fit sits near the lower bound.
    let precip = storms(120);
    let obs: Vec<f64> = (0..120).map(|i| 5.0 - i as f64 * 0.001).collect();
    let fit = calibrate(
        &daily(obs),
        &daily(precip),
        None,
        &CalibrationConfig::default(),
    )
    .unwrap();
    assert!(fit.k < 0.05, "k = {}", fit.k);
}
