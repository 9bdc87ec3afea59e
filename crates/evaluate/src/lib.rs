//! Rill evaluation: goodness-of-fit metrics for simulated against observed
//! series, collected into a [`MetricsBundle`].
//!
//! The pipeline aligns two series on their shared timestamps, then runs
//! every metric on the aligned values. All metric failures propagate except
//! logNSE's: non-positive or constant log flows record
//! [`LogNse::Undefined`] and the evaluation carries on.

mod config;
mod error;
mod metrics;
mod output;
mod report;

use std::path::Path;

use rill_io::{ReaderConfig, read_series};
use rill_series::{TimeSeries, align};
use tracing::{debug, warn};

pub use config::EvaluateConfig;
pub use error::{EvaluateError, MetricError};
pub use metrics::{bias, kge, log_nse, nse, pearson_r, rmse};
pub use output::{LogNse, METRIC_NAMES, MetricsBundle, from_json, to_json};
pub use report::{ReportFormat, ReportMeta, render_report};

/// Evaluate `simulated` against `observed`.
///
/// # Errors
///
/// Returns [`EvaluateError::Align`] if the series share no complete
/// timestamps and [`EvaluateError::Metric`] if any metric other than logNSE
/// fails.
pub fn evaluate(
    observed: &TimeSeries,
    simulated: &TimeSeries,
    config: &EvaluateConfig,
) -> Result<MetricsBundle, EvaluateError> {
    let pair = align(observed, simulated)?;
    debug!(
        n_observed = observed.len(),
        n_simulated = simulated.len(),
        n_aligned = pair.len(),
        "aligned series for evaluation"
    );
    Ok(evaluate_aligned(pair.observed(), pair.simulated(), config)?)
}

/// Evaluate already-aligned value slices.
///
/// # Errors
///
/// Returns the first [`MetricError`] raised by NSE, KGE, RMSE, Bias, or R.
pub fn evaluate_aligned(
    observed: &[f64],
    simulated: &[f64],
    config: &EvaluateConfig,
) -> Result<MetricsBundle, MetricError> {
    let log_nse = config.log_nse().then(|| match log_nse(observed, simulated) {
        Ok(v) => LogNse::Value(v),
        Err(e) => {
            warn!(error = %e, "logNSE undefined");
            LogNse::Undefined
        }
    });

    Ok(MetricsBundle {
        nse: nse(observed, simulated)?,
        log_nse,
        kge: kge(observed, simulated)?,
        rmse: rmse(observed, simulated)?,
        bias: bias(observed, simulated)?,
        r: pearson_r(observed, simulated)?,
    })
}

/// Read both series from CSV and evaluate them.
///
/// # Errors
///
/// Returns [`EvaluateError::Io`] if either file cannot be read, plus every
/// error [`evaluate`] can return.
pub fn evaluate_files(
    observed_path: &Path,
    observed_reader: &ReaderConfig,
    simulated_path: &Path,
    simulated_reader: &ReaderConfig,
    config: &EvaluateConfig,
) -> Result<MetricsBundle, EvaluateError> {
    let observed = read_series(observed_path, observed_reader)?;
    let simulated = read_series(simulated_path, simulated_reader)?;
    evaluate(&observed, &simulated, config)
}
