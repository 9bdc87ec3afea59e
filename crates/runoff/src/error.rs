//! Error types for the rill-runoff crate.

use rill_evaluate::MetricError;
use rill_series::SeriesError;

/// Error type for model runs and calibration.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RunoffError {
    /// Precipitation and evapotranspiration inputs differ in length.
    #[error("length mismatch: {precip} precipitation vs {aet} evapotranspiration values")]
    LengthMismatch { precip: usize, aet: usize },

    /// Evapotranspiration does not share the precipitation timestamps.
    #[error("evapotranspiration index does not match precipitation index")]
    IndexMismatch,

    /// No timestamp has a finite value in every calibration input.
    #[error("no overlapping data across {n_series} calibration inputs")]
    NoOverlapData { n_series: usize },

    /// Initial recession coefficient outside the search bounds.
    #[error("initial k = {value} outside [{lower}, {upper}]")]
    InvalidInitialK { value: f64, lower: f64, upper: f64 },

    /// The objective could not be evaluated.
    #[error("objective failed: {0}")]
    Metric(#[from] MetricError),

    #[error(transparent)]
    Series(#[from] SeriesError),

    /// The optimizer aborted.
    #[error("optimisation failed: {reason}")]
    Optimizer { reason: String },

    /// A calibration record could not be (de)serialised.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_no_overlap() {
        let err = RunoffError::NoOverlapData { n_series: 3 };
        assert_eq!(
            err.to_string(),
            "no overlapping data across 3 calibration inputs"
        );
    }

    #[test]
    fn error_initial_k() {
        let err = RunoffError::InvalidInitialK {
            value: 1.5,
            lower: 0.001,
            upper: 1.0,
        };
        assert_eq!(err.to_string(), "initial k = 1.5 outside [0.001, 1]");
    }

    #[test]
    fn error_wraps_metric() {
        let err: RunoffError = MetricError::DegenerateInput {
            metric: "NSE",
            reason: "observed series is constant".to_string(),
        }
        .into();
        assert!(err.to_string().starts_with("objective failed: NSE undefined"));
    }
}
