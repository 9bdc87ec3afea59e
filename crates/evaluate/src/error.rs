//! Evaluation error types.

/// Errors raised by the individual goodness-of-fit metrics.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricError {
    /// Observed and simulated sequences differ in length.
    #[error("shape mismatch: {observed} observed vs {simulated} simulated values")]
    ShapeMismatch { observed: usize, simulated: usize },

    /// A denominator of the statistic is zero (constant series, zero mean,
    /// or no finite pairs).
    #[error("{metric} undefined: {reason}")]
    DegenerateInput {
        metric: &'static str,
        reason: String,
    },

    /// A log-space metric received a non-positive value.
    #[error("{metric} requires strictly positive values, found {value}")]
    InvalidDomain { metric: &'static str, value: f64 },
}

/// Errors that can occur in the evaluation pipeline.
#[derive(Debug, thiserror::Error)]
pub enum EvaluateError {
    /// Observed and simulated series could not be aligned.
    #[error("alignment failed: {0}")]
    Align(#[from] rill_series::SeriesError),

    /// A required metric could not be computed.
    #[error("metric failed: {0}")]
    Metric(#[from] MetricError),

    /// Reading an input file failed.
    #[error(transparent)]
    Io(#[from] rill_io::IoError),

    /// An unknown report format name was requested.
    #[error("unknown report format '{name}' (expected text, markdown, html, or latex)")]
    UnknownFormat { name: String },

    /// JSON (de)serialization failed.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_display() {
        let err = MetricError::ShapeMismatch {
            observed: 10,
            simulated: 9,
        };
        assert_eq!(
            err.to_string(),
            "shape mismatch: 10 observed vs 9 simulated values"
        );
    }

    #[test]
    fn test_degenerate_display() {
        let err = MetricError::DegenerateInput {
            metric: "NSE",
            reason: "observed series is constant".to_string(),
        };
        assert_eq!(err.to_string(), "NSE undefined: observed series is constant");
    }

    #[test]
    fn test_invalid_domain_display() {
        let err = MetricError::InvalidDomain {
            metric: "logNSE",
            value: -0.5,
        };
        let msg = err.to_string();
        assert!(msg.contains("logNSE"));
        assert!(msg.contains("-0.5"));
    }

    #[test]
    fn test_wraps_series_error() {
        let err: EvaluateError = rill_series::SeriesError::NoOverlap { n_series: 2 }.into();
        assert!(matches!(err, EvaluateError::Align(_)));
        assert!(err.to_string().starts_with("alignment failed"));
    }

    #[test]
    fn test_serialization_display() {
        let err = EvaluateError::Serialization {
            reason: "invalid JSON".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("serialization error"));
        assert!(msg.contains("invalid JSON"));
    }
}
