//! Event detection error types.

/// Errors that can occur during event detection and extraction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EventError {
    /// A numeric parameter is out of range.
    #[error("invalid {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_display() {
        let err = EventError::InvalidParameter {
            name: "min_gap_hours",
            value: -1.0,
            reason: "must be finite and non-negative",
        };
        assert_eq!(
            err.to_string(),
            "invalid min_gap_hours = -1: must be finite and non-negative"
        );
    }
}
