//! Event detection configuration.

use crate::error::EventError;

/// Threshold and closing rule for [`detect_events`](crate::detect_events).
///
/// Defaults to a threshold of 0 and a 24-hour minimum gap.
#[derive(Debug, Clone)]
pub struct EventConfig {
    threshold: f64,
    min_gap_hours: f64,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            min_gap_hours: 24.0,
        }
    }
}

impl EventConfig {
    /// Create a config with the given threshold and minimum gap.
    pub fn new(threshold: f64, min_gap_hours: f64) -> Self {
        Self {
            threshold,
            min_gap_hours,
        }
    }

    /// Set the value above which a sample belongs to an event.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the sub-threshold duration that closes an open event.
    pub fn with_min_gap_hours(mut self, hours: f64) -> Self {
        self.min_gap_hours = hours;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn min_gap_hours(&self) -> f64 {
        self.min_gap_hours
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::InvalidParameter`] if the threshold is not
    /// finite or the minimum gap is negative or not finite.
    pub fn validate(&self) -> Result<(), EventError> {
        if !self.threshold.is_finite() {
            return Err(EventError::InvalidParameter {
                name: "threshold",
                value: self.threshold,
                reason: "must be finite",
            });
        }
        check_hours("min_gap_hours", self.min_gap_hours)
    }
}

/// Rejects negative or non-finite durations.
pub(crate) fn check_hours(name: &'static str, hours: f64) -> Result<(), EventError> {
    if !hours.is_finite() || hours < 0.0 {
        return Err(EventError::InvalidParameter {
            name,
            value: hours,
            reason: "must be finite and non-negative",
        });
    }
    Ok(())
}
