//! Calibration configuration.

use rill_evaluate::EvaluateConfig;

use crate::error::RunoffError;

/// Lower bound of the recession coefficient search.
pub const K_MIN: f64 = 0.001;
/// Upper bound of the recession coefficient search.
pub const K_MAX: f64 = 1.0;

/// Configuration for [`calibrate`](crate::calibrate).
#[derive(Debug, Clone)]
pub struct CalibrationConfig {
    initial_k: f64,
    evaluate: EvaluateConfig,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            initial_k: 0.5,
            evaluate: EvaluateConfig::default(),
        }
    }
}

impl CalibrationConfig {
    /// Set the starting recession coefficient. It is scored before the
    /// search and kept if nothing better is found.
    pub fn with_initial_k(mut self, k: f64) -> Self {
        self.initial_k = k;
        self
    }

    /// Set the metrics computed for the best fit.
    pub fn with_evaluate(mut self, evaluate: EvaluateConfig) -> Self {
        self.evaluate = evaluate;
        self
    }

    pub fn initial_k(&self) -> f64 {
        self.initial_k
    }

    pub fn evaluate(&self) -> &EvaluateConfig {
        &self.evaluate
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RunoffError::InvalidInitialK`] if `initial_k` lies outside
    /// `[K_MIN, K_MAX]`.
    pub fn validate(&self) -> Result<(), RunoffError> {
        if !(K_MIN..=K_MAX).contains(&self.initial_k) {
            return Err(RunoffError::InvalidInitialK {
                value: self.initial_k,
                lower: K_MIN,
                upper: K_MAX,
            });
        }
        Ok(())
    }
}
