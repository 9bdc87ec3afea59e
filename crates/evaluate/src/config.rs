//! Evaluation configuration.

/// Configuration for the evaluation pipeline.
#[derive(Debug, Clone)]
pub struct EvaluateConfig {
    log_nse: bool,
}

impl Default for EvaluateConfig {
    fn default() -> Self {
        Self { log_nse: true }
    }
}

impl EvaluateConfig {
    /// Enable or disable the log-space NSE.
    pub fn with_log_nse(mut self, enabled: bool) -> Self {
        self.log_nse = enabled;
        self
    }

    /// Returns whether logNSE is computed.
    pub fn log_nse(&self) -> bool {
        self.log_nse
    }
}
