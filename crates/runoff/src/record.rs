//! Serialisable summary of a calibration run.

use serde::{Deserialize, Deserializer, Serialize};

use rill_evaluate::MetricsBundle;

use crate::calibrate::CalibrationResult;
use crate::error::RunoffError;

/// The persisted part of a [`CalibrationResult`]: everything except the
/// simulated series, which is written separately as CSV.
///
/// The JSON form nests the metrics under `"metrics"`, so a record file can
/// be fed straight to the report renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRecord {
    #[serde(alias = "best_k")]
    pub k: f64,
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub iterations: u64,
    /// `-NSE` at `k`; `null` in JSON when not finite.
    #[serde(default = "nan", deserialize_with = "nan_if_null")]
    pub objective: f64,
    pub metrics: MetricsBundle,
}

fn nan() -> f64 {
    f64::NAN
}

fn nan_if_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

impl From<&CalibrationResult> for CalibrationRecord {
    fn from(fit: &CalibrationResult) -> Self {
        Self {
            k: fit.k,
            success: fit.success,
            message: fit.message.clone(),
            iterations: fit.iterations,
            objective: fit.objective,
            metrics: fit.metrics.clone(),
        }
    }
}

impl CalibrationRecord {
    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, RunoffError> {
        serde_json::to_string_pretty(self).map_err(|e| RunoffError::Serialization {
            reason: e.to_string(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, RunoffError> {
        serde_json::from_str(json).map_err(|e| RunoffError::Serialization {
            reason: e.to_string(),
        })
    }
}
