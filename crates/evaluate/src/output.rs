//! Metrics bundle and its JSON form.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::EvaluateError;

/// Metric names in bundle order.
pub const METRIC_NAMES: [&str; 6] = ["NSE", "logNSE", "KGE", "RMSE", "Bias", "R"];

/// Outcome of the optional log-space NSE.
///
/// Low or zero flows make logNSE undefined without invalidating the rest
/// of an evaluation, so the pipeline records [`LogNse::Undefined`] instead
/// of failing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum LogNse {
    Value(f64),
    Undefined,
}

impl LogNse {
    /// The score, or `None` when undefined.
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::Undefined => None,
        }
    }

    pub fn is_undefined(self) -> bool {
        matches!(self, Self::Undefined)
    }
}

impl From<Option<f64>> for LogNse {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Self::Value(v),
            _ => Self::Undefined,
        }
    }
}

impl From<LogNse> for Option<f64> {
    fn from(value: LogNse) -> Self {
        value.value()
    }
}

/// Goodness-of-fit scores for one observed/simulated comparison.
///
/// Serialises with the fixed key vocabulary `NSE`, `logNSE`, `KGE`, `RMSE`,
/// `Bias`, `R`. Non-finite scores (e.g. a NaN KGE from a zero observed
/// mean) are written as `null` and read back as NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsBundle {
    #[serde(rename = "NSE", deserialize_with = "nan_if_null")]
    pub nse: f64,
    /// `None` when logNSE was not requested.
    #[serde(
        rename = "logNSE",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_log_nse"
    )]
    pub log_nse: Option<LogNse>,
    #[serde(rename = "KGE", deserialize_with = "nan_if_null")]
    pub kge: f64,
    #[serde(rename = "RMSE", deserialize_with = "nan_if_null")]
    pub rmse: f64,
    #[serde(rename = "Bias", deserialize_with = "nan_if_null")]
    pub bias: f64,
    #[serde(rename = "R", deserialize_with = "nan_if_null")]
    pub r: f64,
}

fn nan_if_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

// An explicit `null` is the undefined sentinel; an absent key means "not
// requested" and is handled by `default`.
fn present_log_nse<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<LogNse>, D::Error> {
    Ok(Some(LogNse::from(Option::<f64>::deserialize(deserializer)?)))
}

impl MetricsBundle {
    /// Score by metric name. `None` for unknown names, an unrequested
    /// logNSE, or the undefined sentinel.
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            "NSE" => Some(self.nse),
            "logNSE" => self.log_nse.and_then(LogNse::value),
            "KGE" => Some(self.kge),
            "RMSE" => Some(self.rmse),
            "Bias" => Some(self.bias),
            "R" => Some(self.r),
            _ => None,
        }
    }

    /// `(name, score)` pairs in [`METRIC_NAMES`] order. An unrequested
    /// logNSE is skipped; an undefined one appears with `None`.
    pub fn entries(&self) -> Vec<(&'static str, Option<f64>)> {
        METRIC_NAMES
            .iter()
            .filter_map(|&name| match name {
                "logNSE" => self.log_nse.map(|l| (name, l.value())),
                _ => Some((name, self.get(name))),
            })
            .collect()
    }
}

/// Serialize a metrics bundle to a pretty-printed JSON string.
pub fn to_json(bundle: &MetricsBundle) -> Result<String, EvaluateError> {
    serde_json::to_string_pretty(bundle).map_err(|e| EvaluateError::Serialization {
        reason: e.to_string(),
    })
}

/// Parse a metrics bundle from JSON.
///
/// Accepts either a bare bundle or a document that nests the bundle under
/// a `"metrics"` object, as calibration records do.
pub fn from_json(json: &str) -> Result<MetricsBundle, EvaluateError> {
    let to_err = |e: serde_json::Error| EvaluateError::Serialization {
        reason: e.to_string(),
    };
    let mut value: serde_json::Value = serde_json::from_str(json).map_err(to_err)?;
    let bundle = match value.get_mut("metrics") {
        Some(nested) if nested.is_object() => nested.take(),
        _ => value,
    };
    serde_json::from_value(bundle).map_err(to_err)
}
