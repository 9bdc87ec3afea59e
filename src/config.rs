use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use rill_io::Metadata;

/// Top-level rill configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RillConfig {
    /// Column-role mapping.
    #[serde(default)]
    pub columns: ColumnsToml,

    /// Event detection settings.
    #[serde(default)]
    pub events: EventsToml,

    /// Calibration settings.
    #[serde(default)]
    pub calibrate: CalibrateToml,

    /// Evaluation settings.
    #[serde(default)]
    pub evaluate: EvaluateToml,

    /// Plot settings.
    #[serde(default)]
    pub plot: PlotToml,

    /// Report settings.
    #[serde(default)]
    pub report: ReportToml,

    /// Catchment description.
    #[serde(default)]
    pub metadata: Metadata,
}

/// Load the configuration at `path`, or defaults when no path is given.
pub fn load(path: Option<&Path>) -> Result<RillConfig> {
    let Some(path) = path else {
        return Ok(RillConfig::default());
    };
    let toml_str = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    toml::from_str(&toml_str).context("failed to parse TOML config")
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ColumnsToml {
    pub time: Option<String>,
    pub discharge: Option<String>,
    pub precipitation: Option<String>,
    pub evapotranspiration: Option<String>,
    pub observed: Option<String>,
    pub simulated: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventsToml {
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default = "default_min_gap_hours")]
    pub min_gap_hours: f64,
    #[serde(default)]
    pub pad_hours: f64,
}

impl Default for EventsToml {
    fn default() -> Self {
        Self {
            threshold: None,
            min_gap_hours: default_min_gap_hours(),
            pad_hours: 0.0,
        }
    }
}

fn default_min_gap_hours() -> f64 {
    24.0
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalibrateToml {
    #[serde(default = "default_initial_k")]
    pub initial_k: f64,
}

impl Default for CalibrateToml {
    fn default() -> Self {
        Self {
            initial_k: default_initial_k(),
        }
    }
}

fn default_initial_k() -> f64 {
    0.5
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluateToml {
    #[serde(default = "default_true")]
    pub log_nse: bool,
}

impl Default for EvaluateToml {
    fn default() -> Self {
        Self { log_nse: true }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlotToml {
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl Default for PlotToml {
    fn default() -> Self {
        Self {
            style: default_style(),
            width: None,
            height: None,
        }
    }
}

fn default_style() -> String {
    "default".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportToml {
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub station: Option<String>,
}

impl Default for ReportToml {
    fn default() -> Self {
        Self {
            format: default_format(),
            title: None,
            station: None,
        }
    }
}

fn default_format() -> String {
    "markdown".to_string()
}
