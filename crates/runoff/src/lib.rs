//! # rill-runoff
//!
//! Lumped linear-reservoir rainfall-runoff model with one parameter, the
//! recession coefficient `k`, and a bounded calibration of `k` against
//! observed discharge.
//!
//! ```ignore
//! use rill_runoff::{CalibrationConfig, calibrate};
//!
//! let fit = calibrate(&discharge, &precip, Some(&aet), &CalibrationConfig::default())?;
//! println!("k = {:.3}, NSE = {:.3}", fit.k, fit.metrics.nse);
//! ```

mod calibrate;
mod config;
mod error;
mod model;
mod record;

pub use calibrate::{CalibrationResult, calibrate};
pub use config::{CalibrationConfig, K_MAX, K_MIN};
pub use error::RunoffError;
pub use model::{LinearReservoir, effective_precipitation, simulate_series};
pub use record::CalibrationRecord;
