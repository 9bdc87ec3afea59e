//! # rill-series
//!
//! Timestamp-indexed value series and the inner-join aligner that
//! reconciles two or more independently sourced series, plus fixed-width
//! resampling.
//!
//! ```ignore
//! use rill_series::{TimeSeries, align};
//!
//! let pair = align(&observed, &simulated)?;
//! assert_eq!(pair.observed().len(), pair.simulated().len());
//! ```

mod align;
mod error;
mod resample;
mod series;

pub use align::{AlignedFrame, AlignedPair, align, align_all};
pub use error::SeriesError;
pub use resample::{Aggregation, Frequency, resample};
pub use series::{DEFAULT_STEP_HOURS, TimeSeries};
