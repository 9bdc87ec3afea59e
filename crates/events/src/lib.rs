//! # rill-events
//!
//! Segment a discharge series into flood events: contiguous periods above
//! a threshold, closed once the flow has stayed at or below it for a
//! minimum gap.
//!
//! ```ignore
//! use rill_events::{EventConfig, detect_events, summarize_events};
//!
//! let events = detect_events(&discharge, &EventConfig::new(50.0, 24.0))?;
//! for summary in summarize_events(&discharge, &events) {
//!     println!("{} peak {}", summary.event, summary.peak);
//! }
//! ```

mod config;
mod error;
mod segment;
mod summary;

pub use config::EventConfig;
pub use error::EventError;
pub use segment::{EventInterval, detect_events};
pub use summary::{EventSample, EventSummary, EventWindow, extract_events, summarize_events};
