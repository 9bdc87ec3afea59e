//! Hysteresis segmentation of a series into above-threshold events.
//!
//! An event opens on the first sample strictly above the threshold. While
//! open, every sample at or below the threshold adds one step to a gap
//! clock and every sample above it resets the clock. The event closes on
//! the sample at which the clock reaches the minimum gap; that sample is
//! the event's end, so the recession tail stays inside the interval. An
//! event still open when the data ends closes on the last sample.
//!
//! The step length is taken once from the first two timestamps and used
//! for the whole scan. Irregular spacing later in the series is not
//! detected and shifts where events close.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use rill_series::TimeSeries;

use crate::config::EventConfig;
use crate::error::EventError;

/// A closed `[start, end]` event period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl EventInterval {
    pub fn duration_hours(&self) -> f64 {
        (self.end - self.start).num_seconds() as f64 / 3600.0
    }
}

#[derive(Debug, Clone, Copy)]
enum State {
    Idle,
    InEvent {
        start: NaiveDateTime,
        gap_hours: f64,
    },
}

/// Detect events in `series`.
///
/// Non-finite samples count as below the threshold.
///
/// # Errors
///
/// Returns [`EventError::InvalidParameter`] if `config` fails validation.
pub fn detect_events(
    series: &TimeSeries,
    config: &EventConfig,
) -> Result<Vec<EventInterval>, EventError> {
    config.validate()?;
    let threshold = config.threshold();
    let min_gap = config.min_gap_hours();
    let step = series.step_hours();
    debug!(n = series.len(), step_hours = step, threshold, min_gap, "scanning for events");

    let mut events = Vec::new();
    let mut state = State::Idle;
    for (t, v) in series.iter() {
        state = match (state, v > threshold) {
            (State::Idle, true) => State::InEvent {
                start: t,
                gap_hours: 0.0,
            },
            (State::Idle, false) => State::Idle,
            (State::InEvent { start, .. }, true) => State::InEvent {
                start,
                gap_hours: 0.0,
            },
            (State::InEvent { start, gap_hours }, false) => {
                let gap_hours = gap_hours + step;
                if gap_hours >= min_gap {
                    events.push(EventInterval { start, end: t });
                    State::Idle
                } else {
                    State::InEvent { start, gap_hours }
                }
            }
        };
    }

    if let (State::InEvent { start, .. }, Some(end)) = (state, series.end()) {
        events.push(EventInterval { start, end });
    }

    debug!(n_events = events.len(), "event scan complete");
    Ok(events)
}
