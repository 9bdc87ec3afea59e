//! Per-event statistics and padded event windows.

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use rill_series::TimeSeries;

use crate::config::check_hours;
use crate::error::EventError;
use crate::segment::EventInterval;

/// Statistics of the samples inside one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    /// 1-based event number.
    pub event: usize,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub duration_hours: f64,
    /// Finite samples inside the interval.
    pub n_samples: usize,
    pub peak: f64,
    pub peak_time: Option<NaiveDateTime>,
    pub mean: f64,
}

/// Summarise each interval against the samples of `series` it covers.
///
/// Intervals that cover no finite samples get NaN peak and mean.
pub fn summarize_events(series: &TimeSeries, intervals: &[EventInterval]) -> Vec<EventSummary> {
    intervals
        .iter()
        .enumerate()
        .map(|(i, interval)| {
            let window = series.slice_between(interval.start, interval.end);
            let finite: Vec<(NaiveDateTime, f64)> =
                window.iter().filter(|(_, v)| v.is_finite()).collect();
            let peak = finite
                .iter()
                .copied()
                .reduce(|best, cur| if cur.1 > best.1 { cur } else { best });
            let values: Vec<f64> = finite.iter().map(|&(_, v)| v).collect();

            EventSummary {
                event: i + 1,
                start: interval.start,
                end: interval.end,
                duration_hours: interval.duration_hours(),
                n_samples: finite.len(),
                peak: peak.map_or(f64::NAN, |(_, v)| v),
                peak_time: peak.map(|(t, _)| t),
                mean: if values.is_empty() {
                    f64::NAN
                } else {
                    rill_stats::mean(&values)
                },
            }
        })
        .collect()
}

/// The samples of one event, widened by padding on both sides.
#[derive(Debug, Clone, PartialEq)]
pub struct EventWindow {
    /// 1-based event number.
    pub event: usize,
    pub interval: EventInterval,
    pub series: TimeSeries,
}

/// One row of the long-format extraction table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSample {
    pub event: usize,
    pub time: NaiveDateTime,
    pub value: f64,
}

impl EventWindow {
    /// Rows of this window in long format.
    pub fn samples(&self) -> impl Iterator<Item = EventSample> + '_ {
        self.series.iter().map(|(time, value)| EventSample {
            event: self.event,
            time,
            value,
        })
    }
}

/// Cut `series` into one window per interval, each widened by `pad_hours`
/// before the start and after the end.
///
/// Windows of neighbouring events may overlap once padded.
///
/// # Errors
///
/// Returns [`EventError::InvalidParameter`] if `pad_hours` is negative,
/// not finite, or too large to represent as a duration.
pub fn extract_events(
    series: &TimeSeries,
    intervals: &[EventInterval],
    pad_hours: f64,
) -> Result<Vec<EventWindow>, EventError> {
    check_hours("pad_hours", pad_hours)?;
    let pad = TimeDelta::try_milliseconds((pad_hours * 3_600_000.0).round() as i64).ok_or(
        EventError::InvalidParameter {
            name: "pad_hours",
            value: pad_hours,
            reason: "duration out of range",
        },
    )?;

    Ok(intervals
        .iter()
        .enumerate()
        .map(|(i, interval)| {
            let lo = interval.start.checked_sub_signed(pad).unwrap_or(NaiveDateTime::MIN);
            let hi = interval.end.checked_add_signed(pad).unwrap_or(NaiveDateTime::MAX);
            EventWindow {
                event: i + 1,
                interval: *interval,
                series: series.slice_between(lo, hi),
            }
        })
        .collect())
}
