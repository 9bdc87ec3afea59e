//! Axis scaling and tick placement.

use chrono::{DateTime, NaiveDateTime};

/// Maps a data interval linearly onto a pixel interval.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scale {
    d0: f64,
    d1: f64,
    r0: f64,
    r1: f64,
}

impl Scale {
    /// Degenerate domains are widened so the mapping stays finite.
    pub(crate) fn new(d0: f64, d1: f64, r0: f64, r1: f64) -> Self {
        let (d0, d1) = if d1 > d0 {
            (d0, d1)
        } else {
            let pad = if d0 == 0.0 { 1.0 } else { d0.abs() * 0.05 };
            (d0 - pad, d0 + pad)
        };
        Self { d0, d1, r0, r1 }
    }

    pub(crate) fn map(&self, v: f64) -> f64 {
        self.r0 + (v - self.d0) / (self.d1 - self.d0) * (self.r1 - self.r0)
    }

    pub(crate) fn domain(&self) -> (f64, f64) {
        (self.d0, self.d1)
    }
}

/// Seconds since the epoch, as a plotting coordinate.
pub(crate) fn time_coord(t: NaiveDateTime) -> f64 {
    t.and_utc().timestamp() as f64
}

fn coord_time(x: f64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(x.round() as i64, 0).map(|d| d.naive_utc())
}

/// Round step of 1, 2, or 5 times a power of ten near `range / target`.
fn nice_step(range: f64, target: usize) -> f64 {
    let raw = range / target.max(1) as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Tick values at round numbers covering `[lo, hi]`.
pub(crate) fn nice_ticks(lo: f64, hi: f64, target: usize) -> Vec<f64> {
    if !lo.is_finite() || !hi.is_finite() || hi <= lo {
        return vec![lo];
    }
    let step = nice_step(hi - lo, target);
    let first = (lo / step).ceil() * step;
    let mut ticks = Vec::new();
    let mut i = 0.0;
    loop {
        let v = first + i * step;
        if v > hi + step * 1e-9 {
            break;
        }
        // snap -0.0 and float noise around zero
        ticks.push(if v.abs() < step * 1e-9 { 0.0 } else { v });
        i += 1.0;
    }
    ticks
}

/// Shortest label that still distinguishes ticks `step` apart.
pub(crate) fn format_value(v: f64, step: f64) -> String {
    let decimals = if step >= 1.0 {
        0
    } else {
        (-step.log10().floor()) as usize
    };
    format!("{v:.decimals$}")
}

/// Decade ticks (1, 10, 100, ...) covering `[lo, hi]` in log10 space.
///
/// Returns the log10 coordinate of each tick with its label.
pub(crate) fn log_ticks(lo: f64, hi: f64) -> Vec<(f64, String)> {
    if !lo.is_finite() || !hi.is_finite() || hi < lo {
        return Vec::new();
    }
    let (first, last) = (lo.ceil() as i32, hi.floor() as i32);
    (first..=last)
        .map(|k| {
            let decimals = usize::try_from(-k).unwrap_or(0);
            (f64::from(k), format!("{:.decimals$}", 10f64.powi(k)))
        })
        .collect()
}

/// Evenly spaced time ticks with labels suited to the span.
pub(crate) fn time_ticks(lo: f64, hi: f64, count: usize) -> Vec<(f64, String)> {
    let span_hours = (hi - lo) / 3600.0;
    let layout = if span_hours > 24.0 * 60.0 {
        "%Y-%m-%d"
    } else if span_hours > 48.0 {
        "%m-%d"
    } else {
        "%m-%d %H:%M"
    };
    let count = count.max(2);
    (0..count)
        .filter_map(|i| {
            let x = lo + (hi - lo) * i as f64 / (count - 1) as f64;
            coord_time(x).map(|t| (x, t.format(layout).to_string()))
        })
        .collect()
}
