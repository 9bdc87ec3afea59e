//! Fixed-width resampling onto epoch-aligned bins.
//!
//! Bins are left-closed, labelled by their left edge, and anchored at
//! `1970-01-01 00:00:00`, so daily bins start at midnight and hourly bins
//! on the hour. Every bin between the first and last sample is emitted,
//! including empty ones. Non-finite samples are skipped.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, TimeDelta};
use tracing::debug;

use crate::error::SeriesError;
use crate::series::TimeSeries;

/// How the samples falling into one bin are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    /// Mean of the finite samples; NaN for a bin without any.
    Mean,
    /// Sum of the finite samples; 0 for a bin without any.
    Sum,
}

impl FromStr for Aggregation {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mean" => Ok(Self::Mean),
            "sum" => Ok(Self::Sum),
            _ => Err(SeriesError::UnknownAggregation {
                name: s.to_string(),
            }),
        }
    }
}

/// Bin width for [`resample`].
///
/// Parses rules such as `15min`, `15T`, `h`, `3H`, `D`, or `30s`: an
/// optional positive count followed by a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frequency(TimeDelta);

impl Frequency {
    /// # Errors
    ///
    /// Returns [`SeriesError::InvalidFrequency`] unless `step` is at least
    /// one millisecond.
    pub fn new(step: TimeDelta) -> Result<Self, SeriesError> {
        if step.num_milliseconds() <= 0 {
            return Err(SeriesError::InvalidFrequency {
                rule: format!("{} ms", step.num_milliseconds()),
            });
        }
        Ok(Self(step))
    }

    pub fn step(self) -> TimeDelta {
        self.0
    }
}

impl FromStr for Frequency {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SeriesError::InvalidFrequency {
            rule: s.to_string(),
        };
        let rule = s.trim();
        let split = rule
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (count, unit) = rule.split_at(split);
        let count: i64 = if count.is_empty() {
            1
        } else {
            count.parse().map_err(|_| invalid())?
        };
        let unit_seconds = match unit.to_ascii_lowercase().as_str() {
            "s" | "sec" | "second" | "seconds" => 1,
            "t" | "min" | "minute" | "minutes" => 60,
            "h" | "hour" | "hours" => 3_600,
            "d" | "day" | "days" => 86_400,
            _ => return Err(invalid()),
        };
        let seconds = count.checked_mul(unit_seconds).ok_or_else(invalid)?;
        let step = TimeDelta::try_seconds(seconds).ok_or_else(invalid)?;
        Self::new(step).map_err(|_| invalid())
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.0.num_milliseconds();
        match ms {
            _ if ms % 86_400_000 == 0 => write!(f, "{}D", ms / 86_400_000),
            _ if ms % 3_600_000 == 0 => write!(f, "{}h", ms / 3_600_000),
            _ if ms % 60_000 == 0 => write!(f, "{}min", ms / 60_000),
            _ if ms % 1_000 == 0 => write!(f, "{}s", ms / 1_000),
            _ => write!(f, "{ms}ms"),
        }
    }
}

fn bin_index(t: NaiveDateTime, step_ms: i64) -> i64 {
    (t - NaiveDateTime::default())
        .num_milliseconds()
        .div_euclid(step_ms)
}

/// Aggregate `series` into bins of width `freq`.
///
/// # Errors
///
/// Returns [`SeriesError::InvalidFrequency`] if a bin edge falls outside
/// the representable date range.
pub fn resample(
    series: &TimeSeries,
    freq: Frequency,
    how: Aggregation,
) -> Result<TimeSeries, SeriesError> {
    let (Some(start), Some(end)) = (series.start(), series.end()) else {
        return Ok(TimeSeries::default());
    };
    let step_ms = freq.step().num_milliseconds();
    let first = bin_index(start, step_ms);
    let n_bins = usize::try_from(bin_index(end, step_ms) - first + 1).unwrap_or(0);

    let mut sums = vec![0.0; n_bins];
    let mut counts = vec![0usize; n_bins];
    for (t, v) in series.iter().filter(|(_, v)| v.is_finite()) {
        let i = (bin_index(t, step_ms) - first) as usize;
        sums[i] += v;
        counts[i] += 1;
    }

    let out_of_range = || SeriesError::InvalidFrequency {
        rule: freq.to_string(),
    };
    let times = (0..n_bins as i64)
        .map(|i| {
            TimeDelta::try_milliseconds((first + i) * step_ms)
                .and_then(|offset| NaiveDateTime::default().checked_add_signed(offset))
                .ok_or_else(out_of_range)
        })
        .collect::<Result<Vec<_>, _>>()?;
    let values = sums
        .iter()
        .zip(&counts)
        .map(|(&sum, &n)| match how {
            Aggregation::Sum => sum,
            Aggregation::Mean if n > 0 => sum / n as f64,
            Aggregation::Mean => f64::NAN,
        })
        .collect();

    debug!(n_in = series.len(), n_out = n_bins, %freq, ?how, "resampled series");
    TimeSeries::new(times, values)
}

impl TimeSeries {
    /// See [`resample`].
    pub fn resample(&self, freq: Frequency, how: Aggregation) -> Result<Self, SeriesError> {
        resample(self, freq, how)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .and_then(|d| d.and_hms_opt(h, m, 0))
            .unwrap()
    }

    #[test]
    fn parse_rules() {
        let h = |n| TimeDelta::hours(n);
        assert_eq!("D".parse::<Frequency>().unwrap().step(), h(24));
        assert_eq!("1d".parse::<Frequency>().unwrap().step(), h(24));
        assert_eq!("H".parse::<Frequency>().unwrap().step(), h(1));
        assert_eq!("3h".parse::<Frequency>().unwrap().step(), h(3));
        assert_eq!(
            "15T".parse::<Frequency>().unwrap().step(),
            TimeDelta::minutes(15)
        );
        assert_eq!(
            "15min".parse::<Frequency>().unwrap().step(),
            TimeDelta::minutes(15)
        );
        assert_eq!("30s".parse::<Frequency>().unwrap().step(), TimeDelta::seconds(30));
        for bad in ["", "15", "0h", "2w", "h2", "-1h"] {
            assert!(
                matches!(
                    bad.parse::<Frequency>(),
                    Err(SeriesError::InvalidFrequency { .. })
                ),
                "{bad:?} accepted"
            );
        }
    }

    #[test]
    fn display_uses_largest_unit() {
        assert_eq!("24h".parse::<Frequency>().unwrap().to_string(), "1D");
        assert_eq!("90min".parse::<Frequency>().unwrap().to_string(), "90min");
        assert_eq!("120min".parse::<Frequency>().unwrap().to_string(), "2h");
    }

    #[test]
    fn parse_aggregation() {
        assert_eq!("Mean".parse::<Aggregation>().unwrap(), Aggregation::Mean);
        assert_eq!("sum".parse::<Aggregation>().unwrap(), Aggregation::Sum);
        assert!(matches!(
            "median".parse::<Aggregation>(),
            Err(SeriesError::UnknownAggregation { .. })
        ));
    }

    #[test]
    fn hourly_to_daily_mean_and_sum() {
        let times = vec![at(1, 0, 0), at(1, 6, 0), at(1, 18, 0), at(2, 0, 0), at(2, 12, 0)];
        let s = TimeSeries::new(times, vec![1.0, 2.0, 3.0, 10.0, 20.0]).unwrap();
        let freq: Frequency = "D".parse().unwrap();

        let mean = s.resample(freq, Aggregation::Mean).unwrap();
        assert_eq!(mean.times(), &[at(1, 0, 0), at(2, 0, 0)]);
        assert_eq!(mean.values(), &[2.0, 15.0]);

        let sum = s.resample(freq, Aggregation::Sum).unwrap();
        assert_eq!(sum.values(), &[6.0, 30.0]);
    }

    #[test]
    fn bins_anchor_on_the_clock() {
        let times = vec![at(1, 0, 10), at(1, 0, 50), at(1, 1, 5)];
        let s = TimeSeries::new(times, vec![1.0, 3.0, 5.0]).unwrap();
        let out = s.resample("h".parse().unwrap(), Aggregation::Mean).unwrap();
        assert_eq!(out.times(), &[at(1, 0, 0), at(1, 1, 0)]);
        assert_eq!(out.values(), &[2.0, 5.0]);
    }

    #[test]
    fn empty_bins_and_missing_values() {
        let times = vec![at(1, 0, 0), at(1, 1, 0), at(1, 3, 0)];
        let s = TimeSeries::new(times, vec![f64::NAN, 4.0, 6.0]).unwrap();
        let freq: Frequency = "h".parse().unwrap();

        let mean = s.resample(freq, Aggregation::Mean).unwrap();
        assert_eq!(mean.len(), 4);
        assert!(mean.values()[0].is_nan());
        assert_eq!(mean.values()[1], 4.0);
        assert!(mean.values()[2].is_nan());

        let sum = s.resample(freq, Aggregation::Sum).unwrap();
        assert_eq!(sum.values(), &[0.0, 4.0, 0.0, 6.0]);
    }

    #[test]
    fn empty_series_stays_empty() {
        let out = resample(
            &TimeSeries::default(),
            "D".parse().unwrap(),
            Aggregation::Sum,
        )
        .unwrap();
        assert!(out.is_empty());
    }
}
