//! Timestamp-indexed series of floating-point values.

use chrono::NaiveDateTime;

use crate::error::SeriesError;

/// Step size assumed when a series has fewer than two samples.
pub const DEFAULT_STEP_HOURS: f64 = 1.0;

/// An ordered sequence of `(timestamp, value)` pairs.
///
/// Timestamps are strictly increasing. Missing values are stored as NaN so
/// that a gap in one column does not shift the index of the others.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeries {
    times: Vec<NaiveDateTime>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Creates a series from already-sorted timestamps and values.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::LengthMismatch`] when the vectors differ in
    /// length and [`SeriesError::NotSorted`] when timestamps are not
    /// strictly increasing.
    pub fn new(times: Vec<NaiveDateTime>, values: Vec<f64>) -> Result<Self, SeriesError> {
        if times.len() != values.len() {
            return Err(SeriesError::LengthMismatch {
                times: times.len(),
                values: values.len(),
            });
        }
        if let Some(i) = times.windows(2).position(|w| w[0] >= w[1]) {
            return Err(SeriesError::NotSorted {
                index: i + 1,
                previous: times[i],
                current: times[i + 1],
            });
        }
        Ok(Self { times, values })
    }

    /// Creates a series from pairs in arbitrary order, sorting on ingest.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::DuplicateTimestamp`] if two pairs share a
    /// timestamp.
    pub fn from_unsorted(mut pairs: Vec<(NaiveDateTime, f64)>) -> Result<Self, SeriesError> {
        pairs.sort_by_key(|&(t, _)| t);
        if let Some(w) = pairs.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(SeriesError::DuplicateTimestamp { timestamp: w[0].0 });
        }
        let (times, values) = pairs.into_iter().unzip();
        Ok(Self { times, values })
    }

    /// Creates a series sharing this series' index with new values.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::LengthMismatch`] if `values` has a different
    /// length from the index.
    pub fn with_values(&self, values: Vec<f64>) -> Result<Self, SeriesError> {
        if values.len() != self.times.len() {
            return Err(SeriesError::LengthMismatch {
                times: self.times.len(),
                values: values.len(),
            });
        }
        Ok(Self {
            times: self.times.clone(),
            values,
        })
    }

    /// Returns the timestamps.
    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    /// Returns the values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Returns `true` if the series holds no samples.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// First timestamp, if any.
    pub fn start(&self) -> Option<NaiveDateTime> {
        self.times.first().copied()
    }

    /// Last timestamp, if any.
    pub fn end(&self) -> Option<NaiveDateTime> {
        self.times.last().copied()
    }

    /// Iterates over `(timestamp, value)` pairs in ascending time.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.times.iter().copied().zip(self.values.iter().copied())
    }

    /// Step size in hours, estimated from the first two samples only.
    ///
    /// Series with fewer than two samples report [`DEFAULT_STEP_HOURS`].
    /// Spacing further into the series is not inspected.
    pub fn step_hours(&self) -> f64 {
        match self.times.as_slice() {
            [first, second, ..] => (*second - *first).num_seconds() as f64 / 3600.0,
            _ => DEFAULT_STEP_HOURS,
        }
    }

    /// Inclusive sub-series between `start` and `end`.
    pub fn slice_between(&self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        let lo = self.times.partition_point(|t| *t < start);
        let hi = self.times.partition_point(|t| *t <= end);
        if lo >= hi {
            return Self::default();
        }
        Self {
            times: self.times[lo..hi].to_vec(),
            values: self.values[lo..hi].to_vec(),
        }
    }

    /// Index of `timestamp`, if present.
    pub fn position(&self, timestamp: NaiveDateTime) -> Option<usize> {
        self.times.binary_search(&timestamp).ok()
    }

    /// Number of non-finite (missing) values.
    pub fn n_missing(&self) -> usize {
        self.values.iter().filter(|v| !v.is_finite()).count()
    }
}
