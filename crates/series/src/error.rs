//! Error types for the rill-series crate.

use chrono::NaiveDateTime;

/// Error type for all fallible operations in the rill-series crate.
///
/// Covers construction of a [`TimeSeries`](crate::TimeSeries) that violates
/// the ordering invariant and alignment of series that share no complete
/// timestamps.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeriesError {
    /// Returned when the timestamp and value vectors differ in length.
    #[error("length mismatch: {times} timestamps vs {values} values")]
    LengthMismatch {
        /// Number of timestamps provided.
        times: usize,
        /// Number of values provided.
        values: usize,
    },

    /// Returned when timestamps are not strictly increasing.
    #[error("timestamps not strictly increasing at index {index} ({previous} >= {current})")]
    NotSorted {
        /// Index of the offending timestamp.
        index: usize,
        /// Timestamp preceding the offending one.
        previous: NaiveDateTime,
        /// Offending timestamp.
        current: NaiveDateTime,
    },

    /// Returned when the same timestamp appears more than once.
    #[error("duplicate timestamp {timestamp}")]
    DuplicateTimestamp {
        /// The repeated timestamp.
        timestamp: NaiveDateTime,
    },

    /// Returned for a resampling rule that is not a positive duration.
    #[error("invalid resampling frequency '{rule}'")]
    InvalidFrequency {
        /// The rule as given.
        rule: String,
    },

    /// Returned for an aggregation other than `mean` or `sum`.
    #[error("unsupported aggregation '{name}' (expected mean or sum)")]
    UnknownAggregation {
        /// The name as given.
        name: String,
    },

    /// Returned when alignment leaves no complete rows.
    #[error("no overlapping timestamps with complete values across {n_series} series")]
    NoOverlap {
        /// Number of series taking part in the join.
        n_series: usize,
    },
}
