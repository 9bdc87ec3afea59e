//! Inner-join alignment of independently sourced series.
//!
//! Rows are kept only where every series has a timestamp and every value at
//! that timestamp is finite. Gaps are dropped, never filled.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::error::SeriesError;
use crate::series::TimeSeries;

/// Observed and simulated values on a shared timestamp index.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPair {
    times: Vec<NaiveDateTime>,
    observed: Vec<f64>,
    simulated: Vec<f64>,
}

impl AlignedPair {
    /// Shared timestamps, ascending.
    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    /// Observed values.
    pub fn observed(&self) -> &[f64] {
        &self.observed
    }

    /// Simulated values.
    pub fn simulated(&self) -> &[f64] {
        &self.simulated
    }

    /// Number of aligned rows.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always `false` for a pair produced by [`align`].
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Any number of series joined on their common, complete timestamps.
///
/// `columns()[i]` holds the values of the `i`-th input series.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedFrame {
    times: Vec<NaiveDateTime>,
    columns: Vec<Vec<f64>>,
}

impl AlignedFrame {
    /// Shared timestamps, ascending.
    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    /// Value columns in input order.
    pub fn columns(&self) -> &[Vec<f64>] {
        &self.columns
    }

    /// Values of column `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not a valid column index.
    pub fn column(&self, i: usize) -> &[f64] {
        &self.columns[i]
    }

    /// Number of aligned rows.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always `false` for a frame produced by [`align_all`].
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Rebuilds column `i` as a [`TimeSeries`] on the shared index.
    pub fn series(&self, i: usize) -> TimeSeries {
        TimeSeries::new(self.times.clone(), self.columns[i].clone())
            .unwrap_or_else(|_| unreachable!("aligned index is strictly increasing"))
    }
}

/// Inner-joins `observed` and `simulated` on timestamp.
///
/// # Errors
///
/// Returns [`SeriesError::NoOverlap`] if no timestamp carries a finite value
/// in both series.
pub fn align(observed: &TimeSeries, simulated: &TimeSeries) -> Result<AlignedPair, SeriesError> {
    let frame = align_all(&[observed, simulated])?;
    let AlignedFrame { times, mut columns } = frame;
    let simulated = columns.pop().unwrap_or_default();
    let observed = columns.pop().unwrap_or_default();
    Ok(AlignedPair {
        times,
        observed,
        simulated,
    })
}

/// Jointly inner-joins every series in `series` on timestamp.
///
/// The join is performed over all inputs at once rather than pairwise, so a
/// row survives only if it is complete in every series.
///
/// # Errors
///
/// Returns [`SeriesError::NoOverlap`] if `series` is empty or no complete
/// row remains.
pub fn align_all(series: &[&TimeSeries]) -> Result<AlignedFrame, SeriesError> {
    let n_series = series.len();
    let Some((first, rest)) = series.split_first() else {
        return Err(SeriesError::NoOverlap { n_series });
    };

    let mut cursors = vec![0usize; rest.len()];
    let mut times = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); n_series];
    let mut row = vec![0.0; n_series];

    'rows: for (t, v) in first.iter() {
        row[0] = v;
        for (j, other) in rest.iter().enumerate() {
            // Both indices are sorted, so each cursor only moves forward.
            let other_times = other.times();
            let c = &mut cursors[j];
            while *c < other_times.len() && other_times[*c] < t {
                *c += 1;
            }
            if *c >= other_times.len() || other_times[*c] != t {
                continue 'rows;
            }
            row[j + 1] = other.values()[*c];
        }
        if row.iter().all(|x| x.is_finite()) {
            times.push(t);
            for (col, &x) in columns.iter_mut().zip(row.iter()) {
                col.push(x);
            }
        }
    }

    if times.is_empty() {
        return Err(SeriesError::NoOverlap { n_series });
    }

    debug!(
        n_series,
        n_rows = times.len(),
        n_first = first.len(),
        "aligned series"
    );

    Ok(AlignedFrame { times, columns })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta};

    fn t(h: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 3, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap()
            + TimeDelta::hours(h)
    }

    fn series(hours: &[i64], values: &[f64]) -> TimeSeries {
        TimeSeries::new(hours.iter().map(|&h| t(h)).collect(), values.to_vec()).unwrap()
    }

    #[test]
    fn align_intersects_indices() {
        let obs = series(&[0, 1, 2, 3], &[1.0, 2.0, 3.0, 4.0]);
        let sim = series(&[1, 3, 5], &[10.0, 30.0, 50.0]);

        let pair = align(&obs, &sim).unwrap();
        assert_eq!(pair.times(), &[t(1), t(3)]);
        assert_eq!(pair.observed(), &[2.0, 4.0]);
        assert_eq!(pair.simulated(), &[10.0, 30.0]);
    }

    #[test]
    fn align_drops_incomplete_rows() {
        let obs = series(&[0, 1, 2], &[1.0, f64::NAN, 3.0]);
        let sim = series(&[0, 1, 2], &[1.5, 2.5, f64::NAN]);

        let pair = align(&obs, &sim).unwrap();
        assert_eq!(pair.len(), 1);
        assert_eq!(pair.times(), &[t(0)]);
    }

    #[test]
    fn align_disjoint_fails() {
        let obs = series(&[0, 1], &[1.0, 2.0]);
        let sim = series(&[5, 6], &[1.0, 2.0]);
        assert!(matches!(
            align(&obs, &sim),
            Err(SeriesError::NoOverlap { n_series: 2 })
        ));
    }

    #[test]
    fn align_all_missing_everywhere_fails() {
        let obs = series(&[0, 1], &[f64::NAN, 2.0]);
        let sim = series(&[0, 1], &[1.0, f64::NAN]);
        assert!(align(&obs, &sim).is_err());
    }

    #[test]
    fn align_all_joins_jointly() {
        let a = series(&[0, 1, 2, 3], &[1.0, 2.0, 3.0, 4.0]);
        let b = series(&[1, 2, 3], &[20.0, 30.0, 40.0]);
        let c = series(&[0, 2, 3], &[100.0, 300.0, f64::NAN]);

        let frame = align_all(&[&a, &b, &c]).unwrap();
        assert_eq!(frame.times(), &[t(2)]);
        assert_eq!(frame.column(0), &[3.0]);
        assert_eq!(frame.column(1), &[30.0]);
        assert_eq!(frame.column(2), &[300.0]);
    }

    #[test]
    fn align_all_empty_input_fails() {
        assert!(matches!(
            align_all(&[]),
            Err(SeriesError::NoOverlap { n_series: 0 })
        ));
    }

    #[test]
    fn frame_series_round_trips_index() {
        let a = series(&[0, 1], &[1.0, 2.0]);
        let b = series(&[0, 1], &[3.0, 4.0]);
        let frame = align_all(&[&a, &b]).unwrap();
        assert_eq!(frame.series(1), b);
    }
}
