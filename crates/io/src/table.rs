//! Sorted, timestamp-indexed table of named value columns.

use chrono::NaiveDateTime;

use rill_series::{Aggregation, Frequency, SeriesError, TimeSeries};

use crate::error::IoError;

/// A timestamp index shared by one or more named `f64` columns.
///
/// Rows are held in ascending time order with no repeated timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    time_column: String,
    times: Vec<NaiveDateTime>,
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl Table {
    /// Builds a table from unsorted rows, sorting them by timestamp.
    pub(crate) fn from_rows(
        time_column: String,
        names: Vec<String>,
        mut rows: Vec<(NaiveDateTime, Vec<f64>)>,
    ) -> Result<Self, IoError> {
        rows.sort_by_key(|(t, _)| *t);
        if let Some(w) = rows.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(SeriesError::DuplicateTimestamp { timestamp: w[0].0 }.into());
        }

        let mut times = Vec::with_capacity(rows.len());
        let mut columns = vec![Vec::with_capacity(rows.len()); names.len()];
        for (t, values) in rows {
            times.push(t);
            for (col, v) in columns.iter_mut().zip(values) {
                col.push(v);
            }
        }

        Ok(Self {
            time_column,
            times,
            names,
            columns,
        })
    }

    /// Name of the timestamp column as it appeared in the header.
    pub fn time_column(&self) -> &str {
        &self.time_column
    }

    /// Timestamps, ascending.
    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    /// Value column names in header order.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.times.len()
    }

    /// Values of a named column.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
    }

    /// `(name, values)` pairs in header order, as [`crate::write_table`] takes them.
    pub fn named_columns(&self) -> Vec<(&str, &[f64])> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
            .collect()
    }

    /// A named column as a [`TimeSeries`].
    ///
    /// Returns `None` if the column does not exist.
    pub fn series(&self, name: &str) -> Option<Result<TimeSeries, SeriesError>> {
        self.column(name)
            .map(|values| TimeSeries::new(self.times.clone(), values.to_vec()))
    }

    /// Rows with timestamps in `[start, end]`, all columns kept.
    pub fn subset(&self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        let lo = self.times.partition_point(|t| *t < start);
        let hi = self.times.partition_point(|t| *t <= end).max(lo);
        Self {
            time_column: self.time_column.clone(),
            times: self.times[lo..hi].to_vec(),
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c[lo..hi].to_vec()).collect(),
        }
    }

    /// Resample every column onto bins of width `freq`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Series`] if a bin edge is out of range.
    pub fn resample(&self, freq: Frequency, how: Aggregation) -> Result<Self, IoError> {
        let mut times = None;
        let mut columns = Vec::with_capacity(self.columns.len());
        for values in &self.columns {
            let series = TimeSeries::new(self.times.clone(), values.clone())?.resample(freq, how)?;
            times.get_or_insert_with(|| series.times().to_vec());
            columns.push(series.values().to_vec());
        }
        Ok(Self {
            time_column: self.time_column.clone(),
            times: times.unwrap_or_default(),
            names: self.names.clone(),
            columns,
        })
    }
}
