//! CSV reader configuration and orchestration.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info};

use rill_series::TimeSeries;

use crate::error::IoError;
use crate::table::Table;
use crate::validate::{validate_header, validate_row_width};

/// Timestamp layouts accepted in the time column, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Cell contents treated as a missing value.
const MISSING_MARKERS: &[&str] = &["", "na", "nan", "null", "none", "-"];

// ---------------------------------------------------------------------------
// ReaderConfig
// ---------------------------------------------------------------------------

/// Configuration for reading timestamp-indexed CSV tables.
///
/// The [`Default`] implementation looks for a time column called `time`,
/// `timestamp`, `datetime`, or `date` (case-insensitive) and selects the
/// first remaining column as the value column.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Explicit time column name; when set, aliases are not consulted.
    time_column: Option<String>,
    /// Aliases to try when looking up the time column.
    time_aliases: Vec<String>,
    /// Value column returned by [`read_series`].
    value_column: Option<String>,
    /// Field delimiter.
    delimiter: u8,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            time_column: None,
            time_aliases: vec![
                "time".into(),
                "timestamp".into(),
                "datetime".into(),
                "date".into(),
            ],
            value_column: None,
            delimiter: b',',
        }
    }
}

impl ReaderConfig {
    /// Set the time column name explicitly.
    pub fn with_time_column(mut self, name: impl Into<String>) -> Self {
        self.time_column = Some(name.into());
        self
    }

    /// Set the value column, or `None` to take the first non-time column.
    pub fn with_value_column(mut self, name: Option<impl Into<String>>) -> Self {
        self.value_column = name.map(Into::into);
        self
    }

    /// Set the field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Returns the configured value column, if any.
    pub fn value_column(&self) -> Option<&str> {
        self.value_column.as_deref()
    }

    fn time_candidates(&self) -> Vec<String> {
        match &self.time_column {
            Some(name) => vec![name.clone()],
            None => self.time_aliases.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// read_table / read_series
// ---------------------------------------------------------------------------

/// Read a timestamp-indexed table from a CSV file.
///
/// The first row is the header. Rows are sorted by timestamp on ingest;
/// value cells that are empty or hold a missing marker (`NA`, `NaN`,
/// `null`, ...) become NaN.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if `path` does not exist,
/// [`IoError::MissingTimeColumn`] if no time column is found,
/// [`IoError::Validation`] for malformed headers or ragged rows,
/// [`IoError::InvalidTimestamp`] / [`IoError::InvalidValue`] for unparsable
/// cells, and [`IoError::Series`] for duplicate timestamps.
pub fn read_table(path: &Path, config: &ReaderConfig) -> Result<Table, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let candidates = config.time_candidates();
    let time_idx = find_time_column(&headers, &candidates).ok_or_else(|| {
        IoError::MissingTimeColumn {
            candidates: candidates.clone(),
            path: path.to_path_buf(),
        }
    })?;
    validate_header(&headers, time_idx).finish()?;

    let value_names: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != time_idx)
        .map(|(_, h)| h.clone())
        .collect();

    let mut rows: Vec<(NaiveDateTime, Vec<f64>)> = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let row = i + 1;
        validate_row_width(row, record.len(), headers.len()).finish()?;

        let raw_time = &record[time_idx];
        let time = parse_timestamp(raw_time).ok_or_else(|| IoError::InvalidTimestamp {
            row,
            value: raw_time.to_string(),
        })?;

        let mut values = Vec::with_capacity(value_names.len());
        for (j, cell) in record.iter().enumerate() {
            if j == time_idx {
                continue;
            }
            let value = parse_value(cell).ok_or_else(|| IoError::InvalidValue {
                row,
                column: headers[j].clone(),
                value: cell.to_string(),
            })?;
            values.push(value);
        }
        rows.push((time, values));
    }

    debug!(
        path = %path.display(),
        n_rows = rows.len(),
        n_columns = value_names.len(),
        time_column = %headers[time_idx],
        "parsed csv"
    );

    Table::from_rows(headers[time_idx].clone(), value_names, rows)
}

/// Read a single value column from a CSV file as a [`TimeSeries`].
///
/// Uses [`ReaderConfig::value_column`] when set, otherwise the first column
/// that is not the timestamp.
///
/// # Errors
///
/// Returns [`IoError::MissingColumn`] if the configured column is absent,
/// plus every error [`read_table`] can return.
pub fn read_series(path: &Path, config: &ReaderConfig) -> Result<TimeSeries, IoError> {
    let table = read_table(path, config)?;
    let name = match config.value_column() {
        Some(name) => name.to_string(),
        None => table
            .column_names()
            .first()
            .cloned()
            .ok_or_else(|| IoError::MissingColumn {
                name: "<first value column>".to_string(),
                path: path.to_path_buf(),
            })?,
    };
    let series = table
        .series(&name)
        .ok_or_else(|| IoError::MissingColumn {
            name: name.clone(),
            path: path.to_path_buf(),
        })??;
    info!(
        path = %path.display(),
        column = %name,
        n = series.len(),
        n_missing = series.n_missing(),
        "series loaded"
    );
    Ok(series)
}

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

fn find_time_column(headers: &[String], candidates: &[String]) -> Option<usize> {
    candidates.iter().find_map(|c| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(c))
    })
}

/// Parse a timestamp in any accepted cell format. Date-only values resolve
/// to midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Parse a value cell. Missing markers become NaN; anything else that is
/// not a number is rejected.
pub(crate) fn parse_value(raw: &str) -> Option<f64> {
    if MISSING_MARKERS
        .iter()
        .any(|m| raw.eq_ignore_ascii_case(m))
    {
        return Some(f64::NAN);
    }
    raw.parse::<f64>().ok()
}
