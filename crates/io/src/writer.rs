//! CSV writer configuration and orchestration.

use std::path::Path;

use chrono::NaiveDateTime;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use rill_series::TimeSeries;

use crate::error::IoError;

/// Configuration for writing timestamp-indexed CSV tables.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Header name of the timestamp column.
    time_column: String,
    /// `strftime` layout for timestamps.
    time_format: String,
    /// Decimal places for values; `None` writes the shortest exact form.
    precision: Option<usize>,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            time_column: "time".to_string(),
            time_format: "%Y-%m-%d %H:%M:%S".to_string(),
            precision: None,
        }
    }
}

impl WriterConfig {
    /// Sets the timestamp column header.
    pub fn with_time_column(mut self, name: impl Into<String>) -> Self {
        self.time_column = name.into();
        self
    }

    /// Sets the timestamp layout.
    pub fn with_time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = format.into();
        self
    }

    /// Sets the number of decimal places written for values.
    pub fn with_precision(mut self, precision: Option<usize>) -> Self {
        self.precision = precision;
        self
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if the time column name is blank.
    fn validate(&self) -> Result<(), IoError> {
        if self.time_column.trim().is_empty() {
            return Err(IoError::Validation {
                count: 1,
                details: "time column name must not be blank".to_string(),
            });
        }
        Ok(())
    }

    fn format_value(&self, v: f64) -> String {
        if !v.is_finite() {
            return String::new();
        }
        match self.precision {
            Some(p) => format!("{v:.p$}"),
            None => v.to_string(),
        }
    }
}

/// Write several value columns on a shared timestamp index.
///
/// Non-finite values are written as empty cells so they read back as
/// missing.
///
/// # Errors
///
/// Returns [`IoError::Validation`] if a column length differs from the
/// index, and [`IoError::Csv`] on write failure.
pub fn write_table(
    path: &Path,
    times: &[NaiveDateTime],
    columns: &[(&str, &[f64])],
    config: &WriterConfig,
) -> Result<(), IoError> {
    config.validate()?;

    let bad: Vec<String> = columns
        .iter()
        .filter(|(_, v)| v.len() != times.len())
        .map(|(name, v)| format!("column '{name}' has {} rows, index has {}", v.len(), times.len()))
        .collect();
    if !bad.is_empty() {
        return Err(IoError::Validation {
            count: bad.len(),
            details: bad.join("; "),
        });
    }

    let mut writer = csv::Writer::from_path(path)?;

    let mut header = Vec::with_capacity(columns.len() + 1);
    header.push(config.time_column.as_str());
    header.extend(columns.iter().map(|(name, _)| *name));
    writer.write_record(&header)?;

    for (i, t) in times.iter().enumerate() {
        let mut record = Vec::with_capacity(columns.len() + 1);
        record.push(t.format(&config.time_format).to_string());
        record.extend(columns.iter().map(|(_, v)| config.format_value(v[i])));
        writer.write_record(&record)?;
    }
    writer.flush().map_err(|e| IoError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    info!(path = %path.display(), n_rows = times.len(), "table written");
    Ok(())
}

/// Write one series as a two-column CSV (`time,<value_name>`).
///
/// # Errors
///
/// See [`write_table`].
pub fn write_series(
    path: &Path,
    series: &TimeSeries,
    value_name: &str,
    config: &WriterConfig,
) -> Result<(), IoError> {
    write_table(path, series.times(), &[(value_name, series.values())], config)
}

/// Write serialisable records with a header derived from field names.
///
/// # Errors
///
/// Returns [`IoError::Csv`] if serialisation or writing fails.
pub fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<(), IoError> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(|e| IoError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    info!(path = %path.display(), n_records = records.len(), "records written");
    Ok(())
}

/// Read records written by [`write_records`] (or any CSV whose header
/// matches `T`'s field names; extra columns are ignored).
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if `path` does not exist and
/// [`IoError::Csv`] if a row fails to deserialise.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let records = reader
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()?;
    Ok(records)
}
