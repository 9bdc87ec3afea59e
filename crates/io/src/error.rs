//! Error types for rill-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the rill-io crate.
///
/// This enum covers missing files, missing columns, malformed CSV content,
/// and series-level invariant violations encountered when reading or writing
/// time-indexed tables.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Returned when a requested value column is not present in a file.
    #[error("column '{name}' not found in {}", path.display())]
    MissingColumn {
        /// Name of the missing column.
        name: String,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when a dataset role has no column mapped to it.
    #[error("no column mapped to the {role} role")]
    MissingRole {
        /// Role name.
        role: String,
    },

    /// Returned when a role maps to a column the table does not have.
    #[error("{role} column '{name}' not present in dataset")]
    MissingRoleColumn {
        /// Role name.
        role: String,
        /// Mapped column name.
        name: String,
    },

    /// Returned when no timestamp column can be identified.
    #[error("no timestamp column (tried {candidates:?}) in {}", path.display())]
    MissingTimeColumn {
        /// Column names that were tried.
        candidates: Vec<String>,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when a timestamp cell cannot be parsed.
    #[error("invalid timestamp '{value}' on row {row}")]
    InvalidTimestamp {
        /// 1-based data row number (header excluded).
        row: usize,
        /// Raw cell content.
        value: String,
    },

    /// Returned when a value cell is neither numeric nor a missing marker.
    #[error("invalid value '{value}' in column '{column}' on row {row}")]
    InvalidValue {
        /// 1-based data row number (header excluded).
        row: usize,
        /// Column name.
        column: String,
        /// Raw cell content.
        value: String,
    },

    /// Returned when one or more validation checks fail.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },

    /// Wraps an error originating from the csv crate.
    #[error("csv error: {reason}")]
    Csv {
        /// Description of the underlying CSV failure.
        reason: String,
    },

    /// Wraps a series invariant violation (ordering, duplicates).
    #[error("series error: {0}")]
    Series(#[from] rill_series::SeriesError),

    /// Wraps a filesystem error.
    #[error("i/o error on {}: {reason}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },
}

impl From<csv::Error> for IoError {
    fn from(e: csv::Error) -> Self {
        IoError::Csv {
            reason: e.to_string(),
        }
    }
}
