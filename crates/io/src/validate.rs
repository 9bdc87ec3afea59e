//! Accumulated validation utilities.
//!
//! Provides [`ValidationCollector`] for gathering multiple validation errors
//! into a single [`IoError::Validation`], plus helpers that check the shape
//! of a CSV table before its cells are parsed.

use std::collections::BTreeSet;

use crate::error::IoError;

// ---------------------------------------------------------------------------
// ValidationCollector
// ---------------------------------------------------------------------------

/// Accumulates validation errors and converts them into a single
/// [`IoError::Validation`].
pub(crate) struct ValidationCollector {
    errors: Vec<String>,
}

impl ValidationCollector {
    /// Create an empty collector.
    pub(crate) fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record one validation error.
    pub(crate) fn push(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Returns `true` when no errors have been recorded.
    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of recorded errors.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.errors.len()
    }

    /// Consume the collector and return `Ok(())` if no errors were recorded,
    /// or `Err(IoError::Validation { count, details })` otherwise.
    ///
    /// The `details` string joins all messages with `"; "`.
    pub(crate) fn finish(self) -> Result<(), IoError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(IoError::Validation {
                count: self.errors.len(),
                details: self.errors.join("; "),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Header checks
// ---------------------------------------------------------------------------

/// Check a CSV header row: no blank names, no repeated names, and at least
/// one column besides the timestamp.
pub(crate) fn validate_header(headers: &[String], time_idx: usize) -> ValidationCollector {
    let mut c = ValidationCollector::new();

    let mut seen = BTreeSet::new();
    for (i, name) in headers.iter().enumerate() {
        if name.is_empty() {
            c.push(format!("blank column name at position {i}"));
        } else if !seen.insert(name.as_str()) {
            c.push(format!("duplicate column name '{name}'"));
        }
    }

    if headers.len() < 2 || time_idx >= headers.len() {
        c.push("table needs a timestamp column and at least one value column");
    }

    c
}

/// Check that a data row has as many cells as the header.
pub(crate) fn validate_row_width(row: usize, width: usize, expected: usize) -> ValidationCollector {
    let mut c = ValidationCollector::new();
    if width != expected {
        c.push(format!(
            "row {row} has {width} field(s), header has {expected}"
        ));
    }
    c
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
