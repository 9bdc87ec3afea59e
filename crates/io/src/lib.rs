//! # rill-io
//!
//! Read timestamp-indexed CSV tables into [`rill_series::TimeSeries`] values
//! and write series, tables, and record lists back to CSV. A [`Dataset`]
//! adds column roles and catchment metadata to a table.
//!
//! ```ignore
//! use rill_io::{ReaderConfig, read_series};
//!
//! let cfg = ReaderConfig::default().with_value_column(Some("discharge"));
//! let q = read_series(Path::new("q.csv"), &cfg)?;
//! ```

mod dataset;
mod error;
mod reader;
mod table;
mod validate;
mod writer;

pub use dataset::{ColumnRoles, Dataset, Metadata, Role, UNNAMED};
pub use error::IoError;
pub use reader::{ReaderConfig, parse_timestamp, read_series, read_table};
pub use table::Table;
pub use writer::{WriterConfig, read_records, write_records, write_series, write_table};
