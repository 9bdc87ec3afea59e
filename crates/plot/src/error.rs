//! Plot rendering error types.

use std::path::PathBuf;

/// Errors that can occur while rendering or saving a figure.
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    /// The figure has no line layers.
    #[error("figure has no series to draw")]
    EmptyFigure,

    /// Every layer is empty or entirely non-finite.
    #[error("no finite values to plot")]
    NoFiniteValues,

    /// The series to compare share no usable timestamp.
    #[error("cannot pair series: {0}")]
    Align(#[from] rill_series::SeriesError),

    /// A style preset name was not recognised.
    #[error("unknown plot style '{name}' (expected default or publication)")]
    UnknownStyle { name: String },

    /// Writing the output file failed.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
