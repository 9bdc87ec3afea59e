//! Residual (simulated minus observed) plots.

use tracing::debug;

use rill_series::{TimeSeries, align};

use crate::error::PlotError;
use crate::figure::Figure;

/// Simulated minus observed on the shared timestamps, with the mean residual
/// as a reference line and a band of one standard deviation around it.
///
/// # Errors
///
/// Returns [`PlotError::Align`] if the series share no complete timestamp.
pub fn residual_figure(observed: &TimeSeries, simulated: &TimeSeries) -> Result<Figure, PlotError> {
    let pair = align(observed, simulated)?;
    let residuals: Vec<f64> = pair
        .observed()
        .iter()
        .zip(pair.simulated())
        .map(|(o, s)| s - o)
        .collect();
    let mean = rill_stats::mean(&residuals);
    let sd = rill_stats::sd(&residuals);
    debug!(n = residuals.len(), mean, sd, "residuals computed");

    let series = TimeSeries::new(pair.times().to_vec(), residuals)?;
    Ok(Figure::new()
        .with_title("Residuals (Sim - Obs)")
        .with_x_label("Time")
        .with_y_label("Residual")
        .with_band(mean - sd, mean + sd)
        .with_line("Residual", &series)
        .with_reference_line(format!("Mean ({mean:.2})"), mean))
}
