//! Flow duration curves.

use rill_series::TimeSeries;

use crate::xy::XyFigure;

/// Exceedance probability (percent) against flow, highest flow first.
///
/// The i-th largest of n finite values is exceeded with probability
/// `i / n * 100`, so the smallest value sits at 100 %.
pub fn exceedance(values: &[f64]) -> Vec<(f64, f64)> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(|a, b| b.total_cmp(a));
    let n = sorted.len() as f64;
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, v)| ((i + 1) as f64 / n * 100.0, v))
        .collect()
}

/// Duration curve of `observed`, with `simulated` dashed on top when given.
pub fn flow_duration_curve(
    observed: &TimeSeries,
    simulated: Option<&TimeSeries>,
    log_scale: bool,
) -> XyFigure {
    let mut fig = XyFigure::new()
        .with_title("Flow Duration Curve")
        .with_x_label("Exceedance probability (%)")
        .with_y_label("Discharge")
        .with_log_y(log_scale)
        .with_line("Observed", exceedance(observed.values()));
    if let Some(sim) = simulated {
        fig = fig.with_dashed_line("Simulated", exceedance(sim.values()));
    }
    fig
}
