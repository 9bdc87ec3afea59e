//! # rill-plot
//!
//! Renders hydrological series as SVG. [`Figure`] draws time-axis line
//! charts with thresholds, shaded event periods, markers and reference
//! bands. [`XyFigure`] draws numeric-axis charts such as scatter plots and
//! flow duration curves. [`ComparisonPlot`] stacks a hydrograph over an
//! observed/simulated scatter.
//!
//! Styling is an explicit [`PlotStyle`] value handed to each render call.

mod axis;
mod canvas;
mod comparison;
mod error;
mod fdc;
mod figure;
mod residuals;
mod style;
mod xy;

pub use comparison::ComparisonPlot;
pub use error::PlotError;
pub use fdc::{exceedance, flow_duration_curve};
pub use figure::{Figure, peak};
pub use residuals::residual_figure;
pub use style::{Margins, PlotStyle};
pub use xy::XyFigure;
