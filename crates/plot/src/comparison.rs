//! Two-panel observed/simulated comparison: hydrograph above, scatter below.

use std::fmt::Write as _;
use std::path::Path;

use tracing::info;

use rill_series::{AlignedPair, TimeSeries, align};

use crate::canvas;
use crate::error::PlotError;
use crate::figure::Figure;
use crate::style::PlotStyle;
use crate::xy::XyFigure;

/// Observed and simulated discharge on their shared timestamps.
#[derive(Debug, Clone)]
pub struct ComparisonPlot {
    pair: AlignedPair,
    hydrograph_note: Vec<String>,
    scatter_note: Vec<String>,
}

impl ComparisonPlot {
    /// # Errors
    ///
    /// Returns [`PlotError::Align`] if the series share no complete timestamp.
    pub fn new(observed: &TimeSeries, simulated: &TimeSeries) -> Result<Self, PlotError> {
        Ok(Self {
            pair: align(observed, simulated)?,
            hydrograph_note: Vec::new(),
            scatter_note: Vec::new(),
        })
    }

    /// Text boxed in the hydrograph panel, typically efficiency scores.
    pub fn with_hydrograph_note(mut self, lines: Vec<String>) -> Self {
        self.hydrograph_note = lines;
        self
    }

    /// Text boxed in the scatter panel, typically error scores.
    pub fn with_scatter_note(mut self, lines: Vec<String>) -> Self {
        self.scatter_note = lines;
        self
    }

    fn hydrograph(&self) -> Result<Figure, PlotError> {
        let times = self.pair.times().to_vec();
        let observed = TimeSeries::new(times.clone(), self.pair.observed().to_vec())?;
        let simulated = TimeSeries::new(times, self.pair.simulated().to_vec())?;
        Ok(Figure::new()
            .with_title("Hydrograph Comparison")
            .with_y_label("Discharge")
            .with_line("Observed", &observed)
            .with_line("Simulated", &simulated)
            .with_annotation(self.hydrograph_note.clone()))
    }

    fn scatter(&self) -> XyFigure {
        let points = self
            .pair
            .observed()
            .iter()
            .copied()
            .zip(self.pair.simulated().iter().copied())
            .collect();
        XyFigure::new()
            .with_title("Scatter Plot")
            .with_x_label("Observed")
            .with_y_label("Simulated")
            .with_points("Simulated", points)
            .with_identity_line()
            .with_annotation(self.scatter_note.clone())
    }

    /// Both panels stacked in one SVG document twice the style height.
    ///
    /// # Errors
    ///
    /// Returns [`PlotError::NoFiniteValues`] if the pair has no rows.
    pub fn render(&self, style: &PlotStyle) -> Result<String, PlotError> {
        if self.pair.is_empty() {
            return Err(PlotError::NoFiniteValues);
        }
        let w = f64::from(style.width());
        let h = f64::from(style.height());
        let mut svg = String::new();
        canvas::open_svg(&mut svg, style, w, h * 2.0);
        canvas::background(&mut svg, style, w, h * 2.0);
        svg.push_str("<g class=\"panel\">\n");
        self.hydrograph()?.draw(&mut svg, style, w, h)?;
        svg.push_str("</g>\n");
        let _ = writeln!(svg, r#"<g class="panel" transform="translate(0,{h})">"#);
        self.scatter().draw(&mut svg, style, w, h)?;
        svg.push_str("</g>\n");
        canvas::close_svg(&mut svg);
        Ok(svg)
    }

    /// Render and write the SVG to `path`.
    ///
    /// # Errors
    ///
    /// As [`ComparisonPlot::render`], plus [`PlotError::Io`] on write failure.
    pub fn save(&self, path: &Path, style: &PlotStyle) -> Result<(), PlotError> {
        let svg = self.render(style)?;
        std::fs::write(path, svg).map_err(|source| PlotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), rows = self.pair.len(), "comparison written");
        Ok(())
    }
}
