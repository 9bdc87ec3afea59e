//! Figure builder and SVG rendering.

use std::fmt::Write as _;
use std::path::Path;

use chrono::NaiveDateTime;
use tracing::{debug, info};

use rill_series::TimeSeries;

use crate::axis::{Scale, time_coord, time_ticks};
use crate::canvas::{self, Area, LegendEntry, Swatch, escape};
use crate::error::PlotError;
use crate::style::PlotStyle;

#[derive(Debug, Clone)]
struct Layer {
    label: String,
    series: TimeSeries,
}

#[derive(Debug, Clone)]
struct Marker {
    label: String,
    time: NaiveDateTime,
    value: f64,
}

/// Time and value of the largest finite sample, first occurrence on ties.
pub fn peak(series: &TimeSeries) -> Option<(NaiveDateTime, f64)> {
    series
        .iter()
        .filter(|(_, v)| v.is_finite())
        .fold(None, |best, (t, v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((t, v)),
        })
}

/// A time-axis line chart.
///
/// ```ignore
/// let svg = Figure::new()
///     .with_title("Discharge")
///     .with_line("observed", &q_obs)
///     .with_threshold(50.0)
///     .render(&PlotStyle::default())?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Figure {
    title: Option<String>,
    x_label: Option<String>,
    y_label: Option<String>,
    layers: Vec<Layer>,
    threshold: Option<f64>,
    intervals: Vec<(NaiveDateTime, NaiveDateTime)>,
    event_labels: bool,
    markers: Vec<Marker>,
    references: Vec<(String, f64)>,
    band: Option<(f64, f64)>,
    annotation: Vec<String>,
}

impl Figure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = Some(label.into());
        self
    }

    pub fn with_y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = Some(label.into());
        self
    }

    /// Add a line layer. Layers are drawn in insertion order.
    pub fn with_line(mut self, label: impl Into<String>, series: &TimeSeries) -> Self {
        self.layers.push(Layer {
            label: label.into(),
            series: series.clone(),
        });
        self
    }

    /// Draw a horizontal reference line at `value`.
    pub fn with_threshold(mut self, value: f64) -> Self {
        self.threshold = Some(value);
        self
    }

    /// Shade `[start, end]` periods behind the lines.
    pub fn with_intervals(mut self, intervals: Vec<(NaiveDateTime, NaiveDateTime)>) -> Self {
        self.intervals = intervals;
        self
    }

    /// Label shaded intervals "Event 1", "Event 2", ... in order.
    pub fn with_event_labels(mut self) -> Self {
        self.event_labels = true;
        self
    }

    /// Mark a single point, listed in the legend.
    pub fn with_marker(mut self, label: impl Into<String>, time: NaiveDateTime, value: f64) -> Self {
        self.markers.push(Marker {
            label: label.into(),
            time,
            value,
        });
        self
    }

    /// Mark the peak of `series`. A series without finite samples adds nothing.
    pub fn with_peak_marker(self, series: &TimeSeries) -> Self {
        match peak(series) {
            Some((time, value)) => self.with_marker("Peak", time, value),
            None => self,
        }
    }

    /// A labelled dashed horizontal line, listed in the legend.
    pub fn with_reference_line(mut self, label: impl Into<String>, value: f64) -> Self {
        self.references.push((label.into(), value));
        self
    }

    /// Shade the value range between `lo` and `hi` across the whole axis.
    pub fn with_band(mut self, lo: f64, hi: f64) -> Self {
        self.band = Some((lo.min(hi), lo.max(hi)));
        self
    }

    /// Boxed text lines in the upper-left corner.
    pub fn with_annotation(mut self, lines: Vec<String>) -> Self {
        self.annotation = lines;
        self
    }

    fn x_extent(&self) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for layer in &self.layers {
            if let (Some(s), Some(e)) = (layer.series.start(), layer.series.end()) {
                lo = lo.min(time_coord(s));
                hi = hi.max(time_coord(e));
            }
        }
        (lo <= hi).then_some((lo, hi))
    }

    fn y_extent(&self) -> Option<(f64, f64)> {
        let mut values = self
            .layers
            .iter()
            .flat_map(|l| l.series.values().iter().copied())
            .filter(|v| v.is_finite())
            .peekable();
        values.peek()?;
        let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        let extras = self
            .threshold
            .into_iter()
            .chain(self.references.iter().map(|(_, v)| *v))
            .chain(self.markers.iter().map(|m| m.value))
            .chain(self.band.into_iter().flat_map(|(a, b)| [a, b]))
            .filter(|v| v.is_finite());
        Some(extras.fold((lo, hi), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// Render the figure as a standalone SVG document.
    ///
    /// # Errors
    ///
    /// Returns [`PlotError::EmptyFigure`] if no layers were added and
    /// [`PlotError::NoFiniteValues`] if none of them has a finite sample.
    pub fn render(&self, style: &PlotStyle) -> Result<String, PlotError> {
        let w = f64::from(style.width());
        let h = f64::from(style.height());
        let mut svg = String::new();
        canvas::open_svg(&mut svg, style, w, h);
        canvas::background(&mut svg, style, w, h);
        self.draw(&mut svg, style, w, h)?;
        canvas::close_svg(&mut svg);
        Ok(svg)
    }

    /// Draw into an open SVG document, in a `width` x `height` box at the origin.
    pub(crate) fn draw(
        &self,
        svg: &mut String,
        style: &PlotStyle,
        width: f64,
        height: f64,
    ) -> Result<(), PlotError> {
        if self.layers.is_empty() {
            return Err(PlotError::EmptyFigure);
        }
        let (x_lo, x_hi) = match self.x_extent().ok_or(PlotError::NoFiniteValues)? {
            // one timestamp: show an hour either side
            (lo, hi) if lo == hi => (lo - 3600.0, hi + 3600.0),
            extent => extent,
        };
        let (y_lo, y_hi) = self.y_extent().ok_or(PlotError::NoFiniteValues)?;
        debug!(
            n_layers = self.layers.len(),
            n_intervals = self.intervals.len(),
            n_markers = self.markers.len(),
            "rendering figure"
        );

        let area = Area::new(style, width, height);
        // headroom above and below the data
        let y_pad = (y_hi - y_lo) * 0.05;
        let xs = Scale::new(x_lo, x_hi, area.left, area.right);
        let ys = Scale::new(y_lo - y_pad, y_hi + y_pad, area.bottom, area.top);
        let fs = style.font_size();

        if let Some((lo, hi)) = self.band {
            canvas::hband(svg, area, ys.map(lo), ys.map(hi), "band", style.threshold_color());
        }
        for (i, (start, end)) in self.intervals.iter().enumerate() {
            let x0 = xs.map(time_coord(*start)).clamp(area.left, area.right);
            let x1 = xs.map(time_coord(*end)).clamp(area.left, area.right);
            if x1 < x0 {
                continue;
            }
            let _ = writeln!(
                svg,
                r#"<rect class="event" x="{x0:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" fill-opacity="0.4"/>"#,
                area.top,
                (x1 - x0).max(1.0),
                area.bottom - area.top,
                escape(style.event_fill())
            );
            if self.event_labels {
                let _ = writeln!(
                    svg,
                    r#"<text class="event-label" x="{:.2}" y="{:.2}" text-anchor="middle" font-size="{:.1}">Event {}</text>"#,
                    (x0 + x1) / 2.0,
                    area.top + fs,
                    fs * 0.85,
                    i + 1
                );
            }
        }

        let (d_lo, d_hi) = ys.domain();
        let y_ticks: Vec<(f64, String)> = canvas::linear_ticks(d_lo, d_hi, 5)
            .into_iter()
            .map(|(v, label)| (ys.map(v), label))
            .collect();
        canvas::y_axis(svg, area, &y_ticks, style);
        let x_ticks: Vec<(f64, String)> = time_ticks(x_lo, x_hi, 5)
            .into_iter()
            .map(|(x, label)| (xs.map(x), label))
            .collect();
        canvas::x_axis(svg, area, &x_ticks, style);
        canvas::frame(svg, area);

        let mut legend = Vec::new();
        if let Some(t) = self.threshold.filter(|t| t.is_finite()) {
            canvas::hline(svg, area, ys.map(t), "threshold", style.threshold_color(), style.line_width());
        }
        for (i, layer) in self.layers.iter().enumerate() {
            canvas::runs(svg, &segments(&layer.series, &xs, &ys), style.color(i), style.line_width());
            legend.push(LegendEntry {
                label: layer.label.clone(),
                color: style.color(i).to_string(),
                swatch: Swatch::Line,
            });
        }
        for (label, value) in self.references.iter().filter(|(_, v)| v.is_finite()) {
            canvas::hline(svg, area, ys.map(*value), "reference", style.threshold_color(), style.line_width());
            legend.push(LegendEntry {
                label: label.clone(),
                color: style.threshold_color().to_string(),
                swatch: Swatch::Dashed,
            });
        }
        for marker in self.markers.iter().filter(|m| m.value.is_finite()) {
            let at = [(xs.map(time_coord(marker.time)), ys.map(marker.value))];
            canvas::dots(svg, "marker", &at, style.threshold_color(), style.line_width() * 3.0);
            legend.push(LegendEntry {
                label: marker.label.clone(),
                color: style.threshold_color().to_string(),
                swatch: Swatch::Dot,
            });
        }

        if legend.len() > 1 || legend.first().is_some_and(|e| !e.label.is_empty()) {
            canvas::legend(svg, area, &legend, style);
        }
        canvas::annotation(svg, area, &self.annotation, style);
        canvas::labels(
            svg,
            area,
            height,
            self.title.as_deref(),
            self.x_label.as_deref(),
            self.y_label.as_deref(),
            style,
        );
        Ok(())
    }

    /// Render and write the SVG to `path`.
    ///
    /// # Errors
    ///
    /// Returns every error [`Figure::render`] can, plus [`PlotError::Io`]
    /// if the file cannot be written.
    pub fn save(&self, path: &Path, style: &PlotStyle) -> Result<(), PlotError> {
        let svg = self.render(style)?;
        std::fs::write(path, svg).map_err(|source| PlotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "figure written");
        Ok(())
    }
}

/// Pixel coordinates of each finite run of samples.
fn segments(series: &TimeSeries, xs: &Scale, ys: &Scale) -> Vec<Vec<(f64, f64)>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for (t, v) in series.iter() {
        if v.is_finite() {
            current.push((xs.map(time_coord(t)), ys.map(v)));
        } else if !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}
