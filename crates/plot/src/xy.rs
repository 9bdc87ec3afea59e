//! Charts over a numeric x axis: scatter plots and duration curves.

use std::fmt::Write as _;
use std::path::Path;

use tracing::{debug, info};

use crate::axis::{Scale, log_ticks};
use crate::canvas::{self, Area, LegendEntry, Swatch, escape};
use crate::error::PlotError;
use crate::style::PlotStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Line,
    Dashed,
    Points,
}

#[derive(Debug, Clone)]
struct XyLayer {
    label: String,
    points: Vec<(f64, f64)>,
    mark: Mark,
}

/// A chart with numeric x and y axes.
#[derive(Debug, Clone, Default)]
pub struct XyFigure {
    title: Option<String>,
    x_label: Option<String>,
    y_label: Option<String>,
    layers: Vec<XyLayer>,
    identity: bool,
    log_y: bool,
    annotation: Vec<String>,
}

impl XyFigure {
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

    /// Connect `points` in the order given.
    pub fn with_line(self, label: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        self.push(label.into(), points, Mark::Line)
    }

    pub fn with_dashed_line(self, label: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        self.push(label.into(), points, Mark::Dashed)
    }

    /// Draw `points` as unconnected dots.
    pub fn with_points(self, label: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        self.push(label.into(), points, Mark::Points)
    }

    /// Draw the 1:1 line and give both axes the same range.
    pub fn with_identity_line(mut self) -> Self {
        self.identity = true;
        self
    }

    /// Logarithmic y axis. Points with y <= 0 are left out.
    pub fn with_log_y(mut self, log_y: bool) -> Self {
        self.log_y = log_y;
        self
    }

    pub fn with_annotation(mut self, lines: Vec<String>) -> Self {
        self.annotation = lines;
        self
    }

    fn push(mut self, label: String, points: Vec<(f64, f64)>, mark: Mark) -> Self {
        self.layers.push(XyLayer {
            label,
            points,
            mark,
        });
        self
    }

    /// y in axis space, or `None` when the point cannot be drawn.
    fn project(&self, (x, y): (f64, f64)) -> Option<(f64, f64)> {
        let y = if self.log_y {
            (y > 0.0).then(|| y.log10())?
        } else {
            y
        };
        (x.is_finite() && y.is_finite()).then_some((x, y))
    }

    fn extent(&self) -> Option<((f64, f64), (f64, f64))> {
        let mut points = self
            .layers
            .iter()
            .flat_map(|l| l.points.iter())
            .filter_map(|&p| self.project(p))
            .peekable();
        points.peek()?;
        let init = ((f64::INFINITY, f64::NEG_INFINITY), (f64::INFINITY, f64::NEG_INFINITY));
        let ((x_lo, x_hi), (y_lo, y_hi)) = points.fold(init, |((xl, xh), (yl, yh)), (x, y)| {
            ((xl.min(x), xh.max(x)), (yl.min(y), yh.max(y)))
        });
        if self.identity && !self.log_y {
            let (lo, hi) = (x_lo.min(y_lo), x_hi.max(y_hi));
            return Some(((lo, hi), (lo, hi)));
        }
        Some(((x_lo, x_hi), (y_lo, y_hi)))
    }

    /// Render the chart as a standalone SVG document.
    ///
    /// # Errors
    ///
    /// Returns [`PlotError::EmptyFigure`] without layers and
    /// [`PlotError::NoFiniteValues`] when no point can be drawn.
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
        let ((x_lo, x_hi), (y_lo, y_hi)) = self.extent().ok_or(PlotError::NoFiniteValues)?;
        debug!(n_layers = self.layers.len(), log_y = self.log_y, "rendering xy figure");

        let area = Area::new(style, width, height);
        let (x_pad, y_pad) = ((x_hi - x_lo) * 0.03, (y_hi - y_lo) * 0.05);
        let xs = Scale::new(x_lo - x_pad, x_hi + x_pad, area.left, area.right);
        let ys = Scale::new(y_lo - y_pad, y_hi + y_pad, area.bottom, area.top);

        let (dy_lo, dy_hi) = ys.domain();
        let y_ticks = if self.log_y {
            log_ticks(dy_lo, dy_hi)
        } else {
            canvas::linear_ticks(dy_lo, dy_hi, 5)
        };
        let y_ticks: Vec<(f64, String)> =
            y_ticks.into_iter().map(|(v, l)| (ys.map(v), l)).collect();
        canvas::y_axis(svg, area, &y_ticks, style);
        let (dx_lo, dx_hi) = xs.domain();
        let x_ticks: Vec<(f64, String)> = canvas::linear_ticks(dx_lo, dx_hi, 5)
            .into_iter()
            .map(|(v, l)| (xs.map(v), l))
            .collect();
        canvas::x_axis(svg, area, &x_ticks, style);
        canvas::frame(svg, area);

        let mut legend = Vec::new();
        if self.identity && !self.log_y {
            let (lo, hi) = (x_lo.min(y_lo), x_hi.max(y_hi));
            let _ = writeln!(
                svg,
                r#"<line class="identity" x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{}" stroke-dasharray="6 4"/>"#,
                xs.map(lo),
                ys.map(lo),
                xs.map(hi),
                ys.map(hi),
                escape(style.threshold_color()),
                style.line_width()
            );
            legend.push(LegendEntry {
                label: "1:1".to_string(),
                color: style.threshold_color().to_string(),
                swatch: Swatch::Dashed,
            });
        }

        for (i, layer) in self.layers.iter().enumerate() {
            let color = style.color(i);
            let pixels = |p: (f64, f64)| self.project(p).map(|(x, y)| (xs.map(x), ys.map(y)));
            let swatch = match layer.mark {
                Mark::Points => {
                    let dots: Vec<(f64, f64)> =
                        layer.points.iter().filter_map(|&p| pixels(p)).collect();
                    canvas::dots(svg, "point", &dots, color, style.line_width() * 1.5);
                    Swatch::Dot
                }
                Mark::Line => {
                    canvas::runs(svg, &runs(&layer.points, pixels), color, style.line_width());
                    Swatch::Line
                }
                Mark::Dashed => {
                    for run in runs(&layer.points, pixels) {
                        let coords: Vec<String> =
                            run.iter().map(|(x, y)| format!("{x:.2},{y:.2}")).collect();
                        let _ = writeln!(
                            svg,
                            r#"<polyline class="series" points="{}" fill="none" stroke="{}" stroke-width="{}" stroke-dasharray="6 4"/>"#,
                            coords.join(" "),
                            escape(color),
                            style.line_width()
                        );
                    }
                    Swatch::Dashed
                }
            };
            legend.push(LegendEntry {
                label: layer.label.clone(),
                color: color.to_string(),
                swatch,
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
    /// As [`XyFigure::render`], plus [`PlotError::Io`] on write failure.
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

/// Consecutive drawable points, split wherever one cannot be drawn.
fn runs(
    points: &[(f64, f64)],
    pixels: impl Fn((f64, f64)) -> Option<(f64, f64)>,
) -> Vec<Vec<(f64, f64)>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for &p in points {
        match pixels(p) {
            Some(px) => current.push(px),
            None if !current.is_empty() => out.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}
