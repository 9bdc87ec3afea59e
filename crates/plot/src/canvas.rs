//! SVG drawing primitives shared by the figure types.
//!
//! Every function appends to a `String`; writing to a `String` cannot fail,
//! so `writeln!` results are discarded.

use std::fmt::Write as _;

use crate::axis::{format_value, nice_ticks};
use crate::style::PlotStyle;

/// The plotting area inside the margins, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Area {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Area {
    pub(crate) fn new(style: &PlotStyle, width: f64, height: f64) -> Self {
        let m = style.margins();
        Self {
            left: m.left,
            right: width - m.right,
            top: m.top,
            bottom: height - m.bottom,
        }
    }
}

/// How a legend entry is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Swatch {
    Line,
    Dashed,
    Dot,
}

#[derive(Debug, Clone)]
pub(crate) struct LegendEntry {
    pub label: String,
    pub color: String,
    pub swatch: Swatch,
}

/// Round-number ticks inside `[lo, hi]` with labels.
pub(crate) fn linear_ticks(lo: f64, hi: f64, target: usize) -> Vec<(f64, String)> {
    let ticks = nice_ticks(lo, hi, target);
    let step = match ticks.as_slice() {
        [a, b, ..] => b - a,
        _ => 1.0,
    };
    ticks
        .into_iter()
        .filter(|&t| t >= lo && t <= hi)
        .map(|t| (t, format_value(t, step)))
        .collect()
}

pub(crate) fn open_svg(svg: &mut String, style: &PlotStyle, width: f64, height: f64) {
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="{}" font-size="{}">"#,
        escape(style.font_family()),
        style.font_size()
    );
}

pub(crate) fn close_svg(svg: &mut String) {
    svg.push_str("</svg>\n");
}

pub(crate) fn background(svg: &mut String, style: &PlotStyle, width: f64, height: f64) {
    let _ = writeln!(
        svg,
        r#"<rect class="background" x="0" y="0" width="{width}" height="{height}" fill="{}"/>"#,
        escape(style.background())
    );
}

/// Horizontal grid lines and labels at pixel rows `ticks`.
pub(crate) fn y_axis(svg: &mut String, area: Area, ticks: &[(f64, String)], style: &PlotStyle) {
    let fs = style.font_size();
    for (y, label) in ticks {
        if style.grid() {
            let _ = writeln!(
                svg,
                r##"<line class="grid" x1="{:.2}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke="#dddddd" stroke-width="0.5"/>"##,
                area.left, area.right
            );
        }
        let _ = writeln!(
            svg,
            r#"<text class="tick" x="{:.2}" y="{:.2}" text-anchor="end">{}</text>"#,
            area.left - 6.0,
            y + fs * 0.35,
            escape(label)
        );
    }
}

/// Vertical grid lines and labels at pixel columns `ticks`.
pub(crate) fn x_axis(svg: &mut String, area: Area, ticks: &[(f64, String)], style: &PlotStyle) {
    let fs = style.font_size();
    for (x, label) in ticks {
        if style.grid() {
            let _ = writeln!(
                svg,
                r##"<line class="grid" x1="{x:.2}" y1="{:.2}" x2="{x:.2}" y2="{:.2}" stroke="#dddddd" stroke-width="0.5"/>"##,
                area.top, area.bottom
            );
        }
        let _ = writeln!(
            svg,
            r#"<text class="tick" x="{x:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
            area.bottom + fs * 1.4,
            escape(label)
        );
    }
}

pub(crate) fn frame(svg: &mut String, area: Area) {
    let _ = writeln!(
        svg,
        r#"<rect class="frame" x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="none" stroke="black" stroke-width="1"/>"#,
        area.left,
        area.top,
        area.right - area.left,
        area.bottom - area.top
    );
}

/// A horizontal line across the plotting area at pixel row `y`.
pub(crate) fn hline(svg: &mut String, area: Area, y: f64, class: &str, color: &str, width: f64) {
    let _ = writeln!(
        svg,
        r#"<line class="{class}" x1="{:.2}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke="{}" stroke-width="{width}" stroke-dasharray="6 4"/>"#,
        area.left,
        area.right,
        escape(color)
    );
}

/// A filled horizontal band between pixel rows `y0` and `y1`.
pub(crate) fn hband(svg: &mut String, area: Area, y0: f64, y1: f64, class: &str, color: &str) {
    let (top, bottom) = (y0.min(y1).max(area.top), y0.max(y1).min(area.bottom));
    if bottom <= top {
        return;
    }
    let _ = writeln!(
        svg,
        r#"<rect class="{class}" x="{:.2}" y="{top:.2}" width="{:.2}" height="{:.2}" fill="{}" fill-opacity="0.15"/>"#,
        area.left,
        area.right - area.left,
        bottom - top,
        escape(color)
    );
}

/// One polyline per run; runs of a single point become dots.
pub(crate) fn runs(svg: &mut String, segments: &[Vec<(f64, f64)>], color: &str, width: f64) {
    let color = escape(color);
    for segment in segments {
        if let [(x, y)] = segment.as_slice() {
            let _ = writeln!(
                svg,
                r#"<circle class="point" cx="{x:.2}" cy="{y:.2}" r="{width}" fill="{color}"/>"#
            );
            continue;
        }
        let points: Vec<String> = segment.iter().map(|(x, y)| format!("{x:.2},{y:.2}")).collect();
        let _ = writeln!(
            svg,
            r#"<polyline class="series" points="{}" fill="none" stroke="{color}" stroke-width="{width}"/>"#,
            points.join(" ")
        );
    }
}

/// Open circles at pixel positions.
pub(crate) fn dots(svg: &mut String, class: &str, points: &[(f64, f64)], color: &str, radius: f64) {
    let color = escape(color);
    for (x, y) in points {
        let _ = writeln!(
            svg,
            r#"<circle class="{class}" cx="{x:.2}" cy="{y:.2}" r="{radius:.2}" fill="{color}"/>"#
        );
    }
}

pub(crate) fn legend(svg: &mut String, area: Area, entries: &[LegendEntry], style: &PlotStyle) {
    let fs = style.font_size();
    let x = area.right - 8.0 - fs * 9.0;
    for (i, entry) in entries.iter().enumerate() {
        let y = area.top + 8.0 + fs * 1.3 * i as f64;
        let color = escape(&entry.color);
        match entry.swatch {
            Swatch::Dot => {
                let _ = writeln!(
                    svg,
                    r#"<circle class="legend" cx="{:.2}" cy="{y:.2}" r="{:.2}" fill="{color}"/>"#,
                    x + fs * 0.75,
                    fs * 0.3
                );
            }
            Swatch::Line | Swatch::Dashed => {
                let dash = if entry.swatch == Swatch::Dashed {
                    r#" stroke-dasharray="6 4""#
                } else {
                    ""
                };
                let _ = writeln!(
                    svg,
                    r#"<line class="legend" x1="{x:.2}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke="{color}" stroke-width="{}"{dash}/>"#,
                    x + fs * 1.5,
                    style.line_width() * 2.0
                );
            }
        }
        let _ = writeln!(
            svg,
            r#"<text class="legend" x="{:.2}" y="{:.2}">{}</text>"#,
            x + fs * 2.0,
            y + fs * 0.35,
            escape(&entry.label)
        );
    }
}

/// Text lines in a boxed note at the top-left of the plotting area.
pub(crate) fn annotation(svg: &mut String, area: Area, lines: &[String], style: &PlotStyle) {
    if lines.is_empty() {
        return;
    }
    let fs = style.font_size();
    let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as f64;
    let (x, y) = (area.left + 10.0, area.top + 10.0);
    let _ = writeln!(
        svg,
        r##"<rect class="annotation" x="{x:.2}" y="{y:.2}" width="{:.2}" height="{:.2}" fill="#ffffff" fill-opacity="0.8" stroke="#cccccc"/>"##,
        widest * fs * 0.6 + 12.0,
        lines.len() as f64 * fs * 1.3 + 8.0
    );
    for (i, line) in lines.iter().enumerate() {
        let _ = writeln!(
            svg,
            r#"<text class="annotation" x="{:.2}" y="{:.2}">{}</text>"#,
            x + 6.0,
            y + 4.0 + fs * (1.0 + 1.3 * i as f64),
            escape(line)
        );
    }
}

/// Title above the area and axis labels beside it.
pub(crate) fn labels(
    svg: &mut String,
    area: Area,
    height: f64,
    title: Option<&str>,
    x_label: Option<&str>,
    y_label: Option<&str>,
    style: &PlotStyle,
) {
    let fs = style.font_size();
    if let Some(title) = title {
        let _ = writeln!(
            svg,
            r#"<text class="title" x="{:.2}" y="{:.2}" text-anchor="middle" font-size="{:.1}" font-weight="bold">{}</text>"#,
            (area.left + area.right) / 2.0,
            area.top / 2.0 + fs * 0.4,
            fs * 1.25,
            escape(title)
        );
    }
    if let Some(label) = x_label {
        let _ = writeln!(
            svg,
            r#"<text class="axis-label" x="{:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
            (area.left + area.right) / 2.0,
            height - fs * 0.6,
            escape(label)
        );
    }
    if let Some(label) = y_label {
        let cy = (area.top + area.bottom) / 2.0;
        let cx = fs * 1.2;
        let _ = writeln!(
            svg,
            r#"<text class="axis-label" x="{cx:.2}" y="{cy:.2}" text-anchor="middle" transform="rotate(-90 {cx:.2} {cy:.2})">{}</text>"#,
            escape(label)
        );
    }
}

pub(crate) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
