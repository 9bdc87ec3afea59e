//! Immutable plot styling.
//!
//! A [`PlotStyle`] is passed to every render call. There is no global style
//! state; two figures rendered with different styles never affect each
//! other.

use crate::error::PlotError;

/// Space reserved around the plotting area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Visual parameters for a rendered figure.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotStyle {
    width: u32,
    height: u32,
    margins: Margins,
    font_family: String,
    font_size: f64,
    line_width: f64,
    palette: Vec<String>,
    grid: bool,
    background: String,
    event_fill: String,
    threshold_color: String,
}

const DEFAULT_PALETTE: [&str; 6] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b",
];

const PUBLICATION_PALETTE: [&str; 4] = ["#000000", "#555555", "#0072b2", "#d55e00"];

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 900,
            height: 420,
            margins: Margins {
                top: 40.0,
                right: 24.0,
                bottom: 56.0,
                left: 68.0,
            },
            font_family: "sans-serif".to_string(),
            font_size: 12.0,
            line_width: 1.5,
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            grid: true,
            background: "#ffffff".to_string(),
            event_fill: "#ffd54f".to_string(),
            threshold_color: "#d62728".to_string(),
        }
    }
}

impl PlotStyle {
    /// Serif type, no grid, and a print-safe palette.
    pub fn publication() -> Self {
        Self {
            width: 1200,
            height: 540,
            font_family: "serif".to_string(),
            font_size: 16.0,
            line_width: 1.0,
            palette: PUBLICATION_PALETTE.iter().map(|c| c.to_string()).collect(),
            grid: false,
            event_fill: "#d9d9d9".to_string(),
            threshold_color: "#000000".to_string(),
            margins: Margins {
                top: 48.0,
                right: 28.0,
                bottom: 68.0,
                left: 84.0,
            },
            ..Self::default()
        }
    }

    /// Look up a preset by name (`default` or `publication`).
    ///
    /// # Errors
    ///
    /// Returns [`PlotError::UnknownStyle`] for any other name.
    pub fn named(name: &str) -> Result<Self, PlotError> {
        match name.to_ascii_lowercase().as_str() {
            "default" => Ok(Self::default()),
            "publication" | "paper" => Ok(Self::publication()),
            _ => Err(PlotError::UnknownStyle {
                name: name.to_string(),
            }),
        }
    }

    /// Set the canvas size in pixels. Zero dimensions are raised to 1.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self
    }

    pub fn with_font(mut self, family: impl Into<String>, size: f64) -> Self {
        self.font_family = family.into();
        self.font_size = size;
        self
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }

    /// Set the line colours, cycled across layers. An empty palette keeps
    /// the current one.
    pub fn with_palette(mut self, palette: Vec<String>) -> Self {
        if !palette.is_empty() {
            self.palette = palette;
        }
        self
    }

    pub fn with_grid(mut self, grid: bool) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background = color.into();
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    pub fn grid(&self) -> bool {
        self.grid
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    pub fn event_fill(&self) -> &str {
        &self.event_fill
    }

    pub fn threshold_color(&self) -> &str {
        &self.threshold_color
    }

    /// Colour of the `i`-th layer.
    pub fn color(&self, i: usize) -> &str {
        match self.palette.len() {
            0 => "#000000",
            n => &self.palette[i % n],
        }
    }
}
