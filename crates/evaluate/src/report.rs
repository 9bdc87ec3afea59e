//! Plain-text, Markdown, HTML, and LaTeX renderings of a metrics bundle.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::EvaluateError;
use crate::output::MetricsBundle;

/// Output document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Markdown,
    Html,
    Latex,
}

impl FromStr for ReportFormat {
    type Err = EvaluateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "markdown" | "md" => Ok(Self::Markdown),
            "html" => Ok(Self::Html),
            "latex" | "tex" => Ok(Self::Latex),
            _ => Err(EvaluateError::UnknownFormat {
                name: s.to_string(),
            }),
        }
    }
}

/// Descriptive fields placed around the metrics table.
#[derive(Debug, Clone)]
pub struct ReportMeta {
    title: String,
    station: Option<String>,
    image: Option<PathBuf>,
}

impl Default for ReportMeta {
    fn default() -> Self {
        Self {
            title: "Model evaluation".to_string(),
            station: None,
            image: None,
        }
    }
}

impl ReportMeta {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_station(mut self, station: Option<impl Into<String>>) -> Self {
        self.station = station.map(Into::into);
        self
    }

    /// Image embedded (HTML, Markdown, LaTeX) or referenced (text).
    pub fn with_image(mut self, image: Option<PathBuf>) -> Self {
        self.image = image;
        self
    }
}

fn format_score(score: Option<f64>) -> String {
    match score {
        Some(v) if v.is_finite() => format!("{v:.4}"),
        Some(_) => "NaN".to_string(),
        None => "undefined".to_string(),
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_latex(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str(r"\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str(r"\textasciitilde{}"),
            '^' => out.push_str(r"\textasciicircum{}"),
            _ => out.push(c),
        }
    }
    out
}

/// Render `bundle` as a standalone document in `format`.
///
/// An undefined logNSE is shown as `undefined`; an unrequested one is left
/// out of the table.
pub fn render_report(bundle: &MetricsBundle, meta: &ReportMeta, format: ReportFormat) -> String {
    let rows: Vec<(&str, String)> = bundle
        .entries()
        .into_iter()
        .map(|(name, score)| (name, format_score(score)))
        .collect();
    let image = meta.image.as_ref().map(|p| p.display().to_string());

    // Writing to a String cannot fail.
    let mut out = String::new();
    match format {
        ReportFormat::Text => {
            let _ = writeln!(out, "{}", meta.title);
            let _ = writeln!(out, "{}", "=".repeat(meta.title.chars().count()));
            if let Some(station) = &meta.station {
                let _ = writeln!(out, "Station: {station}");
            }
            let _ = writeln!(out);
            for (name, score) in &rows {
                let _ = writeln!(out, "{name:<8}{score:>12}");
            }
            if let Some(image) = &image {
                let _ = writeln!(out, "\nFigure: {image}");
            }
        }
        ReportFormat::Markdown => {
            let _ = writeln!(out, "# {}\n", meta.title);
            if let Some(station) = &meta.station {
                let _ = writeln!(out, "**Station:** {station}\n");
            }
            let _ = writeln!(out, "| Metric | Value |");
            let _ = writeln!(out, "|--------|------:|");
            for (name, score) in &rows {
                let _ = writeln!(out, "| {name} | {score} |");
            }
            if let Some(image) = &image {
                let _ = writeln!(out, "\n![{}]({image})", meta.title);
            }
        }
        ReportFormat::Html => {
            let title = escape_html(&meta.title);
            let _ = writeln!(out, "<!DOCTYPE html>");
            let _ = writeln!(out, "<html>\n<head>\n<meta charset=\"utf-8\">");
            let _ = writeln!(out, "<title>{title}</title>\n</head>\n<body>");
            let _ = writeln!(out, "<h1>{title}</h1>");
            if let Some(station) = &meta.station {
                let _ = writeln!(out, "<p><strong>Station:</strong> {}</p>", escape_html(station));
            }
            let _ = writeln!(out, "<table>\n<tr><th>Metric</th><th>Value</th></tr>");
            for (name, score) in &rows {
                let _ = writeln!(out, "<tr><td>{name}</td><td>{score}</td></tr>");
            }
            let _ = writeln!(out, "</table>");
            if let Some(image) = &image {
                let _ = writeln!(
                    out,
                    "<img src=\"{}\" alt=\"{title}\">",
                    escape_html(image)
                );
            }
            let _ = writeln!(out, "</body>\n</html>");
        }
        ReportFormat::Latex => {
            let _ = writeln!(out, r"\documentclass{{article}}");
            if image.is_some() {
                let _ = writeln!(out, r"\usepackage{{graphicx}}");
            }
            let _ = writeln!(out, r"\begin{{document}}");
            let _ = writeln!(out, r"\section*{{{}}}", escape_latex(&meta.title));
            if let Some(station) = &meta.station {
                let _ = writeln!(out, r"\textbf{{Station:}} {}\\", escape_latex(station));
            }
            let _ = writeln!(out, r"\begin{{tabular}}{{lr}}");
            let _ = writeln!(out, r"\hline");
            let _ = writeln!(out, r"Metric & Value \\");
            let _ = writeln!(out, r"\hline");
            for (name, score) in &rows {
                let _ = writeln!(out, r"{name} & {score} \\");
            }
            let _ = writeln!(out, r"\hline");
            let _ = writeln!(out, r"\end{{tabular}}");
            if let Some(image) = &image {
                let _ = writeln!(out, r"\begin{{figure}}[h]");
                let _ = writeln!(out, r"\centering");
                let _ = writeln!(
                    out,
                    r"\includegraphics[width=\linewidth]{{{image}}}"
                );
                let _ = writeln!(out, r"\end{{figure}}");
            }
            let _ = writeln!(out, r"\end{{document}}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::LogNse;

    fn bundle() -> MetricsBundle {
        MetricsBundle {
            nse: 0.91234,
            log_nse: Some(LogNse::Undefined),
            kge: 0.85,
            rmse: 2.5,
            bias: 1.0,
            r: 0.97,
        }
    }

    #[test]
    fn parse_format_names() {
        assert_eq!("md".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert_eq!("HTML".parse::<ReportFormat>().unwrap(), ReportFormat::Html);
        assert_eq!("tex".parse::<ReportFormat>().unwrap(), ReportFormat::Latex);
        assert_eq!("text".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert!(matches!(
            "docx".parse::<ReportFormat>(),
            Err(EvaluateError::UnknownFormat { .. })
        ));
    }

    #[test]
    fn text_report_lists_metrics() {
        let meta = ReportMeta::default().with_station(Some("Gauge 12"));
        let text = render_report(&bundle(), &meta, ReportFormat::Text);
        assert!(text.starts_with("Model evaluation\n================\n"));
        assert!(text.contains("Station: Gauge 12"));
        assert!(text.contains("0.9123"));
        assert!(text.contains("undefined"));
        assert!(!text.contains("Figure:"));
    }

    #[test]
    fn markdown_report_embeds_image() {
        let meta = ReportMeta::default().with_image(Some(PathBuf::from("hydro.svg")));
        let md = render_report(&bundle(), &meta, ReportFormat::Markdown);
        assert!(md.contains("| NSE | 0.9123 |"));
        assert!(md.contains("| logNSE | undefined |"));
        assert!(md.contains("](hydro.svg)"));
    }

    #[test]
    fn html_report_escapes_user_text() {
        let meta = ReportMeta::default().with_title("Q <obs> & sim");
        let html = render_report(&bundle(), &meta, ReportFormat::Html);
        assert!(html.contains("<h1>Q &lt;obs&gt; &amp; sim</h1>"));
        assert!(html.contains("<tr><td>KGE</td><td>0.8500</td></tr>"));
    }

    #[test]
    fn latex_report_escapes_user_text() {
        let meta = ReportMeta::default()
            .with_title("Site_1 100%")
            .with_image(Some(PathBuf::from("fig.pdf")));
        let tex = render_report(&bundle(), &meta, ReportFormat::Latex);
        assert!(tex.contains(r"\section*{Site\_1 100\%}"));
        assert!(tex.contains(r"\usepackage{graphicx}"));
        assert!(tex.contains(r"\includegraphics[width=\linewidth]{fig.pdf}"));
        assert!(tex.contains(r"RMSE & 2.5000 \\"));
    }

    #[test]
    fn unrequested_log_nse_is_left_out() {
        let mut b = bundle();
        b.log_nse = None;
        let md = render_report(&b, &ReportMeta::default(), ReportFormat::Markdown);
        assert!(!md.contains("logNSE"));
    }

    #[test]
    fn nan_score_is_labelled() {
        let mut b = bundle();
        b.kge = f64::NAN;
        let text = render_report(&b, &ReportMeta::default(), ReportFormat::Text);
        assert!(text.contains("NaN"));
    }
}
