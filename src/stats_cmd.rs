//! Stats command: summary statistics of one column.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use rill_io::read_series;
use rill_stats::{Summary, summarize};

use crate::cli::StatsArgs;
use crate::config::RillConfig;
use crate::convert;
use crate::output::emit;

/// Summarise one column of a CSV file.
pub fn run(args: StatsArgs, config: &RillConfig) -> Result<()> {
    let _cmd = info_span!("stats").entered();
    let reader = convert::build_reader_config(
        &config.columns,
        args.column.as_deref(),
        config.columns.discharge.as_deref(),
    );
    let series = read_series(&args.input, &reader)
        .with_context(|| format!("failed to read series: {}", args.input.display()))?;

    let summary = summarize(series.values());
    info!(count = summary.count, missing = summary.missing, "summary computed");

    let text = match args.output {
        Some(_) => {
            serde_json::to_string_pretty(&summary).context("failed to serialize summary")? + "\n"
        }
        None => format_summary(&summary),
    };
    emit(&text, args.output.as_deref(), "summary")
}

fn format_summary(s: &Summary) -> String {
    let mut out = String::new();
    let rows = [
        ("mean", s.mean),
        ("sd", s.sd),
        ("min", s.min),
        ("q25", s.q25),
        ("median", s.median),
        ("q75", s.q75),
        ("max", s.max),
    ];
    let _ = writeln!(out, "{:<10}{:>14}", "count", s.count);
    let _ = writeln!(out, "{:<10}{:>14}", "missing", s.missing);
    for (name, v) in rows {
        let _ = writeln!(out, "{name:<10}{v:>14.4}");
    }
    match s.skewness {
        Some(v) => {
            let _ = writeln!(out, "{:<10}{v:>14.4}", "skewness");
        }
        None => {
            let _ = writeln!(out, "{:<10}{:>14}", "skewness", "n/a");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_table_layout() {
        let text = format_summary(&summarize(&[1.0, 2.0, f64::NAN, 3.0]));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 10);
        assert!(lines[0].starts_with("count") && lines[0].ends_with('3'));
        assert!(lines[1].ends_with('1'));
        assert!(lines[6].starts_with("median") && lines[6].ends_with("2.0000"));
        assert!(lines[9].starts_with("skewness"));

        let short = format_summary(&summarize(&[1.0, 2.0]));
        assert!(short.trim_end().ends_with("n/a"));
    }
}
