//! Report command: render a metrics JSON file as a document.

use anyhow::{Context, Result};
use tracing::info_span;

use rill_evaluate::{ReportMeta, from_json, render_report};

use crate::cli::ReportArgs;
use crate::config::RillConfig;
use crate::convert;
use crate::output::emit;

/// Render the metrics bundle in the requested format.
///
/// Accepts metrics written by `evaluate` and calibration records written by
/// `calibrate`.
pub fn run(args: ReportArgs, config: &RillConfig) -> Result<()> {
    let _cmd = info_span!("report").entered();
    let json = std::fs::read_to_string(&args.metrics)
        .with_context(|| format!("failed to read metrics: {}", args.metrics.display()))?;
    let bundle = from_json(&json)
        .with_context(|| format!("invalid metrics file: {}", args.metrics.display()))?;

    let format = convert::parse_report_format(&config.report, args.format.as_deref())?;
    let mut meta = ReportMeta::default()
        .with_station(
            args.station
                .or_else(|| config.report.station.clone())
                .or_else(|| config.metadata.station.clone())
                .or_else(|| config.metadata.name.clone()),
        )
        .with_image(args.image);
    if let Some(title) = args.title.or_else(|| config.report.title.clone()) {
        meta = meta.with_title(title);
    }

    emit(
        &render_report(&bundle, &meta, format),
        args.output.as_deref(),
        "report",
    )
}
