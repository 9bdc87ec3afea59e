//! Plot command: draw CSV columns as an SVG chart.

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use rill_events::EventInterval;
use rill_io::{read_records, read_table};
use rill_plot::Figure;

use crate::cli::PlotArgs;
use crate::config::RillConfig;
use crate::convert;

/// Render the requested columns to an SVG file.
pub fn run(args: PlotArgs, config: &RillConfig) -> Result<()> {
    let _cmd = info_span!("plot").entered();
    let reader = convert::build_reader_config(&config.columns, None, None);
    let table = read_table(&args.input, &reader)
        .with_context(|| format!("failed to read table: {}", args.input.display()))?;

    let columns = if args.columns.is_empty() {
        let default = config
            .columns
            .discharge
            .clone()
            .or_else(|| table.column_names().first().cloned());
        match default {
            Some(name) => vec![name],
            None => bail!("{} has no value columns", args.input.display()),
        }
    } else {
        args.columns.clone()
    };

    let title = args.title.clone().unwrap_or_else(|| {
        args.input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    let mut figure = Figure::new().with_title(title).with_x_label(table.time_column());
    if let [only] = columns.as_slice() {
        figure = figure.with_y_label(only.as_str());
    }
    for (i, name) in columns.iter().enumerate() {
        let series = table
            .series(name)
            .with_context(|| format!("column '{name}' not found in {}", args.input.display()))?
            .with_context(|| format!("column '{name}' is not a valid series"))?;
        figure = figure.with_line(name.as_str(), &series);
        if args.peak && i == 0 {
            figure = figure.with_peak_marker(&series);
        }
    }

    if let Some(path) = &args.events {
        let events: Vec<EventInterval> = read_records(path)
            .with_context(|| format!("failed to read events: {}", path.display()))?;
        info!(n_events = events.len(), "shading events");
        figure = figure.with_intervals(events.iter().map(|e| (e.start, e.end)).collect());
        if args.label_events {
            figure = figure.with_event_labels();
        }
    }
    if let Some(t) = args.threshold.or(config.events.threshold) {
        figure = figure.with_threshold(t);
    }

    let style = convert::build_plot_style(&config.plot, args.style.as_deref())?;
    figure
        .save(&args.output, &style)
        .with_context(|| format!("failed to write plot: {}", args.output.display()))?;
    Ok(())
}
