//! Event commands: detect events and extract per-event windows.

use std::fmt::Write as _;

use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use tracing::{info, info_span};

use rill_events::{
    EventInterval, EventSample, EventSummary, detect_events, extract_events, summarize_events,
};
use rill_io::{Dataset, WriterConfig, read_records, read_series, write_records, write_table};
use rill_series::TimeSeries;

use crate::cli::{EventDetectArgs, EventExtractArgs};
use crate::config::RillConfig;
use crate::convert;

fn read_discharge(
    path: &std::path::Path,
    column: Option<&str>,
    config: &RillConfig,
) -> Result<TimeSeries> {
    let reader =
        convert::build_reader_config(&config.columns, column, config.columns.discharge.as_deref());
    read_series(path, &reader).with_context(|| format!("failed to read series: {}", path.display()))
}

/// Detect events and write one summary row per event.
pub fn run_detect(args: EventDetectArgs, config: &RillConfig) -> Result<()> {
    let _cmd = info_span!("event-detect").entered();
    let series = read_discharge(&args.input, args.column.as_deref(), config)?;
    let event_cfg =
        convert::build_event_config(&config.events, args.threshold, args.min_gap_hours)?;

    let events = detect_events(&series, &event_cfg).context("event detection failed")?;
    info!(n_events = events.len(), "events detected");
    let summaries = summarize_events(&series, &events);

    match &args.output {
        Some(path) => write_records(path, &summaries)
            .with_context(|| format!("failed to write events: {}", path.display()))?,
        None => print!("{}", format_summaries(&summaries)),
    }
    Ok(())
}

/// Cut the series into padded event windows and write them in long format,
/// or with `--start`/`--end` write every column inside one fixed window.
pub fn run_extract(args: EventExtractArgs, config: &RillConfig) -> Result<()> {
    let _cmd = info_span!("event-extract").entered();
    if let (Some(start), Some(end)) = (args.start, args.end) {
        return extract_window(&args, config, start, end);
    }
    let series = read_discharge(&args.input, args.column.as_deref(), config)?;

    let events: Vec<EventInterval> = match &args.events {
        Some(path) => read_records(path)
            .with_context(|| format!("failed to read events: {}", path.display()))?,
        None => {
            let event_cfg =
                convert::build_event_config(&config.events, args.threshold, args.min_gap_hours)?;
            detect_events(&series, &event_cfg).context("event detection failed")?
        }
    };

    let pad_hours = args.pad_hours.unwrap_or(config.events.pad_hours);
    let windows = extract_events(&series, &events, pad_hours).context("event extraction failed")?;
    let samples: Vec<EventSample> = windows.iter().flat_map(|w| w.samples()).collect();
    info!(n_events = windows.len(), n_samples = samples.len(), "events extracted");

    write_records(&args.output, &samples)
        .with_context(|| format!("failed to write windows: {}", args.output.display()))?;
    Ok(())
}

fn extract_window(
    args: &EventExtractArgs,
    config: &RillConfig,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<()> {
    let reader = convert::build_reader_config(&config.columns, None, None);
    let dataset = Dataset::from_csv(
        &args.input,
        &reader,
        convert::build_column_roles(&config.columns),
        config.metadata.clone(),
    )
    .with_context(|| format!("failed to read dataset: {}", args.input.display()))?;
    let window = cut_window(&dataset, start, end)?;
    info!(
        dataset = window.meta().display_name(),
        n_rows = window.table().n_rows(),
        "window extracted"
    );

    let table = window.table();
    let writer = WriterConfig::default().with_time_column(table.time_column());
    write_table(&args.output, table.times(), &table.named_columns(), &writer)
        .with_context(|| format!("failed to write window: {}", args.output.display()))?;
    Ok(())
}

fn cut_window(dataset: &Dataset, start: NaiveDateTime, end: NaiveDateTime) -> Result<Dataset> {
    if end < start {
        bail!("window end {end} is before start {start}");
    }
    let window = dataset.subset(start, end);
    if window.table().n_rows() == 0 {
        bail!("no rows between {start} and {end}");
    }
    Ok(window)
}

fn format_summaries(summaries: &[EventSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5}  {:<19}  {:<19}  {:>9}  {:>10}",
        "event", "start", "end", "hours", "peak"
    );
    for s in summaries {
        let _ = writeln!(
            out,
            "{:>5}  {:<19}  {:<19}  {:>9.1}  {:>10.3}",
            s.event,
            s.start.format("%Y-%m-%d %H:%M:%S").to_string(),
            s.end.format("%Y-%m-%d %H:%M:%S").to_string(),
            s.duration_hours,
            s.peak
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dataset() -> (tempfile::NamedTempFile, Dataset) {
        use std::io::Write;
        let mut f = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        f.write_all(
            b"time,q,p\n2020-01-01 00:00,1.0,0.0\n2020-01-01 01:00,2.0,3.5\n2020-01-01 02:00,4.0,1.0\n2020-01-01 03:00,3.0,0.0\n",
        )
        .unwrap();
        let reader = rill_io::ReaderConfig::default();
        let ds = Dataset::from_csv(f.path(), &reader, Default::default(), Default::default()).unwrap();
        (f, ds)
    }

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .and_then(|d| d.and_hms_opt(h, 0, 0))
            .unwrap()
    }

    #[test]
    fn window_keeps_all_columns() {
        let (_f, ds) = dataset();
        let window = cut_window(&ds, at(1), at(2)).unwrap();
        assert_eq!(window.table().times(), &[at(1), at(2)]);
        assert_eq!(window.table().column("q"), Some(&[2.0, 4.0][..]));
        assert_eq!(window.table().column("p"), Some(&[3.5, 1.0][..]));
    }

    #[test]
    fn empty_or_reversed_window_rejected() {
        let (_f, ds) = dataset();
        let err = cut_window(&ds, at(2), at(1)).unwrap_err();
        assert!(err.to_string().contains("before start"));
        let late = at(10);
        let err = cut_window(&ds, late, late).unwrap_err();
        assert!(err.to_string().contains("no rows"));
    }

    #[test]
    fn summary_table() {
        let start = NaiveDate::from_ymd_opt(2020, 2, 3)
            .and_then(|d| d.and_hms_opt(4, 0, 0))
            .unwrap();
        let end = start + chrono::TimeDelta::hours(30);
        let text = format_summaries(&[EventSummary {
            event: 1,
            start,
            end,
            duration_hours: 30.0,
            n_samples: 31,
            peak: 12.5,
            peak_time: Some(start),
            mean: 6.0,
        }]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("2020-02-03 04:00:00"));
        assert!(lines[1].contains("2020-02-04 10:00:00"));
        assert!(lines[1].trim_end().ends_with("12.500"));
    }
}
