use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};

/// Rill hydrological time series toolkit.
#[derive(Parser)]
#[command(
    name = "rill",
    version,
    about = "Hydrological time series toolkit: events, evaluation, calibration"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to TOML configuration file. Flags override its values.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Summary statistics of one column.
    Stats(StatsArgs),
    /// Draw one or more columns as an SVG line chart.
    Plot(PlotArgs),
    /// Detect threshold events and write their summaries.
    EventDetect(EventDetectArgs),
    /// Cut a series into per-event windows.
    EventExtract(EventExtractArgs),
    /// Compare a simulated series against observations.
    Evaluate(EvaluateArgs),
    /// Fit the linear-reservoir recession coefficient.
    Calibrate(CalibrateArgs),
    /// Render a metrics JSON file as a document.
    Report(ReportArgs),
    /// Aggregate every column onto fixed-width time bins.
    Resample(ResampleArgs),
}

/// Parse a command-line timestamp in any format the CSV reader accepts.
fn parse_time(raw: &str) -> Result<NaiveDateTime, String> {
    rill_io::parse_timestamp(raw)
        .ok_or_else(|| format!("'{raw}' is not a timestamp (e.g. 2020-01-31 or 2020-01-31 06:00)"))
}

/// Arguments for the `stats` subcommand.
#[derive(clap::Args)]
pub struct StatsArgs {
    /// Input CSV file.
    pub input: PathBuf,

    /// Value column (default: first non-time column).
    #[arg(long)]
    pub column: Option<String>,

    /// Write the summary as JSON instead of printing it.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `plot` subcommand.
#[derive(clap::Args)]
pub struct PlotArgs {
    /// Input CSV file.
    pub input: PathBuf,

    /// Columns to draw; repeat for several (default: first non-time column).
    #[arg(long = "column")]
    pub columns: Vec<String>,

    /// Events CSV (from `event-detect`) to shade.
    #[arg(long)]
    pub events: Option<PathBuf>,

    /// Draw a horizontal threshold line.
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Style preset: default or publication.
    #[arg(long)]
    pub style: Option<String>,

    /// Figure title.
    #[arg(long)]
    pub title: Option<String>,

    /// Mark the peak of the first column.
    #[arg(long)]
    pub peak: bool,

    /// Label shaded events "Event 1", "Event 2", ...
    #[arg(long = "label-events")]
    pub label_events: bool,

    /// Output SVG path.
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Arguments for the `event-detect` subcommand.
#[derive(clap::Args)]
pub struct EventDetectArgs {
    /// Discharge CSV file.
    pub input: PathBuf,

    /// Discharge column.
    #[arg(long)]
    pub column: Option<String>,

    /// Event threshold (overrides `[events].threshold`).
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Sub-threshold hours that close an event.
    #[arg(long = "min-gap-hours")]
    pub min_gap_hours: Option<f64>,

    /// Output events CSV (printed when omitted).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `event-extract` subcommand.
#[derive(clap::Args)]
pub struct EventExtractArgs {
    /// Discharge CSV file.
    pub input: PathBuf,

    /// Discharge column.
    #[arg(long)]
    pub column: Option<String>,

    /// Events CSV to use instead of detecting events.
    #[arg(long)]
    pub events: Option<PathBuf>,

    /// Event threshold when detecting.
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Minimum gap when detecting.
    #[arg(long = "min-gap-hours")]
    pub min_gap_hours: Option<f64>,

    /// Hours of context added before and after each event.
    #[arg(long = "pad-hours")]
    pub pad_hours: Option<f64>,

    /// Start of a fixed window to cut instead of events (inclusive).
    #[arg(
        long,
        value_parser = parse_time,
        requires = "end",
        conflicts_with_all = ["events", "threshold", "pad_hours"]
    )]
    pub start: Option<NaiveDateTime>,

    /// End of the fixed window (inclusive).
    #[arg(long, value_parser = parse_time, requires = "start")]
    pub end: Option<NaiveDateTime>,

    /// Output CSV: `event,time,value` rows, or every input column for a
    /// fixed window.
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Arguments for the `evaluate` subcommand.
#[derive(clap::Args)]
pub struct EvaluateArgs {
    /// Observed series CSV.
    pub observed: PathBuf,

    /// Simulated series CSV.
    pub simulated: PathBuf,

    /// Observed value column.
    #[arg(long = "obs-column")]
    pub obs_column: Option<String>,

    /// Simulated value column.
    #[arg(long = "sim-column")]
    pub sim_column: Option<String>,

    /// Skip the log-space NSE.
    #[arg(long = "no-log-nse")]
    pub no_log_nse: bool,

    /// Output metrics JSON (printed when omitted).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Hydrograph and scatter comparison SVG.
    #[arg(long)]
    pub plot: Option<PathBuf>,

    /// Residual (simulated minus observed) SVG.
    #[arg(long = "residual-plot")]
    pub residual_plot: Option<PathBuf>,

    /// Flow duration curve SVG.
    #[arg(long = "fdc-plot")]
    pub fdc_plot: Option<PathBuf>,

    /// Linear instead of logarithmic discharge axis on the duration curve.
    #[arg(long = "linear-fdc")]
    pub linear_fdc: bool,

    /// Use the publication style for figures.
    #[arg(long = "pub")]
    pub publication: bool,
}

/// Arguments for the `calibrate` subcommand.
#[derive(clap::Args)]
pub struct CalibrateArgs {
    /// Observed discharge CSV.
    #[arg(long)]
    pub discharge: PathBuf,

    /// Precipitation CSV.
    #[arg(long)]
    pub precip: PathBuf,

    /// Actual evapotranspiration CSV.
    #[arg(long)]
    pub aet: Option<PathBuf>,

    /// Discharge column.
    #[arg(long = "discharge-column")]
    pub discharge_column: Option<String>,

    /// Precipitation column.
    #[arg(long = "precip-column")]
    pub precip_column: Option<String>,

    /// Evapotranspiration column.
    #[arg(long = "aet-column")]
    pub aet_column: Option<String>,

    /// Starting recession coefficient.
    #[arg(long = "initial-k")]
    pub initial_k: Option<f64>,

    /// Output CSV for the best-fit simulation.
    #[arg(long)]
    pub simulated: Option<PathBuf>,

    /// Output calibration record JSON: k, convergence, and metrics.
    #[arg(long)]
    pub metrics: Option<PathBuf>,

    /// Observed against best-fit comparison SVG.
    #[arg(long)]
    pub plot: Option<PathBuf>,

    /// Use the publication style for the figure.
    #[arg(long = "pub")]
    pub publication: bool,
}

/// Arguments for the `report` subcommand.
#[derive(clap::Args)]
pub struct ReportArgs {
    /// Metrics JSON (from `evaluate` or `calibrate`).
    pub metrics: PathBuf,

    /// text, markdown, html, or latex.
    #[arg(short, long)]
    pub format: Option<String>,

    /// Figure to embed.
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Report title.
    #[arg(long)]
    pub title: Option<String>,

    /// Station name.
    #[arg(long)]
    pub station: Option<String>,

    /// Output document (printed when omitted).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `resample` subcommand.
#[derive(clap::Args)]
pub struct ResampleArgs {
    /// Input CSV file.
    pub input: PathBuf,

    /// Bin width, e.g. 1h, 6h, 1D, 15min.
    #[arg(long)]
    pub rule: String,

    /// Aggregation: mean or sum.
    #[arg(long, default_value = "mean")]
    pub how: String,

    /// Output CSV.
    #[arg(short, long)]
    pub output: PathBuf,
}
