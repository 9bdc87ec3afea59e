//! Resample command: aggregate a table onto fixed-width time bins.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use rill_io::{Dataset, WriterConfig, write_table};
use rill_series::{Aggregation, Frequency};

use crate::cli::ResampleArgs;
use crate::config::RillConfig;
use crate::convert;

/// Resample every column of the input and write the binned table.
pub fn run(args: ResampleArgs, config: &RillConfig) -> Result<()> {
    let _cmd = info_span!("resample").entered();
    let freq: Frequency = args.rule.parse()?;
    let how: Aggregation = args.how.parse()?;

    let reader = convert::build_reader_config(&config.columns, None, None);
    let dataset = Dataset::from_csv(
        &args.input,
        &reader,
        convert::build_column_roles(&config.columns),
        config.metadata.clone(),
    )
    .with_context(|| format!("failed to read dataset: {}", args.input.display()))?;
    let resampled = dataset
        .resample(freq, how)
        .with_context(|| format!("failed to resample {}", dataset.meta().display_name()))?;

    let table = resampled.table();
    info!(
        rule = %freq,
        rows_in = dataset.table().n_rows(),
        rows_out = table.n_rows(),
        "resampled"
    );
    let writer = WriterConfig::default().with_time_column(table.time_column());
    write_table(&args.output, table.times(), &table.named_columns(), &writer)
        .with_context(|| format!("failed to write table: {}", args.output.display()))?;
    Ok(())
}
