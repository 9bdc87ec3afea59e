//! Calibrate command: fit the recession coefficient to observed discharge.

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use rill_io::{WriterConfig, read_series, write_series};
use rill_plot::ComparisonPlot;
use rill_runoff::calibrate;

use crate::cli::CalibrateArgs;
use crate::config::RillConfig;
use crate::convert;
use crate::output::emit;

/// Calibrate `k`, then write the best-fit simulation, its calibration record
/// and a comparison figure, as requested.
pub fn run(args: CalibrateArgs, config: &RillConfig) -> Result<()> {
    let _cmd = info_span!("calibrate").entered();
    let columns = &config.columns;

    let q_reader = convert::build_reader_config(
        columns,
        args.discharge_column.as_deref(),
        columns.discharge.as_deref(),
    );
    let p_reader = convert::build_reader_config(
        columns,
        args.precip_column.as_deref(),
        columns.precipitation.as_deref(),
    );
    let discharge = read_series(&args.discharge, &q_reader)
        .with_context(|| format!("failed to read discharge: {}", args.discharge.display()))?;
    let precip = read_series(&args.precip, &p_reader)
        .with_context(|| format!("failed to read precipitation: {}", args.precip.display()))?;
    let aet = match &args.aet {
        Some(path) => {
            let reader = convert::build_reader_config(
                columns,
                args.aet_column.as_deref(),
                columns.evapotranspiration.as_deref(),
            );
            Some(
                read_series(path, &reader).with_context(|| {
                    format!("failed to read evapotranspiration: {}", path.display())
                })?,
            )
        }
        None => None,
    };

    let cal_cfg =
        convert::build_calibration_config(&config.calibrate, &config.evaluate, args.initial_k)?;
    let fit = calibrate(&discharge, &precip, aet.as_ref(), &cal_cfg).context("calibration failed")?;
    if !fit.success {
        warn!(message = %fit.message, "optimizer did not report convergence");
    }

    if let Some(path) = &args.simulated {
        write_series(path, &fit.simulated, "simulated", &WriterConfig::default())
            .with_context(|| format!("failed to write simulation: {}", path.display()))?;
    }
    if let Some(path) = &args.metrics {
        emit(&(fit.record().to_json()? + "\n"), Some(path), "calibration record")?;
    }
    if let Some(path) = &args.plot {
        let style = convert::build_figure_style(&config.plot, args.publication)?;
        let (hydrograph, scatter) = convert::comparison_notes(&fit.metrics);
        let hydrograph = std::iter::once(format!("k = {:.4}", fit.k)).chain(hydrograph).collect();
        ComparisonPlot::new(&discharge, &fit.simulated)?
            .with_hydrograph_note(hydrograph)
            .with_scatter_note(scatter)
            .save(path, &style)
            .with_context(|| format!("failed to write plot: {}", path.display()))?;
    }

    info!(k = fit.k, nse = fit.metrics.nse, "calibration written");
    println!(
        "k = {:.4}  NSE = {:.4}  converged = {}  iterations = {}  ({})",
        fit.k, fit.metrics.nse, fit.success, fit.iterations, fit.message
    );
    Ok(())
}
