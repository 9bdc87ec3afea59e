//! Evaluate command: compare a simulated series against observations.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use rill_evaluate::{evaluate, to_json};
use rill_io::read_series;
use rill_plot::{ComparisonPlot, flow_duration_curve, residual_figure};

use crate::cli::EvaluateArgs;
use crate::config::RillConfig;
use crate::convert;
use crate::output::emit;

/// Run the evaluation pipeline on two CSV files, write the metrics JSON and
/// any requested figures.
pub fn run(args: EvaluateArgs, config: &RillConfig) -> Result<()> {
    let _cmd = info_span!("evaluate").entered();
    let columns = &config.columns;
    let obs_reader = convert::build_reader_config(
        columns,
        args.obs_column.as_deref(),
        columns.observed.as_deref().or(columns.discharge.as_deref()),
    );
    let sim_reader =
        convert::build_reader_config(columns, args.sim_column.as_deref(), columns.simulated.as_deref());
    let eval_cfg = convert::build_evaluate_config(&config.evaluate, args.no_log_nse);

    info!(
        observed = %args.observed.display(),
        simulated = %args.simulated.display(),
        "running evaluation"
    );
    let observed = read_series(&args.observed, &obs_reader)
        .with_context(|| format!("failed to read observed: {}", args.observed.display()))?;
    let simulated = read_series(&args.simulated, &sim_reader)
        .with_context(|| format!("failed to read simulated: {}", args.simulated.display()))?;
    let bundle = evaluate(&observed, &simulated, &eval_cfg).context("evaluation failed")?;
    info!(nse = bundle.nse, kge = bundle.kge, "evaluation complete");

    let json = to_json(&bundle)? + "\n";
    emit(&json, args.output.as_deref(), "metrics")?;

    if args.plot.is_none() && args.residual_plot.is_none() && args.fdc_plot.is_none() {
        return Ok(());
    }
    let style = convert::build_figure_style(&config.plot, args.publication)?;
    if let Some(path) = &args.plot {
        let (hydrograph, scatter) = convert::comparison_notes(&bundle);
        ComparisonPlot::new(&observed, &simulated)?
            .with_hydrograph_note(hydrograph)
            .with_scatter_note(scatter)
            .save(path, &style)
            .with_context(|| format!("failed to write plot: {}", path.display()))?;
    }
    if let Some(path) = &args.residual_plot {
        residual_figure(&observed, &simulated)?
            .save(path, &style)
            .with_context(|| format!("failed to write plot: {}", path.display()))?;
    }
    if let Some(path) = &args.fdc_plot {
        flow_duration_curve(&observed, Some(&simulated), !args.linear_fdc)
            .save(path, &style)
            .with_context(|| format!("failed to write plot: {}", path.display()))?;
    }
    Ok(())
}
