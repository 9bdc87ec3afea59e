//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result, bail};

use crate::config::*;

use rill_evaluate::{EvaluateConfig, MetricsBundle, ReportFormat};
use rill_events::EventConfig;
use rill_io::{ColumnRoles, ReaderConfig};
use rill_plot::PlotStyle;
use rill_runoff::CalibrationConfig;

/// Builds a [`ReaderConfig`] for one value column.
///
/// `column` is the flag value, `role` the `[columns]` entry it overrides.
pub fn build_reader_config(
    columns: &ColumnsToml,
    column: Option<&str>,
    role: Option<&str>,
) -> ReaderConfig {
    let mut cfg = ReaderConfig::default().with_value_column(column.or(role));
    if let Some(ref time) = columns.time {
        cfg = cfg.with_time_column(time);
    }
    cfg
}

/// Column roles from `[columns]`. The observed role falls back to the
/// discharge column.
pub fn build_column_roles(columns: &ColumnsToml) -> ColumnRoles {
    ColumnRoles {
        observed: columns.observed.clone().or_else(|| columns.discharge.clone()),
        simulated: columns.simulated.clone(),
        precipitation: columns.precipitation.clone(),
        evapotranspiration: columns.evapotranspiration.clone(),
    }
}

/// Builds an [`EventConfig`], letting CLI flags override the TOML values.
pub fn build_event_config(
    events: &EventsToml,
    threshold: Option<f64>,
    min_gap_hours: Option<f64>,
) -> Result<EventConfig> {
    let Some(threshold) = threshold.or(events.threshold) else {
        bail!("no event threshold: pass --threshold or set [events].threshold");
    };
    let cfg = EventConfig::new(threshold, min_gap_hours.unwrap_or(events.min_gap_hours));
    cfg.validate().context("invalid event configuration")?;
    Ok(cfg)
}

/// Builds an [`EvaluateConfig`] from the TOML evaluate configuration.
pub fn build_evaluate_config(eval: &EvaluateToml, no_log_nse: bool) -> EvaluateConfig {
    EvaluateConfig::default().with_log_nse(eval.log_nse && !no_log_nse)
}

/// Builds a [`CalibrationConfig`] from the TOML calibrate configuration.
pub fn build_calibration_config(
    calibrate: &CalibrateToml,
    eval: &EvaluateToml,
    initial_k: Option<f64>,
) -> Result<CalibrationConfig> {
    let cfg = CalibrationConfig::default()
        .with_initial_k(initial_k.unwrap_or(calibrate.initial_k))
        .with_evaluate(build_evaluate_config(eval, false));
    cfg.validate().context("invalid calibration configuration")?;
    Ok(cfg)
}

/// Builds a [`PlotStyle`] from a preset name and optional size overrides.
pub fn build_plot_style(plot: &PlotToml, style: Option<&str>) -> Result<PlotStyle> {
    let mut cfg = PlotStyle::named(style.unwrap_or(&plot.style))?;
    if plot.width.is_some() || plot.height.is_some() {
        let width = plot.width.unwrap_or(cfg.width());
        let height = plot.height.unwrap_or(cfg.height());
        cfg = cfg.with_size(width, height);
    }
    Ok(cfg)
}

/// Style for figures written by `evaluate` and `calibrate`: the
/// publication preset with `--pub`, otherwise the `[plot]` section.
pub fn build_figure_style(plot: &PlotToml, publication: bool) -> Result<PlotStyle> {
    build_plot_style(plot, publication.then_some("publication"))
}

/// Score notes for the hydrograph and scatter panels of a comparison plot.
pub fn comparison_notes(bundle: &MetricsBundle) -> (Vec<String>, Vec<String>) {
    let hydrograph = vec![
        format!("NSE = {:.3}", bundle.nse),
        format!("KGE = {:.3}", bundle.kge),
    ];
    let scatter = vec![
        format!("R = {:.3}", bundle.r),
        format!("RMSE = {:.3}", bundle.rmse),
        format!("Bias = {:.1}%", bundle.bias),
    ];
    (hydrograph, scatter)
}

/// Parses a report format name, falling back to `[report].format`.
pub fn parse_report_format(report: &ReportToml, format: Option<&str>) -> Result<ReportFormat> {
    Ok(format.unwrap_or(&report.format).parse::<ReportFormat>()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_flag_overrides_role() {
        let columns = ColumnsToml {
            time: Some("ts".into()),
            ..ColumnsToml::default()
        };
        let cfg = build_reader_config(&columns, Some("q_obs"), Some("q"));
        assert_eq!(cfg.value_column(), Some("q_obs"));
        let cfg = build_reader_config(&columns, None, Some("q"));
        assert_eq!(cfg.value_column(), Some("q"));
        let cfg = build_reader_config(&columns, None, None);
        assert_eq!(cfg.value_column(), None);
    }

    #[test]
    fn roles_from_columns() {
        let columns = ColumnsToml {
            discharge: Some("q".into()),
            precipitation: Some("p".into()),
            ..ColumnsToml::default()
        };
        let roles = build_column_roles(&columns);
        assert_eq!(roles.observed.as_deref(), Some("q"));
        assert_eq!(roles.precipitation.as_deref(), Some("p"));
        assert_eq!(roles.simulated, None);

        let explicit = ColumnsToml {
            observed: Some("q_obs".into()),
            ..columns
        };
        assert_eq!(build_column_roles(&explicit).observed.as_deref(), Some("q_obs"));
    }

    #[test]
    fn event_threshold_required() {
        let events = EventsToml::default();
        assert!(build_event_config(&events, None, None).is_err());

        let cfg = build_event_config(&events, Some(4.0), None).unwrap();
        assert_eq!(cfg.threshold(), 4.0);
        assert_eq!(cfg.min_gap_hours(), 24.0);
    }

    #[test]
    fn event_flags_override_toml() {
        let events = EventsToml {
            threshold: Some(10.0),
            min_gap_hours: 6.0,
            pad_hours: 0.0,
        };
        let cfg = build_event_config(&events, None, Some(2.0)).unwrap();
        assert_eq!(cfg.threshold(), 10.0);
        assert_eq!(cfg.min_gap_hours(), 2.0);
        assert!(build_event_config(&events, None, Some(-1.0)).is_err());
    }

    #[test]
    fn log_nse_flag_wins() {
        let eval = EvaluateToml::default();
        assert!(build_evaluate_config(&eval, false).log_nse());
        assert!(!build_evaluate_config(&eval, true).log_nse());
        let off = EvaluateToml { log_nse: false };
        assert!(!build_evaluate_config(&off, false).log_nse());
    }

    #[test]
    fn calibration_initial_k_checked() {
        let cal = CalibrateToml::default();
        let eval = EvaluateToml::default();
        assert_eq!(
            build_calibration_config(&cal, &eval, None).unwrap().initial_k(),
            0.5
        );
        assert!(build_calibration_config(&cal, &eval, Some(3.0)).is_err());
    }

    #[test]
    fn plot_style_presets_and_size() {
        let plot = PlotToml {
            style: "publication".into(),
            width: Some(500),
            height: None,
        };
        let style = build_plot_style(&plot, None).unwrap();
        assert_eq!(style.font_family(), "serif");
        assert_eq!(style.width(), 500);
        assert_eq!(style.height(), PlotStyle::publication().height());

        assert!(build_plot_style(&PlotToml::default(), Some("neon")).is_err());
    }

    #[test]
    fn figure_style_pub_flag() {
        let plot = PlotToml::default();
        assert_eq!(
            build_figure_style(&plot, true).unwrap(),
            PlotStyle::publication()
        );
        assert_eq!(build_figure_style(&plot, false).unwrap(), PlotStyle::default());
    }

    #[test]
    fn notes_carry_scores() {
        let bundle = MetricsBundle {
            nse: 0.8123,
            log_nse: None,
            kge: 0.75,
            rmse: 1.25,
            bias: -4.26,
            r: 0.9,
        };
        let (hydrograph, scatter) = comparison_notes(&bundle);
        assert_eq!(hydrograph, vec!["NSE = 0.812", "KGE = 0.750"]);
        assert_eq!(scatter, vec!["R = 0.900", "RMSE = 1.250", "Bias = -4.3%"]);
    }

    #[test]
    fn report_format_fallback() {
        let report = ReportToml::default();
        assert_eq!(
            parse_report_format(&report, None).unwrap(),
            ReportFormat::Markdown
        );
        assert_eq!(
            parse_report_format(&report, Some("latex")).unwrap(),
            ReportFormat::Latex
        );
        assert!(parse_report_format(&report, Some("pdf")).is_err());
    }
}
