use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use rill_plot::{
    ComparisonPlot, Figure, PlotError, PlotStyle, flow_duration_curve, residual_figure,
};
use rill_series::TimeSeries;

fn t(h: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 4, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap()
        + TimeDelta::hours(h)
}

fn hourly(values: &[f64]) -> TimeSeries {
    let times = (0..values.len() as i64).map(t).collect();
    TimeSeries::new(times, values.to_vec()).unwrap()
}

#[test]
fn test_full_figure() {
    let obs = hourly(&[1.0, 3.0, 9.0, 6.0, 2.0, 1.0]);
    let sim = hourly(&[1.2, 2.5, 8.0, 6.5, 2.4, 1.1]);
    let svg = Figure::new()
        .with_title("Gauge <A> & B")
        .with_x_label("time")
        .with_y_label("discharge (m3/s)")
        .with_line("observed", &obs)
        .with_line("simulated", &sim)
        .with_threshold(5.0)
        .with_intervals(vec![(t(2), t(3))])
        .render(&PlotStyle::default())
        .unwrap();

    assert!(svg.starts_with("<svg"));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert_eq!(svg.matches(r#"class="series""#).count(), 2);
    assert_eq!(svg.matches(r#"class="threshold""#).count(), 1);
    assert_eq!(svg.matches(r#"class="event""#).count(), 1);
    assert!(svg.contains("Gauge &lt;A&gt; &amp; B"));
    assert!(svg.contains(">observed</text>"));
    assert!(svg.contains(r#"class="grid""#));
}

#[test]
fn test_publication_style_is_applied() {
    let q = hourly(&[1.0, 2.0, 3.0]);
    let svg = Figure::new()
        .with_line("q", &q)
        .render(&PlotStyle::publication())
        .unwrap();
    assert!(svg.contains(r#"font-family="serif""#));
    assert!(svg.contains(r#"width="1200""#));
    assert!(!svg.contains(r#"class="grid""#));
}

#[test]
fn test_style_is_per_call() {
    let q = hourly(&[1.0, 2.0, 3.0]);
    let fig = Figure::new().with_line("q", &q);
    let a = fig.render(&PlotStyle::publication()).unwrap();
    let b = fig.render(&PlotStyle::default()).unwrap();
    assert_ne!(a, b);
    assert_eq!(b, fig.render(&PlotStyle::default()).unwrap());
}

#[test]
fn test_empty_and_missing() {
    assert!(matches!(
        Figure::new().render(&PlotStyle::default()),
        Err(PlotError::EmptyFigure)
    ));
    let blank = hourly(&[f64::NAN, f64::NAN]);
    assert!(matches!(
        Figure::new().with_line("q", &blank).render(&PlotStyle::default()),
        Err(PlotError::NoFiniteValues)
    ));
}

#[test]
fn test_single_sample_renders() {
    let svg = Figure::new()
        .with_line("q", &hourly(&[4.0]))
        .render(&PlotStyle::default())
        .unwrap();
    assert_eq!(svg.matches(r#"class="point""#).count(), 1);
    assert!(!svg.contains("NaN"));
}

#[test]
fn test_save_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("q.svg");
    Figure::new()
        .with_line("q", &hourly(&[1.0, 2.0]))
        .save(&path, &PlotStyle::default())
        .unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("<polyline"));

    let bad = dir.path().join("missing").join("q.svg");
    assert!(matches!(
        Figure::new()
            .with_line("q", &hourly(&[1.0, 2.0]))
            .save(&bad, &PlotStyle::default()),
        Err(PlotError::Io { .. })
    ));
}

#[test]
fn test_event_labels_and_peak_marker() {
    let q = hourly(&[1.0, 6.0, 2.0, 1.0, 8.0, 3.0]);
    let svg = Figure::new()
        .with_line("Discharge", &q)
        .with_intervals(vec![(t(1), t(2)), (t(4), t(5))])
        .with_event_labels()
        .with_peak_marker(&q)
        .render(&PlotStyle::publication())
        .unwrap();
    assert_eq!(svg.matches(r#"class="event-label""#).count(), 2);
    assert!(svg.contains(">Event 1</text>"));
    assert!(svg.contains(">Event 2</text>"));
    assert_eq!(svg.matches(r#"<circle class="marker""#).count(), 1);
}

#[test]
fn test_flow_duration_curve() {
    let obs = hourly(&[5.0, 1.0, 20.0, 3.0, 8.0]);
    let sim = hourly(&[4.0, 2.0, 18.0, 3.5, 7.0]);
    let svg = flow_duration_curve(&obs, Some(&sim), true)
        .render(&PlotStyle::default())
        .unwrap();
    assert!(svg.contains("Flow Duration Curve"));
    assert!(svg.contains("Exceedance probability (%)"));
    assert_eq!(svg.matches(r#"<polyline class="series""#).count(), 2);
    assert!(svg.contains(">Simulated</text>"));
    assert!(svg.contains(">10</text>"));

    let observed_only = flow_duration_curve(&obs, None, false)
        .render(&PlotStyle::default())
        .unwrap();
    assert_eq!(observed_only.matches(r#"<polyline class="series""#).count(), 1);
}

#[test]
fn test_residual_figure() {
    let obs = hourly(&[1.0, 2.0, 3.0, 4.0]);
    let sim = hourly(&[2.0, 2.0, 4.0, 4.0]);
    let svg = residual_figure(&obs, &sim)
        .unwrap()
        .render(&PlotStyle::default())
        .unwrap();
    assert!(svg.contains("Residuals (Sim - Obs)"));
    assert!(svg.contains(">Mean (0.50)</text>"));
    assert_eq!(svg.matches(r#"<rect class="band""#).count(), 1);
    assert_eq!(svg.matches(r#"<line class="reference""#).count(), 1);

    let late = TimeSeries::new(vec![t(10), t(11)], vec![1.0, 2.0]).unwrap();
    assert!(matches!(
        residual_figure(&obs, &late),
        Err(PlotError::Align(_))
    ));
}

#[test]
fn test_comparison_plot() {
    let obs = hourly(&[1.0, 3.0, 9.0, 6.0, 2.0]);
    let sim = hourly(&[1.2, 2.5, 8.0, 6.5, f64::NAN]);
    let plot = ComparisonPlot::new(&obs, &sim)
        .unwrap()
        .with_hydrograph_note(vec!["NSE = 0.91".to_string(), "KGE = 0.88".to_string()])
        .with_scatter_note(vec!["R = 0.97".to_string()]);
    let svg = plot.render(&PlotStyle::publication()).unwrap();

    assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="1200" height="1080""#));
    assert_eq!(svg.matches(r#"class="panel""#).count(), 2);
    assert!(svg.contains(r#"transform="translate(0,540)""#));
    assert_eq!(svg.matches(r#"<polyline class="series""#).count(), 2);
    // one scatter dot per aligned row
    assert_eq!(svg.matches(r#"<circle class="point""#).count(), 4);
    assert_eq!(svg.matches(r#"class="identity""#).count(), 1);
    assert!(svg.contains(">NSE = 0.91</text>"));
    assert!(svg.contains(">R = 0.97</text>"));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("comparison.svg");
    plot.save(&path, &PlotStyle::default()).unwrap();
    assert!(std::fs::read_to_string(&path).unwrap().contains(r#"height="840""#));
}
