//! Bounded one-dimensional calibration of the recession coefficient.
//!
//! Wraps `argmin`'s Brent minimiser around `-NSE(k)` on `[K_MIN, K_MAX]`.
//! The starting outflow is pinned to the first aligned observation.

use argmin::core::{CostFunction, Executor, State, TerminationReason, TerminationStatus};
use argmin::solver::brent::BrentOpt;
use tracing::{debug, info};

use rill_evaluate::{MetricsBundle, evaluate_aligned, nse};
use rill_series::{SeriesError, TimeSeries, align_all};

use crate::config::{CalibrationConfig, K_MAX, K_MIN};
use crate::error::RunoffError;
use crate::model::{LinearReservoir, effective_precipitation};
use crate::record::CalibrationRecord;

/// Safety cap on Brent iterations; convergence normally comes far sooner.
const MAX_ITERS: u64 = 500;

/// Best fit found by [`calibrate`].
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationResult {
    /// Best recession coefficient.
    pub k: f64,
    /// Metrics of the best-fit simulation against the aligned observations.
    pub metrics: MetricsBundle,
    /// Best-fit simulation on the aligned timestamps.
    pub simulated: TimeSeries,
    /// Whether the optimizer reported convergence.
    pub success: bool,
    /// Optimizer termination message.
    pub message: String,
    pub iterations: u64,
    /// `-NSE` at `k`.
    pub objective: f64,
}

impl CalibrationResult {
    /// The JSON-serialisable summary of this fit.
    pub fn record(&self) -> CalibrationRecord {
        CalibrationRecord::from(self)
    }
}

struct ReservoirCost<'a> {
    observed: &'a [f64],
    effective: &'a [f64],
    q0: f64,
}

impl ReservoirCost<'_> {
    fn objective(&self, k: f64) -> Result<f64, RunoffError> {
        let simulated = LinearReservoir::new(k).simulate(self.effective, self.q0);
        Ok(-nse(self.observed, &simulated)?)
    }
}

impl CostFunction for ReservoirCost<'_> {
    type Param = f64;
    type Output = f64;

    fn cost(&self, k: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        match self.objective(*k) {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Ok(f64::MAX),
        }
    }
}

/// Calibrate `k` so the reservoir driven by `precip` (net of `aet`) best
/// reproduces `observed`.
///
/// All inputs are first joined on timestamps where every one of them has a
/// finite value.
///
/// # Errors
///
/// Returns [`RunoffError::NoOverlapData`] if that join is empty,
/// [`RunoffError::Metric`] if NSE is undefined for the observations (e.g.
/// constant flow), and [`RunoffError::Optimizer`] if the search aborts.
pub fn calibrate(
    observed: &TimeSeries,
    precip: &TimeSeries,
    aet: Option<&TimeSeries>,
    config: &CalibrationConfig,
) -> Result<CalibrationResult, RunoffError> {
    config.validate()?;

    let mut inputs = vec![observed, precip];
    inputs.extend(aet);
    let frame = align_all(&inputs).map_err(|e| match e {
        SeriesError::NoOverlap { n_series } => RunoffError::NoOverlapData { n_series },
        other => other.into(),
    })?;

    let obs = frame.column(0);
    let effective = effective_precipitation(frame.column(1), aet.map(|_| frame.column(2)))?;
    let q0 = obs[0];
    debug!(n = frame.len(), q0, "calibration inputs aligned");

    let cost = ReservoirCost {
        observed: obs,
        effective: &effective,
        q0,
    };
    let initial_k = config.initial_k();
    let initial_objective = cost.objective(initial_k)?;

    let solver = BrentOpt::new(K_MIN, K_MAX);
    let result = Executor::new(cost, solver)
        .configure(|state| state.max_iters(MAX_ITERS))
        .run()
        .map_err(|e| RunoffError::Optimizer {
            reason: e.to_string(),
        })?;

    let state = result.state();
    let status = state.get_termination_status();
    let success = matches!(
        status,
        TerminationStatus::Terminated(TerminationReason::SolverConverged)
    );
    let message = match status {
        TerminationStatus::Terminated(reason) => reason.to_string(),
        TerminationStatus::NotTerminated => "not terminated".to_string(),
    };
    let iterations = state.get_iter();
    let searched = state.best_param.map(|k| (k, state.best_cost));

    let (k, objective) = match searched {
        Some((k, c)) if c.is_finite() && c <= initial_objective => (k, c),
        _ => {
            debug!(initial_k, initial_objective, "search did not improve on initial k");
            (initial_k, initial_objective)
        }
    };

    let simulated = LinearReservoir::new(k).simulate(&effective, q0);
    let metrics = evaluate_aligned(obs, &simulated, config.evaluate())?;
    let simulated = TimeSeries::new(frame.times().to_vec(), simulated)?;

    info!(k, nse = metrics.nse, iterations, success, %message, "calibration finished");
    Ok(CalibrationResult {
        k,
        metrics,
        simulated,
        success,
        message,
        iterations,
        objective,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

    fn t(h: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap()
            + TimeDelta::hours(h)
    }

    fn hourly(start: i64, values: &[f64]) -> TimeSeries {
        let times = (0..values.len() as i64).map(|i| t(start + i)).collect();
        TimeSeries::new(times, values.to_vec()).unwrap()
    }

    fn rain(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| if (i * 7) % 11 < 3 { ((i * 13) % 17) as f64 } else { 0.0 })
            .collect()
    }

    #[test]
    fn no_overlap_is_reported() {
        let obs = hourly(0, &[1.0, 2.0, 3.0]);
        let p = hourly(100, &[1.0, 2.0, 3.0]);
        assert!(matches!(
            calibrate(&obs, &p, None, &CalibrationConfig::default()),
            Err(RunoffError::NoOverlapData { n_series: 2 })
        ));
    }

    #[test]
    fn constant_observations_fail() {
        let obs = hourly(0, &[2.0; 10]);
        let p = hourly(0, &rain(10));
        assert!(matches!(
            calibrate(&obs, &p, None, &CalibrationConfig::default()),
            Err(RunoffError::Metric(_))
        ));
    }

    #[test]
    fn invalid_initial_k_rejected() {
        let obs = hourly(0, &[1.0, 2.0]);
        let config = CalibrationConfig::default().with_initial_k(2.0);
        assert!(matches!(
            calibrate(&obs, &obs, None, &config),
            Err(RunoffError::InvalidInitialK { .. })
        ));
    }

    #[test]
    fn objective_matches_negative_nse() {
        let p = rain(50);
        let obs = LinearReservoir::new(0.4).simulate(&p, 1.0);
        let cost = ReservoirCost {
            observed: &obs,
            effective: &p,
            q0: 1.0,
        };
        assert_relative_eq!(cost.objective(0.4).unwrap(), -1.0, epsilon = 1e-12);
        assert!(cost.cost(&0.9).unwrap() > -1.0);
    }

    #[test]
    fn recovers_known_k() {
        let k_true = 0.3;
        let mut p = rain(400);
        // p[0] == q0 keeps obs[0] == q0, so the pinned start matches
        p[0] = 2.0;
        let q = LinearReservoir::new(k_true).simulate(&p, 2.0);

        let result = calibrate(
            &hourly(0, &q),
            &hourly(0, &p),
            None,
            &CalibrationConfig::default(),
        )
        .unwrap();

        assert!((result.k - k_true).abs() < 0.01, "k = {}", result.k);
        assert!(result.metrics.nse > 0.99, "nse = {}", result.metrics.nse);
        assert_relative_eq!(result.objective, -result.metrics.nse, epsilon = 1e-9);
        assert_eq!(result.simulated.len(), 400);
        assert!(!result.message.is_empty());
    }
}
