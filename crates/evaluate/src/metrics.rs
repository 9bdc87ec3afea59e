//! Goodness-of-fit metrics over paired observed/simulated sequences.
//!
//! Every metric takes two slices of equal length, discards pairs where
//! either element is non-finite, and computes its statistic on the rest.
//! Degenerate denominators are reported as
//! [`MetricError::DegenerateInput`] rather than returned as NaN or
//! infinity, with one exception: the bias ratio inside [`kge`] is NaN when
//! the observed mean is zero and that NaN is propagated.

use rill_stats::{mean, sd, sum_sq_dev};

use crate::error::MetricError;

/// Checks lengths and returns the finite pairs as two vectors.
fn finite_pairs(observed: &[f64], simulated: &[f64]) -> Result<(Vec<f64>, Vec<f64>), MetricError> {
    if observed.len() != simulated.len() {
        return Err(MetricError::ShapeMismatch {
            observed: observed.len(),
            simulated: simulated.len(),
        });
    }
    Ok(observed
        .iter()
        .zip(simulated)
        .filter(|(o, s)| o.is_finite() && s.is_finite())
        .map(|(&o, &s)| (o, s))
        .unzip())
}

fn require_pairs(metric: &'static str, obs: &[f64]) -> Result<(), MetricError> {
    if obs.is_empty() {
        return Err(MetricError::DegenerateInput {
            metric,
            reason: "no finite value pairs".to_string(),
        });
    }
    Ok(())
}

/// `true` when every value equals the first one.
fn is_constant(data: &[f64]) -> bool {
    data.windows(2).all(|w| w[0] == w[1])
}

fn nse_core(metric: &'static str, obs: &[f64], sim: &[f64]) -> Result<f64, MetricError> {
    require_pairs(metric, obs)?;
    if is_constant(obs) {
        return Err(MetricError::DegenerateInput {
            metric,
            reason: "observed series is constant".to_string(),
        });
    }
    let num: f64 = obs.iter().zip(sim).map(|(o, s)| (s - o) * (s - o)).sum();
    Ok(1.0 - num / sum_sq_dev(obs))
}

/// Nash-Sutcliffe efficiency: `1 - Σ(sim-obs)² / Σ(obs-mean(obs))²`.
///
/// # Errors
///
/// [`MetricError::ShapeMismatch`] on unequal lengths;
/// [`MetricError::DegenerateInput`] when `observed` is constant.
pub fn nse(observed: &[f64], simulated: &[f64]) -> Result<f64, MetricError> {
    let (obs, sim) = finite_pairs(observed, simulated)?;
    nse_core("NSE", &obs, &sim)
}

/// NSE of the natural logarithms of both sequences.
///
/// # Errors
///
/// [`MetricError::InvalidDomain`] if any value is `<= 0`;
/// [`MetricError::DegenerateInput`] if `ln(observed)` is constant.
pub fn log_nse(observed: &[f64], simulated: &[f64]) -> Result<f64, MetricError> {
    let (obs, sim) = finite_pairs(observed, simulated)?;
    if let Some(&value) = obs.iter().chain(&sim).find(|&&v| v <= 0.0) {
        return Err(MetricError::InvalidDomain {
            metric: "logNSE",
            value,
        });
    }
    let log_obs: Vec<f64> = obs.iter().map(|v| v.ln()).collect();
    let log_sim: Vec<f64> = sim.iter().map(|v| v.ln()).collect();
    nse_core("logNSE", &log_obs, &log_sim)
}

/// Root-mean-square error.
///
/// # Errors
///
/// [`MetricError::ShapeMismatch`] on unequal lengths;
/// [`MetricError::DegenerateInput`] if no finite pairs remain.
pub fn rmse(observed: &[f64], simulated: &[f64]) -> Result<f64, MetricError> {
    let (obs, sim) = finite_pairs(observed, simulated)?;
    require_pairs("RMSE", &obs)?;
    let mse = obs
        .iter()
        .zip(&sim)
        .map(|(o, s)| (s - o) * (s - o))
        .sum::<f64>()
        / obs.len() as f64;
    Ok(mse.sqrt())
}

/// Percent bias: `100 * (mean(sim) - mean(obs)) / mean(obs)`.
///
/// # Errors
///
/// [`MetricError::DegenerateInput`] when the observed mean is zero or the
/// observed series is constant over two or more pairs.
pub fn bias(observed: &[f64], simulated: &[f64]) -> Result<f64, MetricError> {
    let (obs, sim) = finite_pairs(observed, simulated)?;
    require_pairs("Bias", &obs)?;
    if obs.len() >= 2 && is_constant(&obs) {
        return Err(MetricError::DegenerateInput {
            metric: "Bias",
            reason: "observed series is constant".to_string(),
        });
    }
    let mean_obs = mean(&obs);
    if mean_obs == 0.0 {
        return Err(MetricError::DegenerateInput {
            metric: "Bias",
            reason: "observed mean is zero".to_string(),
        });
    }
    Ok(100.0 * (mean(&sim) - mean_obs) / mean_obs)
}

fn pearson_core(obs: &[f64], sim: &[f64]) -> Result<f64, MetricError> {
    if obs.len() < 2 {
        return Err(MetricError::DegenerateInput {
            metric: "R",
            reason: format!("need at least 2 finite pairs, got {}", obs.len()),
        });
    }
    if is_constant(obs) || is_constant(sim) {
        return Err(MetricError::DegenerateInput {
            metric: "R",
            reason: "zero variance in observed or simulated series".to_string(),
        });
    }
    let mo = mean(obs);
    let ms = mean(sim);
    let mut sum_os = 0.0;
    let mut sum_oo = 0.0;
    let mut sum_ss = 0.0;
    for (&o, &s) in obs.iter().zip(sim) {
        let dobs = o - mo;
        let dsim = s - ms;
        sum_os += dobs * dsim;
        sum_oo += dobs * dobs;
        sum_ss += dsim * dsim;
    }
    // product of roots so tiny variances do not underflow together
    let denom = sum_oo.sqrt() * sum_ss.sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return Err(MetricError::DegenerateInput {
            metric: "R",
            reason: "variance underflows in observed or simulated series".to_string(),
        });
    }
    Ok(sum_os / denom)
}

/// Pearson correlation coefficient.
///
/// # Errors
///
/// [`MetricError::DegenerateInput`] when either sequence has zero variance
/// or fewer than two finite pairs remain.
pub fn pearson_r(observed: &[f64], simulated: &[f64]) -> Result<f64, MetricError> {
    let (obs, sim) = finite_pairs(observed, simulated)?;
    pearson_core(&obs, &sim)
}

/// Kling-Gupta efficiency: `1 - sqrt((r-1)² + (α-1)² + (β-1)²)`.
///
/// `α = sd(sim)/sd(obs)` (sample sd), `β = mean(sim)/mean(obs)`. `β` is NaN
/// when the observed mean is zero, making the result NaN.
///
/// # Errors
///
/// [`MetricError::DegenerateInput`] when `observed` is constant, or when
/// the correlation term is undefined.
pub fn kge(observed: &[f64], simulated: &[f64]) -> Result<f64, MetricError> {
    let (obs, sim) = finite_pairs(observed, simulated)?;
    require_pairs("KGE", &obs)?;
    if obs.len() < 2 || is_constant(&obs) {
        return Err(MetricError::DegenerateInput {
            metric: "KGE",
            reason: "observed standard deviation is zero".to_string(),
        });
    }
    let r = pearson_core(&obs, &sim)?;
    let alpha = sd(&sim) / sd(&obs);
    let mean_obs = mean(&obs);
    let beta = if mean_obs == 0.0 {
        f64::NAN
    } else {
        mean(&sim) / mean_obs
    };
    Ok(1.0 - ((r - 1.0).powi(2) + (alpha - 1.0).powi(2) + (beta - 1.0).powi(2)).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const OBS: [f64; 6] = [1.0, 3.0, 2.0, 5.0, 4.0, 6.0];

    #[test]
    fn identical_series_are_perfect() {
        assert_relative_eq!(nse(&OBS, &OBS).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(log_nse(&OBS, &OBS).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(rmse(&OBS, &OBS).unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(bias(&OBS, &OBS).unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(kge(&OBS, &OBS).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(pearson_r(&OBS, &OBS).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn scaled_simulation_correlates_perfectly() {
        let sim: Vec<f64> = OBS.iter().map(|v| 2.0 * v).collect();
        assert_relative_eq!(pearson_r(&OBS, &sim).unwrap(), 1.0, epsilon = 1e-12);
        assert!(nse(&OBS, &sim).unwrap() < 1.0);
        assert!(kge(&OBS, &sim).unwrap() < 1.0);
        assert_relative_eq!(bias(&OBS, &sim).unwrap(), 100.0, epsilon = 1e-10);
    }

    #[test]
    fn nse_known_value() {
        // obs mean 2, Σ(obs-mean)² = 2; Σ(sim-obs)² = 0.5
        let obs = [1.0, 2.0, 3.0];
        let sim = [1.5, 2.0, 2.5];
        assert_relative_eq!(nse(&obs, &sim).unwrap(), 0.75, epsilon = 1e-12);
    }

    #[test]
    fn nse_mean_prediction_is_zero() {
        let obs = [1.0, 2.0, 3.0];
        let sim = [2.0, 2.0, 2.0];
        assert_relative_eq!(nse(&obs, &sim).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn rmse_known_value() {
        let obs = [0.0, 0.0, 0.0, 0.0];
        let sim = [1.0, -1.0, 1.0, -1.0];
        assert_relative_eq!(rmse(&obs, &sim).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn kge_known_value() {
        // r = 1, alpha = 1, beta = 1.5 when sim = obs + mean(obs)/2
        let obs = [2.0, 4.0, 6.0];
        let sim = [4.0, 6.0, 8.0];
        assert_relative_eq!(kge(&obs, &sim).unwrap(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn kge_zero_mean_propagates_nan() {
        let obs = [-1.0, 0.0, 1.0];
        let sim = [-0.5, 0.1, 0.9];
        assert!(kge(&obs, &sim).unwrap().is_nan());
    }

    #[test]
    fn constant_observed_is_degenerate() {
        let obs = [3.0, 3.0, 3.0];
        let sim = [1.0, 2.0, 3.0];
        for result in [
            nse(&obs, &sim),
            bias(&obs, &sim),
            kge(&obs, &sim),
            pearson_r(&obs, &sim),
        ] {
            assert!(matches!(result, Err(MetricError::DegenerateInput { .. })));
        }
        // RMSE does not depend on observed variance
        assert!(rmse(&obs, &sim).is_ok());
    }

    #[test]
    fn bias_single_pair_uses_mean_only() {
        assert_relative_eq!(bias(&[2.0], &[3.0]).unwrap(), 50.0, epsilon = 1e-12);
    }

    #[test]
    fn tiny_variance_correlation_is_degenerate() {
        let tiny = [1e-200, 2e-200, 3e-200];
        assert!(matches!(
            pearson_r(&tiny, &tiny),
            Err(MetricError::DegenerateInput { metric: "R", .. })
        ));
        assert!(matches!(
            kge(&tiny, &tiny),
            Err(MetricError::DegenerateInput { .. })
        ));
    }

    #[test]
    fn small_but_representable_variance_still_correlates() {
        let obs = [1e-150, 2e-150, 3e-150];
        let sim = [2e-150, 4e-150, 6e-150];
        assert_relative_eq!(pearson_r(&obs, &sim).unwrap(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn constant_tenths_detected_exactly() {
        let obs = [0.1, 0.1, 0.1];
        assert!(matches!(
            nse(&obs, &[0.2, 0.1, 0.0]),
            Err(MetricError::DegenerateInput { metric: "NSE", .. })
        ));
    }

    #[test]
    fn bias_zero_mean_is_degenerate() {
        let obs = [0.0, 0.0];
        let sim = [1.0, 2.0];
        assert!(matches!(
            bias(&obs, &sim),
            Err(MetricError::DegenerateInput { metric: "Bias", .. })
        ));
    }

    #[test]
    fn constant_simulation_breaks_correlation() {
        let sim = [2.0; 6];
        assert!(matches!(
            pearson_r(&OBS, &sim),
            Err(MetricError::DegenerateInput { metric: "R", .. })
        ));
        assert!(kge(&OBS, &sim).is_err());
        // NSE only depends on observed variance
        assert!(nse(&OBS, &sim).is_ok());
    }

    #[test]
    fn log_nse_rejects_non_positive() {
        let obs = [1.0, 0.0, 2.0];
        let sim = [1.0, 1.0, 2.0];
        assert!(matches!(
            log_nse(&obs, &sim),
            Err(MetricError::InvalidDomain {
                metric: "logNSE",
                value
            }) if value == 0.0
        ));
        assert!(matches!(
            log_nse(&sim, &[1.0, -2.0, 2.0]),
            Err(MetricError::InvalidDomain { .. })
        ));
    }

    #[test]
    fn log_nse_constant_observed_is_degenerate() {
        assert!(matches!(
            log_nse(&[2.0, 2.0], &[1.0, 3.0]),
            Err(MetricError::DegenerateInput {
                metric: "logNSE",
                ..
            })
        ));
    }

    #[test]
    fn shape_mismatch_everywhere() {
        let obs = [1.0, 2.0, 3.0];
        let sim = [1.0, 2.0];
        let expected = MetricError::ShapeMismatch {
            observed: 3,
            simulated: 2,
        };
        assert_eq!(nse(&obs, &sim), Err(expected.clone()));
        assert_eq!(log_nse(&obs, &sim), Err(expected.clone()));
        assert_eq!(rmse(&obs, &sim), Err(expected.clone()));
        assert_eq!(bias(&obs, &sim), Err(expected.clone()));
        assert_eq!(pearson_r(&obs, &sim), Err(expected.clone()));
        assert_eq!(kge(&obs, &sim), Err(expected));
    }

    #[test]
    fn non_finite_pairs_are_dropped() {
        let obs = [1.0, f64::NAN, 2.0, 3.0];
        let sim = [1.5, 7.0, 2.0, f64::INFINITY];
        // remaining pairs: (1, 1.5), (2, 2) -> Σ(obs-mean)² = 0.5, Σ err² = 0.25
        assert_relative_eq!(nse(&obs, &sim).unwrap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(rmse(&obs, &sim).unwrap(), (0.125f64).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn all_pairs_missing_is_degenerate() {
        let obs = [f64::NAN, 1.0];
        let sim = [1.0, f64::NAN];
        assert!(matches!(
            rmse(&obs, &sim),
            Err(MetricError::DegenerateInput { metric: "RMSE", .. })
        ));
    }
}
