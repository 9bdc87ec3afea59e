//! Single linear reservoir.
//!
//! Each step releases a fraction `k` of the new input and keeps `1 - k` of
//! the previous outflow:
//!
//! ```text
//! q[0] = (1 - k) * q0     + k * p[0]
//! q[t] = (1 - k) * q[t-1] + k * p[t]
//! ```
//!
//! `k = 1` passes input straight through; `k -> 0` holds the outflow at
//! `q0`. Valid recession coefficients lie in `(0, 1]`. The model does not
//! check this; the calibrator keeps its search inside those bounds.

use rill_series::TimeSeries;

use crate::error::RunoffError;

/// Precipitation net of evapotranspiration, floored at zero.
///
/// Non-finite precipitation contributes no input, and non-finite
/// evapotranspiration removes nothing.
///
/// # Errors
///
/// Returns [`RunoffError::LengthMismatch`] if `aet` is given with a
/// different length than `precip`.
pub fn effective_precipitation(precip: &[f64], aet: Option<&[f64]>) -> Result<Vec<f64>, RunoffError> {
    let finite_or_zero = |v: f64| if v.is_finite() { v } else { 0.0 };
    match aet {
        None => Ok(precip.iter().map(|&p| finite_or_zero(p).max(0.0)).collect()),
        Some(aet) if aet.len() != precip.len() => Err(RunoffError::LengthMismatch {
            precip: precip.len(),
            aet: aet.len(),
        }),
        Some(aet) => Ok(precip
            .iter()
            .zip(aet)
            .map(|(&p, &e)| (finite_or_zero(p) - finite_or_zero(e)).max(0.0))
            .collect()),
    }
}

/// Linear reservoir with recession coefficient `k`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearReservoir {
    k: f64,
}

impl LinearReservoir {
    pub fn new(k: f64) -> Self {
        Self { k }
    }

    pub fn k(&self) -> f64 {
        self.k
    }

    /// Route `effective` precipitation starting from outflow `q0`.
    pub fn simulate(&self, effective: &[f64], q0: f64) -> Vec<f64> {
        let k = self.k;
        let mut q = q0;
        effective
            .iter()
            .map(|&p| {
                q = (1.0 - k) * q + k * p;
                q
            })
            .collect()
    }
}

/// Simulate discharge on the timestamps of `precip`.
///
/// # Errors
///
/// Returns [`RunoffError::IndexMismatch`] if `aet` has different
/// timestamps from `precip`.
pub fn simulate_series(
    precip: &TimeSeries,
    aet: Option<&TimeSeries>,
    k: f64,
    q0: f64,
) -> Result<TimeSeries, RunoffError> {
    if let Some(aet) = aet
        && aet.times() != precip.times()
    {
        return Err(RunoffError::IndexMismatch);
    }
    let effective = effective_precipitation(precip.values(), aet.map(TimeSeries::values))?;
    let simulated = LinearReservoir::new(k).simulate(&effective, q0);
    Ok(precip.with_values(simulated)?)
}
