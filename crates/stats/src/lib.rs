//! Statistical helper functions and series summaries for rill.

use serde::{Deserialize, Serialize};

/// Arithmetic mean of a slice. Returns 0.0 if empty.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Sample variance with N-1 denominator.
/// Returns 0.0 if fewer than 2 elements.
pub fn variance(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let nf = n as f64;
    let mean = data.iter().sum::<f64>() / nf;
    data.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / (nf - 1.0)
}

/// Sample standard deviation with N-1 denominator.
/// Returns 0.0 if fewer than 2 elements.
pub fn sd(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// Sum of squared deviations from the mean.
pub fn sum_sq_dev(data: &[f64]) -> f64 {
    let m = mean(data);
    data.iter().map(|&x| (x - m) * (x - m)).sum()
}

/// Adjusted Fisher-Pearson sample skewness.
///
/// Returns `None` for fewer than 3 elements or zero variance.
pub fn skewness(data: &[f64]) -> Option<f64> {
    let n = data.len();
    if n < 3 {
        return None;
    }
    let nf = n as f64;
    let m = mean(data);
    let m2 = data.iter().map(|&x| (x - m).powi(2)).sum::<f64>() / nf;
    if m2 <= 0.0 {
        return None;
    }
    let m3 = data.iter().map(|&x| (x - m).powi(3)).sum::<f64>() / nf;
    let g1 = m3 / m2.powf(1.5);
    Some(g1 * (nf * (nf - 1.0)).sqrt() / (nf - 2.0))
}

/// Linear-interpolation quantile (R type 7).
///
/// **Expects pre-sorted input** (caller's responsibility).
///
/// # Panics
///
/// Panics if `sorted` is empty.
pub fn quantile_type7(sorted: &[f64], p: f64) -> f64 {
    assert!(
        !sorted.is_empty(),
        "quantile_type7: input must not be empty"
    );
    let n = sorted.len();
    let h = (n - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    sorted[lo] + (h - h.floor()) * (sorted[hi] - sorted[lo])
}

/// Median of pre-sorted data. For even length, averages the middle two values.
///
/// # Panics
///
/// Panics if `sorted` is empty.
pub fn median(sorted: &[f64]) -> f64 {
    assert!(!sorted.is_empty(), "median: input must not be empty");
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Descriptive statistics of one value column.
///
/// Moments and quantiles are computed over finite values only; `missing`
/// counts the non-finite entries that were skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub missing: usize,
    pub mean: f64,
    pub sd: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
    pub skewness: Option<f64>,
}

/// Summarise a value column.
///
/// With no finite values every statistic is NaN and `count` is 0.
pub fn summarize(values: &[f64]) -> Summary {
    let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let missing = values.len() - finite.len();

    if finite.is_empty() {
        return Summary {
            count: 0,
            missing,
            mean: f64::NAN,
            sd: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            median: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
            skewness: None,
        };
    }

    finite.sort_by(f64::total_cmp);
    Summary {
        count: finite.len(),
        missing,
        mean: mean(&finite),
        sd: sd(&finite),
        min: finite[0],
        q25: quantile_type7(&finite, 0.25),
        median: median(&finite),
        q75: quantile_type7(&finite, 0.75),
        max: finite[finite.len() - 1],
        skewness: skewness(&finite),
    }
}
