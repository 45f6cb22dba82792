//! Per-group descriptive statistics.

use serde::Serialize;

/// Descriptive statistics for one duration sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupSummary {
    /// Number of observations.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// 50th percentile.
    pub median: f64,
    /// Sample standard deviation (n − 1 denominator).
    pub std_dev: f64,
    /// 25th percentile.
    pub q1: f64,
    /// 75th percentile.
    pub q3: f64,
}

impl GroupSummary {
    /// Compute summary statistics for a sample.
    ///
    /// `values` must be non-empty; the comparison pipeline rejects empty
    /// groups before reaching this point.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_sample(values: &[f64]) -> Self {
        debug_assert!(!values.is_empty());

        let count = values.len();
        let n = count as f64;
        let mean = values.iter().sum::<f64>() / n;

        let std_dev = if count < 2 {
            0.0
        } else {
            let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (sum_sq / (n - 1.0)).sqrt()
        };

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Self {
            count,
            mean,
            median: percentile(&sorted, 50.0),
            std_dev,
            q1: percentile(&sorted, 25.0),
            q3: percentile(&sorted, 75.0),
        }
    }
}

/// Percentile of a sorted sample, with linear interpolation between order
/// statistics (the conventional definition).
///
/// `sorted` must be non-empty and ascending; `p` is in percent (0–100).
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    debug_assert!(!sorted.is_empty());

    let last = sorted.len() - 1;
    let rank = p / 100.0 * last as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Median of an unsorted sample.
#[must_use]
pub fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    percentile(&sorted, 50.0)
}
