//! Bootstrap confidence interval on the median difference.

use rand::prelude::*;
use rand_xorshift::XorShiftRng;
use rayon::prelude::*;
use serde::Serialize;

use super::summary::percentile;

/// 95% percentile-bootstrap interval bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BootstrapCi {
    pub lower: f64,
    pub upper: f64,
}

/// Percentile bootstrap CI for median(first) − median(second).
///
/// Each resample independently draws, with replacement, |first| values from
/// `first` and |second| values from `second`, and records the difference of
/// the resample medians. The interval is the [2.5th, 97.5th] percentile of
/// the recorded differences.
///
/// Every iteration seeds its own RNG from `seed + index`, so the parallel
/// loop reproduces the sequential result bit for bit.
#[must_use]
pub fn median_diff_ci(first: &[f64], second: &[f64], iterations: usize, seed: u64) -> BootstrapCi {
    debug_assert!(!first.is_empty() && !second.is_empty());

    let iterations = iterations.max(1);
    let mut diffs: Vec<f64> = (0..iterations)
        .into_par_iter()
        .map(|i| {
            let mut rng = XorShiftRng::seed_from_u64(seed.wrapping_add(i as u64));
            resample_median(first, &mut rng) - resample_median(second, &mut rng)
        })
        .collect();
    diffs.sort_by(f64::total_cmp);

    BootstrapCi {
        lower: percentile(&diffs, 2.5),
        upper: percentile(&diffs, 97.5),
    }
}

/// Median of one same-size resample drawn with replacement.
fn resample_median(values: &[f64], rng: &mut XorShiftRng) -> f64 {
    let mut sample: Vec<f64> = (0..values.len())
        .map(|_| values[rng.random_range(0..values.len())])
        .collect();
    sample.sort_by(f64::total_cmp);
    percentile(&sample, 50.0)
}
