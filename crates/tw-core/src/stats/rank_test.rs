//! Two-sided Mann–Whitney U rank-sum test.

use serde::Serialize;
use statrs::function::erf::erfc;

/// Result of the rank-sum test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankTest {
    /// U statistic for the first sample.
    pub u_statistic: f64,
    /// Two-sided p-value.
    pub p_value: f64,
}

/// Two-sided Mann–Whitney U test on two unpaired samples.
///
/// Ties receive midranks. The p-value uses the asymptotic normal
/// approximation with tie correction and continuity correction, which is
/// the standard treatment for tied data. Both samples must be non-empty.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mann_whitney_u(first: &[f64], second: &[f64]) -> RankTest {
    debug_assert!(!first.is_empty() && !second.is_empty());

    let n1 = first.len() as f64;
    let n2 = second.len() as f64;

    // Pool both samples, tagging membership in the first.
    let mut pooled: Vec<(f64, bool)> = first
        .iter()
        .map(|&v| (v, true))
        .chain(second.iter().map(|&v| (v, false)))
        .collect();
    pooled.sort_by(|a, b| a.0.total_cmp(&b.0));

    // Walk tie groups, assigning the midrank to every member and
    // accumulating the t³ − t tie-correction term.
    let n = pooled.len();
    let mut rank_sum_first = 0.0;
    let mut tie_term = 0.0;
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && pooled[j].0 == pooled[i].0 {
            j += 1;
        }
        // 1-based ranks i+1..=j average to (i + j + 1) / 2.
        let midrank = (i + j + 1) as f64 / 2.0;
        for entry in &pooled[i..j] {
            if entry.1 {
                rank_sum_first += midrank;
            }
        }
        let t = (j - i) as f64;
        tie_term += t * t * t - t;
        i = j;
    }

    let u1 = rank_sum_first - n1 * (n1 + 1.0) / 2.0;

    let n_total = n1 + n2;
    let mean_u = n1 * n2 / 2.0;
    let tie_correction = tie_term / (n_total * (n_total - 1.0));
    let variance = n1 * n2 / 12.0 * (n_total + 1.0 - tie_correction);

    if variance <= 0.0 {
        // Every pooled value is tied: the ranks carry no information.
        return RankTest {
            u_statistic: u1,
            p_value: 1.0,
        };
    }

    // Continuity correction: pull the statistic half a unit toward the mean.
    let diff = u1 - mean_u;
    let corrected = if diff > 0.0 {
        diff - 0.5
    } else if diff < 0.0 {
        diff + 0.5
    } else {
        0.0
    };
    let z = corrected / variance.sqrt();
    // Two-sided tail: 2·(1 − Φ(|z|)) = erfc(|z| / √2).
    let p_value = erfc(z.abs() / std::f64::consts::SQRT_2).min(1.0);

    RankTest {
        u_statistic: u1,
        p_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fully_separated_samples() {
        // All of the first sample outranks all of the second:
        // U1 = n1 * n2.
        let test = mann_whitney_u(&[10.0, 20.0, 30.0], &[1.0, 2.0, 3.0]);

        assert!((test.u_statistic - 9.0).abs() < 1e-12);
        assert!(test.p_value > 0.0 && test.p_value < 1.0);
    }

    #[test]
    fn test_u_statistics_are_complementary() {
        let a = [1.0, 4.0, 6.0, 9.0];
        let b = [2.0, 3.0, 7.0];

        let forward = mann_whitney_u(&a, &b);
        let backward = mann_whitney_u(&b, &a);

        let n1n2 = (a.len() * b.len()) as f64;
        assert!((forward.u_statistic + backward.u_statistic - n1n2).abs() < 1e-12);
        assert!((forward.p_value - backward.p_value).abs() < 1e-12);
    }

    #[test]
    fn test_identical_samples_not_significant() {
        let test = mann_whitney_u(&[1.0, 2.0, 3.0, 4.0], &[1.0, 2.0, 3.0, 4.0]);

        // U1 = n1*n2/2 exactly; p must be near 1.
        assert!((test.u_statistic - 8.0).abs() < 1e-12);
        assert!(test.p_value > 0.9);
    }

    #[test]
    fn test_all_values_tied() {
        let test = mann_whitney_u(&[5.0, 5.0, 5.0], &[5.0, 5.0]);

        assert!((test.p_value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_midranks_for_ties() {
        // Pooled sorted: [1, 2, 2, 3]; the tied 2s get midrank 2.5.
        // first = [2, 3] -> rank sum = 2.5 + 4 = 6.5; U1 = 6.5 - 3 = 3.5.
        let test = mann_whitney_u(&[2.0, 3.0], &[1.0, 2.0]);

        assert!((test.u_statistic - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_large_separation_is_significant() {
        let first: Vec<f64> = (0..30).map(|i| 100.0 + f64::from(i)).collect();
        let second: Vec<f64> = (0..30).map(f64::from).collect();

        let test = mann_whitney_u(&first, &second);

        assert!((test.u_statistic - 900.0).abs() < 1e-12);
        assert!(test.p_value < 0.001);
    }

    #[test]
    fn test_p_value_never_exceeds_one() {
        let test = mann_whitney_u(&[1.0, 2.0], &[1.5, 2.5]);

        assert!(test.p_value <= 1.0);
        assert!(test.p_value >= 0.0);
    }
}
