//! Standardized effect size (Cohen's d).

use serde::Serialize;

/// Effect-size tier for |d|.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EffectSize {
    Negligible,
    Small,
    Medium,
    Large,
}

/// Tier thresholds, smallest first. Adding a tier is a data change.
const EFFECT_TIERS: &[(f64, EffectSize)] = &[
    (0.2, EffectSize::Small),
    (0.5, EffectSize::Medium),
    (0.8, EffectSize::Large),
];

impl EffectSize {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Negligible => "NEGLIGIBLE",
            Self::Small => "SMALL",
            Self::Medium => "MEDIUM",
            Self::Large => "LARGE",
        }
    }

    /// Classify a Cohen's d value.
    ///
    /// Thresholds are evaluated ascending and the last satisfied tier wins,
    /// so the mapping stays monotonic in |d|.
    #[must_use]
    pub fn from_d(d: f64) -> Self {
        let mut tier = Self::Negligible;
        for &(threshold, candidate) in EFFECT_TIERS {
            if d.abs() >= threshold {
                tier = candidate;
            }
        }
        tier
    }
}

impl std::fmt::Display for EffectSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pooled standard deviation of two samples:
/// sqrt(((n1−1)·sd1² + (n2−1)·sd2²) / (n1 + n2 − 2)).
///
/// Both samples must have at least 2 observations.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn pooled_std_dev(n1: usize, sd1: f64, n2: usize, sd2: f64) -> f64 {
    debug_assert!(n1 >= 2 && n2 >= 2);

    let n1 = n1 as f64;
    let n2 = n2 as f64;
    (((n1 - 1.0) * sd1 * sd1 + (n2 - 1.0) * sd2 * sd2) / (n1 + n2 - 2.0)).sqrt()
}

/// Cohen's d: a mean difference standardized by the pooled sd.
#[must_use]
pub fn cohens_d(mean1: f64, mean2: f64, pooled_sd: f64) -> f64 {
    (mean1 - mean2) / pooled_sd
}
