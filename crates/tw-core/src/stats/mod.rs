//! Comparative statistics over two duration samples.
//!
//! The pipeline: descriptive summaries per group, a two-sided rank-sum
//! significance test, a standardized effect size, and a seeded bootstrap
//! confidence interval on the median difference. Degenerate inputs are
//! rejected up front with typed errors instead of propagating NaN.

mod bootstrap;
mod effect;
mod rank_test;
mod summary;

pub use bootstrap::{BootstrapCi, median_diff_ci};
pub use effect::{EffectSize, cohens_d, pooled_std_dev};
pub use rank_test::{RankTest, mann_whitney_u};
pub use summary::{GroupSummary, median, percentile};

use serde::Serialize;
use thiserror::Error;

use crate::event::OpenType;

/// Default number of bootstrap resamples.
pub const DEFAULT_BOOTSTRAP_ITERATIONS: usize = 10_000;

/// Default bootstrap seed.
pub const DEFAULT_BOOTSTRAP_SEED: u64 = 42;

/// Tuning knobs for the comparison pipeline.
#[derive(Debug, Clone)]
pub struct CompareConfig {
    /// Number of bootstrap resamples for the median-difference CI.
    pub bootstrap_iterations: usize,
    /// Seed for the bootstrap RNG; fixing it makes the interval reproducible.
    pub bootstrap_seed: u64,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            bootstrap_iterations: DEFAULT_BOOTSTRAP_ITERATIONS,
            bootstrap_seed: DEFAULT_BOOTSTRAP_SEED,
        }
    }
}

/// Preconditions the comparison refuses to run without.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompareError {
    /// A group has no sessions at all (e.g. everything was filtered out).
    #[error("{group} group has no sessions to compare")]
    EmptyGroup { group: OpenType },

    /// A group is too small for the pooled sd and the rank test.
    #[error("{group} group has {len} session(s); need at least 2")]
    DegenerateSample { group: OpenType, len: usize },

    /// Both groups are constant, so the effect size is undefined.
    #[error("pooled standard deviation is zero; effect size is undefined")]
    ZeroVariance,
}

/// Significance tier for a p-value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Significance {
    HighlySignificant,
    VerySignificant,
    Significant,
    NotSignificant,
}

impl Significance {
    /// Classify a p-value; thresholds are checked strictly in descending
    /// stringency, first match wins.
    #[must_use]
    pub fn from_p_value(p: f64) -> Self {
        if p < 0.001 {
            Self::HighlySignificant
        } else if p < 0.01 {
            Self::VerySignificant
        } else if p < 0.05 {
            Self::Significant
        } else {
            Self::NotSignificant
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HighlySignificant => "highly significant",
            Self::VerySignificant => "very significant",
            Self::Significant => "significant",
            Self::NotSignificant => "not significant",
        }
    }
}

impl std::fmt::Display for Significance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directional conclusion drawn from the confidence interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    ManualLonger,
    ManualShorter,
    Inconclusive,
}

impl Direction {
    /// A claim is made only when the whole interval sits on one side of zero.
    #[must_use]
    pub fn from_interval(ci: BootstrapCi) -> Self {
        if ci.lower > 0.0 {
            Self::ManualLonger
        } else if ci.upper < 0.0 {
            Self::ManualShorter
        } else {
            Self::Inconclusive
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ManualLonger => "manual sessions are longer",
            Self::ManualShorter => "manual sessions are shorter",
            Self::Inconclusive => "no directional difference",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full output of one manual-vs-auto comparison.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    /// Descriptive statistics for the manual group.
    pub manual: GroupSummary,
    /// Descriptive statistics for the auto group.
    pub auto: GroupSummary,
    /// Mann–Whitney U for the manual group.
    pub u_statistic: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    pub significance: Significance,
    /// Cohen's d, manual minus auto, pooled-sd standardized.
    pub cohens_d: f64,
    pub effect: EffectSize,
    /// median(manual) − median(auto) of the original samples.
    pub median_difference: f64,
    /// Bootstrap 95% CI lower bound on the median difference.
    pub ci_lower: f64,
    /// Bootstrap 95% CI upper bound on the median difference.
    pub ci_upper: f64,
    pub direction: Direction,
}

/// Run the full comparison pipeline on two duration samples.
pub fn compare(
    manual: &[f64],
    auto: &[f64],
    config: &CompareConfig,
) -> Result<ComparisonReport, CompareError> {
    check_group(OpenType::Manual, manual)?;
    check_group(OpenType::Auto, auto)?;

    let manual_summary = GroupSummary::from_sample(manual);
    let auto_summary = GroupSummary::from_sample(auto);

    let pooled = pooled_std_dev(
        manual_summary.count,
        manual_summary.std_dev,
        auto_summary.count,
        auto_summary.std_dev,
    );
    if pooled <= 0.0 {
        return Err(CompareError::ZeroVariance);
    }

    let test = mann_whitney_u(manual, auto);
    let d = cohens_d(manual_summary.mean, auto_summary.mean, pooled);
    let ci = median_diff_ci(
        manual,
        auto,
        config.bootstrap_iterations,
        config.bootstrap_seed,
    );

    Ok(ComparisonReport {
        manual: manual_summary,
        auto: auto_summary,
        u_statistic: test.u_statistic,
        p_value: test.p_value,
        significance: Significance::from_p_value(test.p_value),
        cohens_d: d,
        effect: EffectSize::from_d(d),
        median_difference: manual_summary.median - auto_summary.median,
        ci_lower: ci.lower,
        ci_upper: ci.upper,
        direction: Direction::from_interval(ci),
    })
}

fn check_group(group: OpenType, values: &[f64]) -> Result<(), CompareError> {
    match values.len() {
        0 => Err(CompareError::EmptyGroup { group }),
        1 => Err(CompareError::DegenerateSample { group, len: 1 }),
        _ => Ok(()),
    }
}
