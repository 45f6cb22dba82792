//! Analyze command: the full matching + comparison pipeline.
//!
//! Reads the raw event table, reconstructs sessions, filters outliers,
//! splits durations by open type, runs the statistical comparison, and
//! renders the result as human-readable text or JSON.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tw_core::{
    CompareConfig, ComparisonReport, Event, OpenType, Session, Significance, aggregate_users,
    compare, filter_outliers,
};

use crate::commands::sessions::format_sessions_csv;
use crate::input;

/// Options for one analyze run.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Outlier ceiling in minutes.
    pub ceiling_minutes: f64,
    /// Statistics engine configuration.
    pub compare: CompareConfig,
}

/// Everything one run of the pipeline produced.
#[derive(Debug)]
pub struct AnalysisData {
    pub generated_at: DateTime<Utc>,
    pub matched_sessions: usize,
    pub unmatched_opens: usize,
    pub unmatched_closes: usize,
    pub outliers_removed: usize,
    pub ceiling_minutes: f64,
    pub kept_sessions: Vec<Session>,
    pub report: ComparisonReport,
}

// ========== Pipeline ==========

/// Run matching, filtering, and comparison over normalized event groups.
pub fn run_pipeline(
    groups: &[Vec<Event>],
    options: &AnalyzeOptions,
    generated_at: DateTime<Utc>,
) -> Result<AnalysisData> {
    let matched = aggregate_users(groups);
    let matched_sessions = matched.sessions.len();
    let unmatched_opens = matched.unmatched_opens;
    let unmatched_closes = matched.unmatched_closes;

    let (kept_sessions, outliers_removed) =
        filter_outliers(matched.sessions, options.ceiling_minutes);

    let manual = durations_of(&kept_sessions, OpenType::Manual);
    let auto = durations_of(&kept_sessions, OpenType::Auto);

    let report = compare(&manual, &auto, &options.compare)
        .context("comparison preconditions not met")?;

    Ok(AnalysisData {
        generated_at,
        matched_sessions,
        unmatched_opens,
        unmatched_closes,
        outliers_removed,
        ceiling_minutes: options.ceiling_minutes,
        kept_sessions,
        report,
    })
}

fn durations_of(sessions: &[Session], open_type: OpenType) -> Vec<f64> {
    sessions
        .iter()
        .filter(|s| s.open_type == open_type)
        .map(|s| s.duration_minutes)
        .collect()
}

// ========== Human-Readable Report ==========

/// Writes a section header followed by an underline of matching width.
fn section(output: &mut String, title: &str) {
    writeln!(output).unwrap();
    writeln!(output, "{title}").unwrap();
    writeln!(output, "{}", "─".repeat(title.chars().count())).unwrap();
}

fn significance_label(significance: Significance) -> &'static str {
    match significance {
        Significance::HighlySignificant => "HIGHLY significant (p < 0.001)",
        Significance::VerySignificant => "VERY significant (p < 0.01)",
        Significance::Significant => "significant (p < 0.05)",
        Significance::NotSignificant => "NOT significant (p >= 0.05)",
    }
}

fn write_group(output: &mut String, label: &str, summary: &tw_core::GroupSummary) {
    section(output, &format!("{label} (n={})", summary.count));
    writeln!(output, "Mean:    {:.3} min", summary.mean).unwrap();
    writeln!(output, "Median:  {:.3} min", summary.median).unwrap();
    writeln!(output, "Std dev: {:.3} min", summary.std_dev).unwrap();
    writeln!(output, "Q1:      {:.3} min", summary.q1).unwrap();
    writeln!(output, "Q3:      {:.3} min", summary.q3).unwrap();
}

/// Formats the human-readable analysis report.
pub fn format_report(data: &AnalysisData) -> String {
    let mut output = String::new();
    let report = &data.report;

    writeln!(output, "TOOLWINDOW SESSION ANALYSIS").unwrap();

    section(&mut output, "MATCHING");
    writeln!(output, "Matched sessions: {}", data.matched_sessions).unwrap();
    writeln!(output, "Orphaned opens:   {}", data.unmatched_opens).unwrap();
    writeln!(output, "Orphaned closes:  {}", data.unmatched_closes).unwrap();
    writeln!(
        output,
        "Outliers removed: {} (> {} min)",
        data.outliers_removed, data.ceiling_minutes
    )
    .unwrap();

    write_group(&mut output, "MANUAL OPENS", &report.manual);
    write_group(&mut output, "AUTO OPENS", &report.auto);

    section(&mut output, "MANN-WHITNEY U TEST");
    writeln!(output, "U statistic: {:.4}", report.u_statistic).unwrap();
    writeln!(output, "p-value:     {:.6}", report.p_value).unwrap();
    writeln!(
        output,
        "Result:      {}",
        significance_label(report.significance)
    )
    .unwrap();

    section(&mut output, "EFFECT SIZE");
    writeln!(output, "Cohen's d:      {:.3}", report.cohens_d).unwrap();
    writeln!(output, "Interpretation: {} effect", report.effect).unwrap();

    section(&mut output, "BOOTSTRAP 95% CI");
    writeln!(
        output,
        "Median difference: {:.3} min",
        report.median_difference
    )
    .unwrap();
    writeln!(
        output,
        "95% CI:            [{:.3}, {:.3}] min",
        report.ci_lower, report.ci_upper
    )
    .unwrap();
    writeln!(output, "Conclusion:        {}", report.direction).unwrap();

    output
}

// ========== JSON Output ==========

/// Flat JSON report: every statistic as a named scalar field.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub generated_at: String,
    pub matched_sessions: usize,
    pub unmatched_opens: usize,
    pub unmatched_closes: usize,
    pub outliers_removed: usize,
    pub manual_count: usize,
    pub manual_mean: f64,
    pub manual_median: f64,
    pub manual_std_dev: f64,
    pub manual_q1: f64,
    pub manual_q3: f64,
    pub auto_count: usize,
    pub auto_mean: f64,
    pub auto_median: f64,
    pub auto_std_dev: f64,
    pub auto_q1: f64,
    pub auto_q3: f64,
    pub u_statistic: f64,
    pub p_value: f64,
    pub significance: Significance,
    pub cohens_d: f64,
    pub effect: tw_core::EffectSize,
    pub median_difference: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub direction: tw_core::Direction,
}

/// Formats analysis data as JSON.
pub fn format_report_json(data: &AnalysisData) -> Result<String> {
    let report = &data.report;
    let json = JsonReport {
        generated_at: data.generated_at.to_rfc3339(),
        matched_sessions: data.matched_sessions,
        unmatched_opens: data.unmatched_opens,
        unmatched_closes: data.unmatched_closes,
        outliers_removed: data.outliers_removed,
        manual_count: report.manual.count,
        manual_mean: report.manual.mean,
        manual_median: report.manual.median,
        manual_std_dev: report.manual.std_dev,
        manual_q1: report.manual.q1,
        manual_q3: report.manual.q3,
        auto_count: report.auto.count,
        auto_mean: report.auto.mean,
        auto_median: report.auto.median,
        auto_std_dev: report.auto.std_dev,
        auto_q1: report.auto.q1,
        auto_q3: report.auto.q3,
        u_statistic: report.u_statistic,
        p_value: report.p_value,
        significance: report.significance,
        cohens_d: report.cohens_d,
        effect: report.effect,
        median_difference: report.median_difference,
        ci_lower: report.ci_lower,
        ci_upper: report.ci_upper,
        direction: report.direction,
    };

    Ok(serde_json::to_string_pretty(&json)?)
}

// ========== Public Interface ==========

/// Runs the analyze command.
pub fn run(
    input_path: &Path,
    sessions_out: Option<&Path>,
    json: bool,
    options: &AnalyzeOptions,
) -> Result<()> {
    let groups = input::load_events(input_path)
        .with_context(|| format!("failed to read events from {}", input_path.display()))?;

    let data = run_pipeline(&groups, options, Utc::now())?;

    if let Some(path) = sessions_out {
        std::fs::write(path, format_sessions_csv(&data.kept_sessions))
            .with_context(|| format!("failed to write sessions to {}", path.display()))?;
        tracing::debug!(path = %path.display(), sessions = data.kept_sessions.len(), "wrote session table");
    }

    if json {
        let output = format_report_json(&data)?;
        println!("{output}");
    } else {
        let output = format_report(&data);
        print!("{output}");
    }

    Ok(())
}
