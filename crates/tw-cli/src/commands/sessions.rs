//! Sessions command: reconstruct and filter sessions without statistics.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use tw_core::{Session, aggregate_users, filter_outliers};

use crate::input;

/// Format the kept-session table as CSV.
pub fn format_sessions_csv(sessions: &[Session]) -> String {
    let mut output = String::new();
    output.push_str("user_id,duration_minutes,open_type\n");
    for session in sessions {
        writeln!(
            output,
            "{},{},{}",
            session.user_id, session.duration_minutes, session.open_type
        )
        .unwrap();
    }
    output
}

/// Runs the sessions command.
///
/// With `--out`, writes the table to the given file and prints the counts;
/// without it, the table itself goes to stdout.
pub fn run(input_path: &Path, out: Option<&Path>, ceiling_minutes: f64) -> Result<()> {
    let groups = input::load_events(input_path)
        .with_context(|| format!("failed to read events from {}", input_path.display()))?;

    let matched = aggregate_users(&groups);
    let matched_sessions = matched.sessions.len();
    let unmatched_opens = matched.unmatched_opens;
    let unmatched_closes = matched.unmatched_closes;
    let (kept, removed) = filter_outliers(matched.sessions, ceiling_minutes);

    let csv = format_sessions_csv(&kept);
    if let Some(path) = out {
        std::fs::write(path, csv)
            .with_context(|| format!("failed to write sessions to {}", path.display()))?;
        println!("Matched sessions: {matched_sessions}");
        println!("Orphaned opens:   {unmatched_opens}");
        println!("Orphaned closes:  {unmatched_closes}");
        println!("Outliers removed: {removed} (> {ceiling_minutes} min)");
        println!("Wrote {} sessions to {}", kept.len(), path.display());
    } else {
        tracing::debug!(
            matched_sessions,
            unmatched_opens,
            unmatched_closes,
            removed,
            "session table to stdout"
        );
        print!("{csv}");
    }

    Ok(())
}
