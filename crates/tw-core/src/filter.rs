//! Duration-ceiling outlier removal.

use crate::matcher::Session;

/// Default ceiling: 24 hours.
pub const DEFAULT_CEILING_MINUTES: f64 = 1_440.0;

/// Remove sessions whose duration exceeds `ceiling_minutes`.
///
/// The threshold is exclusive: a session exactly at the ceiling is kept.
/// Relative order of the kept sessions is preserved, and the removed count
/// is returned alongside them.
#[must_use]
pub fn filter_outliers(sessions: Vec<Session>, ceiling_minutes: f64) -> (Vec<Session>, usize) {
    let before = sessions.len();
    let kept: Vec<Session> = sessions
        .into_iter()
        .filter(|s| s.duration_minutes <= ceiling_minutes)
        .collect();
    let removed = before - kept.len();
    (kept, removed)
}
