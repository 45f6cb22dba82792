//! Open/close session matching.
//!
//! Pairs each "closed" event with the most recent unmatched "opened" event
//! of the same user, reconstructing bounded sessions from the raw stream.
//!
//! # Algorithm Summary
//!
//! 1. Fold one user's time-sorted events over a LIFO stack of pending opens
//! 2. A close pops the nearest open (nested/re-entrant opens close first)
//! 3. Leftover stack entries and stackless closes become orphan counts

use rayon::prelude::*;
use serde::Serialize;

use crate::event::{Event, EventKind, OpenType};

/// Milliseconds per minute, for duration conversion.
const MS_PER_MINUTE: f64 = 60_000.0;

/// A reconstructed open/close pair with a derived duration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    /// The user this session belongs to.
    pub user_id: String,
    /// (close timestamp − open timestamp) in minutes. May be zero or, when
    /// the input carries clock skew, negative; durations pass through
    /// unclamped.
    pub duration_minutes: f64,
    /// Inherited from the open event that started the session.
    pub open_type: OpenType,
}

/// An open event awaiting its close.
#[derive(Debug, Clone, Copy)]
struct PendingOpen {
    timestamp_ms: i64,
    open_type: OpenType,
}

/// Matched sessions plus counts of events that could not be paired.
///
/// Produced per user by [`match_user_events`] and merged across users by
/// [`aggregate_users`] into the same shape.
#[derive(Debug, Clone, Default)]
pub struct MatchResult {
    /// Sessions in emission order (close-event order within each user).
    pub sessions: Vec<Session>,
    /// Opens still on the stack at the end of a user's stream.
    pub unmatched_opens: usize,
    /// Closes that arrived with no open on the stack.
    pub unmatched_closes: usize,
}

/// Match one user's time-ordered events into sessions.
///
/// Events must be sorted by timestamp ascending. The matcher is a pure
/// pass-through: it never rejects or clamps durations, and pending opens are
/// discarded at the end of the stream, never retried against another user.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn match_user_events(events: &[Event]) -> MatchResult {
    let mut stack: Vec<PendingOpen> = Vec::new();
    let mut sessions: Vec<Session> = Vec::new();
    let mut unmatched_closes = 0usize;

    for event in events {
        match event.kind {
            EventKind::Opened { open_type } => {
                stack.push(PendingOpen {
                    timestamp_ms: event.timestamp_ms,
                    open_type,
                });
            }
            EventKind::Closed => {
                if let Some(open) = stack.pop() {
                    let duration_ms = event.timestamp_ms - open.timestamp_ms;
                    sessions.push(Session {
                        user_id: event.user_id.clone(),
                        duration_minutes: duration_ms as f64 / MS_PER_MINUTE,
                        open_type: open.open_type,
                    });
                } else {
                    unmatched_closes += 1;
                }
            }
        }
    }

    MatchResult {
        sessions,
        unmatched_opens: stack.len(),
        unmatched_closes,
    }
}

/// Run the matcher over every per-user group and merge the results.
///
/// Users are independent, so the groups are matched in parallel; the merge
/// preserves group order, keeping the output deterministic.
#[must_use]
pub fn aggregate_users(groups: &[Vec<Event>]) -> MatchResult {
    let per_user: Vec<MatchResult> = groups
        .par_iter()
        .map(|events| match_user_events(events))
        .collect();

    let mut total = MatchResult::default();
    for result in per_user {
        total.sessions.extend(result.sessions);
        total.unmatched_opens += result.unmatched_opens;
        total.unmatched_closes += result.unmatched_closes;
    }

    tracing::debug!(
        users = groups.len(),
        sessions = total.sessions.len(),
        unmatched_opens = total.unmatched_opens,
        unmatched_closes = total.unmatched_closes,
        "matched sessions across users"
    );

    total
}
