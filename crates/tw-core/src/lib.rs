//! Core domain logic for toolwindow session analytics.
//!
//! This crate contains the fundamental types and logic for:
//! - Session matching: pairing open/close events into bounded sessions
//! - Outlier filtering: dropping implausibly long sessions
//! - Comparative statistics: manual-vs-auto duration comparison

pub mod event;
pub mod filter;
pub mod matcher;
pub mod stats;

pub use event::{Event, EventKind, OpenType};
pub use filter::{DEFAULT_CEILING_MINUTES, filter_outliers};
pub use matcher::{MatchResult, Session, aggregate_users, match_user_events};
pub use stats::{
    CompareConfig, CompareError, ComparisonReport, Direction, EffectSize, GroupSummary,
    Significance, compare,
};
