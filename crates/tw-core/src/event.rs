//! Raw tool-window events from the normalized input stream.

use serde::{Deserialize, Serialize};

/// How a tool window was opened.
///
/// This is the categorical label the statistical comparison splits on; it is
/// present on "opened" events and carried forward to the resulting session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenType {
    /// The user opened the window themselves.
    Manual,
    /// The IDE opened the window automatically.
    Auto,
}

impl OpenType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Auto => "auto",
        }
    }
}

impl std::fmt::Display for OpenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OpenType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(Self::Manual),
            "auto" => Ok(Self::Auto),
            _ => Err(format!("invalid open type: {s}")),
        }
    }
}

/// What happened to the tool window.
///
/// Only opened events carry an open type; the enum payload makes a "closed"
/// event with a mode, or an "opened" event without one, unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// The window was opened.
    Opened {
        /// The open mode, inherited by the session this open produces.
        open_type: OpenType,
    },
    /// The window was closed.
    Closed,
}

/// A single tool-window event for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// The user whose window produced this event.
    pub user_id: String,
    /// Milliseconds since the epoch. Non-decreasing within a user once the
    /// normalizer has sorted the stream.
    pub timestamp_ms: i64,
    /// What happened.
    pub kind: EventKind,
}

impl Event {
    /// An "opened" event.
    #[must_use]
    pub fn opened(user_id: impl Into<String>, timestamp_ms: i64, open_type: OpenType) -> Self {
        Self {
            user_id: user_id.into(),
            timestamp_ms,
            kind: EventKind::Opened { open_type },
        }
    }

    /// A "closed" event.
    #[must_use]
    pub fn closed(user_id: impl Into<String>, timestamp_ms: i64) -> Self {
        Self {
            user_id: user_id.into(),
            timestamp_ms,
            kind: EventKind::Closed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_type_roundtrip() {
        for ot in [OpenType::Manual, OpenType::Auto] {
            let s = ot.as_str();
            let parsed: OpenType = s.parse().unwrap();
            assert_eq!(parsed, ot);
            assert_eq!(ot.to_string(), s);
        }
    }

    #[test]
    fn test_open_type_invalid() {
        let result = "automatic".parse::<OpenType>();
        assert!(result.is_err());
    }

    #[test]
    fn test_open_type_serde_matches_as_str() {
        // Serde serialization must match as_str() so CSV parsing and JSON
        // output agree on the same strings.
        for ot in [OpenType::Manual, OpenType::Auto] {
            let serde_value = serde_json::to_value(ot).unwrap();
            assert_eq!(serde_value.as_str().unwrap(), ot.as_str());
        }
    }

    #[test]
    fn test_event_kind_serde_shape() {
        let opened = serde_json::to_value(EventKind::Opened {
            open_type: OpenType::Auto,
        })
        .unwrap();
        assert_eq!(opened["type"], "opened");
        assert_eq!(opened["open_type"], "auto");

        let closed = serde_json::to_value(EventKind::Closed).unwrap();
        assert_eq!(closed["type"], "closed");
    }

    #[test]
    fn test_event_constructors() {
        let open = Event::opened("u1", 1000, OpenType::Manual);
        assert_eq!(open.user_id, "u1");
        assert_eq!(open.timestamp_ms, 1000);
        assert_eq!(
            open.kind,
            EventKind::Opened {
                open_type: OpenType::Manual
            }
        );

        let close = Event::closed("u1", 2000);
        assert_eq!(close.kind, EventKind::Closed);
    }
}
