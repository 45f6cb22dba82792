//! CSV event-stream normalization.
//!
//! Parses the raw event table, sorts it globally by (user, timestamp), and
//! hands the core per-user event groups in timestamp order. The core never
//! sorts or groups on its own.

use std::path::Path;

use thiserror::Error;
use tw_core::{Event, OpenType};

/// Expected header of the raw event table.
const HEADER: &str = "user_id,timestamp,event,open_type";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: expected 3 or 4 columns, got {got}")]
    ColumnCount { line: usize, got: usize },
    #[error("line {line}: invalid timestamp: {value}")]
    Timestamp { line: usize, value: String },
    #[error("line {line}: unknown event kind: {value}")]
    EventKind { line: usize, value: String },
    #[error("line {line}: {message}")]
    OpenType { line: usize, message: String },
    #[error("line {line}: opened event is missing an open type")]
    MissingOpenType { line: usize },
}

/// Read and normalize an event table from a CSV file.
pub fn load_events(path: &Path) -> Result<Vec<Vec<Event>>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_events(&content)
}

/// Parse CSV content into per-user event groups sorted by timestamp.
///
/// A leading header row is skipped; blank lines are ignored. Groups come
/// back in ascending user order, each sorted ascending by timestamp.
pub fn parse_events(content: &str) -> Result<Vec<Vec<Event>>, ParseError> {
    let mut events: Vec<Event> = Vec::new();

    for (idx, raw_line) in content.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if idx == 0 && trimmed == HEADER {
            continue;
        }
        events.push(parse_row(trimmed, line)?);
    }

    tracing::debug!(events = events.len(), "parsed event table");

    // Stable sort: events with equal (user, timestamp) keep file order.
    events.sort_by(|a, b| {
        a.user_id
            .cmp(&b.user_id)
            .then(a.timestamp_ms.cmp(&b.timestamp_ms))
    });

    Ok(group_by_user(events))
}

fn parse_row(row: &str, line: usize) -> Result<Event, ParseError> {
    let fields: Vec<&str> = row.split(',').map(str::trim).collect();
    // Closed rows may omit the trailing open_type column entirely.
    if fields.len() < 3 || fields.len() > 4 {
        return Err(ParseError::ColumnCount {
            line,
            got: fields.len(),
        });
    }

    let user_id = fields[0].to_string();
    let timestamp_ms: i64 = fields[1].parse().map_err(|_| ParseError::Timestamp {
        line,
        value: fields[1].to_string(),
    })?;
    let open_type_field = fields.get(3).copied().unwrap_or("");

    match fields[2] {
        "opened" => {
            if open_type_field.is_empty() {
                return Err(ParseError::MissingOpenType { line });
            }
            let open_type: OpenType = open_type_field
                .parse()
                .map_err(|message| ParseError::OpenType { line, message })?;
            Ok(Event::opened(user_id, timestamp_ms, open_type))
        }
        "closed" => Ok(Event::closed(user_id, timestamp_ms)),
        other => Err(ParseError::EventKind {
            line,
            value: other.to_string(),
        }),
    }
}

fn group_by_user(events: Vec<Event>) -> Vec<Vec<Event>> {
    let mut groups: Vec<Vec<Event>> = Vec::new();
    for event in events {
        match groups.last_mut() {
            Some(group) if group[0].user_id == event.user_id => group.push(event),
            _ => groups.push(vec![event]),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use tw_core::EventKind;

    #[test]
    fn test_parse_with_header() {
        let content = "user_id,timestamp,event,open_type\n\
                       u1,1000,opened,manual\n\
                       u1,2000,closed,\n";

        let groups = parse_events(content).unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(
            groups[0][0].kind,
            EventKind::Opened {
                open_type: OpenType::Manual
            }
        );
        assert_eq!(groups[0][1].kind, EventKind::Closed);
    }

    #[test]
    fn test_parse_without_header() {
        let content = "u1,1000,opened,auto\nu1,2000,closed\n";

        let groups = parse_events(content).unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn test_sorts_within_user_and_groups_by_user() {
        // Rows arrive interleaved and out of timestamp order.
        let content = "u2,5000,closed\n\
                       u1,3000,closed\n\
                       u2,1000,opened,manual\n\
                       u1,1000,opened,auto\n";

        let groups = parse_events(content).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0][0].user_id, "u1");
        assert_eq!(groups[0][0].timestamp_ms, 1000);
        assert_eq!(groups[0][1].timestamp_ms, 3000);
        assert_eq!(groups[1][0].user_id, "u2");
        assert_eq!(groups[1][0].timestamp_ms, 1000);
    }

    #[test]
    fn test_blank_lines_ignored() {
        let content = "\nu1,1000,opened,manual\n\n  \nu1,2000,closed\n";

        let groups = parse_events(content).unwrap();

        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn test_bad_timestamp_names_line() {
        let content = "u1,notanumber,opened,manual\n";

        let err = parse_events(content).unwrap_err();

        assert!(matches!(err, ParseError::Timestamp { line: 1, .. }));
    }

    #[test]
    fn test_unknown_event_kind() {
        let content = "u1,1000,minimized,manual\n";

        let err = parse_events(content).unwrap_err();

        assert!(matches!(err, ParseError::EventKind { line: 1, .. }));
        assert!(err.to_string().contains("minimized"));
    }

    #[test]
    fn test_opened_without_open_type() {
        let content = "u1,1000,opened,\n";

        let err = parse_events(content).unwrap_err();

        assert!(matches!(err, ParseError::MissingOpenType { line: 1 }));
    }

    #[test]
    fn test_opened_with_invalid_open_type() {
        let content = "u1,1000,opened,automatic\n";

        let err = parse_events(content).unwrap_err();

        assert!(matches!(err, ParseError::OpenType { line: 1, .. }));
    }

    #[test]
    fn test_closed_open_type_ignored() {
        // Some exporters fill open_type on closed rows; it carries no
        // meaning there.
        let content = "u1,1000,opened,manual\nu1,2000,closed,manual\n";

        let groups = parse_events(content).unwrap();

        assert_eq!(groups[0][1].kind, EventKind::Closed);
    }

    #[test]
    fn test_wrong_column_count() {
        let content = "u1,1000\n";

        let err = parse_events(content).unwrap_err();

        assert!(matches!(err, ParseError::ColumnCount { line: 1, got: 2 }));
    }

    #[test]
    fn test_empty_input() {
        let groups = parse_events("").unwrap();
        assert!(groups.is_empty());
    }
}
