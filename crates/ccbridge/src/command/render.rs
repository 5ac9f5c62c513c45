//! User-facing reply text.

use chrono::{DateTime, FixedOffset};

use crate::api::SessionSummary;
use crate::session::short_id;

const USAGE: &str = "CC Bridge commands:
/cc <prompt> - submit a task (continues the previous session automatically)
/cc-new - start a fresh session
/cc-new <prompt> - start a fresh session and submit right away
/cc-recent - list recent sessions
/cc-now - show the current session ID
/cc-resume <id> <prompt> - switch to an earlier session and keep going

Tip: consecutive /cc messages stay in the same session, no ID needed.";

/// Usage text followed by the current session line.
pub fn help(current: Option<&str>) -> String {
    format!("{USAGE}\n{}", pointer_line(current))
}

/// One-line summary of the session pointer, identifier shortened.
pub fn pointer_line(current: Option<&str>) -> String {
    match current {
        Some(id) => format!("Current session: `{}...`", short_id(id)),
        None => "No active session".to_string(),
    }
}

/// Full current session identifier.
pub fn current(current: Option<&str>) -> String {
    match current {
        Some(id) => format!("Current session: `{id}`"),
        None => "No active session. Send /cc <prompt> to start one.".to_string(),
    }
}

pub fn reset() -> String {
    "Session reset. The next /cc starts a new session.".to_string()
}

pub fn resumed(session_id: &str) -> String {
    format!(
        "Switched to session `{}...`\nThe next /cc <prompt> continues it.",
        short_id(session_id)
    )
}

/// Recent-session listing.
///
/// Timestamps are shown at `offset`; one that fails to parse is shown as-is.
pub fn recent(sessions: &[SessionSummary], current: Option<&str>, offset: FixedOffset) -> String {
    if sessions.is_empty() {
        return "No recent CC sessions found.".to_string();
    }

    let entries: Vec<String> = sessions
        .iter()
        .enumerate()
        .map(|(i, s)| {
            format!(
                "{}. {}\n   `{}` | {} | {}KB",
                i + 1,
                s.topic,
                short_id(&s.session_id),
                local_time(&s.last_modified, offset),
                s.size_kb
            )
        })
        .collect();

    let footer = match current {
        Some(id) => format!("Current: `{}...`", short_id(id)),
        None => "No active session".to_string(),
    };

    format!("Recent CC sessions\n\n{}\n{}", entries.join("\n\n"), footer)
}

fn local_time(timestamp: &str, offset: FixedOffset) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(t) => t
            .with_timezone(&offset)
            .format("%Y/%-m/%-d %H:%M:%S")
            .to_string(),
        Err(_) => timestamp.to_string(),
    }
}
