//! Command intent resolution.
//!
//! Argument text is matched against an ordered rule table; the first rule
//! that matches decides the intent. Every pattern is anchored at the start
//! of the trimmed input only, so anything after a recognized marker is kept
//! as prompt text instead of invalidating the match. Matching is
//! case-insensitive.
//!
//! | order | rule    | markers                    |
//! |-------|---------|----------------------------|
//! | 1     | empty   | (whitespace only)          |
//! | 2     | recent  | `最近`, `recent`           |
//! | 3     | current | `当前`, `现在`, `session`  |
//! | 4     | new     | `新会话`, `new`            |
//! | 5     | resume  | `接续 <session-id>`        |
//! | 6     | default | anything else              |

use std::sync::LazyLock;

use regex::Regex;

/// Sub-command marker for listing recent sessions.
pub const RECENT_MARKER: &str = "最近";
/// Sub-command marker for showing the current session.
pub const CURRENT_MARKER: &str = "当前";
/// Sub-command marker for starting a new session.
pub const NEW_MARKER: &str = "新会话";
/// Sub-command marker for resuming a session.
pub const RESUME_MARKER: &str = "接续";

static RECENT: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)^(?:最近|recent)"));

// `session` only counts when it is the whole input.
static CURRENT: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)^(?:当前|现在|session$)"));

static NEW: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)^(?:新会话|new)\s*"));

// Session ids: hex digits and hyphens, at least 8. The prompt may span lines.
static RESUME: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?is)^接续\s+([a-f0-9-]{8,})\s*(.*)"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in command pattern is valid")
}

// ============================================================================
// Intent
// ============================================================================

/// What a piece of command text asks the bridge to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Show usage and the current session.
    Help,
    /// List recently active sessions.
    ListRecent,
    /// Show the full current session identifier.
    ShowCurrent,
    /// Forget the current session.
    Reset,
    /// Forget the current session, then submit `prompt` without one.
    ResetAndSubmit { prompt: String },
    /// Point at `session_id` and wait for the next prompt.
    ResumeAndWait { session_id: String },
    /// Point at `session_id` and submit `prompt` in it.
    ResumeAndSubmit { session_id: String, prompt: String },
    /// Submit `prompt`, continuing the current session if there is one.
    Submit { prompt: String },
}

// ============================================================================
// Rules
// ============================================================================

/// A named matcher in the resolution table.
struct Rule {
    name: &'static str,
    matches: fn(&str) -> Option<Intent>,
}

/// Resolution order. Patterns overlap, so the order is significant.
const RULES: &[Rule] = &[
    Rule {
        name: "empty",
        matches: match_empty,
    },
    Rule {
        name: "recent",
        matches: match_recent,
    },
    Rule {
        name: "current",
        matches: match_current,
    },
    Rule {
        name: "new",
        matches: match_new,
    },
    Rule {
        name: "resume",
        matches: match_resume,
    },
];

/// Resolve command argument text into an intent, also reporting which rule
/// matched (`"default"` if none did).
pub fn resolve_named(args: &str) -> (&'static str, Intent) {
    let args = args.trim();
    RULES
        .iter()
        .find_map(|rule| (rule.matches)(args).map(|intent| (rule.name, intent)))
        .unwrap_or_else(|| {
            (
                "default",
                Intent::Submit {
                    prompt: args.to_string(),
                },
            )
        })
}

fn match_empty(args: &str) -> Option<Intent> {
    args.is_empty().then_some(Intent::Help)
}

fn match_recent(args: &str) -> Option<Intent> {
    RECENT.is_match(args).then_some(Intent::ListRecent)
}

fn match_current(args: &str) -> Option<Intent> {
    CURRENT.is_match(args).then_some(Intent::ShowCurrent)
}

fn match_new(args: &str) -> Option<Intent> {
    let marker = NEW.find(args)?;
    let prompt = args[marker.end()..].trim();
    if prompt.is_empty() {
        Some(Intent::Reset)
    } else {
        Some(Intent::ResetAndSubmit {
            prompt: prompt.to_string(),
        })
    }
}

fn match_resume(args: &str) -> Option<Intent> {
    let caps = RESUME.captures(args)?;
    let session_id = caps[1].to_string();
    let prompt = caps.get(2).map_or("", |m| m.as_str()).trim();
    if prompt.is_empty() {
        Some(Intent::ResumeAndWait { session_id })
    } else {
        Some(Intent::ResumeAndSubmit {
            session_id,
            prompt: prompt.to_string(),
        })
    }
}
