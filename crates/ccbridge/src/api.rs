//! Wire types for the remote task API.
//!
//! Field names follow the API's camelCase JSON.

use serde::{Deserialize, Serialize};

/// Timeout hint attached to submissions (10 minutes).
///
/// Passed to the remote system; the bridge never enforces it locally.
pub const DEFAULT_TASK_TIMEOUT_MS: u64 = 600_000;

/// Body of `POST /claude`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTaskRequest {
    pub prompt: String,
    pub timeout: u64,
    pub callback_channel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Successful response of `POST /claude`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTaskResponse {
    pub task_id: String,
    pub session_id: String,
}

/// Response of `GET /claude/recent`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecentSessionsResponse {
    /// Missing and `null` both mean no sessions.
    #[serde(default)]
    pub sessions: Option<Vec<SessionSummary>>,
}

/// One entry of the recent-sessions listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    /// ISO-8601 timestamp.
    pub last_modified: String,
    #[serde(rename = "sizeKB")]
    pub size_kb: f64,
    pub topic: String,
}
