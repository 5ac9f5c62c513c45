//! Command handling: resolve argument text, apply it to the session pointer,
//! and talk to the task API.

pub mod intent;
pub mod registry;
pub mod render;

use std::sync::Arc;

use chrono::FixedOffset;
use tracing::{Instrument, Span, debug, error, info, info_span};

use crate::api::SubmitTaskRequest;
use crate::client::{ClientError, TaskApi};
use crate::config::{Config, ConfigError};
use crate::session::{SessionPointer, short_id};

pub use intent::Intent;
pub use registry::{CommandRegistry, CommandSpec};

/// Characters of the prompt included in log lines.
const PROMPT_PREVIEW_CHARS: usize = 50;

// ============================================================================
// Reply
// ============================================================================

/// Result of handling one command.
///
/// Every path produces a reply; failures are carried as `is_error` rather
/// than returned as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    /// Text to show the user. Empty when there is nothing to show.
    pub text: String,
    pub is_error: bool,
}

impl CommandReply {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }

    /// Accepted submission. The result arrives later through the callback.
    pub fn silent() -> Self {
        Self::ok(String::new())
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Values the bridge attaches to outgoing requests and replies.
#[derive(Debug, Clone)]
pub struct BridgeSettings {
    /// Where the task API should deliver results.
    pub callback_channel: String,
    /// Timeout hint for submissions, in milliseconds.
    pub task_timeout_ms: u64,
    /// How many sessions to ask for when listing.
    pub recent_limit: u32,
    /// Offset used to display session timestamps.
    pub utc_offset: FixedOffset,
}

impl BridgeSettings {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            callback_channel: config.callback_target().to_string(),
            task_timeout_ms: config.task_timeout_ms,
            recent_limit: config.recent_limit,
            utc_offset: config.utc_offset()?,
        })
    }
}

// ============================================================================
// Command Bridge
// ============================================================================

/// Executes command text against the session pointer and the task API.
///
/// Owns no global state: the pointer, the API and the logging span are all
/// handed in, so two bridges never see each other's session.
pub struct CommandBridge {
    api: Arc<dyn TaskApi>,
    pointer: SessionPointer,
    settings: BridgeSettings,
    span: Span,
}

impl CommandBridge {
    pub fn new(api: Arc<dyn TaskApi>, pointer: SessionPointer, settings: BridgeSettings) -> Self {
        Self {
            api,
            pointer,
            settings,
            span: info_span!("cc_bridge"),
        }
    }

    /// Record this bridge's log events inside `span`.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// The session pointer this bridge reads and updates.
    pub fn pointer(&self) -> &SessionPointer {
        &self.pointer
    }

    /// Handle the argument text of the primary command.
    pub async fn handle(&self, args: &str) -> CommandReply {
        self.dispatch(args).instrument(self.span.clone()).await
    }

    async fn dispatch(&self, args: &str) -> CommandReply {
        let (rule, intent) = intent::resolve_named(args);
        debug!(rule, "resolved command");

        match intent {
            Intent::Help => CommandReply::ok(render::help(self.pointer.get().as_deref())),
            Intent::ListRecent => self.list_recent().await,
            Intent::ShowCurrent => CommandReply::ok(render::current(self.pointer.get().as_deref())),
            Intent::Reset => {
                self.pointer.clear();
                info!("session reset");
                CommandReply::ok(render::reset())
            }
            Intent::ResetAndSubmit { prompt } => {
                self.pointer.clear();
                info!("session reset before submit");
                self.submit(&prompt).await
            }
            Intent::ResumeAndWait { session_id } => {
                info!(session = %short_id(&session_id), "session resumed");
                self.pointer.set(session_id.as_str());
                CommandReply::ok(render::resumed(&session_id))
            }
            Intent::ResumeAndSubmit { session_id, prompt } => {
                info!(session = %short_id(&session_id), "session resumed");
                self.pointer.set(session_id);
                self.submit(&prompt).await
            }
            Intent::Submit { prompt } => self.submit(&prompt).await,
        }
    }

    async fn list_recent(&self) -> CommandReply {
        info!(limit = self.settings.recent_limit, "listing recent sessions");
        match self.api.recent_sessions(self.settings.recent_limit).await {
            Ok(sessions) => CommandReply::ok(render::recent(
                &sessions,
                self.pointer.get().as_deref(),
                self.settings.utc_offset,
            )),
            Err(ClientError::ApiError { status, body }) => {
                error!(status, body = %body, "recent sessions query rejected");
                CommandReply::error("❌ Query failed")
            }
            Err(e) => {
                error!(error = %e, "recent sessions query failed");
                CommandReply::error(format!("❌ {e}"))
            }
        }
    }

    /// Submit `prompt`, continuing whatever session the pointer holds.
    ///
    /// Only a successful response moves the pointer.
    async fn submit(&self, prompt: &str) -> CommandReply {
        let request = SubmitTaskRequest {
            prompt: prompt.to_string(),
            timeout: self.settings.task_timeout_ms,
            callback_channel: self.settings.callback_channel.clone(),
            session_id: self.pointer.get(),
        };

        info!(
            prompt = %preview(prompt),
            session = request.session_id.as_deref().map(short_id).unwrap_or("new"),
            "submitting task"
        );

        match self.api.submit(&request).await {
            Ok(response) => {
                info!(
                    task = %short_id(&response.task_id),
                    session = %short_id(&response.session_id),
                    "task submitted"
                );
                self.pointer.set(response.session_id);
                CommandReply::silent()
            }
            Err(ClientError::ApiError { status, body }) => {
                error!(status, body = %body, "task submission rejected");
                CommandReply::error(format!("❌ Submission failed: {status}"))
            }
            Err(e) => {
                error!(error = %e, "task submission failed");
                CommandReply::error(format!("❌ Cannot reach task API: {e}"))
            }
        }
    }
}

/// First characters of a prompt, for logs.
fn preview(prompt: &str) -> String {
    let mut chars = prompt.chars();
    let head: String = chars.by_ref().take(PROMPT_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
