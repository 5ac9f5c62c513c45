//! `cc_call`: submit a task on behalf of another agent.
//!
//! Continuations are explicit here: the caller passes `sessionId` itself and
//! the command session pointer is neither read nor written.

use std::sync::Arc;

use async_trait::async_trait;
use ccbridge_plugin_protocol::ToolRegistration;
use serde::Deserialize;
use tracing::{info, warn};

use crate::api::{DEFAULT_TASK_TIMEOUT_MS, SubmitTaskRequest};
use crate::client::{ClientError, TaskApi};
use crate::session::short_id;

use super::error::ToolError;
use super::tool::{Tool, ToolResult};

pub const TOOL_NAME: &str = "cc_call";

const DESCRIPTION: &str = "Submit a task to Claude Code via the task API. Returns immediately. \
The output is delivered DIRECTLY to the chat channel via callback (not through you). \
For NEW tasks: provide only 'prompt'. \
For FOLLOW-UP in an existing session: provide both 'prompt' and 'sessionId'. \
After calling this tool, tell the user the task was submitted and STOP.";

/// Tool that submits tasks with an explicit, caller-managed session.
pub struct CcCallTool {
    api: Arc<dyn TaskApi>,
    callback_channel: String,
}

impl CcCallTool {
    pub fn new(api: Arc<dyn TaskApi>, callback_channel: impl Into<String>) -> Self {
        Self {
            api,
            callback_channel: callback_channel.into(),
        }
    }

    fn build_request(&self, args: CcCallArgs) -> SubmitTaskRequest {
        SubmitTaskRequest {
            prompt: args.prompt,
            timeout: args
                .timeout
                .filter(|&t| t > 0)
                .unwrap_or(DEFAULT_TASK_TIMEOUT_MS),
            callback_channel: self.callback_channel.clone(),
            session_id: args.session_id.filter(|s| !s.is_empty()),
        }
    }
}

#[async_trait]
impl Tool for CcCallTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn registration(&self) -> ToolRegistration {
        ToolRegistration {
            name: TOOL_NAME.to_string(),
            label: "Call Claude Code".to_string(),
            description: DESCRIPTION.to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "prompt": {
                        "type": "string",
                        "description": "The task or message to send to Claude Code"
                    },
                    "sessionId": {
                        "type": "string",
                        "description": "Session ID from a previous cc_call (omit for new tasks)"
                    },
                    "timeout": {
                        "type": "number",
                        "description": "Timeout in ms (default: 600000 = 10 min)"
                    }
                },
                "required": ["prompt"]
            }),
            optional: true,
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: CcCallArgs = serde_json::from_value(arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;
        if args.prompt.trim().is_empty() {
            return Err(ToolError::InvalidArguments("prompt is empty".to_string()));
        }

        let request = self.build_request(args);
        match self.api.submit(&request).await {
            Ok(response) => {
                info!(
                    task = %short_id(&response.task_id),
                    session = %short_id(&response.session_id),
                    "cc_call submitted"
                );
                Ok(ToolResult::success("✓"))
            }
            Err(ClientError::ApiError { status, body }) => {
                warn!(status, "cc_call rejected");
                Ok(ToolResult::failure(format!("❌ {status} {body}")))
            }
            Err(e) => {
                warn!(error = %e, "cc_call failed");
                Ok(ToolResult::failure(format!("❌ {e}")))
            }
        }
    }
}

// ============================================================================
// Private Types
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CcCallArgs {
    prompt: String,
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    timeout: Option<u64>,
}
