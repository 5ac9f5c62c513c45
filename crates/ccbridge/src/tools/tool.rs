//! Tool trait for host-invoked tools.

use std::sync::Arc;

use async_trait::async_trait;
use ccbridge_plugin_protocol::ToolRegistration;

use super::error::ToolError;

/// Outcome of a tool call, as text for the calling agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    pub success: bool,
    pub content: String,
}

impl ToolResult {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            success: true,
            content: content.into(),
        }
    }

    pub fn failure(content: impl Into<String>) -> Self {
        Self {
            success: false,
            content: content.into(),
        }
    }
}

/// A tool the plugin registers with the host.
///
/// Each implementation holds its own dependencies and parses its own
/// JSON arguments.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool.
    fn name(&self) -> &str;

    /// Registration announced to the host.
    fn registration(&self) -> ToolRegistration;

    /// Execute the tool with the given JSON arguments.
    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError>;
}

/// Type alias for a shared tool reference.
pub type SharedTool = Arc<dyn Tool>;
