//! Plugin protocol between a chat host and the ccbridge plugin.
//!
//! The protocol is line-delimited JSON over stdio:
//!
//! - **Requests** (Host → Plugin): command invocations, tool calls, pings
//! - **Events** (Plugin → Host): registration, replies, tool results, errors
//!
//! The plugin writes a [`PluginEvent::Ready`] line first, announcing the
//! commands and tools it wants registered. After that every request gets
//! exactly one event back, except [`HostRequest::Shutdown`] which is answered
//! with [`PluginEvent::Shutdown`] before the plugin exits.
//!
//! # Example: one exchange
//!
//! ```text
//! <- {"type":"ready","plugin":"cc-bridge","version":"0.1.0","commands":[...],"tools":[...]}
//! -> {"type":"command","request_id":"r1","command":"cc-now","args":""}
//! <- {"type":"reply","request_id":"r1","text":"No active session.","is_error":false}
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Requests (Host → Plugin)
// ============================================================================

/// Requests sent from the host to the plugin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostRequest {
    /// A registered command was invoked by a chat user.
    Command {
        request_id: String,
        /// Command name without the leading slash (e.g. `cc-new`).
        command: String,
        /// Raw argument text following the command name.
        #[serde(default)]
        args: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sender_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        channel: Option<String>,
    },

    /// Another agent in the host invoked a registered tool.
    ToolCall {
        request_id: String,
        tool: String,
        #[serde(default)]
        arguments: serde_json::Value,
    },

    /// Liveness check.
    Ping { request_id: String },

    /// Request graceful shutdown.
    Shutdown,
}

// ============================================================================
// Events (Plugin → Host)
// ============================================================================

/// Events sent from the plugin to the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PluginEvent {
    /// Plugin is ready; carries everything the host should register.
    Ready {
        plugin: String,
        version: String,
        commands: Vec<CommandRegistration>,
        tools: Vec<ToolRegistration>,
    },

    /// Reply to a command invocation.
    ///
    /// An empty `text` means there is nothing to show the user.
    Reply {
        request_id: String,
        text: String,
        #[serde(default)]
        is_error: bool,
    },

    /// Result of a tool call.
    ToolResult {
        request_id: String,
        text: String,
        success: bool,
    },

    /// Answer to [`HostRequest::Ping`].
    Pong { request_id: String },

    /// A request could not be served.
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
        code: String,
        message: String,
        /// If true, the plugin is about to exit.
        #[serde(default)]
        fatal: bool,
    },

    /// Plugin is shutting down.
    Shutdown { reason: String },
}

// ============================================================================
// Registrations
// ============================================================================

/// A command the plugin asks the host to register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRegistration {
    /// Command name: ASCII letters, digits, `-` and `_` only.
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub accepts_args: bool,
    /// Only authorized senders may invoke the command.
    #[serde(default)]
    pub require_auth: bool,
}

/// A tool the plugin asks the host to register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRegistration {
    pub name: String,
    pub label: String,
    pub description: String,
    /// JSON Schema for the tool arguments.
    pub parameters: serde_json::Value,
    /// Optional tools are only exposed to agents that opt in.
    #[serde(default)]
    pub optional: bool,
}

// ============================================================================
// Error Codes
// ============================================================================

/// Standard error codes carried by [`PluginEvent::Error`].
pub mod error_codes {
    /// No command with the requested name is registered.
    pub const UNKNOWN_COMMAND: &str = "unknown_command";
    /// No tool with the requested name is registered.
    pub const UNKNOWN_TOOL: &str = "unknown_tool";
    /// The request line could not be parsed.
    pub const INVALID_REQUEST: &str = "invalid_request";
}
