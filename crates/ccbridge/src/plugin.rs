//! Plugin runtime: serves host requests over line-delimited JSON.
//!
//! Requests are handled strictly one after another. A command runs to
//! completion, network call included, before the next line is read, which
//! is what keeps the shared session pointer free of concurrent writers.

use std::sync::Arc;

use ccbridge_plugin_protocol::{HostRequest, PluginEvent, error_codes};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, info_span, warn};

use crate::build_info::{PLUGIN_NAME, VERSION};
use crate::client::{TaskApi, TaskApiClient};
use crate::command::{BridgeSettings, CommandBridge, CommandRegistry};
use crate::config::{Config, ConfigError};
use crate::session::SessionPointer;
use crate::tools::{CcCallTool, SharedTool};

/// Commands, tools and the bridge behind them.
pub struct Plugin {
    bridge: CommandBridge,
    registry: CommandRegistry,
    tools: Vec<SharedTool>,
}

impl Plugin {
    pub fn new(bridge: CommandBridge, tools: Vec<SharedTool>) -> Self {
        Self {
            bridge,
            registry: CommandRegistry,
            tools,
        }
    }

    /// Wire up the reqwest client, a fresh session pointer and `cc_call`.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        for warning in config.warnings() {
            warn!("{warning}");
        }

        let api: Arc<dyn TaskApi> = Arc::new(TaskApiClient::new(&config.api_url, &config.api_token));
        let settings = BridgeSettings::from_config(config)?;
        let tool: SharedTool = Arc::new(CcCallTool::new(api.clone(), config.callback_target()));
        let bridge = CommandBridge::new(api, SessionPointer::new(), settings)
            .with_span(info_span!("cc_bridge", plugin = PLUGIN_NAME));

        Ok(Self::new(bridge, vec![tool]))
    }

    pub fn bridge(&self) -> &CommandBridge {
        &self.bridge
    }

    /// Registration event written before any request is read.
    pub fn ready_event(&self) -> PluginEvent {
        PluginEvent::Ready {
            plugin: PLUGIN_NAME.to_string(),
            version: VERSION.to_string(),
            commands: self.registry.registrations(),
            tools: self.tools.iter().map(|t| t.registration()).collect(),
        }
    }

    /// Serve one request.
    pub async fn handle_request(&self, request: HostRequest) -> PluginEvent {
        match request {
            HostRequest::Command {
                request_id,
                command,
                args,
                sender_id,
                channel,
            } => {
                debug!(
                    request_id = %request_id,
                    command = %command,
                    sender = sender_id.as_deref().unwrap_or("-"),
                    channel = channel.as_deref().unwrap_or("-"),
                    "command received"
                );
                let Some(args) = self.registry.route(&command, &args) else {
                    return unknown(request_id, error_codes::UNKNOWN_COMMAND, &command);
                };
                let reply = self.bridge.handle(&args).await;
                PluginEvent::Reply {
                    request_id,
                    text: reply.text,
                    is_error: reply.is_error,
                }
            }
            HostRequest::ToolCall {
                request_id,
                tool,
                arguments,
            } => {
                let Some(handler) = self.tools.iter().find(|t| t.name() == tool) else {
                    return unknown(request_id, error_codes::UNKNOWN_TOOL, &tool);
                };
                let (success, text) = match handler.execute(arguments).await {
                    Ok(result) => (result.success, result.content),
                    Err(e) => (false, format!("❌ {e}")),
                };
                PluginEvent::ToolResult {
                    request_id,
                    text,
                    success,
                }
            }
            HostRequest::Ping { request_id } => PluginEvent::Pong { request_id },
            HostRequest::Shutdown => PluginEvent::Shutdown {
                reason: "shutdown requested".to_string(),
            },
        }
    }

    /// Run one slash command outside the stdio loop and return what to print.
    ///
    /// Error replies come back as errors so the caller exits non-zero.
    pub async fn send(&self, text: &str) -> anyhow::Result<String> {
        let Some(args) = self.registry.route_slash(text) else {
            anyhow::bail!("not a registered command: {text}");
        };
        let reply = self.bridge.handle(&args).await;
        if reply.is_error {
            anyhow::bail!("{}", reply.text);
        }
        if reply.text.is_empty() {
            Ok("Submitted.".to_string())
        } else {
            Ok(reply.text)
        }
    }

    /// Announce readiness, then serve requests until shutdown or EOF.
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        write_event(&mut writer, &self.ready_event()).await?;
        info!("plugin ready");

        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let event = match serde_json::from_str::<HostRequest>(&line) {
                Ok(request) => self.handle_request(request).await,
                Err(e) => {
                    warn!(line = %line, error = %e, "failed to parse host request");
                    PluginEvent::Error {
                        request_id: None,
                        code: error_codes::INVALID_REQUEST.to_string(),
                        message: e.to_string(),
                        fatal: false,
                    }
                }
            };

            let is_shutdown = matches!(event, PluginEvent::Shutdown { .. });
            write_event(&mut writer, &event).await?;
            if is_shutdown {
                info!("shutdown requested");
                return Ok(());
            }
        }

        debug!("host closed stdin");
        Ok(())
    }
}

fn unknown(request_id: String, code: &str, name: &str) -> PluginEvent {
    warn!(name = %name, code, "request for unregistered name");
    PluginEvent::Error {
        request_id: Some(request_id),
        code: code.to_string(),
        message: format!("'{name}' is not registered"),
        fatal: false,
    }
}

async fn write_event<W: AsyncWrite + Unpin>(
    writer: &mut W,
    event: &PluginEvent,
) -> std::io::Result<()> {
    let mut line = serde_json::to_string(event)?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plugin() -> Plugin {
        let config = Config {
            api_url: "http://127.0.0.1:9".to_string(),
            ..Config::default()
        };
        Plugin::from_config(&config).unwrap()
    }

    #[test]
    fn ready_event_lists_commands_and_tool() {
        match plugin().ready_event() {
            PluginEvent::Ready {
                plugin,
                commands,
                tools,
                ..
            } => {
                assert_eq!(plugin, "cc-bridge");
                let names: Vec<_> = commands.iter().map(|c| c.name.as_str()).collect();
                assert_eq!(names, ["cc", "cc-recent", "cc-now", "cc-new", "cc-resume"]);
                assert_eq!(tools.len(), 1);
                assert_eq!(tools[0].name, "cc_call");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn ping_gets_pong() {
        let event = plugin()
            .handle_request(HostRequest::Ping {
                request_id: "p1".to_string(),
            })
            .await;
        assert!(matches!(event, PluginEvent::Pong { request_id } if request_id == "p1"));
    }

    #[tokio::test]
    async fn unknown_command_is_reported() {
        let event = plugin()
            .handle_request(HostRequest::Command {
                request_id: "r1".to_string(),
                command: "cc最近".to_string(),
                args: String::new(),
                sender_id: None,
                channel: None,
            })
            .await;
        match event {
            PluginEvent::Error { code, fatal, .. } => {
                assert_eq!(code, error_codes::UNKNOWN_COMMAND);
                assert!(!fatal);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn subcommand_without_network() {
        let plugin = plugin();
        let event = plugin
            .handle_request(HostRequest::Command {
                request_id: "r1".to_string(),
                command: "cc-resume".to_string(),
                args: "abcdef01-2222".to_string(),
                sender_id: Some("u1".to_string()),
                channel: Some("discord".to_string()),
            })
            .await;

        assert!(matches!(event, PluginEvent::Reply { is_error: false, .. }));
        assert_eq!(
            plugin.bridge().pointer().get().as_deref(),
            Some("abcdef01-2222")
        );
    }

    #[tokio::test]
    async fn send_runs_slash_text() {
        let plugin = plugin();
        let output = plugin.send("/cc-resume abcdef01-2222").await.unwrap();
        assert!(output.starts_with("Switched to session `abcdef01...`"));
    }

    #[tokio::test]
    async fn send_error_reply_is_an_error() {
        let err = plugin().send("/cc hello").await.unwrap_err();
        assert!(err.to_string().starts_with("❌ Cannot reach task API:"));
    }

    #[tokio::test]
    async fn send_unknown_command_is_an_error() {
        let err = plugin().send("/cc最近").await.unwrap_err();
        assert_eq!(err.to_string(), "not a registered command: /cc最近");
    }

    #[tokio::test]
    async fn invalid_tool_arguments_become_failed_result() {
        let event = plugin()
            .handle_request(HostRequest::ToolCall {
                request_id: "t1".to_string(),
                tool: "cc_call".to_string(),
                arguments: serde_json::json!({"timeout": 5}),
            })
            .await;
        match event {
            PluginEvent::ToolResult { success, text, .. } => {
                assert!(!success);
                assert!(text.starts_with("❌ invalid arguments"));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
