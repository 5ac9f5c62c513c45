use std::io::ErrorKind;
use std::path::Path;

use chrono::FixedOffset;
use serde::Deserialize;
use thiserror::Error;
use tokio::fs;

// ============================================================================
// Config (root)
// ============================================================================

/// Plugin configuration, read from `ccbridge.yaml`.
///
/// Every field is optional. Missing credentials are reported by
/// [`Config::warnings`] but never stop the plugin from starting; calls simply
/// fail downstream.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Base URL of the task API.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Bearer token sent with every task API request.
    #[serde(default)]
    pub api_token: String,
    /// Where the task API delivers results.
    #[serde(default)]
    pub callback_channel: String,
    /// Fallback for `callback_channel`.
    #[serde(default)]
    pub default_channel: String,
    /// How many sessions `/cc-recent` asks for.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: u32,
    /// Timeout hint (milliseconds) attached to every submission.
    #[serde(default = "default_task_timeout_ms")]
    pub task_timeout_ms: u64,
    /// UTC offset used when showing session timestamps.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_saphyr::Error),

    #[error("environment variable '{0}' is not set")]
    MissingEnvVar(String),

    #[error("unclosed variable reference '${{' (missing '}}')")]
    UnclosedVarReference,

    #[error("utc offset of {0} hours is out of range")]
    InvalidUtcOffset(i32),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_token: String::new(),
            callback_channel: String::new(),
            default_channel: String::new(),
            recent_limit: default_recent_limit(),
            task_timeout_ms: default_task_timeout_ms(),
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

impl Config {
    /// Load the config file, returning defaults when it does not exist.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::Io(e)),
        };
        Self::parse(&contents)
    }

    /// Parse config text, expanding `${VAR}` references first.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let expanded = expand_env_vars(contents)?;
        if expanded.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_saphyr::from_str(&expanded)?;
        config.utc_offset()?;
        Ok(config)
    }

    /// The callback target: `callback_channel`, else `default_channel`.
    pub fn callback_target(&self) -> &str {
        if self.callback_channel.is_empty() {
            &self.default_channel
        } else {
            &self.callback_channel
        }
    }

    /// Display offset for session timestamps.
    pub fn utc_offset(&self) -> Result<FixedOffset, ConfigError> {
        self.utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or(ConfigError::InvalidUtcOffset(self.utc_offset_hours))
    }

    /// Problems worth reporting once at startup.
    pub fn warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        if self.api_token.is_empty() {
            warnings.push("api_token not configured; task API calls will fail");
        }
        if self.callback_target().is_empty() {
            warnings.push("callback_channel not configured; results won't be delivered");
        }
        warnings
    }
}

// ============================================================================
// Private Helpers (Serde Defaults)
// ============================================================================

fn default_api_url() -> String {
    "http://host.docker.internal:3456".to_string()
}

fn default_recent_limit() -> u32 {
    8
}

fn default_task_timeout_ms() -> u64 {
    crate::api::DEFAULT_TASK_TIMEOUT_MS
}

fn default_utc_offset_hours() -> i32 {
    8
}

// ============================================================================
// Environment Variable Expansion
// ============================================================================

/// Expand environment variables in config text.
///
/// - `${VAR}` is required and errors if unset
/// - `${VAR:-default}` falls back to `default` (which may be empty)
/// - `$$` is a literal `$`; a `$` not followed by `{` is kept as-is
fn expand_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        result.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(tail) = after.strip_prefix('$') {
            result.push('$');
            rest = tail;
        } else if let Some(reference) = after.strip_prefix('{') {
            let end = reference
                .find('}')
                .ok_or(ConfigError::UnclosedVarReference)?;
            result.push_str(&lookup_var(&reference[..end])?);
            rest = &reference[end + 1..];
        } else {
            result.push('$');
            rest = after;
        }
    }

    result.push_str(rest);
    Ok(result)
}

/// Resolve the inside of a `${...}` reference.
fn lookup_var(reference: &str) -> Result<String, ConfigError> {
    let (name, default) = match reference.split_once(":-") {
        Some((name, default)) => (name, Some(default)),
        None => (reference, None),
    };

    match (std::env::var(name), default) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(default)) => Ok(default.to_string()),
        (Err(_), None) => Err(ConfigError::MissingEnvVar(name.to_string())),
    }
}
