use thiserror::Error;

/// Errors a tool reports instead of a result.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
}
