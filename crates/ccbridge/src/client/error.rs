//! Client error types.

use thiserror::Error;

/// Result type for task API operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the task API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request never completed or the response could not be decoded.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("api error ({status}): {body}")]
    ApiError { status: u16, body: String },
}
