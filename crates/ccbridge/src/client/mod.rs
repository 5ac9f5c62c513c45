//! HTTP client for the remote task API.
//!
//! [`TaskApi`] is the seam the command bridge and tools depend on;
//! [`TaskApiClient`] is the reqwest implementation.

mod error;

pub use error::{ClientError, Result};

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder};

use crate::api::{RecentSessionsResponse, SessionSummary, SubmitTaskRequest, SubmitTaskResponse};

/// Operations the bridge needs from the task API.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Submit a task. `POST /claude`.
    async fn submit(&self, request: &SubmitTaskRequest) -> Result<SubmitTaskResponse>;

    /// List recently active sessions. `GET /claude/recent?limit=N`.
    async fn recent_sessions(&self, limit: u32) -> Result<Vec<SessionSummary>>;
}

/// reqwest-backed task API client.
///
/// No request timeout is configured: submissions carry a timeout hint for the
/// remote side and the call itself may take as long as the server needs.
#[derive(Debug, Clone)]
pub struct TaskApiClient {
    base_url: String,
    token: String,
    http: Client,
}

impl TaskApiClient {
    /// Create a new client pointing to the given base URL.
    ///
    /// Example: `TaskApiClient::new("http://localhost:3456", "token")`
    #[must_use]
    pub fn new(base_url: &str, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            http: Client::new(),
        }
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request with the headers every task API call carries.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
            .header(CONTENT_TYPE, "application/json")
    }

    /// Parse a successful JSON response or convert an error response.
    async fn json_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ClientError::ApiError {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[async_trait]
impl TaskApi for TaskApiClient {
    async fn submit(&self, request: &SubmitTaskRequest) -> Result<SubmitTaskResponse> {
        let response = self
            .request(Method::POST, "/claude")
            .json(request)
            .send()
            .await?;
        Self::json_response(response).await
    }

    async fn recent_sessions(&self, limit: u32) -> Result<Vec<SessionSummary>> {
        let response = self
            .request(Method::GET, "/claude/recent")
            .query(&[("limit", limit)])
            .send()
            .await?;
        let body: RecentSessionsResponse = Self::json_response(response).await?;
        Ok(body.sessions.unwrap_or_default())
    }
}
