//! Common test utilities: an in-process mock of the task API.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

/// A request the mock server received.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub limit: Option<String>,
    pub body: Option<Value>,
}

/// Mutable behavior of the mock server.
#[derive(Debug, Clone)]
pub struct MockBehavior {
    /// Session id returned by successful submissions.
    pub session_id: String,
    /// When set, submissions fail with this status and body.
    pub reject: Option<(u16, String)>,
    /// When set, recent-session queries fail with this status and body.
    pub reject_recent: Option<(u16, String)>,
    /// Value of the `sessions` field in recent-session responses.
    pub sessions: Value,
}

impl Default for MockBehavior {
    fn default() -> Self {
        Self {
            session_id: "s1".to_string(),
            reject: None,
            reject_recent: None,
            sessions: json!([]),
        }
    }
}

#[derive(Clone, Default)]
struct MockState {
    recorded: Arc<Mutex<Vec<Recorded>>>,
    behavior: Arc<Mutex<MockBehavior>>,
}

/// Handle to a running mock task API.
pub struct MockTaskApi {
    pub url: String,
    state: MockState,
}

impl MockTaskApi {
    /// Start the mock on an ephemeral localhost port.
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new()
            .route("/claude", post(submit))
            .route("/claude/recent", get(recent))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}"),
            state,
        }
    }

    pub fn set_behavior(&self, behavior: MockBehavior) {
        *self.state.behavior.lock().unwrap() = behavior;
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.state.recorded.lock().unwrap().clone()
    }

    /// Bodies of every `POST /claude` received so far.
    pub fn submissions(&self) -> Vec<Value> {
        self.recorded()
            .into_iter()
            .filter(|r| r.path == "/claude")
            .filter_map(|r| r.body)
            .collect()
    }
}

/// A URL nothing listens on, for transport failures.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn submit(State(state): State<MockState>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    state.recorded.lock().unwrap().push(Recorded {
        path: "/claude".to_string(),
        authorization: header(&headers, "authorization"),
        content_type: header(&headers, "content-type"),
        limit: None,
        body: Some(body),
    });

    let behavior = state.behavior.lock().unwrap().clone();
    match behavior.reject {
        Some((status, message)) => (StatusCode::from_u16(status).unwrap(), message).into_response(),
        None => Json(json!({"taskId": "task-0001", "sessionId": behavior.session_id})).into_response(),
    }
}

async fn recent(
    State(state): State<MockState>,
    headers: HeaderMap,
    Query(query): Query<std::collections::HashMap<String, String>>,
) -> Response {
    state.recorded.lock().unwrap().push(Recorded {
        path: "/claude/recent".to_string(),
        authorization: header(&headers, "authorization"),
        content_type: header(&headers, "content-type"),
        limit: query.get("limit").cloned(),
        body: None,
    });

    let behavior = state.behavior.lock().unwrap().clone();
    match behavior.reject_recent {
        Some((status, message)) => (StatusCode::from_u16(status).unwrap(), message).into_response(),
        None => Json(json!({"sessions": behavior.sessions})).into_response(),
    }
}
