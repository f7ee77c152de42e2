//! Test utilities for CLI testing
//!
//! Provides a mock put.io server that mimics the endpoints used by the CLI:
//! token checking with an `ERROR` envelope, a small nested folder tree, and
//! a download endpoint answering with a redirect.

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// Token the mock server accepts
pub const TEST_TOKEN: &str = "test-token";

/// Folder whose listing is refused by the mock server
pub const LOCKED_FOLDER_ID: i64 = 7;

/// Mock server state
#[derive(Debug, Clone, Default)]
pub struct MockServerState {
    /// Public URL of the server, known once bound
    pub url: Arc<Mutex<String>>,
    /// Every token received, in order
    pub seen_tokens: Arc<Mutex<Vec<String>>>,
    /// Number of `/files/list` calls
    pub list_calls: Arc<Mutex<u32>>,
    /// Number of requests that reached a redirect target
    pub cdn_hits: Arc<Mutex<u32>>,
}

/// Query parameters common to every endpoint
#[derive(Debug, Deserialize)]
pub struct AuthQuery {
    oauth_token: Option<String>,
    parent_id: Option<i64>,
}

/// Mock server implementation
#[derive(Debug)]
pub struct MockServer {
    state: MockServerState,
    port: u16,
}

impl Default for MockServer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockServer {
    /// Create a new mock server
    pub fn new() -> Self {
        Self {
            state: MockServerState::default(),
            port: 0, // Will be assigned when server starts
        }
    }

    /// Start the mock server and return the address
    ///
    /// The API itself is mounted under `/v2`, like the real service.
    pub async fn start(mut self) -> Result<(Self, String)> {
        let app = self.create_router();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        self.port = addr.port();

        let server_url = format!("http://127.0.0.1:{}", self.port);
        *self.state.url.lock().unwrap() = server_url.clone();

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Mock server error: {}", e);
            }
        });

        // Give the server a moment to start and verify it's running
        for _ in 0..20 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        Ok((self, server_url))
    }

    /// Get the server port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get a reference to the server state
    pub fn state(&self) -> &MockServerState {
        &self.state
    }

    /// Create the mock server router
    fn create_router(&self) -> Router {
        Router::new()
            .route("/v2/files/list", get(list_files_handler))
            .route("/v2/files/:id/download", get(download_handler))
            .route("/v2/account/info", get(account_info_handler))
            .route("/v2/transfers/list", get(transfers_handler))
            .route("/v2/events/list", get(events_handler))
            // Same endpoint answering with something that is not JSON
            .route("/broken/events/list", get(broken_handler))
            // Redirect target; must never be reached by the link lookup
            .route("/cdn/files/:id", get(cdn_handler))
            .with_state(self.state.clone())
    }
}

fn error_envelope(status: StatusCode, message: &str) -> Response {
    let body = json!({
        "status": "ERROR",
        "error_type": "invalid_grant",
        "error_message": message,
    });
    (status, Json(body)).into_response()
}

/// Record the token and reject anything but [`TEST_TOKEN`]
fn check_token(state: &MockServerState, query: &AuthQuery) -> Option<Response> {
    let token = query.oauth_token.clone().unwrap_or_default();
    state.seen_tokens.lock().unwrap().push(token.clone());

    if token == TEST_TOKEN {
        None
    } else {
        Some(error_envelope(StatusCode::UNAUTHORIZED, "Invalid OAuth token"))
    }
}

fn file(id: i64, name: &str, content_type: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "content_type": content_type,
        "size": 1024,
    })
}

/// Folder tree served by the mock:
///
/// ```text
/// 0 (root)
/// ├── 1 Movies/
/// │   ├── 2 Action/
/// │   │   └── 3 clip.mkv
/// │   └── 4 poster.jpg
/// └── 5 readme.txt
/// 6 Archive/
/// └── 7 Locked/   (listing refused)
/// ```
fn children_of(parent_id: i64) -> Vec<Value> {
    const DIR: &str = "application/x-directory";
    match parent_id {
        0 => vec![file(1, "Movies", DIR), file(5, "readme.txt", "text/plain")],
        1 => vec![file(2, "Action", DIR), file(4, "poster.jpg", "image/jpeg")],
        2 => vec![file(3, "clip.mkv", "video/x-matroska")],
        6 => vec![file(LOCKED_FOLDER_ID, "Locked", DIR)],
        _ => Vec::new(),
    }
}

async fn list_files_handler(
    State(state): State<MockServerState>,
    Query(query): Query<AuthQuery>,
) -> Response {
    if let Some(rejection) = check_token(&state, &query) {
        return rejection;
    }
    *state.list_calls.lock().unwrap() += 1;

    let parent_id = query.parent_id.unwrap_or(0);
    if parent_id == LOCKED_FOLDER_ID {
        return error_envelope(StatusCode::FORBIDDEN, "Folder is locked");
    }

    Json(json!({
        "status": "OK",
        "parent": { "id": parent_id },
        "files": children_of(parent_id),
    }))
    .into_response()
}

async fn download_handler(
    Path(id): Path<i64>,
    State(state): State<MockServerState>,
    Query(query): Query<AuthQuery>,
) -> Response {
    if let Some(rejection) = check_token(&state, &query) {
        return rejection;
    }

    if id == 404 {
        // Answers directly instead of redirecting
        return Json(json!({ "status": "OK" })).into_response();
    }

    let target = format!("{}/cdn/files/{}", state.url.lock().unwrap(), id);
    (StatusCode::FOUND, [(header::LOCATION, target)]).into_response()
}

async fn cdn_handler(State(state): State<MockServerState>) -> &'static str {
    *state.cdn_hits.lock().unwrap() += 1;
    "file content"
}

async fn account_info_handler(
    State(state): State<MockServerState>,
    Query(query): Query<AuthQuery>,
) -> Response {
    if let Some(rejection) = check_token(&state, &query) {
        return rejection;
    }

    Json(json!({
        "status": "OK",
        "info": {
            "username": "alice",
            "mail": "alice@example.com",
            "plan_expiration_date": "2027-03-01T00:00:00",
            "disk": {
                "avail": 53687091200u64,
                "used": 53687091200u64,
                "size": 107374182400u64
            }
        }
    }))
    .into_response()
}

async fn transfers_handler(
    State(state): State<MockServerState>,
    Query(query): Query<AuthQuery>,
) -> Response {
    if let Some(rejection) = check_token(&state, &query) {
        return rejection;
    }

    Json(json!({
        "status": "OK",
        "transfers": [
            {
                "id": 11, "file_id": 3, "name": "ubuntu.iso", "status": "COMPLETED",
                "size": 1073741824u64, "down_speed": 0, "up_speed": 0, "current_ratio": 1.5
            },
            {
                "id": 12, "file_id": 0, "name": "debian.iso", "status": "DOWNLOADING",
                "size": 4194304, "down_speed": 348160, "up_speed": 1024, "current_ratio": 0.0
            }
        ]
    }))
    .into_response()
}

async fn events_handler(
    State(state): State<MockServerState>,
    Query(query): Query<AuthQuery>,
) -> Response {
    if let Some(rejection) = check_token(&state, &query) {
        return rejection;
    }

    Json(json!({
        "status": "OK",
        "events": [
            {
                "id": 1, "type": "transfer_completed", "created_at": "2026-10-01 10:00:00",
                "file_id": 3, "transfer_name": "ubuntu.iso", "transfer_size": 1073741824u64
            },
            {
                "id": 2, "type": "file_shared", "created_at": "2026-10-02 11:00:00",
                "sharing_user_name": "bob"
            },
            {
                "id": 3, "type": "zip_created", "created_at": "2026-10-03 12:00:00",
                "zip_id": 77, "zip_size": 2097152
            }
        ]
    }))
    .into_response()
}

async fn broken_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/html")],
        "<html><body>maintenance</body></html>",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_server_startup() {
        let server = MockServer::new();
        let (server, url) = server.start().await.unwrap();

        assert!(server.port() > 0);
        assert!(url.contains(&server.port().to_string()));
        assert_eq!(*server.state().url.lock().unwrap(), url);
    }

    #[tokio::test]
    async fn test_rejects_missing_token() {
        let (_, url) = MockServer::new().start().await.unwrap();

        let response = reqwest::get(format!("{}/v2/account/info", url))
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["status"], "ERROR");
    }

    #[tokio::test]
    async fn test_files_list_endpoint() {
        let (_, url) = MockServer::new().start().await.unwrap();

        let response = reqwest::get(format!(
            "{}/v2/files/list?oauth_token={}&parent_id=1",
            url, TEST_TOKEN
        ))
        .await
        .unwrap();
        assert!(response.status().is_success());

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["files"].as_array().unwrap().len(), 2);
        assert_eq!(body["files"][0]["name"], "Action");
    }
}
