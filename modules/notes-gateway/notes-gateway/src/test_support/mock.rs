//! Mock resource service for integration tests.
//!
//! One server stands in for every resource service: responses are registered
//! per method and path, and every inbound request is recorded.
//!
//! # Usage
//! ```ignore
//! let mock = MockDownstream::start().await;
//! mock.mock("GET", "/tags", MockResponse::json(200, json!([{"id": 3}])));
//! // point the gateway at mock.base_url()
//! let requests = mock.recorded_requests().await;
//! mock.stop().await;
//! ```

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::{OriginalUri, State};
use axum::http::{HeaderMap, Method, StatusCode};
use bytes::Bytes;
use dashmap::DashMap;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

// ---------------------------------------------------------------------------
// Mock response types
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub enum MockBody {
    Json(Value),
    Text(String),
    Empty,
}

/// A registered response.
#[derive(Clone, Debug)]
pub struct MockResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: MockBody,
    /// Wait this long before answering.
    pub delay: Option<Duration>,
}

/// Key for route lookup.
#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub struct RouteKey {
    pub method: String,
    pub path: String,
}

impl RouteKey {
    fn new(method: &str, path: &str) -> Self {
        Self {
            method: method.to_uppercase(),
            path: path.to_owned(),
        }
    }
}

impl MockResponse {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: MockBody::Json(body),
            delay: None,
        }
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: MockBody::Text(body.into()),
            delay: None,
        }
    }

    pub fn empty(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: MockBody::Empty,
            delay: None,
        }
    }

    /// Error body in the resource services' wire format.
    pub fn error(status: u16, code: &str, message: &str, developer_message: &str) -> Self {
        Self::json(
            status,
            json!({
                "error_code": code,
                "message": message,
                "developer_message": developer_message,
            }),
        )
    }

    /// `201 Created` pointing at `location`.
    pub fn created(location: impl Into<String>) -> Self {
        Self::empty(201).with_header("location", location)
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn into_axum_response(self) -> axum::response::Response {
        let mut builder = axum::response::Response::builder()
            .status(StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK));
        for (k, v) in &self.headers {
            builder = builder.header(k.as_str(), v.as_str());
        }
        let has_content_type = self
            .headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("content-type"));

        let body = match self.body {
            MockBody::Json(value) => {
                if !has_content_type {
                    builder = builder.header("content-type", "application/json");
                }
                axum::body::Body::from(value.to_string())
            }
            MockBody::Text(text) => axum::body::Body::from(text),
            MockBody::Empty => axum::body::Body::empty(),
        };
        builder.body(body).expect("invalid mock response")
    }
}

// ---------------------------------------------------------------------------
// Recording types
// ---------------------------------------------------------------------------

/// A captured inbound request for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path and query as received, e.g. `/tags?id=3,7,9`.
    pub uri: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("recorded body is not valid JSON")
    }
}

struct SharedState {
    recorded: Mutex<VecDeque<RecordedRequest>>,
    max_recorded: usize,
    routes: DashMap<RouteKey, VecDeque<MockResponse>>,
}

impl SharedState {
    fn new(max_recorded: usize) -> Self {
        Self {
            recorded: Mutex::new(VecDeque::new()),
            max_recorded,
            routes: DashMap::new(),
        }
    }

    async fn record(&self, method: &Method, uri: &str, headers: &HeaderMap, body: &[u8]) {
        let headers = headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_owned()))
            .collect();
        let entry = RecordedRequest {
            method: method.to_string(),
            uri: uri.to_owned(),
            headers,
            body: body.to_vec(),
        };
        let mut queue = self.recorded.lock().await;
        if queue.len() >= self.max_recorded {
            queue.pop_front();
        }
        queue.push_back(entry);
    }

    /// Next queued response; the last one keeps being served.
    fn next_response(&self, key: &RouteKey) -> Option<MockResponse> {
        let mut queue = self.routes.get_mut(key)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

// ---------------------------------------------------------------------------
// MockDownstream
// ---------------------------------------------------------------------------

/// A mock resource service bound to a random local port.
pub struct MockDownstream {
    addr: SocketAddr,
    state: Arc<SharedState>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl Drop for MockDownstream {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(h) = self.handle.take() {
            h.abort();
        }
    }
}

impl MockDownstream {
    /// Start the mock server on `127.0.0.1:0` (random port).
    pub async fn start() -> Self {
        let state = Arc::new(SharedState::new(200));
        let app = Router::new()
            .fallback(dynamic_handler)
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock downstream");
        let addr = listener.local_addr().expect("failed to get local addr");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("mock server error");
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Serve `response` for every `method path` request, replacing any
    /// earlier registration. Query strings are ignored when matching.
    pub fn mock(&self, method: &str, path: &str, response: MockResponse) -> &Self {
        self.mock_sequence(method, path, vec![response])
    }

    /// Serve `responses` in order for `method path`; the last one repeats.
    pub fn mock_sequence(&self, method: &str, path: &str, responses: Vec<MockResponse>) -> &Self {
        self.state
            .routes
            .insert(RouteKey::new(method, path), responses.into());
        self
    }

    /// Snapshot of all recorded requests (oldest first).
    pub async fn recorded_requests(&self) -> Vec<RecordedRequest> {
        self.state.recorded.lock().await.iter().cloned().collect()
    }

    pub async fn clear_recorded(&self) {
        self.state.recorded.lock().await.clear();
    }

    /// Gracefully stop the mock server.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(h) = self.handle.take() {
            let _ = h.await;
        }
    }
}

async fn dynamic_handler(
    State(state): State<Arc<SharedState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> axum::response::Response {
    let path_and_query = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_owned(), ToString::to_string);
    state.record(&method, &path_and_query, &headers, &body).await;

    let key = RouteKey::new(method.as_str(), uri.path());
    let Some(response) = state.next_response(&key) else {
        return MockResponse::error(
            404,
            "MOCK-404",
            "no mock registered",
            &format!("{} {}", key.method, key.path),
        )
        .into_axum_response();
    };

    if let Some(delay) = response.delay {
        tokio::time::sleep(delay).await;
    }
    response.into_axum_response()
}
