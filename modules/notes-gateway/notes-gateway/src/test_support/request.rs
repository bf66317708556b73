//! Fluent request builder for integration tests.

use axum::body::Body;
use http::header::HeaderMap;
use http::{HeaderName, HeaderValue, Method};
use tower::ServiceExt;

use super::body::IntoBody;
use super::harness::AppHarness;
use super::response::TestResponse;

/// Fluent HTTP request builder tied to an [`AppHarness`].
pub struct RequestCase<'a> {
    harness: &'a AppHarness,
    method: Method,
    path: String,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    body: Option<Body>,
}

impl<'a> RequestCase<'a> {
    pub(crate) fn new(harness: &'a AppHarness, method: Method, path: impl Into<String>) -> Self {
        Self {
            harness,
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Set the request body: `Json(&dto)`, `serde_json::Value`, `RawJson`
    /// or `&'static str`.
    #[must_use]
    pub fn with_body(mut self, body: impl IntoBody) -> Self {
        let (b, ct) = body.into_body();
        self.body = Some(b);
        if let Some(ct) = ct {
            self.headers.insert(http::header::CONTENT_TYPE, ct);
        }
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: &'static str) -> Self {
        self.headers.insert(name, HeaderValue::from_static(value));
        self
    }

    /// Add a query parameter; the value is percent-encoded, except that a
    /// literal `,` is kept so list parameters read naturally.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Send the request through the router and collect the response.
    pub async fn send(self) -> TestResponse {
        let uri = if self.query.is_empty() {
            self.path
        } else {
            let qs: Vec<String> = self
                .query
                .iter()
                .map(|(k, v)| {
                    let v = v
                        .split(',')
                        .map(|p| urlencoding::encode(p).into_owned())
                        .collect::<Vec<_>>()
                        .join(",");
                    format!("{}={v}", urlencoding::encode(k))
                })
                .collect();
            format!("{}?{}", self.path, qs.join("&"))
        };

        let mut builder = http::Request::builder().method(self.method).uri(&uri);
        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }

        let request = builder
            .body(self.body.unwrap_or_else(Body::empty))
            .expect("failed to build request");

        let response = self
            .harness
            .router()
            .clone()
            .oneshot(request)
            .await
            .expect("router returned error");

        TestResponse::from_response(response).await
    }

    /// Send and assert the expected status code.
    pub async fn expect_status(self, status: u16) -> TestResponse {
        let resp = self.send().await;
        resp.assert_status(status);
        resp
    }
}
