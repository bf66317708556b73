//! Response wrapper with assertion helpers for integration tests.

use axum::body::Body;
use http::StatusCode;
use http::header::{self, HeaderMap};
use notes_gateway_sdk::ErrorInfo;

use crate::api::rest::error::ERROR_SOURCE_HEADER;

/// Eagerly-collected HTTP response with sync assertion methods.
pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl TestResponse {
    /// Consume an `http::Response<Body>`, collecting the body into bytes.
    pub async fn from_response(resp: http::Response<Body>) -> Self {
        let (parts, body) = resp.into_parts();
        let body = axum::body::to_bytes(body, usize::MAX)
            .await
            .expect("failed to collect response body")
            .to_vec();
        Self {
            status: parts.status,
            headers: parts.headers,
            body,
        }
    }

    // -- Assertions --

    pub fn assert_status(&self, expected: u16) -> &Self {
        assert_eq!(
            self.status.as_u16(),
            expected,
            "expected status {expected}, got {}. Body: {}",
            self.status.as_u16(),
            String::from_utf8_lossy(&self.body),
        );
        self
    }

    pub fn assert_header(&self, name: &str, expected: &str) -> &Self {
        let actual = self
            .header(name)
            .unwrap_or_else(|| panic!("header '{name}' not present in response"));
        assert_eq!(
            actual, expected,
            "header '{name}': expected '{expected}', got '{actual}'"
        );
        self
    }

    /// Assert a gateway error: status, `error_code` and the source header.
    pub fn assert_error(&self, status: u16, code: &str, source: &str) -> &Self {
        self.assert_status(status);
        self.assert_header(ERROR_SOURCE_HEADER, source);
        assert_eq!(self.error_info().code, code);
        self
    }

    pub fn assert_body_contains(&self, needle: &str) -> &Self {
        let body = String::from_utf8_lossy(&self.body);
        assert!(
            body.contains(needle),
            "expected body to contain '{needle}', body was: {body}"
        );
        self
    }

    // -- Accessors --

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn location(&self) -> Option<&str> {
        self.header(header::LOCATION.as_str())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("response body is not valid JSON")
    }

    /// The body decoded as the shared error format.
    pub fn error_info(&self) -> ErrorInfo {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "body is not an error object: {e}\nbody: {}",
                String::from_utf8_lossy(&self.body)
            )
        })
    }
}
