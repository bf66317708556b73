//! In-process [`HttpExchange`] double that counts calls and replays canned
//! responses without touching the network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bytes::Bytes;
use http::{Method, Request, Response, header};
use notes_gateway_sdk::TransportError;
use parking_lot::Mutex;

use crate::infra::rest::HttpExchange;

/// What the exchange last received.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: Method,
    pub uri: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Replays `(status, body)` pairs in order; once exhausted, the last one
/// repeats. Extra headers are added to every response.
pub struct CountingExchange {
    responses: Vec<(u16, &'static str)>,
    headers: Vec<(String, String)>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last: Mutex<Option<SeenRequest>>,
}

impl CountingExchange {
    pub fn ok(status: u16, body: &'static str) -> Self {
        Self {
            responses: vec![(status, body)],
            headers: Vec::new(),
            delay: None,
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    /// Queue another response after the ones already configured.
    #[must_use]
    pub fn then(mut self, status: u16, body: &'static str) -> Self {
        self.responses.push((status, body));
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sleep before answering, to exercise deadlines.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<SeenRequest> {
        self.last.lock().clone()
    }
}

#[async_trait::async_trait]
impl HttpExchange for CountingExchange {
    async fn exchange(&self, req: Request<Bytes>) -> Result<Response<Bytes>, TransportError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let uri = req.uri().to_string();
        *self.last.lock() = Some(SeenRequest {
            method: req.method().clone(),
            uri: uri.clone(),
            content_type: req
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned),
            body: req.body().to_vec(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let (status, body) = self.responses[n.min(self.responses.len() - 1)];
        let mut builder = Response::builder().status(status);
        for (k, v) in &self.headers {
            builder = builder.header(k.as_str(), v.as_str());
        }
        builder
            .body(Bytes::from_static(body.as_bytes()))
            .map_err(|e| TransportError::MalformedResponse {
                url: uri,
                detail: e.to_string(),
            })
    }
}
