use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::{HeaderValue, Method, Request, Response, header};
use notes_gateway_sdk::{Deadline, FilterSet, TransportError};
use tracing::debug;
use url::Url;

use super::query;
use super::response::{ClassifiedResponse, classify};

/// Overall lifetime of a single exchange on the pooled client.
pub const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// DownstreamRequest
// ---------------------------------------------------------------------------

/// One outbound call to a resource service: method, resource path (optionally
/// ending in an identifier segment), filters and an optional JSON body.
#[derive(Debug, Clone)]
pub struct DownstreamRequest {
    method: Method,
    path: String,
    filters: FilterSet,
    body: Option<Bytes>,
}

impl DownstreamRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            filters: FilterSet::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_filters(mut self, filters: FilterSet) -> Self {
        self.filters = filters;
        self
    }

    #[must_use]
    pub fn with_json_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    #[must_use]
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }
}

// ---------------------------------------------------------------------------
// HttpExchange
// ---------------------------------------------------------------------------

/// Executes one fully-built HTTP request.
///
/// A non-2xx response is a completed exchange and must be returned as `Ok`.
#[async_trait::async_trait]
pub trait HttpExchange: Send + Sync {
    async fn exchange(&self, req: Request<Bytes>) -> Result<Response<Bytes>, TransportError>;
}

/// [`HttpExchange`] backed by a pooled `reqwest::Client`.
pub struct ReqwestExchange {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestExchange {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .timeout(timeout)
            // Created-resource identifiers live in the Location header; a
            // followed redirect would hide it.
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { client, timeout })
    }
}

#[async_trait::async_trait]
impl HttpExchange for ReqwestExchange {
    async fn exchange(&self, req: Request<Bytes>) -> Result<Response<Bytes>, TransportError> {
        let url = req.uri().to_string();
        let (parts, body) = req.into_parts();

        let response = self
            .client
            .request(parts.method, &url)
            .headers(parts.headers)
            .body(body)
            .send()
            .await
            .map_err(|e| self.map_error(&url, e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_error(&url, e))?;

        let mut out = Response::new(body);
        *out.status_mut() = status;
        *out.headers_mut() = headers;
        Ok(out)
    }
}

impl ReqwestExchange {
    fn map_error(&self, url: &str, e: reqwest::Error) -> TransportError {
        let url = redact_url(url);
        // reqwest repeats the full URL in its message.
        let e = e.without_url();
        if e.is_timeout() {
            TransportError::Timeout {
                url,
                after: self.timeout,
            }
        } else if e.is_connect() {
            TransportError::Connect {
                url,
                detail: e.to_string(),
            }
        } else if e.is_body() || e.is_decode() {
            TransportError::MalformedResponse {
                url,
                detail: e.to_string(),
            }
        } else {
            TransportError::Network {
                url,
                detail: e.to_string(),
            }
        }
    }
}

/// `raw` without query, fragment or userinfo, for error messages and logs.
///
/// Filter values (user credentials among them) travel in the query string.
#[must_use]
pub fn redact_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            url.set_query(None);
            url.set_fragment(None);
            let _ = url.set_username("");
            let _ = url.set_password(None);
            url.into()
        }
        Err(_) => raw.split(['?', '#']).next().unwrap_or_default().to_owned(),
    }
}

// ---------------------------------------------------------------------------
// RestClient
// ---------------------------------------------------------------------------

/// Base URL of one resource service plus the shared exchange.
///
/// Holds no per-request state; clones share the same connection pool.
#[derive(Clone)]
pub struct RestClient {
    base_url: String,
    exchange: Arc<dyn HttpExchange>,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl RestClient {
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL.
    pub fn new(base_url: &str, exchange: Arc<dyn HttpExchange>) -> Result<Self, url::ParseError> {
        Url::parse(base_url)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            exchange,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of `req`: base URL, resource path and encoded filters.
    #[must_use]
    pub fn build_url(&self, req: &DownstreamRequest) -> String {
        let path = req.path.trim_start_matches('/');
        query::with_filters(&format!("{}/{path}", self.base_url), &req.filters)
    }

    /// Send `req` and classify the response.
    ///
    /// Nothing is sent when `deadline` has already passed; otherwise the
    /// exchange is abandoned as soon as it does.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the exchange does not complete or the
    /// error body cannot be decoded. Non-2xx responses are `Ok`.
    pub async fn send(
        &self,
        req: DownstreamRequest,
        deadline: Deadline,
    ) -> Result<ClassifiedResponse, TransportError> {
        let url = self.build_url(&req);

        if deadline.is_expired() {
            return Err(TransportError::DeadlineExceeded {
                url: redact_url(&url),
            });
        }
        // Filter values can carry credentials; only field names are logged.
        debug!(
            method = %req.method,
            base_url = %self.base_url,
            path = %req.path,
            filters = ?req.filters.iter().map(|f| f.field.as_str()).collect::<Vec<_>>(),
            "sending downstream request"
        );

        let mut builder = Request::builder().method(req.method).uri(url.as_str());
        if req.body.is_some() {
            builder = builder.header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
        }
        let request = builder
            .body(req.body.unwrap_or_default())
            .map_err(|e| TransportError::InvalidRequest {
                detail: e.to_string(),
            })?;

        let response = tokio::time::timeout(deadline.remaining(), self.exchange.exchange(request))
            .await
            .map_err(|_| TransportError::DeadlineExceeded {
                url: redact_url(&url),
            })??;

        classify(&url, response)
    }
}
