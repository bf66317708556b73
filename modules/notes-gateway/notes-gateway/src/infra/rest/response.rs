use bytes::Bytes;
use http::{HeaderValue, Response, StatusCode, header};
use notes_gateway_sdk::{ErrorInfo, TransportError};
use url::Url;

use super::transport::redact_url;

/// `Location` header of a successful response, resolved against the request
/// URL so relative values work too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Url(Url),
    /// Present but not a usable URL (not UTF-8, or fails to parse).
    Unusable(String),
}

/// Outcome of a completed exchange with a resource service.
#[derive(Debug, Clone)]
pub enum ClassifiedResponse {
    /// 2xx: the body is opaque to the gateway.
    Success {
        status: StatusCode,
        body: Bytes,
        location: Option<Location>,
    },
    /// Any other status, with its decoded error body.
    Failure { status: StatusCode, error: ErrorInfo },
}

impl ClassifiedResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Success { status, .. } | Self::Failure { status, .. } => *status,
        }
    }
}

/// Classify a raw response by status class.
///
/// # Errors
///
/// Returns [`TransportError::UndecodableErrorBody`] when a non-2xx response
/// does not carry a JSON [`ErrorInfo`].
pub fn classify(
    request_url: &str,
    response: Response<Bytes>,
) -> Result<ClassifiedResponse, TransportError> {
    let status = response.status();

    if status.is_success() {
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| resolve_location(request_url, v));
        return Ok(ClassifiedResponse::Success {
            status,
            body: response.into_body(),
            location,
        });
    }

    let error: ErrorInfo = serde_json::from_slice(response.body()).map_err(|e| {
        TransportError::UndecodableErrorBody {
            url: redact_url(request_url),
            status: status.as_u16(),
            detail: e.to_string(),
        }
    })?;
    Ok(ClassifiedResponse::Failure { status, error })
}

fn resolve_location(request_url: &str, value: &HeaderValue) -> Location {
    let Ok(raw) = value.to_str() else {
        return Location::Unusable(String::from_utf8_lossy(value.as_bytes()).into_owned());
    };
    Url::parse(request_url)
        .and_then(|base| base.join(raw))
        .map_or_else(|_| Location::Unusable(raw.to_owned()), Location::Url)
}

/// Why an identifier could not be taken from a create response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    Missing,
    Invalid(String),
}

/// Identifier of a newly created resource: the last non-empty path segment
/// of its `Location`. Returned as-is, without format validation.
///
/// # Errors
///
/// Returns [`LocationError::Missing`] without a header and
/// [`LocationError::Invalid`] when the URL has no non-empty path segment.
pub fn extract_identifier(location: Option<&Location>) -> Result<String, LocationError> {
    match location {
        None => Err(LocationError::Missing),
        Some(Location::Unusable(raw)) => Err(LocationError::Invalid(raw.clone())),
        Some(Location::Url(url)) => url
            .path_segments()
            .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
            .map(str::to_owned)
            .ok_or_else(|| LocationError::Invalid(url.to_string())),
    }
}
