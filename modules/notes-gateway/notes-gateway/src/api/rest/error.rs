use std::any::Any;

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::{HeaderValue, StatusCode};
use notes_gateway_sdk::{ErrorInfo, ResourceClientError};
use tracing::{error, warn};

use crate::domain::error::DomainError;

// ---------------------------------------------------------------------------
// Error codes and headers
// ---------------------------------------------------------------------------

pub(crate) const ERR_VALIDATION: &str = "GW-000400";
pub(crate) const ERR_NOT_FOUND: &str = "GW-000404";
pub(crate) const ERR_INTERNAL: &str = "GW-000500";

/// Tells callers whether an error body was produced by the gateway itself or
/// relayed from a resource service.
pub const ERROR_SOURCE_HEADER: &str = "x-gateway-error-source";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSource {
    Gateway,
    Downstream,
}

impl ErrorSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gateway => "gateway",
            Self::Downstream => "downstream",
        }
    }
}

/// Result type returned by every handler; the `Err` side is rendered by
/// [`error_response`].
pub type ApiResult<T = Response> = Result<T, DomainError>;

// ---------------------------------------------------------------------------
// DomainError → response helpers
// ---------------------------------------------------------------------------

/// Status for a relayed resource service error. Client errors and explicit
/// unavailability pass through; anything else is a bad gateway.
fn downstream_status(status: u16) -> StatusCode {
    match StatusCode::from_u16(status) {
        Ok(s) if s.is_client_error() => s,
        Ok(s @ (StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT)) => s,
        _ => StatusCode::BAD_GATEWAY,
    }
}

fn http_status_code(err: &DomainError) -> StatusCode {
    match err {
        DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Downstream { status, .. } => downstream_status(*status),
        DomainError::Client { .. } | DomainError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_source(err: &DomainError) -> ErrorSource {
    match err {
        DomainError::NotFound { info: Some(_), .. } | DomainError::Downstream { .. } => {
            ErrorSource::Downstream
        }
        _ => ErrorSource::Gateway,
    }
}

fn error_body(err: &DomainError) -> ErrorInfo {
    match err {
        DomainError::Validation { detail, .. } => {
            ErrorInfo::new(ERR_VALIDATION, detail.clone(), "invalid request data")
        }
        DomainError::NotFound {
            info: Some(info), ..
        }
        | DomainError::Downstream { info, .. } => info.clone(),
        DomainError::NotFound { message, .. } => {
            ErrorInfo::new(ERR_NOT_FOUND, message.clone(), "")
        }
        DomainError::Client { .. } | DomainError::Internal { .. } => {
            ErrorInfo::new(ERR_INTERNAL, "internal server error", "")
        }
    }
}

fn log_error(err: &DomainError, status: StatusCode) {
    let instance = err.instance();
    match err {
        DomainError::Client { source, .. } => {
            let timed_out = matches!(
                source,
                ResourceClientError::Transport { source, .. } if source.is_deadline_exceeded()
            );
            error!(
                instance,
                status = status.as_u16(),
                resource = source.resource(),
                timed_out,
                error = ?source,
                "resource client failed"
            );
        }
        DomainError::Internal { message, .. } => {
            error!(instance, status = status.as_u16(), detail = %message, "internal error");
        }
        DomainError::Downstream { .. } if status.is_server_error() => {
            warn!(instance, status = status.as_u16(), error = %err, "downstream failure");
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Central dispatch
// ---------------------------------------------------------------------------

/// Render a `DomainError` as a JSON error body with the
/// `x-gateway-error-source` header.
pub fn error_response(err: DomainError) -> Response {
    let status = http_status_code(&err);
    log_error(&err, status);

    let mut response = (status, Json(error_body(&err))).into_response();
    response.headers_mut().insert(
        ERROR_SOURCE_HEADER,
        HeaderValue::from_static(error_source(&err).as_str()),
    );
    response
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        error_response(self)
    }
}

/// Convert a resource client failure into a `DomainError` tagged with the
/// inbound request path.
pub(crate) fn client_error(err: ResourceClientError, instance: &str) -> DomainError {
    DomainError::from(err).with_instance(instance)
}

/// Handler for `CatchPanicLayer`: a panicking handler becomes a 500 with the
/// same body shape as every other gateway error.
#[allow(clippy::needless_pass_by_value)]
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    error_response(DomainError::internal(format!("handler panicked: {detail}")))
}
