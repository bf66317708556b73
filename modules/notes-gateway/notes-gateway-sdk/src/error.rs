use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Structured error body returned by every resource service on a non-2xx
/// response.
///
/// The gateway treats it as opaque beyond these three fields and re-emits it
/// unchanged when passing a downstream failure through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    #[serde(rename = "error_code")]
    pub code: String,
    pub message: String,
    pub developer_message: String,
}

impl ErrorInfo {
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        developer_message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            developer_message: developer_message.into(),
        }
    }
}

/// Failure to complete an HTTP exchange with a resource service.
///
/// A well-formed non-2xx response is never a `TransportError`; it is
/// classified into an [`ErrorInfo`] instead.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("deadline exceeded before {url} answered")]
    DeadlineExceeded { url: String },

    #[error("request to {url} timed out after {after:?}")]
    Timeout { url: String, after: Duration },

    #[error("failed to connect to {url}: {detail}")]
    Connect { url: String, detail: String },

    #[error("request to {url} failed: {detail}")]
    Network { url: String, detail: String },

    #[error("malformed response from {url}: {detail}")]
    MalformedResponse { url: String, detail: String },

    #[error("error body from {url} (status {status}) is not decodable: {detail}")]
    UndecodableErrorBody {
        url: String,
        status: u16,
        detail: String,
    },

    #[error("invalid request: {detail}")]
    InvalidRequest { detail: String },
}

impl TransportError {
    #[must_use]
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, Self::DeadlineExceeded { .. })
    }
}

/// Error returned by every resource client operation.
///
/// Each variant names the resource and the operation that failed, so the
/// identity of the failure survives any further wrapping.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ResourceClientError {
    #[error("{resource}.{operation}: not found: {}", info.message)]
    NotFound {
        resource: &'static str,
        operation: &'static str,
        info: ErrorInfo,
    },

    #[error("{resource}.{operation}: downstream returned {status}: {}", info.message)]
    Api {
        resource: &'static str,
        operation: &'static str,
        status: u16,
        info: ErrorInfo,
    },

    #[error("{resource}.{operation}: transport failure")]
    Transport {
        resource: &'static str,
        operation: &'static str,
        #[source]
        source: TransportError,
    },

    #[error("{resource}.{operation}: created response carries no Location header")]
    MissingLocation {
        resource: &'static str,
        operation: &'static str,
    },

    #[error("{resource}.{operation}: unusable Location header '{location}'")]
    InvalidLocation {
        resource: &'static str,
        operation: &'static str,
        location: String,
    },

    #[error("{resource}.{operation}: failed to encode request body: {detail}")]
    Encode {
        resource: &'static str,
        operation: &'static str,
        detail: String,
    },
}

impl ResourceClientError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Downstream error body, if this failure came from one.
    #[must_use]
    pub fn error_info(&self) -> Option<&ErrorInfo> {
        match self {
            Self::NotFound { info, .. } | Self::Api { info, .. } => Some(info),
            Self::Transport { .. }
            | Self::MissingLocation { .. }
            | Self::InvalidLocation { .. }
            | Self::Encode { .. } => None,
        }
    }

    #[must_use]
    pub fn transport(&self) -> Option<&TransportError> {
        match self {
            Self::Transport { source, .. } => Some(source),
            _ => None,
        }
    }

    #[must_use]
    pub fn resource(&self) -> &'static str {
        match self {
            Self::NotFound { resource, .. }
            | Self::Api { resource, .. }
            | Self::Transport { resource, .. }
            | Self::MissingLocation { resource, .. }
            | Self::InvalidLocation { resource, .. }
            | Self::Encode { resource, .. } => resource,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_info_uses_downstream_field_names() {
        let info = ErrorInfo::new("404", "not found", "no rows");
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "error_code": "404",
                "message": "not found",
                "developer_message": "no rows"
            })
        );
    }

    #[test]
    fn error_info_decodes_downstream_body() {
        let info: ErrorInfo = serde_json::from_str(
            r#"{"error_code":"US-000004","message":"user not found","developer_message":"mongo: no documents"}"#,
        )
        .unwrap();
        assert_eq!(info.code, "US-000004");
        assert_eq!(info.developer_message, "mongo: no documents");
    }

    #[test]
    fn not_found_survives_as_predicate() {
        let err = ResourceClientError::NotFound {
            resource: "tags",
            operation: "delete",
            info: ErrorInfo::new("404", "not found", ""),
        };
        assert!(err.is_not_found());
        assert_eq!(err.error_info().map(|i| i.code.as_str()), Some("404"));
        assert_eq!(err.resource(), "tags");
    }

    #[test]
    fn transport_error_is_kept_as_source() {
        use std::error::Error as _;

        let err = ResourceClientError::Transport {
            resource: "notes",
            operation: "get_one",
            source: TransportError::DeadlineExceeded {
                url: "http://notes/notes/1".into(),
            },
        };
        assert!(err.transport().is_some_and(TransportError::is_deadline_exceeded));
        assert!(err.source().is_some());
        assert!(err.error_info().is_none());
    }
}
