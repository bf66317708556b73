use notes_gateway_sdk::{ErrorInfo, ResourceClientError};

/// Outcome of a failed gateway request, consumed by the error middleware.
///
/// `Validation` is caller input rejected locally; `NotFound` and
/// `Downstream` pass a resource service's answer through; `Client` is any
/// other resource client failure (transport, encoding, location) and keeps
/// the original error as its source.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("validation: {detail}")]
    Validation { detail: String, instance: String },

    #[error("not found: {message}")]
    NotFound {
        message: String,
        info: Option<ErrorInfo>,
        instance: String,
    },

    #[error("downstream returned {status}: {}", info.message)]
    Downstream {
        status: u16,
        info: ErrorInfo,
        instance: String,
    },

    #[error("resource client failed: {source}")]
    Client {
        #[source]
        source: ResourceClientError,
        instance: String,
    },

    #[error("internal: {message}")]
    Internal { message: String, instance: String },
}

impl DomainError {
    #[must_use]
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation {
            detail: detail.into(),
            instance: String::new(),
        }
    }

    /// Absence reported by a storage layer or handler, without a downstream
    /// error body.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            info: None,
            instance: String::new(),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            instance: String::new(),
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Client { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    #[must_use]
    pub fn instance(&self) -> &str {
        match self {
            Self::Validation { instance, .. }
            | Self::NotFound { instance, .. }
            | Self::Downstream { instance, .. }
            | Self::Client { instance, .. }
            | Self::Internal { instance, .. } => instance,
        }
    }

    /// Fill in the request path if it has not been set yet.
    #[must_use]
    pub fn with_instance(mut self, path: &str) -> Self {
        let slot = match &mut self {
            Self::Validation { instance, .. }
            | Self::NotFound { instance, .. }
            | Self::Downstream { instance, .. }
            | Self::Client { instance, .. }
            | Self::Internal { instance, .. } => instance,
        };
        if slot.is_empty() {
            path.clone_into(slot);
        }
        self
    }
}

// ---------------------------------------------------------------------------
// From<ResourceClientError>
// ---------------------------------------------------------------------------

impl From<ResourceClientError> for DomainError {
    fn from(e: ResourceClientError) -> Self {
        match e {
            ResourceClientError::NotFound { info, .. } => Self::NotFound {
                message: info.message.clone(),
                info: Some(info),
                instance: String::new(),
            },
            ResourceClientError::Api { status, info, .. } => Self::Downstream {
                status,
                info,
                instance: String::new(),
            },
            other => Self::Client {
                source: other,
                instance: String::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notes_gateway_sdk::TransportError;

    #[test]
    fn downstream_not_found_keeps_body() {
        let err: DomainError = ResourceClientError::NotFound {
            resource: "notes",
            operation: "get_one",
            info: ErrorInfo::new("404", "not found", "no rows"),
        }
        .into();
        assert!(err.is_not_found());
        match err {
            DomainError::NotFound { message, info, .. } => {
                assert_eq!(message, "not found");
                assert_eq!(info.unwrap().developer_message, "no rows");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn api_error_becomes_downstream() {
        let err: DomainError = ResourceClientError::Api {
            resource: "tags",
            operation: "create",
            status: 409,
            info: ErrorInfo::new("TS-000009", "tag exists", "duplicate key"),
        }
        .into();
        assert!(matches!(err, DomainError::Downstream { status: 409, .. }));
    }

    #[test]
    fn transport_failure_keeps_identity() {
        use std::error::Error as _;

        let err: DomainError = ResourceClientError::Transport {
            resource: "users",
            operation: "get_one",
            source: TransportError::DeadlineExceeded {
                url: "http://users/users/1".into(),
            },
        }
        .into();
        let client = err
            .source()
            .and_then(|s| s.downcast_ref::<ResourceClientError>())
            .unwrap();
        assert!(
            client
                .transport()
                .is_some_and(TransportError::is_deadline_exceeded)
        );
    }

    #[test]
    fn with_instance_does_not_overwrite() {
        let err = DomainError::Validation {
            detail: "bad".into(),
            instance: "/api/tags".into(),
        }
        .with_instance("/fallback");
        assert_eq!(err.instance(), "/api/tags");

        let err = DomainError::internal("boom").with_instance("/api/notes");
        assert_eq!(err.instance(), "/api/notes");
    }
}
