//! REST clients for the resource services.
//!
//! All four clients share [`ResourceEndpoint`], which implements the common
//! operation shapes over one resource path; the per-resource types only pick
//! paths, filter fields and DTOs.

mod categories;
mod notes;
mod tags;
mod users;

pub use categories::CategoryClient;
pub use notes::NoteClient;
pub use tags::TagClient;
pub use users::UserClient;

use std::time::Duration;

use bytes::Bytes;
use http::{Method, StatusCode};
use notes_gateway_sdk::{Deadline, FilterSet, ResourceClientError};
use serde::Serialize;
use tracing::{trace, warn};

use crate::infra::rest::{
    ClassifiedResponse, DownstreamRequest, Location, LocationError, RestClient,
    extract_identifier,
};

/// Upper bound for a single call; the caller's deadline can only shorten it.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

struct Delivered {
    body: Bytes,
    location: Option<Location>,
}

pub(crate) struct ResourceEndpoint {
    resource: &'static str,
    path: String,
    rest: RestClient,
    request_timeout: Duration,
}

impl ResourceEndpoint {
    pub(crate) fn new(resource: &'static str, rest: RestClient, request_timeout: Duration) -> Self {
        Self {
            resource,
            path: format!("/{resource}"),
            rest,
            request_timeout,
        }
    }

    fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.path, urlencoding::encode(id))
    }

    pub(crate) async fn get_one(
        &self,
        id: &str,
        deadline: Deadline,
    ) -> Result<Bytes, ResourceClientError> {
        let req = DownstreamRequest::new(Method::GET, self.item_path(id));
        Ok(self.dispatch("get_one", req, deadline).await?.body)
    }

    pub(crate) async fn get_many(
        &self,
        filters: FilterSet,
        deadline: Deadline,
    ) -> Result<Bytes, ResourceClientError> {
        let req = DownstreamRequest::new(Method::GET, self.path.as_str()).with_filters(filters);
        Ok(self.dispatch("get_many", req, deadline).await?.body)
    }

    pub(crate) async fn create<T: Serialize + Sync>(
        &self,
        dto: &T,
        deadline: Deadline,
    ) -> Result<String, ResourceClientError> {
        const OP: &str = "create";
        let body = self.encode(OP, dto)?;
        let req = DownstreamRequest::new(Method::POST, self.path.as_str()).with_json_body(body);
        let delivered = self.dispatch(OP, req, deadline).await?;

        trace!(resource = self.resource, location = ?delivered.location, "created");
        extract_identifier(delivered.location.as_ref()).map_err(|e| match e {
            LocationError::Missing => ResourceClientError::MissingLocation {
                resource: self.resource,
                operation: OP,
            },
            LocationError::Invalid(location) => ResourceClientError::InvalidLocation {
                resource: self.resource,
                operation: OP,
                location,
            },
        })
    }

    pub(crate) async fn update<T: Serialize + Sync>(
        &self,
        id: &str,
        dto: &T,
        deadline: Deadline,
    ) -> Result<(), ResourceClientError> {
        const OP: &str = "update";
        let body = self.encode(OP, dto)?;
        let req = DownstreamRequest::new(Method::PATCH, self.item_path(id)).with_json_body(body);
        self.dispatch(OP, req, deadline).await.map(|_| ())
    }

    pub(crate) async fn delete(&self, id: &str, deadline: Deadline) -> Result<(), ResourceClientError> {
        let req = DownstreamRequest::new(Method::DELETE, self.item_path(id));
        self.dispatch("delete", req, deadline).await.map(|_| ())
    }

    /// DELETE `resource/{id}` that also carries identifying context in a JSON
    /// body, for services that check ownership on delete.
    pub(crate) async fn delete_with_body<T: Serialize + Sync>(
        &self,
        id: &str,
        body: &T,
        deadline: Deadline,
    ) -> Result<(), ResourceClientError> {
        const OP: &str = "delete";
        let body = self.encode(OP, body)?;
        let req = DownstreamRequest::new(Method::DELETE, self.item_path(id)).with_json_body(body);
        self.dispatch(OP, req, deadline).await.map(|_| ())
    }

    fn encode<T: Serialize>(
        &self,
        operation: &'static str,
        dto: &T,
    ) -> Result<Vec<u8>, ResourceClientError> {
        serde_json::to_vec(dto).map_err(|e| ResourceClientError::Encode {
            resource: self.resource,
            operation,
            detail: e.to_string(),
        })
    }

    async fn dispatch(
        &self,
        operation: &'static str,
        req: DownstreamRequest,
        deadline: Deadline,
    ) -> Result<Delivered, ResourceClientError> {
        let deadline = deadline.capped(self.request_timeout);

        match self.rest.send(req, deadline).await {
            Ok(ClassifiedResponse::Success { body, location, .. }) => Ok(Delivered { body, location }),
            Ok(ClassifiedResponse::Failure { status, error }) => {
                warn!(
                    resource = self.resource,
                    operation,
                    status = status.as_u16(),
                    code = %error.code,
                    "resource service returned an error"
                );
                if status == StatusCode::NOT_FOUND {
                    Err(ResourceClientError::NotFound {
                        resource: self.resource,
                        operation,
                        info: error,
                    })
                } else {
                    Err(ResourceClientError::Api {
                        resource: self.resource,
                        operation,
                        status: status.as_u16(),
                        info: error,
                    })
                }
            }
            Err(source) => Err(ResourceClientError::Transport {
                resource: self.resource,
                operation,
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test_support::CountingExchange;
    use notes_gateway_sdk::TransportError;

    fn endpoint(exchange: Arc<CountingExchange>) -> ResourceEndpoint {
        let rest = RestClient::new("http://svc", exchange).unwrap();
        ResourceEndpoint::new("categories", rest, REQUEST_TIMEOUT)
    }

    fn deadline() -> Deadline {
        Deadline::after(Duration::from_secs(2))
    }

    #[tokio::test]
    async fn create_returns_identifier_from_location() {
        let exchange = Arc::new(
            CountingExchange::ok(201, "").with_header("location", "http://svc/categories/abc-123"),
        );
        let id = endpoint(exchange.clone())
            .create(&serde_json::json!({"name": "a"}), deadline())
            .await
            .unwrap();
        assert_eq!(id, "abc-123");

        let seen = exchange.last_request().unwrap();
        assert_eq!(seen.method, Method::POST);
        assert_eq!(seen.uri, "http://svc/categories");
    }

    #[tokio::test]
    async fn create_without_location_is_an_error() {
        let exchange = Arc::new(CountingExchange::ok(201, ""));
        let err = endpoint(exchange)
            .create(&serde_json::json!({}), deadline())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ResourceClientError::MissingLocation {
                resource: "categories",
                operation: "create"
            }
        ));
    }

    #[tokio::test]
    async fn not_found_keeps_error_info() {
        let exchange = Arc::new(CountingExchange::ok(
            404,
            r#"{"error_code":"404","message":"not found","developer_message":"no rows"}"#,
        ));
        let err = endpoint(exchange).get_one("x", deadline()).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.error_info().unwrap().developer_message, "no rows");
    }

    #[tokio::test]
    async fn other_status_becomes_api_error() {
        let exchange = Arc::new(CountingExchange::ok(
            418,
            r#"{"error_code":"CS-000418","message":"teapot","developer_message":""}"#,
        ));
        let err = endpoint(exchange)
            .update("c-1", &serde_json::json!({}), deadline())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ResourceClientError::Api {
                status: 418,
                operation: "update",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn call_is_capped_by_request_timeout() {
        let exchange =
            Arc::new(CountingExchange::ok(200, "[]").with_delay(Duration::from_millis(500)));
        let rest = RestClient::new("http://svc", exchange).unwrap();
        let ep = ResourceEndpoint::new("tags", rest, Duration::from_millis(20));

        let err = ep
            .get_many(FilterSet::new(), Deadline::after(Duration::from_secs(60)))
            .await
            .unwrap_err();
        assert!(
            err.transport()
                .is_some_and(TransportError::is_deadline_exceeded)
        );
    }

    #[tokio::test]
    async fn identifier_segment_is_escaped() {
        let exchange = Arc::new(CountingExchange::ok(204, ""));
        endpoint(exchange.clone())
            .delete("../users", deadline())
            .await
            .unwrap();
        assert_eq!(
            exchange.last_request().unwrap().uri,
            "http://svc/categories/..%2Fusers"
        );
    }
}
