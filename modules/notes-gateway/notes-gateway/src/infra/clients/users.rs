use std::time::Duration;

use bytes::Bytes;
use notes_gateway_sdk::{
    CreateUserRequest, Deadline, FilterSet, ResourceClientError, UpdateUserRequest, UserClientV1,
};

use super::ResourceEndpoint;
use crate::infra::rest::RestClient;

/// REST client for the user service.
pub struct UserClient {
    endpoint: ResourceEndpoint,
}

impl UserClient {
    #[must_use]
    pub fn new(rest: RestClient, request_timeout: Duration) -> Self {
        Self {
            endpoint: ResourceEndpoint::new("users", rest, request_timeout),
        }
    }
}

#[async_trait::async_trait]
impl UserClientV1 for UserClient {
    async fn get_one(&self, uuid: &str, deadline: Deadline) -> Result<Bytes, ResourceClientError> {
        self.endpoint.get_one(uuid, deadline).await
    }

    async fn get_by_email_and_password(
        &self,
        email: &str,
        password: &str,
        deadline: Deadline,
    ) -> Result<Bytes, ResourceClientError> {
        let filters = FilterSet::new()
            .with("email", [email])
            .with("password", [password]);
        self.endpoint.get_many(filters, deadline).await
    }

    async fn create(
        &self,
        req: CreateUserRequest,
        deadline: Deadline,
    ) -> Result<String, ResourceClientError> {
        self.endpoint.create(&req, deadline).await
    }

    async fn update(
        &self,
        uuid: &str,
        req: UpdateUserRequest,
        deadline: Deadline,
    ) -> Result<(), ResourceClientError> {
        self.endpoint.update(uuid, &req, deadline).await
    }

    async fn delete(&self, uuid: &str, deadline: Deadline) -> Result<(), ResourceClientError> {
        self.endpoint.delete(uuid, deadline).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::rest::error::{client_error, error_response};
    use crate::infra::rest::decode_query;
    use crate::test_support::CountingExchange;

    #[tracing_test::traced_test]
    #[tokio::test]
    async fn credentials_are_escaped_and_not_logged() {
        let exchange = Arc::new(CountingExchange::ok(200, r#"{"uuid":"u-1"}"#));
        let users = UserClient::new(
            RestClient::new("http://users:10001", exchange.clone()).unwrap(),
            Duration::from_secs(1),
        );

        users
            .get_by_email_and_password("a@b.c", "p&w=1,2", Deadline::after(Duration::from_secs(1)))
            .await
            .unwrap();

        let uri = exchange.last_request().unwrap().uri;
        let query = uri.split_once('?').unwrap().1;
        assert_eq!(
            decode_query(query).unwrap(),
            vec![
                ("email".to_owned(), vec!["a@b.c".to_owned()]),
                ("password".to_owned(), vec!["p&w=1,2".to_owned()]),
            ]
        );
        assert!(!logs_contain("p%26w"));
        assert!(logs_contain("sending downstream request"));
    }

    #[tracing_test::traced_test]
    #[tokio::test]
    async fn timed_out_lookup_logs_no_credentials() {
        let exchange =
            Arc::new(CountingExchange::ok(200, "[]").with_delay(Duration::from_secs(2)));
        let users = UserClient::new(
            RestClient::new("http://users:10001", exchange).unwrap(),
            Duration::from_millis(20),
        );

        let err = users
            .get_by_email_and_password(
                "a@b.c",
                "hunter2secret",
                Deadline::after(Duration::from_secs(1)),
            )
            .await
            .unwrap_err();
        assert!(
            err.transport()
                .is_some_and(notes_gateway_sdk::TransportError::is_deadline_exceeded)
        );

        let resp = error_response(client_error(err, "/api/users"));
        assert_eq!(resp.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
        assert!(logs_contain("resource client failed"));
        assert!(logs_contain("http://users:10001/users"));
        assert!(!logs_contain("hunter2secret"));
    }
}
