use std::time::Duration;

use bytes::Bytes;
use notes_gateway_sdk::{
    CreateTagRequest, Deadline, FilterSet, ResourceClientError, TagClientV1, UpdateTagRequest,
};

use super::ResourceEndpoint;
use crate::infra::rest::RestClient;

/// REST client for the tag service. Tags are addressed by integer id.
pub struct TagClient {
    endpoint: ResourceEndpoint,
}

impl TagClient {
    #[must_use]
    pub fn new(rest: RestClient, request_timeout: Duration) -> Self {
        Self {
            endpoint: ResourceEndpoint::new("tags", rest, request_timeout),
        }
    }
}

#[async_trait::async_trait]
impl TagClientV1 for TagClient {
    async fn get_one(&self, id: i64, deadline: Deadline) -> Result<Bytes, ResourceClientError> {
        self.endpoint.get_one(&id.to_string(), deadline).await
    }

    async fn get_many(
        &self,
        ids: &[i64],
        deadline: Deadline,
    ) -> Result<Bytes, ResourceClientError> {
        let filters = FilterSet::new().with("id", ids.iter().map(ToString::to_string));
        self.endpoint.get_many(filters, deadline).await
    }

    async fn create(
        &self,
        req: CreateTagRequest,
        deadline: Deadline,
    ) -> Result<String, ResourceClientError> {
        self.endpoint.create(&req, deadline).await
    }

    async fn update(
        &self,
        id: &str,
        req: UpdateTagRequest,
        deadline: Deadline,
    ) -> Result<(), ResourceClientError> {
        self.endpoint.update(id, &req, deadline).await
    }

    async fn delete(&self, id: &str, deadline: Deadline) -> Result<(), ResourceClientError> {
        self.endpoint.delete(id, deadline).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test_support::CountingExchange;

    fn client(exchange: Arc<CountingExchange>) -> TagClient {
        TagClient::new(
            RestClient::new("http://tags:10004", exchange).unwrap(),
            Duration::from_secs(1),
        )
    }

    fn deadline() -> Deadline {
        Deadline::after(Duration::from_secs(2))
    }

    #[tokio::test]
    async fn get_many_joins_ids_in_one_field() {
        let exchange = Arc::new(CountingExchange::ok(200, r#"[{"id":3},{"id":7},{"id":9}]"#));
        let body = client(exchange.clone())
            .get_many(&[3, 7, 9], deadline())
            .await
            .unwrap();

        assert_eq!(&body[..], br#"[{"id":3},{"id":7},{"id":9}]"#);
        assert_eq!(
            exchange.last_request().unwrap().uri,
            "http://tags:10004/tags?id=3,7,9"
        );
    }

    #[tokio::test]
    async fn second_delete_reports_not_found() {
        let exchange = Arc::new(CountingExchange::ok(204, "").then(
            404,
            r#"{"error_code":"TS-000404","message":"tag not found","developer_message":""}"#,
        ));
        let tags = client(exchange.clone());

        tags.delete("5", deadline()).await.unwrap();
        let err = tags.delete("5", deadline()).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(exchange.calls(), 2);
    }
}
