use std::time::Duration;

use bytes::Bytes;
use notes_gateway_sdk::{
    CategoryClientV1, CreateCategoryRequest, Deadline, DeleteCategoryRequest, FilterSet,
    ResourceClientError, UpdateCategoryRequest,
};

use super::ResourceEndpoint;
use crate::infra::rest::RestClient;

/// REST client for the category service.
pub struct CategoryClient {
    endpoint: ResourceEndpoint,
}

impl CategoryClient {
    #[must_use]
    pub fn new(rest: RestClient, request_timeout: Duration) -> Self {
        Self {
            endpoint: ResourceEndpoint::new("categories", rest, request_timeout),
        }
    }
}

#[async_trait::async_trait]
impl CategoryClientV1 for CategoryClient {
    async fn get_one(&self, uuid: &str, deadline: Deadline) -> Result<Bytes, ResourceClientError> {
        self.endpoint.get_one(uuid, deadline).await
    }

    async fn get_user_categories(
        &self,
        user_uuid: &str,
        deadline: Deadline,
    ) -> Result<Bytes, ResourceClientError> {
        let filters = FilterSet::new().with("user_uuid", [user_uuid]);
        self.endpoint.get_many(filters, deadline).await
    }

    async fn create(
        &self,
        req: CreateCategoryRequest,
        deadline: Deadline,
    ) -> Result<String, ResourceClientError> {
        self.endpoint.create(&req, deadline).await
    }

    async fn update(
        &self,
        uuid: &str,
        req: UpdateCategoryRequest,
        deadline: Deadline,
    ) -> Result<(), ResourceClientError> {
        self.endpoint.update(uuid, &req, deadline).await
    }

    async fn delete(
        &self,
        req: DeleteCategoryRequest,
        deadline: Deadline,
    ) -> Result<(), ResourceClientError> {
        self.endpoint
            .delete_with_body(&req.uuid, &req, deadline)
            .await
    }
}
