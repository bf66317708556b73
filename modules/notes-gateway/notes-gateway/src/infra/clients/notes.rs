use std::time::Duration;

use bytes::Bytes;
use notes_gateway_sdk::{
    CreateNoteRequest, Deadline, FilterSet, NoteClientV1, ResourceClientError, UpdateNoteRequest,
};

use super::ResourceEndpoint;
use crate::infra::rest::RestClient;

/// REST client for the note service.
pub struct NoteClient {
    endpoint: ResourceEndpoint,
}

impl NoteClient {
    #[must_use]
    pub fn new(rest: RestClient, request_timeout: Duration) -> Self {
        Self {
            endpoint: ResourceEndpoint::new("notes", rest, request_timeout),
        }
    }
}

#[async_trait::async_trait]
impl NoteClientV1 for NoteClient {
    async fn get_one(&self, uuid: &str, deadline: Deadline) -> Result<Bytes, ResourceClientError> {
        self.endpoint.get_one(uuid, deadline).await
    }

    async fn get_by_category(
        &self,
        category_uuid: &str,
        deadline: Deadline,
    ) -> Result<Bytes, ResourceClientError> {
        let filters = FilterSet::new().with("category_uuid", [category_uuid]);
        self.endpoint.get_many(filters, deadline).await
    }

    async fn create(
        &self,
        req: CreateNoteRequest,
        deadline: Deadline,
    ) -> Result<String, ResourceClientError> {
        self.endpoint.create(&req, deadline).await
    }

    async fn update(
        &self,
        uuid: &str,
        req: UpdateNoteRequest,
        deadline: Deadline,
    ) -> Result<(), ResourceClientError> {
        self.endpoint.update(uuid, &req, deadline).await
    }

    async fn delete(&self, uuid: &str, deadline: Deadline) -> Result<(), ResourceClientError> {
        self.endpoint.delete(uuid, deadline).await
    }
}
