use bytes::Bytes;

use crate::deadline::Deadline;
use crate::error::ResourceClientError;
use crate::models::{
    CreateCategoryRequest, CreateNoteRequest, CreateTagRequest, CreateUserRequest,
    DeleteCategoryRequest, UpdateCategoryRequest, UpdateNoteRequest, UpdateTagRequest,
    UpdateUserRequest,
};

// ---------------------------------------------------------------------------
// Resource client traits
// ---------------------------------------------------------------------------
//
// Read operations return the resource service's response body untouched.
// `create` returns the identifier taken from the `Location` header.
// Every call is bounded by the caller's `deadline`; implementations may only
// shorten it.

/// Client for the category service (`/categories`).
#[async_trait::async_trait]
pub trait CategoryClientV1: Send + Sync {
    async fn get_one(&self, uuid: &str, deadline: Deadline) -> Result<Bytes, ResourceClientError>;

    async fn get_user_categories(
        &self,
        user_uuid: &str,
        deadline: Deadline,
    ) -> Result<Bytes, ResourceClientError>;

    async fn create(
        &self,
        req: CreateCategoryRequest,
        deadline: Deadline,
    ) -> Result<String, ResourceClientError>;

    async fn update(
        &self,
        uuid: &str,
        req: UpdateCategoryRequest,
        deadline: Deadline,
    ) -> Result<(), ResourceClientError>;

    async fn delete(
        &self,
        req: DeleteCategoryRequest,
        deadline: Deadline,
    ) -> Result<(), ResourceClientError>;
}

/// Client for the tag service (`/tags`). Tags use numeric identifiers.
#[async_trait::async_trait]
pub trait TagClientV1: Send + Sync {
    async fn get_one(&self, id: i64, deadline: Deadline) -> Result<Bytes, ResourceClientError>;

    async fn get_many(&self, ids: &[i64], deadline: Deadline)
    -> Result<Bytes, ResourceClientError>;

    async fn create(
        &self,
        req: CreateTagRequest,
        deadline: Deadline,
    ) -> Result<String, ResourceClientError>;

    async fn update(
        &self,
        id: &str,
        req: UpdateTagRequest,
        deadline: Deadline,
    ) -> Result<(), ResourceClientError>;

    async fn delete(&self, id: &str, deadline: Deadline) -> Result<(), ResourceClientError>;
}

/// Client for the note service (`/notes`).
#[async_trait::async_trait]
pub trait NoteClientV1: Send + Sync {
    async fn get_one(&self, uuid: &str, deadline: Deadline) -> Result<Bytes, ResourceClientError>;

    async fn get_by_category(
        &self,
        category_uuid: &str,
        deadline: Deadline,
    ) -> Result<Bytes, ResourceClientError>;

    async fn create(
        &self,
        req: CreateNoteRequest,
        deadline: Deadline,
    ) -> Result<String, ResourceClientError>;

    async fn update(
        &self,
        uuid: &str,
        req: UpdateNoteRequest,
        deadline: Deadline,
    ) -> Result<(), ResourceClientError>;

    async fn delete(&self, uuid: &str, deadline: Deadline) -> Result<(), ResourceClientError>;
}

/// Client for the user service (`/users`).
#[async_trait::async_trait]
pub trait UserClientV1: Send + Sync {
    async fn get_one(&self, uuid: &str, deadline: Deadline) -> Result<Bytes, ResourceClientError>;

    async fn get_by_email_and_password(
        &self,
        email: &str,
        password: &str,
        deadline: Deadline,
    ) -> Result<Bytes, ResourceClientError>;

    async fn create(
        &self,
        req: CreateUserRequest,
        deadline: Deadline,
    ) -> Result<String, ResourceClientError>;

    async fn update(
        &self,
        uuid: &str,
        req: UpdateUserRequest,
        deadline: Deadline,
    ) -> Result<(), ResourceClientError>;

    async fn delete(&self, uuid: &str, deadline: Deadline) -> Result<(), ResourceClientError>;
}
