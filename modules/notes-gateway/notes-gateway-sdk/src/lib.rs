pub mod api;
pub mod deadline;
pub mod error;
pub mod filter;
pub mod models;

pub use api::{CategoryClientV1, NoteClientV1, TagClientV1, UserClientV1};
pub use deadline::Deadline;
pub use error::{ErrorInfo, ResourceClientError, TransportError};
pub use filter::{Filter, FilterSet};
pub use models::{
    CreateCategoryRequest, CreateNoteRequest, CreateTagRequest, CreateUserRequest,
    DeleteCategoryRequest, UpdateCategoryRequest, UpdateNoteRequest, UpdateTagRequest,
    UpdateUserRequest,
};
