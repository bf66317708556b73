// === PUBLIC API (from SDK) ===
pub use notes_gateway_sdk::{
    CategoryClientV1, Deadline, ErrorInfo, NoteClientV1, ResourceClientError, TagClientV1,
    TransportError, UserClientV1,
};

// === MODULE DEFINITION ===
pub mod config;
pub mod module;
pub use config::GatewayConfig;
pub use module::{AppState, NotesGatewayModule};

// === INTERNAL MODULES ===
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
pub mod infra;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;
