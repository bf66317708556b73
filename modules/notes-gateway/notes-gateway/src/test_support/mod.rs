//! Test utilities for notes gateway unit and integration tests.

pub mod api_v1;
pub mod body;
mod exchange;
pub mod harness;
mod mock;
pub mod request;
pub mod response;

pub use body::{IntoBody, Json, RawJson};
pub use exchange::{CountingExchange, SeenRequest};
pub use harness::{AppHarness, AppHarnessBuilder};
pub use mock::{MockBody, MockDownstream, MockResponse, RecordedRequest, RouteKey};
pub use request::RequestCase;
pub use response::TestResponse;
