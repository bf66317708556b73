//! Endpoint factory for the `/api/` surface.

use http::Method;

use super::harness::AppHarness;
use super::request::RequestCase;

/// Builds requests against `/api/{collection}`; `collection` is one of
/// `categories`, `tags`, `notes`, `users`.
pub struct ApiV1<'a> {
    harness: &'a AppHarness,
}

impl<'a> ApiV1<'a> {
    pub(crate) fn new(harness: &'a AppHarness) -> Self {
        Self { harness }
    }

    pub fn list(&self, collection: &str) -> RequestCase<'a> {
        RequestCase::new(self.harness, Method::GET, format!("/api/{collection}"))
    }

    pub fn get(&self, collection: &str, id: &str) -> RequestCase<'a> {
        RequestCase::new(self.harness, Method::GET, format!("/api/{collection}/{id}"))
    }

    pub fn post(&self, collection: &str) -> RequestCase<'a> {
        RequestCase::new(self.harness, Method::POST, format!("/api/{collection}"))
    }

    pub fn patch(&self, collection: &str, id: &str) -> RequestCase<'a> {
        RequestCase::new(
            self.harness,
            Method::PATCH,
            format!("/api/{collection}/{id}"),
        )
    }

    pub fn delete(&self, collection: &str, id: &str) -> RequestCase<'a> {
        RequestCase::new(
            self.harness,
            Method::DELETE,
            format!("/api/{collection}/{id}"),
        )
    }

    /// Arbitrary path, for routes mounted with `with_routes`.
    pub fn raw(&self, method: Method, path: &str) -> RequestCase<'a> {
        RequestCase::new(self.harness, method, path)
    }
}
