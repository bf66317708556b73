//! Body conversion trait for the fluent request builder.

use axum::body::Body;
use http::header::HeaderValue;
use serde::Serialize;

/// Converts a value into a request body, optionally providing a Content-Type header.
pub trait IntoBody {
    fn into_body(self) -> (Body, Option<HeaderValue>);
}

/// Newtype wrapper that signals "serialize this as JSON".
pub struct Json<T>(pub T);

fn application_json() -> HeaderValue {
    HeaderValue::from_static("application/json")
}

impl<T: Serialize> IntoBody for Json<T> {
    fn into_body(self) -> (Body, Option<HeaderValue>) {
        let bytes = serde_json::to_vec(&self.0).expect("failed to serialize body as JSON");
        (Body::from(bytes), Some(application_json()))
    }
}

impl IntoBody for serde_json::Value {
    fn into_body(self) -> (Body, Option<HeaderValue>) {
        Json(self).into_body()
    }
}

/// Raw text sent as `application/json`, for malformed-body cases.
pub struct RawJson(pub &'static str);

impl IntoBody for RawJson {
    fn into_body(self) -> (Body, Option<HeaderValue>) {
        (Body::from(self.0), Some(application_json()))
    }
}

impl IntoBody for &'static str {
    fn into_body(self) -> (Body, Option<HeaderValue>) {
        (Body::from(self), None)
    }
}
