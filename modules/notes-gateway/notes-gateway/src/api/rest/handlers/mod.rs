pub mod categories;
pub mod notes;
pub mod tags;
pub mod users;

use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use http::{HeaderValue, StatusCode, header};

use crate::domain::error::DomainError;

/// 200 with the resource service's body passed through untouched.
pub(crate) fn json_bytes(body: Bytes) -> Response {
    (
        [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        body,
    )
        .into_response()
}

/// 201 with a `Location` pointing at the gateway route of the new resource.
pub(crate) fn created(collection: &str, id: &str) -> Result<Response, DomainError> {
    let location = format!("{collection}/{}", urlencoding::encode(id));
    let value = HeaderValue::from_str(&location).map_err(|e| {
        DomainError::internal(format!("unrepresentable location '{location}': {e}"))
    })?;
    Ok((StatusCode::CREATED, [(header::LOCATION, value)]).into_response())
}

pub(crate) fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}
