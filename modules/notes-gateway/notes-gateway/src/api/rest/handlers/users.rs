use axum::extract::{Extension, Path, RawQuery};
use notes_gateway_sdk::{CreateUserRequest, UpdateUserRequest};
use tracing::debug;

use super::{created, json_bytes, no_content};
use crate::api::rest::error::{ApiResult, client_error};
use crate::api::rest::extractors::{JsonBody, QueryParams};
use crate::domain::error::DomainError;
use crate::module::AppState;

const COLLECTION: &str = "/api/users";

/// `GET /api/users?email=..&password=..`: credential lookup used at login.
pub async fn find_user(
    Extension(state): Extension<AppState>,
    RawQuery(query): RawQuery,
) -> ApiResult {
    let params = QueryParams::parse(query.as_deref());
    let email = params.required("email", COLLECTION)?;
    let password = params.required("password", COLLECTION)?;
    let body = state
        .users
        .get_by_email_and_password(email, password, state.deadline())
        .await
        .map_err(|e| client_error(e, COLLECTION))?;
    Ok(json_bytes(body))
}

pub async fn get_user(Extension(state): Extension<AppState>, Path(uuid): Path<String>) -> ApiResult {
    let instance = format!("{COLLECTION}/{uuid}");
    let body = state
        .users
        .get_one(&uuid, state.deadline())
        .await
        .map_err(|e| client_error(e, &instance))?;
    Ok(json_bytes(body))
}

pub async fn create_user(
    Extension(state): Extension<AppState>,
    JsonBody(req): JsonBody<CreateUserRequest>,
) -> ApiResult {
    if req.password != req.repeat_password {
        return Err(DomainError::Validation {
            detail: "password and repeat_password do not match".into(),
            instance: COLLECTION.into(),
        });
    }
    debug!(email = %req.email, "create user");
    let uuid = state
        .users
        .create(req, state.deadline())
        .await
        .map_err(|e| client_error(e, COLLECTION))?;
    created(COLLECTION, &uuid)
}

pub async fn update_user(
    Extension(state): Extension<AppState>,
    Path(uuid): Path<String>,
    JsonBody(req): JsonBody<UpdateUserRequest>,
) -> ApiResult {
    let instance = format!("{COLLECTION}/{uuid}");
    if req.new_password.is_some() && req.old_password.is_none() {
        return Err(DomainError::Validation {
            detail: "old_password is required to set new_password".into(),
            instance,
        });
    }
    state
        .users
        .update(&uuid, req, state.deadline())
        .await
        .map_err(|e| client_error(e, &instance))?;
    Ok(no_content())
}

pub async fn delete_user(
    Extension(state): Extension<AppState>,
    Path(uuid): Path<String>,
) -> ApiResult {
    let instance = format!("{COLLECTION}/{uuid}");
    state
        .users
        .delete(&uuid, state.deadline())
        .await
        .map_err(|e| client_error(e, &instance))?;
    Ok(no_content())
}
