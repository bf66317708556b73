use axum::extract::{Extension, Path, RawQuery};
use notes_gateway_sdk::{CreateCategoryRequest, DeleteCategoryRequest, UpdateCategoryRequest};
use tracing::debug;

use super::{created, json_bytes, no_content};
use crate::api::rest::error::{ApiResult, client_error};
use crate::api::rest::extractors::{JsonBody, QueryParams};
use crate::module::AppState;

const COLLECTION: &str = "/api/categories";

pub async fn list_categories(
    Extension(state): Extension<AppState>,
    RawQuery(query): RawQuery,
) -> ApiResult {
    let params = QueryParams::parse(query.as_deref());
    let user_uuid = params.required("user_uuid", COLLECTION)?;
    let body = state
        .categories
        .get_user_categories(user_uuid, state.deadline())
        .await
        .map_err(|e| client_error(e, COLLECTION))?;
    Ok(json_bytes(body))
}

pub async fn get_category(
    Extension(state): Extension<AppState>,
    Path(uuid): Path<String>,
) -> ApiResult {
    let instance = format!("{COLLECTION}/{uuid}");
    let body = state
        .categories
        .get_one(&uuid, state.deadline())
        .await
        .map_err(|e| client_error(e, &instance))?;
    Ok(json_bytes(body))
}

pub async fn create_category(
    Extension(state): Extension<AppState>,
    JsonBody(req): JsonBody<CreateCategoryRequest>,
) -> ApiResult {
    debug!(user_uuid = %req.user_uuid, "create category");
    let uuid = state
        .categories
        .create(req, state.deadline())
        .await
        .map_err(|e| client_error(e, COLLECTION))?;
    created(COLLECTION, &uuid)
}

pub async fn update_category(
    Extension(state): Extension<AppState>,
    Path(uuid): Path<String>,
    JsonBody(req): JsonBody<UpdateCategoryRequest>,
) -> ApiResult {
    let instance = format!("{COLLECTION}/{uuid}");
    state
        .categories
        .update(&uuid, req, state.deadline())
        .await
        .map_err(|e| client_error(e, &instance))?;
    Ok(no_content())
}

/// The owner is required so the category service can check it.
pub async fn delete_category(
    Extension(state): Extension<AppState>,
    Path(uuid): Path<String>,
    RawQuery(query): RawQuery,
) -> ApiResult {
    let instance = format!("{COLLECTION}/{uuid}");
    let params = QueryParams::parse(query.as_deref());
    let user_uuid = params.required("user_uuid", &instance)?.to_owned();
    state
        .categories
        .delete(DeleteCategoryRequest { uuid, user_uuid }, state.deadline())
        .await
        .map_err(|e| client_error(e, &instance))?;
    Ok(no_content())
}
