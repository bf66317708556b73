use axum::extract::{Extension, Path, RawQuery};
use notes_gateway_sdk::{CreateTagRequest, UpdateTagRequest};

use super::{created, json_bytes, no_content};
use crate::api::rest::error::{ApiResult, client_error};
use crate::api::rest::extractors::{JsonBody, QueryParams, parse_id_list, parse_numeric_id};
use crate::module::AppState;

const COLLECTION: &str = "/api/tags";

/// `GET /api/tags?id=3,7,9`
pub async fn list_tags(
    Extension(state): Extension<AppState>,
    RawQuery(query): RawQuery,
) -> ApiResult {
    let params = QueryParams::parse(query.as_deref());
    let ids = parse_id_list(params.required("id", COLLECTION)?, "id", COLLECTION)?;
    let body = state
        .tags
        .get_many(&ids, state.deadline())
        .await
        .map_err(|e| client_error(e, COLLECTION))?;
    Ok(json_bytes(body))
}

pub async fn get_tag(Extension(state): Extension<AppState>, Path(id): Path<String>) -> ApiResult {
    let instance = format!("{COLLECTION}/{id}");
    let id = parse_numeric_id(&id, &instance)?;
    let body = state
        .tags
        .get_one(id, state.deadline())
        .await
        .map_err(|e| client_error(e, &instance))?;
    Ok(json_bytes(body))
}

pub async fn create_tag(
    Extension(state): Extension<AppState>,
    JsonBody(req): JsonBody<CreateTagRequest>,
) -> ApiResult {
    let id = state
        .tags
        .create(req, state.deadline())
        .await
        .map_err(|e| client_error(e, COLLECTION))?;
    created(COLLECTION, &id)
}

pub async fn update_tag(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateTagRequest>,
) -> ApiResult {
    let instance = format!("{COLLECTION}/{id}");
    parse_numeric_id(&id, &instance)?;
    state
        .tags
        .update(&id, req, state.deadline())
        .await
        .map_err(|e| client_error(e, &instance))?;
    Ok(no_content())
}

pub async fn delete_tag(Extension(state): Extension<AppState>, Path(id): Path<String>) -> ApiResult {
    let instance = format!("{COLLECTION}/{id}");
    parse_numeric_id(&id, &instance)?;
    state
        .tags
        .delete(&id, state.deadline())
        .await
        .map_err(|e| client_error(e, &instance))?;
    Ok(no_content())
}
