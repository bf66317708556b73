use axum::extract::{Extension, Path, RawQuery};
use notes_gateway_sdk::{CreateNoteRequest, UpdateNoteRequest};

use super::{created, json_bytes, no_content};
use crate::api::rest::error::{ApiResult, client_error};
use crate::api::rest::extractors::{JsonBody, QueryParams};
use crate::module::AppState;

const COLLECTION: &str = "/api/notes";

pub async fn list_notes(
    Extension(state): Extension<AppState>,
    RawQuery(query): RawQuery,
) -> ApiResult {
    let params = QueryParams::parse(query.as_deref());
    let category_uuid = params.required("category_uuid", COLLECTION)?;
    let body = state
        .notes
        .get_by_category(category_uuid, state.deadline())
        .await
        .map_err(|e| client_error(e, COLLECTION))?;
    Ok(json_bytes(body))
}

pub async fn get_note(Extension(state): Extension<AppState>, Path(uuid): Path<String>) -> ApiResult {
    let instance = format!("{COLLECTION}/{uuid}");
    let body = state
        .notes
        .get_one(&uuid, state.deadline())
        .await
        .map_err(|e| client_error(e, &instance))?;
    Ok(json_bytes(body))
}

pub async fn create_note(
    Extension(state): Extension<AppState>,
    JsonBody(req): JsonBody<CreateNoteRequest>,
) -> ApiResult {
    let uuid = state
        .notes
        .create(req, state.deadline())
        .await
        .map_err(|e| client_error(e, COLLECTION))?;
    created(COLLECTION, &uuid)
}

pub async fn update_note(
    Extension(state): Extension<AppState>,
    Path(uuid): Path<String>,
    JsonBody(req): JsonBody<UpdateNoteRequest>,
) -> ApiResult {
    let instance = format!("{COLLECTION}/{uuid}");
    state
        .notes
        .update(&uuid, req, state.deadline())
        .await
        .map_err(|e| client_error(e, &instance))?;
    Ok(no_content())
}

pub async fn delete_note(
    Extension(state): Extension<AppState>,
    Path(uuid): Path<String>,
) -> ApiResult {
    let instance = format!("{COLLECTION}/{uuid}");
    state
        .notes
        .delete(&uuid, state.deadline())
        .await
        .map_err(|e| client_error(e, &instance))?;
    Ok(no_content())
}
