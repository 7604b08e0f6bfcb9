//! Content handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;
use uuid::Uuid;

use crate::application::contents::ContentError;
use crate::application::error::ErrorReport;

use super::error::ApiError;
use super::models::{ContentRequest, DeletedResponse};
use super::state::ApiState;

pub async fn list_contents(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let contents = state
        .contents
        .list()
        .await
        .map_err(|err| content_error_to_api("list", None, err))?;

    Ok(Json(contents))
}

pub async fn get_content(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let content = state
        .contents
        .get(id)
        .await
        .map_err(|err| content_error_to_api("get", Some(id), err))?;

    match content {
        Some(content) => Ok(Json(content)),
        None => Err(ApiError::not_found("content not found")),
    }
}

pub async fn create_content(
    State(state): State<ApiState>,
    Json(payload): Json<ContentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let content = state
        .contents
        .create(payload.into())
        .await
        .map_err(|err| content_error_to_api("create", None, err))?;

    Ok((StatusCode::CREATED, Json(content)))
}

pub async fn update_content(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ContentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let content = state
        .contents
        .update(id, payload.into())
        .await
        .map_err(|err| content_error_to_api("update", Some(id), err))?;

    match content {
        Some(content) => Ok(Json(content)),
        None => Err(ApiError::not_found("content not found")),
    }
}

pub async fn delete_content(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state
        .contents
        .delete(id)
        .await
        .map_err(|err| content_error_to_api("delete", Some(id), err))?;

    match deleted {
        Some(id) => Ok(Json(DeletedResponse { id })),
        None => Err(ApiError::not_found("content not found")),
    }
}

pub async fn add_genres(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(genres): Json<Vec<String>>,
) -> Result<impl IntoResponse, ApiError> {
    let content = state
        .contents
        .add_genres(id, genres)
        .await
        .map_err(|err| content_error_to_api("add_genres", Some(id), err))?;

    match content {
        Some(content) => Ok(Json(content)),
        None => Err(ApiError::not_found("content not found")),
    }
}

pub async fn remove_genres(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(genres): Json<Vec<String>>,
) -> Result<impl IntoResponse, ApiError> {
    let content = state
        .contents
        .remove_genres(id, genres)
        .await
        .map_err(|err| content_error_to_api("remove_genres", Some(id), err))?;

    match content {
        Some(content) => Ok(Json(content)),
        None => Err(ApiError::not_found("content not found")),
    }
}

pub async fn healthz(State(state): State<ApiState>) -> Response {
    match &state.db {
        Some(db) => match db.health_check().await {
            Ok(()) => StatusCode::NO_CONTENT.into_response(),
            Err(err) => {
                let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
                ErrorReport::from_error(
                    "infra::http::api::healthz",
                    StatusCode::SERVICE_UNAVAILABLE,
                    &err,
                )
                .attach(&mut response);
                response
            }
        },
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

fn content_error_to_api(op: &'static str, id: Option<Uuid>, err: ContentError) -> ApiError {
    match err {
        ContentError::Validation(message) => ApiError::bad_request("invalid request", Some(message)),
        ContentError::Store(err) => {
            error!(
                target = "mediateca::http::api",
                op,
                id = ?id,
                error = %err,
                "storage operation failed",
            );
            ApiError::storage()
        }
    }
}
