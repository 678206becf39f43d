//! CRUD handlers for the `apps` routes.
//!
//! Every handler resolves the caller through the session service first and
//! passes the resulting user id to the store, so ownership filtering is
//! enforced on every path.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::apps::model::{CreateApp, UpdateApp};
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// `GET /api/apps` — the caller's apps, newest first.
pub async fn list_apps(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user = state.sessions.get_user(bearer_token(&headers))?;
    let apps = state.store.list(&user);
    Ok(Json(json!({ "data": apps })))
}

/// `POST /api/apps/create`
pub async fn create_app(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateApp>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let user = state.sessions.get_user(bearer_token(&headers))?;

    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::NameRequired);
    }

    let app = state.store.create(&user, CreateApp { name, ..payload });
    tracing::info!(app_id = %app.id, user = %user, "App created");
    Ok((StatusCode::CREATED, Json(json!({ "data": app }))))
}

/// `GET /api/apps/{id}`
pub async fn get_app(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let user = state.sessions.get_user(bearer_token(&headers))?;
    let app = state.store.get(&user, id).ok_or(ApiError::NotFound)?;
    Ok(Json(json!({ "data": app })))
}

/// `PUT /api/apps/{id}/update`
pub async fn update_app(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateApp>,
) -> Result<Json<Value>, ApiError> {
    let user = state.sessions.get_user(bearer_token(&headers))?;

    if let Some(name) = &payload.name {
        if name.trim().is_empty() {
            return Err(ApiError::InvalidName);
        }
    }

    let app = state
        .store
        .update(&user, id, payload)
        .ok_or(ApiError::NotFound)?;
    Ok(Json(json!({ "data": app })))
}

/// `DELETE /api/apps/{id}/delete`
pub async fn delete_app(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let user = state.sessions.get_user(bearer_token(&headers))?;
    if !state.store.delete(&user, id) {
        return Err(ApiError::NotFound);
    }
    tracing::info!(app_id = %id, user = %user, "App deleted");
    Ok(Json(json!({ "success": true })))
}

/// Pull the bearer token out of the `Authorization` header, if present.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
