use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::Extension;
use serde_json::{json, Value};

use crate::database::models::Tag;
use crate::error::ApiError;
use crate::middleware::auth::CurrentAdmin;
use crate::middleware::client_ip::ClientIp;
use crate::schemas::tag::TagPayload;
use crate::services::audit_service::Actor;
use crate::services::tag_service;
use crate::state::AppState;

/// GET /api/tags - public listing
pub async fn list_public(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, ApiError> {
    Ok(Json(tag_service::list_all(&state.pool).await?))
}

/// GET /api/admin/tags
pub async fn list_admin(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, ApiError> {
    Ok(Json(tag_service::list_all(&state.pool).await?))
}

/// POST /api/admin/tags
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    ip: ClientIp,
    Json(body): Json<TagPayload>,
) -> Result<(StatusCode, Json<Tag>), ApiError> {
    let data = body.validate()?;
    let actor = Actor::new(&current, &ip);
    let tag = tag_service::create(&state.pool, &actor, data).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

/// PUT /api/admin/tags/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    ip: ClientIp,
    Path(tag_id): Path<i64>,
    Json(body): Json<TagPayload>,
) -> Result<Json<Tag>, ApiError> {
    let data = body.validate()?;
    let actor = Actor::new(&current, &ip);
    let tag = tag_service::update(&state.pool, &actor, tag_id, data).await?;
    Ok(Json(tag))
}

/// DELETE /api/admin/tags/:id
pub async fn remove(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    ip: ClientIp,
    Path(tag_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let actor = Actor::new(&current, &ip);
    tag_service::delete(&state.pool, &actor, tag_id).await?;
    Ok(Json(json!({ "message": "Tag deleted" })))
}
