use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::Extension;
use serde_json::{json, Value};

use crate::database::models::Category;
use crate::error::ApiError;
use crate::middleware::auth::CurrentAdmin;
use crate::middleware::client_ip::ClientIp;
use crate::schemas::category::CategoryPayload;
use crate::services::audit_service::Actor;
use crate::services::category_service;
use crate::state::AppState;

/// GET /api/categories - public listing
pub async fn list_public(State(state): State<AppState>) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(category_service::list_all(&state.pool).await?))
}

/// GET /api/admin/categories
pub async fn list_admin(State(state): State<AppState>) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(category_service::list_all(&state.pool).await?))
}

/// POST /api/admin/categories
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    ip: ClientIp,
    Json(body): Json<CategoryPayload>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let data = body.validate()?;
    let actor = Actor::new(&current, &ip);
    let category = category_service::create(&state.pool, &actor, data).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/admin/categories/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    ip: ClientIp,
    Path(category_id): Path<i64>,
    Json(body): Json<CategoryPayload>,
) -> Result<Json<Category>, ApiError> {
    let data = body.validate()?;
    let actor = Actor::new(&current, &ip);
    let category = category_service::update(&state.pool, &actor, category_id, data).await?;
    Ok(Json(category))
}

/// DELETE /api/admin/categories/:id
pub async fn remove(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    ip: ClientIp,
    Path(category_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let actor = Actor::new(&current, &ip);
    category_service::delete(&state.pool, &actor, category_id).await?;
    Ok(Json(json!({ "message": "Category deleted" })))
}
