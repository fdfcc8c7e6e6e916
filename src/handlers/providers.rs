use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::Extension;
use serde_json::{json, Value};

use crate::database::models::Provider;
use crate::error::ApiError;
use crate::middleware::auth::CurrentAdmin;
use crate::middleware::client_ip::ClientIp;
use crate::schemas::provider::{ProviderCreateRequest, ProviderUpdateRequest};
use crate::services::audit_service::Actor;
use crate::services::provider_service;
use crate::state::AppState;

/// GET /api/admin/providers - providers are admin-only data
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Provider>>, ApiError> {
    Ok(Json(provider_service::list_all(&state.pool).await?))
}

/// POST /api/admin/providers
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    ip: ClientIp,
    Json(body): Json<ProviderCreateRequest>,
) -> Result<(StatusCode, Json<Provider>), ApiError> {
    let data = body.validate()?;
    let actor = Actor::new(&current, &ip);
    let provider = provider_service::create(&state.pool, &actor, data).await?;
    Ok((StatusCode::CREATED, Json(provider)))
}

/// PUT /api/admin/providers/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    ip: ClientIp,
    Path(provider_id): Path<i64>,
    Json(body): Json<ProviderUpdateRequest>,
) -> Result<Json<Provider>, ApiError> {
    let data = body.validate()?;
    let actor = Actor::new(&current, &ip);
    let provider = provider_service::update(&state.pool, &actor, provider_id, data).await?;
    Ok(Json(provider))
}

/// DELETE /api/admin/providers/:id
pub async fn remove(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    ip: ClientIp,
    Path(provider_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let actor = Actor::new(&current, &ip);
    provider_service::delete(&state.pool, &actor, provider_id).await?;
    Ok(Json(json!({ "message": "Provider deleted" })))
}
