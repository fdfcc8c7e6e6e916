use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::Extension;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::auth::CurrentAdmin;
use crate::middleware::client_ip::ClientIp;
use crate::schemas::admin::{
    AdminCreateRequest, AdminPasswordRequest, AdminResponse, AdminUpdateRequest,
};
use crate::services::admin_service;
use crate::services::audit_service::{Actor, AuditAction};
use crate::state::AppState;

/// GET /api/auth/admins
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let admins = admin_service::list_all(&state.pool).await?;
    let admins: Vec<AdminResponse> = admins.iter().map(AdminResponse::from).collect();
    Ok(Json(json!({ "admins": admins })))
}

/// POST /api/auth/admins
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    ip: ClientIp,
    Json(body): Json<AdminCreateRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let data = body.validate()?;
    let actor = Actor::new(&current, &ip);
    let admin = admin_service::create(&state.pool, &actor, data).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Admin created successfully",
            "admin": AdminResponse::from(&admin),
        })),
    ))
}

/// PUT /api/auth/admins/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    ip: ClientIp,
    Path(admin_id): Path<i64>,
    Json(body): Json<AdminUpdateRequest>,
) -> Result<Json<Value>, ApiError> {
    let data = body.validate()?;
    let actor = Actor::new(&current, &ip);
    let admin = admin_service::update(&state.pool, &actor, admin_id, data).await?;

    Ok(Json(json!({
        "message": "Admin updated successfully",
        "admin": AdminResponse::from(&admin),
    })))
}

/// PUT /api/auth/admins/:id/password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    ip: ClientIp,
    Path(admin_id): Path<i64>,
    Json(body): Json<AdminPasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    let data = body.validate()?;
    let actor = Actor::new(&current, &ip);
    admin_service::change_password(&state.pool, &actor, admin_id, data).await?;

    Ok(Json(json!({ "message": "Password updated successfully" })))
}

/// PUT /api/auth/admins/:id/toggle
pub async fn toggle_status(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    ip: ClientIp,
    Path(admin_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let actor = Actor::new(&current, &ip);
    let (admin, action) = admin_service::toggle_status(&state.pool, &actor, admin_id).await?;

    let message = if action == AuditAction::ActivateAdmin {
        "Admin activated successfully"
    } else {
        "Admin deactivated successfully"
    };
    Ok(Json(json!({
        "message": message,
        "admin": AdminResponse::from(&admin),
    })))
}

/// DELETE /api/auth/admins/:id
pub async fn remove(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    ip: ClientIp,
    Path(admin_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let actor = Actor::new(&current, &ip);
    admin_service::delete(&state.pool, &actor, admin_id).await?;

    Ok(Json(json!({ "message": "Admin deleted" })))
}
