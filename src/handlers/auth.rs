use axum::extract::State;
use axum::response::Json;
use axum::Extension;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::auth::CurrentAdmin;
use crate::middleware::client_ip::ClientIp;
use crate::services::admin_service;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let (email, password) = match (body.email.as_deref(), body.password.as_deref()) {
        (Some(e), Some(p)) if !e.trim().is_empty() && !p.is_empty() => (e.trim(), p),
        _ => return Err(ApiError::bad_request("Email and password are required")),
    };

    let (admin, token) = admin_service::login(&state.pool, &ip, email, password).await?;

    Ok(Json(json!({
        "token": token,
        "admin": {
            "id": admin.id,
            "email": admin.email,
            "name": admin.name,
        },
    })))
}

/// GET /api/auth/me
pub async fn me(Extension(admin): Extension<CurrentAdmin>) -> Json<Value> {
    Json(json!({
        "id": admin.id,
        "email": admin.email,
        "name": admin.name,
        "is_active": admin.is_active,
    }))
}
