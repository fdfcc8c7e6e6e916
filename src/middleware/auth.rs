use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use crate::auth::{decode_jwt, extract_bearer_token};
use crate::config;
use crate::error::ApiError;
use crate::repositories::admin_repository;
use crate::state::AppState;

/// Authenticated admin context, resolved once per request by
/// [`require_admin`] and read by handlers via `Extension<CurrentAdmin>`.
#[derive(Debug, Clone)]
pub struct CurrentAdmin {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub is_active: bool,
}

/// Bearer-token middleware guarding the admin surface.
///
/// Validates the JWT, loads the admin row and rejects inactive accounts, so
/// a deactivated admin loses access immediately even with a live token.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

    let token = extract_bearer_token(header).map_err(ApiError::unauthorized)?;

    let claims = decode_jwt(token, &config::config().security.jwt_secret)
        .map_err(|e| ApiError::unauthorized(e.to_string()))?;

    let mut conn = state.pool.acquire().await?;
    let admin = admin_repository::find_by_id(&mut conn, claims.admin_id)
        .await?
        .filter(|a| a.is_active)
        .ok_or_else(|| ApiError::unauthorized("Admin not found or inactive"))?;

    request.extensions_mut().insert(CurrentAdmin {
        id: admin.id,
        email: admin.email,
        name: admin.name,
        is_active: admin.is_active,
    });

    Ok(next.run(request).await)
}
