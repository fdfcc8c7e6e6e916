use axum::extract::{Path, State};
use axum::response::Json;
use axum::Extension;

use crate::database::models::SiteContent;
use crate::error::ApiError;
use crate::middleware::auth::CurrentAdmin;
use crate::middleware::client_ip::ClientIp;
use crate::schemas::site_content::SiteContentUpdateRequest;
use crate::services::audit_service::Actor;
use crate::services::site_content_service;
use crate::state::AppState;

/// GET /api/site-content/:key - public; an unseen key is created empty.
pub async fn get_content(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<SiteContent>, ApiError> {
    let content = site_content_service::get_or_create(&state.pool, &key).await?;
    Ok(Json(content))
}

/// PUT /api/admin/site-content/:key
pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    ip: ClientIp,
    Path(key): Path<String>,
    Json(body): Json<SiteContentUpdateRequest>,
) -> Result<Json<SiteContent>, ApiError> {
    let data = body.validate()?;
    let actor = Actor::new(&current, &ip);
    let content = site_content_service::update(&state.pool, &actor, &key, data).await?;
    Ok(Json(content))
}
