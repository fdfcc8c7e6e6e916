use axum::extract::{Query, State};
use axum::response::Json;

use crate::api::{PageParams, Paginated};
use crate::database::models::AuditLog;
use crate::error::ApiError;
use crate::services::audit_service;
use crate::state::AppState;

/// GET /api/auth/audit - newest-first audit trail
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Paginated<AuditLog>>, ApiError> {
    let page = audit_service::list(&state.pool, &params).await?;
    Ok(Json(page))
}
