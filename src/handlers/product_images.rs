use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::Extension;

use crate::error::ApiError;
use crate::handlers::products::parse_product_request;
use crate::middleware::auth::CurrentAdmin;
use crate::middleware::client_ip::ClientIp;
use crate::schemas::product::ProductResponse;
use crate::services::audit_service::Actor;
use crate::services::product_service;
use crate::state::AppState;

/// POST /api/admin/products/:id/images - append uploads to a product
pub async fn add(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    ip: ClientIp,
    Path(product_id): Path<i64>,
    request: Request,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let (payload, uploads) = parse_product_request(request).await?;
    let actor = Actor::new(&current, &ip);
    let detail = product_service::add_images(
        &state.pool,
        state.images.as_ref(),
        &actor,
        product_id,
        uploads,
        payload.primary_index,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(ProductResponse::admin(&detail))))
}

/// DELETE /api/admin/products/:id/images/:image_id
pub async fn remove(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    ip: ClientIp,
    Path((product_id, image_id)): Path<(i64, i64)>,
) -> Result<Json<ProductResponse>, ApiError> {
    let actor = Actor::new(&current, &ip);
    let detail = product_service::delete_image(
        &state.pool,
        state.images.as_ref(),
        &actor,
        product_id,
        image_id,
    )
    .await?;
    Ok(Json(ProductResponse::admin(&detail)))
}

/// PUT /api/admin/products/:id/images/:image_id/set-primary
pub async fn set_primary(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    ip: ClientIp,
    Path((product_id, image_id)): Path<(i64, i64)>,
) -> Result<Json<ProductResponse>, ApiError> {
    let actor = Actor::new(&current, &ip);
    let detail =
        product_service::set_primary_image(&state.pool, &actor, product_id, image_id).await?;
    Ok(Json(ProductResponse::admin(&detail)))
}
