pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod repositories;
pub mod schemas;
pub mod services;
pub mod state;
pub mod storage;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router.
///
/// Public routes first, then the bearer-gated admin surface wrapped in the
/// auth middleware. The state carries the connection pool and the image
/// store collaborator.
pub fn app(state: AppState) -> Router {
    let config = config::config();

    let public = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/categories", get(handlers::categories::list_public))
        .route("/api/tags", get(handlers::tags::list_public))
        .route("/api/products", get(handlers::products::list_public))
        .route("/api/products/:id", get(handlers::products::get_public))
        .route("/api/site-content/:key", get(handlers::site_content::get_content));

    let admin = Router::new()
        .route("/api/auth/me", get(handlers::auth::me))
        .route("/api/auth/audit", get(handlers::audit::list))
        .route(
            "/api/auth/admins",
            get(handlers::admins::list).post(handlers::admins::create),
        )
        .route(
            "/api/auth/admins/:id",
            put(handlers::admins::update).delete(handlers::admins::remove),
        )
        .route("/api/auth/admins/:id/password", put(handlers::admins::change_password))
        .route("/api/auth/admins/:id/toggle", put(handlers::admins::toggle_status))
        .route(
            "/api/admin/categories",
            get(handlers::categories::list_admin).post(handlers::categories::create),
        )
        .route(
            "/api/admin/categories/:id",
            put(handlers::categories::update).delete(handlers::categories::remove),
        )
        .route(
            "/api/admin/tags",
            get(handlers::tags::list_admin).post(handlers::tags::create),
        )
        .route(
            "/api/admin/tags/:id",
            put(handlers::tags::update).delete(handlers::tags::remove),
        )
        .route(
            "/api/admin/providers",
            get(handlers::providers::list).post(handlers::providers::create),
        )
        .route(
            "/api/admin/providers/:id",
            put(handlers::providers::update).delete(handlers::providers::remove),
        )
        .route(
            "/api/admin/products",
            get(handlers::products::list_admin).post(handlers::products::create),
        )
        .route(
            "/api/admin/products/:id",
            get(handlers::products::get_admin)
                .put(handlers::products::update)
                .delete(handlers::products::remove),
        )
        .route("/api/admin/products/:id/images", post(handlers::product_images::add))
        .route(
            "/api/admin/products/:id/images/:image_id",
            delete(handlers::product_images::remove),
        )
        .route(
            "/api/admin/products/:id/images/:image_id/set-primary",
            put(handlers::product_images::set_primary),
        )
        .route("/api/admin/site-content/:key", put(handlers::site_content::update))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_admin,
        ));

    Router::new()
        .merge(public)
        .merge(admin)
        .nest_service("/media", ServeDir::new(&config.uploads.media_dir))
        .layer(DefaultBodyLimit::max(config.uploads.max_upload_bytes))
        .layer(middleware::cors::cors_layer(&config.security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
