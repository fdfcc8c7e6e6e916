use std::net::SocketAddr;

use catalog_api::state::AppState;
use catalog_api::{config, database};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, SECRET_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .init();

    let config = config::config();
    tracing::info!("Starting catalog API in {:?} mode", config.environment);

    let state = match AppState::from_env() {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("failed to initialize application state: {e}");
            std::process::exit(1);
        }
    };

    // Schema bootstrap is idempotent; a dead database is fatal at startup.
    if let Err(e) = database::bootstrap(&state.pool).await {
        tracing::error!("database bootstrap failed: {e}");
        std::process::exit(1);
    }

    if let Err(e) = std::fs::create_dir_all(&config.uploads.media_dir) {
        tracing::error!("cannot create media directory {}: {e}", config.uploads.media_dir);
        std::process::exit(1);
    }

    let app = catalog_api::app(state);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(config.server.port);

    let bind_addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {bind_addr}: {e}"));

    tracing::info!("catalog API listening on http://{bind_addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("server");
}
