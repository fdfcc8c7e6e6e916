pub mod models;
pub mod schema;

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;

use crate::config;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

fn pool_options() -> PgPoolOptions {
    let db = &config::config().database;
    PgPoolOptions::new()
        .max_connections(db.max_connections)
        .acquire_timeout(Duration::from_secs(db.connect_timeout_secs))
}

/// Build a pool from DATABASE_URL without touching the network. Connections
/// are established on first use, so the router can be constructed (and unit
/// tested) without a live database.
pub fn connect_lazy_from_env() -> Result<PgPool, DatabaseError> {
    let url = std::env::var("DATABASE_URL")
        .map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;
    Ok(pool_options().connect_lazy(&url)?)
}

/// Eager variant for the CLI, where an unreachable database should fail fast.
pub async fn connect_from_env() -> Result<PgPool, DatabaseError> {
    let url = std::env::var("DATABASE_URL")
        .map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;
    Ok(pool_options().connect(&url).await?)
}

/// Run the idempotent DDL bootstrap.
pub async fn bootstrap(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in schema::STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::info!("database schema bootstrapped");
    Ok(())
}

/// Pings the database to ensure connectivity.
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
