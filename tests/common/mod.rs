//! Shared harness for the integration tests.
//!
//! Each test spawns its own in-process server on a free port so tests stay
//! independent of each other's tokio runtime. Tests that need a database call
//! [`spawn_app`] and skip cleanly (returning `Ok(())`) when `DATABASE_URL`
//! is not set, so the suite passes on machines without Postgres.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use catalog_api::auth::{generate_jwt, Claims};
use catalog_api::config;
use catalog_api::state::AppState;
use catalog_api::storage::DiskImageStore;

pub const PRIMARY_ADMIN_EMAIL: &str = "primary@example.test";
pub const PRIMARY_ADMIN_PASSWORD: &str = "primary-password";

pub struct TestApp {
    pub base_url: String,
    pub pool: PgPool,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Bearer token for an existing, active admin.
    pub fn token_for(&self, admin_id: i64) -> String {
        let security = &config::config().security;
        let claims = Claims::new(admin_id, security.jwt_expiry_hours);
        generate_jwt(&claims, &security.jwt_secret).expect("token generation")
    }

    pub fn primary_token(&self) -> String {
        self.token_for(1)
    }

    /// Create an additional (non-primary) admin through the API and return
    /// its id.
    pub async fn create_admin(&self, email: &str, password: &str) -> Result<i64> {
        let res = self
            .client
            .post(self.url("/api/auth/admins"))
            .bearer_auth(self.primary_token())
            .json(&serde_json::json!({
                "email": email,
                "name": "Test Admin",
                "password": password,
            }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == 201, "admin create failed: {}", res.status());
        let body: serde_json::Value = res.json().await?;
        body["admin"]["id"]
            .as_i64()
            .context("admin id missing from response")
    }
}

/// Unique suffix for names and emails so concurrently running tests never
/// collide on unique columns.
pub fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

/// Make sure the protected primary admin (id 1) exists with a known
/// password. Explicitly inserting id 1 can leave the serial sequence behind,
/// so it is bumped past the current max id.
async fn ensure_primary_admin(pool: &PgPool) -> Result<()> {
    let hash = bcrypt::hash(PRIMARY_ADMIN_PASSWORD, 4)?;
    sqlx::query(
        "INSERT INTO admins (id, email, name, password_hash, is_active) \
         VALUES (1, $1, 'Primary Admin', $2, TRUE) \
         ON CONFLICT (id) DO UPDATE \
         SET email = EXCLUDED.email, password_hash = EXCLUDED.password_hash, is_active = TRUE",
    )
    .bind(PRIMARY_ADMIN_EMAIL)
    .bind(&hash)
    .execute(pool)
    .await?;
    sqlx::query(
        "SELECT setval(pg_get_serial_sequence('admins', 'id'), \
                (SELECT GREATEST(MAX(id), 1) FROM admins))",
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Spawn a fully wired server against the database from `DATABASE_URL`.
/// Returns `None` (tests should pass trivially) when no database is
/// configured.
pub async fn spawn_app() -> Result<Option<TestApp>> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping database-backed test");
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&url)
        .await
        .context("failed to connect to test database")?;

    catalog_api::database::bootstrap(&pool).await?;
    ensure_primary_admin(&pool).await?;

    let media_dir = std::env::temp_dir().join(format!("catalog-api-test-{}", Uuid::new_v4()));
    let store = DiskImageStore::new(&media_dir, "/media");
    let state = AppState::new(pool.clone(), Arc::new(store));
    let app = catalog_api::app(state);

    let port = portpicker::pick_unused_port().context("no free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("test server");
    });

    Ok(Some(TestApp {
        base_url: format!("http://127.0.0.1:{port}"),
        pool,
        client: reqwest::Client::new(),
    }))
}
