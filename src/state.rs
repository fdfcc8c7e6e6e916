use std::sync::Arc;

use sqlx::PgPool;

use crate::config;
use crate::database::{self, DatabaseError};
use crate::storage::{DiskImageStore, ImageStore};

/// Shared application state: the connection pool and the image-store
/// collaborator, threaded through handlers via axum's `State`.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub images: Arc<dyn ImageStore>,
}

impl AppState {
    pub fn new(pool: PgPool, images: Arc<dyn ImageStore>) -> Self {
        Self { pool, images }
    }

    /// Lazy pool plus the disk-backed image store from config.
    pub fn from_env() -> Result<Self, DatabaseError> {
        let pool = database::connect_lazy_from_env()?;
        let uploads = &config::config().uploads;
        let store = DiskImageStore::new(&uploads.media_dir, &uploads.public_base);
        Ok(Self::new(pool, Arc::new(store)))
    }
}
