//! Business rules per entity.
//!
//! Services own the transaction scope: each mutating operation opens one
//! transaction, runs its checks and repository calls inside it, writes the
//! audit entry on the same transaction and only then commits. A failing
//! audit write therefore rolls back the whole operation.

pub mod admin_service;
pub mod audit_service;
pub mod category_service;
pub mod product_service;
pub mod provider_service;
pub mod site_content_service;
pub mod tag_service;

use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),

    /// Domain-rule violation reported as 400 (self-action, last image, ...).
    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}
