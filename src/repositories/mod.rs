//! Data access per entity.
//!
//! Every function takes an explicit `&mut PgConnection`, so callers decide
//! the transaction scope: services open a transaction, thread it through the
//! repositories and the audit writer, and commit once everything passed.

pub mod admin_repository;
pub mod audit_log_repository;
pub mod category_repository;
pub mod product_image_repository;
pub mod product_repository;
pub mod provider_repository;
pub mod site_content_repository;
pub mod tag_repository;
