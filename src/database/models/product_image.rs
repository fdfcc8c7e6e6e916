use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A single stored image of a product. Exactly one row per product carries
/// `is_primary = true` whenever the product has any images; `display_order`
/// is zero-based and stable (not renumbered on deletes).
#[derive(Debug, Clone, FromRow)]
pub struct ProductImage {
    pub id: i64,
    pub product_id: i64,
    pub image_path: String,
    pub is_primary: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}
