use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use super::ProductImage;

#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    /// Legacy single-image field, kept mirroring the current primary image.
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Minimal {id, name} reference used when embedding related rows.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct NamedRef {
    pub id: i64,
    pub name: String,
}

/// A product together with its relations and images, as assembled by the
/// repository for responses.
#[derive(Debug, Clone)]
pub struct ProductDetail {
    pub product: Product,
    pub categories: Vec<NamedRef>,
    pub tags: Vec<NamedRef>,
    pub providers: Vec<NamedRef>,
    pub images: Vec<ProductImage>,
}
