use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Keyed editable content block, lazily created on first read.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SiteContent {
    pub id: i64,
    pub key: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<i64>,
}
