use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Admin account row. Deliberately not `Serialize`: the password hash must
/// never reach a response body, so the API serializes `AdminResponse` instead.
#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
