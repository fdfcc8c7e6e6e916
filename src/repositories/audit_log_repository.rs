use serde_json::Value;
use sqlx::PgConnection;

use crate::database::models::AuditLog;

/// Append one audit entry. The trail is append-only: there are deliberately
/// no update or delete functions in this module.
#[allow(clippy::too_many_arguments)]
pub async fn insert(
    conn: &mut PgConnection,
    admin_id: i64,
    action: &str,
    entity: Option<&str>,
    entity_id: Option<i64>,
    details: Option<Value>,
    ip_address: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO audit_logs (admin_id, action, entity, entity_id, details, ip_address) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(admin_id)
    .bind(action)
    .bind(entity)
    .bind(entity_id)
    .bind(details)
    .bind(ip_address)
    .execute(conn)
    .await?;
    Ok(())
}

/// Newest-first page, joined with the actor's email where the account still
/// exists.
pub async fn list_page(
    conn: &mut PgConnection,
    limit: i64,
    offset: i64,
) -> Result<Vec<AuditLog>, sqlx::Error> {
    sqlx::query_as::<_, AuditLog>(
        "SELECT l.id, l.admin_id, a.email AS admin_email, l.action, l.entity, l.entity_id, \
                l.details, l.ip_address, l.created_at \
         FROM audit_logs l \
         LEFT JOIN admins a ON a.id = l.admin_id \
         ORDER BY l.created_at DESC, l.id DESC \
         LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(conn)
    .await
}

pub async fn count(conn: &mut PgConnection) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM audit_logs")
        .fetch_one(conn)
        .await?;
    Ok(count)
}
