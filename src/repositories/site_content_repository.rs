use sqlx::PgConnection;

use crate::database::models::SiteContent;
use crate::schemas::site_content::SiteContentUpdate;

pub async fn find_by_key(
    conn: &mut PgConnection,
    key: &str,
) -> Result<Option<SiteContent>, sqlx::Error> {
    sqlx::query_as::<_, SiteContent>("SELECT * FROM site_content WHERE key = $1")
        .bind(key)
        .fetch_optional(conn)
        .await
}

/// Read-or-create: the first read of an unseen key inserts an empty row.
/// ON CONFLICT DO NOTHING keeps this idempotent under concurrent first reads.
pub async fn get_or_create(conn: &mut PgConnection, key: &str) -> Result<SiteContent, sqlx::Error> {
    sqlx::query("INSERT INTO site_content (key) VALUES ($1) ON CONFLICT (key) DO NOTHING")
        .bind(key)
        .execute(&mut *conn)
        .await?;
    sqlx::query_as::<_, SiteContent>("SELECT * FROM site_content WHERE key = $1")
        .bind(key)
        .fetch_one(conn)
        .await
}

/// Allow-listed update; a provided empty string clears the column. Stamps
/// the updating admin.
pub async fn update(
    conn: &mut PgConnection,
    id: i64,
    data: &SiteContentUpdate,
    updated_by: i64,
) -> Result<SiteContent, sqlx::Error> {
    sqlx::query_as::<_, SiteContent>(
        "UPDATE site_content SET \
            title      = CASE WHEN $2 THEN NULLIF($3, '') ELSE title END, \
            content    = CASE WHEN $4 THEN NULLIF($5, '') ELSE content END, \
            updated_at = now(), \
            updated_by = $6 \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(data.title.is_some())
    .bind(data.title.as_deref().unwrap_or(""))
    .bind(data.content.is_some())
    .bind(data.content.as_deref().unwrap_or(""))
    .bind(updated_by)
    .fetch_one(conn)
    .await
}
