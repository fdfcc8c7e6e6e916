use sqlx::PgConnection;

use crate::database::models::Provider;
use crate::schemas::provider::{ProviderCreate, ProviderUpdate};

pub async fn list_all(conn: &mut PgConnection) -> Result<Vec<Provider>, sqlx::Error> {
    sqlx::query_as::<_, Provider>("SELECT * FROM providers ORDER BY name")
        .fetch_all(conn)
        .await
}

pub async fn find_by_id(conn: &mut PgConnection, id: i64) -> Result<Option<Provider>, sqlx::Error> {
    sqlx::query_as::<_, Provider>("SELECT * FROM providers WHERE id = $1")
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn insert(
    conn: &mut PgConnection,
    data: &ProviderCreate,
) -> Result<Provider, sqlx::Error> {
    sqlx::query_as::<_, Provider>(
        "INSERT INTO providers (name, contact, phone, description) \
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(&data.name)
    .bind(&data.contact)
    .bind(&data.phone)
    .bind(&data.description)
    .fetch_one(conn)
    .await
}

/// Allow-listed update. For the optional columns a provided empty string
/// clears the value (stored as NULL), absence leaves it untouched.
pub async fn update(
    conn: &mut PgConnection,
    id: i64,
    data: &ProviderUpdate,
) -> Result<Provider, sqlx::Error> {
    sqlx::query_as::<_, Provider>(
        "UPDATE providers SET \
            name        = COALESCE($2, name), \
            contact     = CASE WHEN $3 THEN NULLIF($4, '') ELSE contact END, \
            phone       = CASE WHEN $5 THEN NULLIF($6, '') ELSE phone END, \
            description = CASE WHEN $7 THEN NULLIF($8, '') ELSE description END, \
            updated_at  = now() \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&data.name)
    .bind(data.contact.is_some())
    .bind(data.contact.as_deref().unwrap_or(""))
    .bind(data.phone.is_some())
    .bind(data.phone.as_deref().unwrap_or(""))
    .bind(data.description.is_some())
    .bind(data.description.as_deref().unwrap_or(""))
    .fetch_one(conn)
    .await
}

pub async fn delete(conn: &mut PgConnection, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM providers WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn ids_existing(conn: &mut PgConnection, ids: &[i64]) -> Result<Vec<i64>, sqlx::Error> {
    let rows: Vec<(i64,)> = sqlx::query_as("SELECT id FROM providers WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(conn)
        .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}
