use sqlx::PgConnection;

use crate::database::models::Admin;

const COLUMNS: &str = "id, email, password_hash, name, is_active, created_at";

pub async fn list_all(conn: &mut PgConnection) -> Result<Vec<Admin>, sqlx::Error> {
    sqlx::query_as::<_, Admin>(&format!(
        "SELECT {COLUMNS} FROM admins ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(conn)
    .await
}

pub async fn find_by_id(conn: &mut PgConnection, id: i64) -> Result<Option<Admin>, sqlx::Error> {
    sqlx::query_as::<_, Admin>(&format!("SELECT {COLUMNS} FROM admins WHERE id = $1"))
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn find_by_email(
    conn: &mut PgConnection,
    email: &str,
) -> Result<Option<Admin>, sqlx::Error> {
    sqlx::query_as::<_, Admin>(&format!("SELECT {COLUMNS} FROM admins WHERE email = $1"))
        .bind(email)
        .fetch_optional(conn)
        .await
}

/// Whether the email belongs to an admin other than `exclude_id`.
pub async fn email_in_use(
    conn: &mut PgConnection,
    email: &str,
    exclude_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM admins WHERE email = $1 AND ($2::bigint IS NULL OR id <> $2)",
    )
    .bind(email)
    .bind(exclude_id)
    .fetch_one(conn)
    .await?;
    Ok(count > 0)
}

pub async fn insert(
    conn: &mut PgConnection,
    email: &str,
    name: &str,
    password_hash: &str,
) -> Result<Admin, sqlx::Error> {
    sqlx::query_as::<_, Admin>(&format!(
        "INSERT INTO admins (email, name, password_hash) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
    ))
    .bind(email)
    .bind(name)
    .bind(password_hash)
    .fetch_one(conn)
    .await
}

/// Allow-listed profile update: only email and name can change here.
pub async fn update_profile(
    conn: &mut PgConnection,
    id: i64,
    email: Option<&str>,
    name: Option<&str>,
) -> Result<Admin, sqlx::Error> {
    sqlx::query_as::<_, Admin>(&format!(
        "UPDATE admins SET email = COALESCE($2, email), name = COALESCE($3, name) \
         WHERE id = $1 RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(email)
    .bind(name)
    .fetch_one(conn)
    .await
}

pub async fn update_password(
    conn: &mut PgConnection,
    id: i64,
    password_hash: &str,
) -> Result<Admin, sqlx::Error> {
    sqlx::query_as::<_, Admin>(&format!(
        "UPDATE admins SET password_hash = $2 WHERE id = $1 RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(password_hash)
    .fetch_one(conn)
    .await
}

pub async fn set_active(
    conn: &mut PgConnection,
    id: i64,
    is_active: bool,
) -> Result<Admin, sqlx::Error> {
    sqlx::query_as::<_, Admin>(&format!(
        "UPDATE admins SET is_active = $2 WHERE id = $1 RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(is_active)
    .fetch_one(conn)
    .await
}

pub async fn delete(conn: &mut PgConnection, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM admins WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}
