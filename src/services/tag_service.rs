use serde_json::json;
use sqlx::PgPool;

use crate::database::models::Tag;
use crate::repositories::tag_repository;
use crate::schemas::tag::TagInput;
use crate::services::audit_service::{self, Actor, AuditAction};
use crate::services::ServiceError;

pub async fn list_all(pool: &PgPool) -> Result<Vec<Tag>, ServiceError> {
    let mut conn = pool.acquire().await?;
    Ok(tag_repository::list_all(&mut conn).await?)
}

pub async fn create(pool: &PgPool, actor: &Actor, data: TagInput) -> Result<Tag, ServiceError> {
    let mut tx = pool.begin().await?;

    if tag_repository::find_by_name(&mut tx, &data.name).await?.is_some() {
        return Err(ServiceError::Conflict("A tag with that name already exists".into()));
    }

    let tag = tag_repository::insert(&mut tx, &data.name).await?;

    audit_service::record(
        &mut tx,
        actor,
        AuditAction::Create,
        Some("tag"),
        Some(tag.id),
        Some(json!({ "name": tag.name })),
    )
    .await?;
    tx.commit().await?;

    Ok(tag)
}

pub async fn update(
    pool: &PgPool,
    actor: &Actor,
    tag_id: i64,
    data: TagInput,
) -> Result<Tag, ServiceError> {
    let mut tx = pool.begin().await?;

    let tag = tag_repository::find_by_id(&mut tx, tag_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Tag not found".into()))?;

    if let Some(existing) = tag_repository::find_by_name(&mut tx, &data.name).await? {
        if existing.id != tag_id {
            return Err(ServiceError::Conflict("A tag with that name already exists".into()));
        }
    }

    let old_name = tag.name;
    let updated = tag_repository::update_name(&mut tx, tag_id, &data.name).await?;

    audit_service::record(
        &mut tx,
        actor,
        AuditAction::Update,
        Some("tag"),
        Some(tag_id),
        Some(json!({ "old_name": old_name, "new_name": updated.name })),
    )
    .await?;
    tx.commit().await?;

    Ok(updated)
}

pub async fn delete(pool: &PgPool, actor: &Actor, tag_id: i64) -> Result<String, ServiceError> {
    let mut tx = pool.begin().await?;

    let tag = tag_repository::find_by_id(&mut tx, tag_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Tag not found".into()))?;

    tag_repository::delete(&mut tx, tag_id).await?;

    audit_service::record(
        &mut tx,
        actor,
        AuditAction::Delete,
        Some("tag"),
        Some(tag_id),
        Some(json!({ "name": tag.name })),
    )
    .await?;
    tx.commit().await?;

    Ok(tag.name)
}
