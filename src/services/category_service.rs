use serde_json::json;
use sqlx::PgPool;

use crate::database::models::Category;
use crate::repositories::category_repository;
use crate::schemas::category::CategoryInput;
use crate::services::audit_service::{self, Actor, AuditAction};
use crate::services::ServiceError;

pub async fn list_all(pool: &PgPool) -> Result<Vec<Category>, ServiceError> {
    let mut conn = pool.acquire().await?;
    Ok(category_repository::list_all(&mut conn).await?)
}

pub async fn create(
    pool: &PgPool,
    actor: &Actor,
    data: CategoryInput,
) -> Result<Category, ServiceError> {
    let mut tx = pool.begin().await?;

    if category_repository::find_by_name(&mut tx, &data.name).await?.is_some() {
        return Err(ServiceError::Conflict(
            "A category with that name already exists".into(),
        ));
    }

    let category = category_repository::insert(&mut tx, &data.name).await?;

    audit_service::record(
        &mut tx,
        actor,
        AuditAction::Create,
        Some("category"),
        Some(category.id),
        Some(json!({ "name": category.name })),
    )
    .await?;
    tx.commit().await?;

    Ok(category)
}

pub async fn update(
    pool: &PgPool,
    actor: &Actor,
    category_id: i64,
    data: CategoryInput,
) -> Result<Category, ServiceError> {
    let mut tx = pool.begin().await?;

    let category = category_repository::find_by_id(&mut tx, category_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Category not found".into()))?;

    // Renaming to the current name is a no-op, not a conflict.
    if let Some(existing) = category_repository::find_by_name(&mut tx, &data.name).await? {
        if existing.id != category_id {
            return Err(ServiceError::Conflict(
                "A category with that name already exists".into(),
            ));
        }
    }

    let old_name = category.name;
    let updated = category_repository::update_name(&mut tx, category_id, &data.name).await?;

    audit_service::record(
        &mut tx,
        actor,
        AuditAction::Update,
        Some("category"),
        Some(category_id),
        Some(json!({ "old_name": old_name, "new_name": updated.name })),
    )
    .await?;
    tx.commit().await?;

    Ok(updated)
}

pub async fn delete(pool: &PgPool, actor: &Actor, category_id: i64) -> Result<String, ServiceError> {
    let mut tx = pool.begin().await?;

    let category = category_repository::find_by_id(&mut tx, category_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Category not found".into()))?;

    category_repository::delete(&mut tx, category_id).await?;

    audit_service::record(
        &mut tx,
        actor,
        AuditAction::Delete,
        Some("category"),
        Some(category_id),
        Some(json!({ "name": category.name })),
    )
    .await?;
    tx.commit().await?;

    Ok(category.name)
}
