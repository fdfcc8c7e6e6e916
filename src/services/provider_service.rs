use serde_json::json;
use sqlx::PgPool;

use crate::database::models::Provider;
use crate::repositories::provider_repository;
use crate::schemas::provider::{ProviderCreate, ProviderUpdate};
use crate::services::audit_service::{self, Actor, AuditAction};
use crate::services::ServiceError;

fn snapshot(provider: &Provider) -> serde_json::Value {
    json!({
        "name": provider.name,
        "contact": provider.contact,
        "phone": provider.phone,
        "description": provider.description,
    })
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Provider>, ServiceError> {
    let mut conn = pool.acquire().await?;
    Ok(provider_repository::list_all(&mut conn).await?)
}

pub async fn create(
    pool: &PgPool,
    actor: &Actor,
    data: ProviderCreate,
) -> Result<Provider, ServiceError> {
    let mut tx = pool.begin().await?;

    let provider = provider_repository::insert(&mut tx, &data).await?;

    audit_service::record(
        &mut tx,
        actor,
        AuditAction::Create,
        Some("provider"),
        Some(provider.id),
        Some(json!({ "name": provider.name })),
    )
    .await?;
    tx.commit().await?;

    Ok(provider)
}

pub async fn update(
    pool: &PgPool,
    actor: &Actor,
    provider_id: i64,
    data: ProviderUpdate,
) -> Result<Provider, ServiceError> {
    let mut tx = pool.begin().await?;

    let provider = provider_repository::find_by_id(&mut tx, provider_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Provider not found".into()))?;

    let old = snapshot(&provider);
    let updated = provider_repository::update(&mut tx, provider_id, &data).await?;

    audit_service::record(
        &mut tx,
        actor,
        AuditAction::Update,
        Some("provider"),
        Some(provider_id),
        Some(json!({ "old_data": old, "new_data": snapshot(&updated) })),
    )
    .await?;
    tx.commit().await?;

    Ok(updated)
}

pub async fn delete(pool: &PgPool, actor: &Actor, provider_id: i64) -> Result<String, ServiceError> {
    let mut tx = pool.begin().await?;

    let provider = provider_repository::find_by_id(&mut tx, provider_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Provider not found".into()))?;

    provider_repository::delete(&mut tx, provider_id).await?;

    audit_service::record(
        &mut tx,
        actor,
        AuditAction::Delete,
        Some("provider"),
        Some(provider_id),
        Some(json!({ "name": provider.name })),
    )
    .await?;
    tx.commit().await?;

    Ok(provider.name)
}
