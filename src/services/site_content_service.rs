use serde_json::json;
use sqlx::PgPool;

use crate::database::models::SiteContent;
use crate::repositories::site_content_repository;
use crate::schemas::site_content::SiteContentUpdate;
use crate::services::audit_service::{self, Actor, AuditAction};
use crate::services::ServiceError;

/// Read-or-create: the first read of an unseen key stores an empty record,
/// later reads return it unchanged.
pub async fn get_or_create(pool: &PgPool, key: &str) -> Result<SiteContent, ServiceError> {
    let mut tx = pool.begin().await?;
    let content = site_content_repository::get_or_create(&mut tx, key).await?;
    tx.commit().await?;
    Ok(content)
}

pub async fn update(
    pool: &PgPool,
    actor: &Actor,
    key: &str,
    data: SiteContentUpdate,
) -> Result<SiteContent, ServiceError> {
    let mut tx = pool.begin().await?;

    let content = site_content_repository::get_or_create(&mut tx, key).await?;
    let old = json!({ "title": content.title, "content": content.content });

    let updated =
        site_content_repository::update(&mut tx, content.id, &data, actor.admin_id).await?;

    audit_service::record(
        &mut tx,
        actor,
        AuditAction::Update,
        Some("site_content"),
        Some(updated.id),
        Some(json!({
            "key": key,
            "old": old,
            "new": { "title": updated.title, "content": updated.content },
        })),
    )
    .await?;
    tx.commit().await?;

    Ok(updated)
}
