use serde_json::json;
use sqlx::{PgConnection, PgPool};

use crate::api::Page;
use crate::config;
use crate::database::models::{ProductDetail, ProductImage};
use crate::repositories::product_repository::ProductFilter;
use crate::repositories::{
    category_repository, product_image_repository, product_repository, provider_repository,
    tag_repository,
};
use crate::schemas::product::{ProductCreate, ProductUpdate};
use crate::services::audit_service::{self, Actor, AuditAction};
use crate::services::ServiceError;
use crate::storage::{is_allowed_image, ImageStore, UploadedImage};

pub const PRODUCTS_DEFAULT_PER_PAGE: i64 = 15;

pub async fn list(
    pool: &PgPool,
    filter: &ProductFilter,
    page: &Page,
) -> Result<(Vec<ProductDetail>, i64), ServiceError> {
    let mut conn = pool.acquire().await?;
    let total = product_repository::count_filtered(&mut conn, filter).await?;
    let products =
        product_repository::list_filtered(&mut conn, filter, page.limit(), page.offset()).await?;
    let details = product_repository::load_details(&mut conn, products).await?;
    Ok((details, total))
}

pub async fn get(pool: &PgPool, product_id: i64) -> Result<ProductDetail, ServiceError> {
    let mut conn = pool.acquire().await?;
    detail_on(&mut conn, product_id).await
}

async fn detail_on(
    conn: &mut PgConnection,
    product_id: i64,
) -> Result<ProductDetail, ServiceError> {
    let product = product_repository::find_by_id(conn, product_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Product not found".into()))?;
    let mut details = product_repository::load_details(conn, vec![product]).await?;
    details
        .pop()
        .ok_or_else(|| ServiceError::NotFound("Product not found".into()))
}

/// Verify that every referenced relation id exists, naming the first
/// missing one. Runs before any row is written.
async fn resolve_relations(
    conn: &mut PgConnection,
    category_ids: Option<&[i64]>,
    tag_ids: Option<&[i64]>,
    provider_ids: Option<&[i64]>,
) -> Result<(), ServiceError> {
    if let Some(ids) = category_ids {
        let existing = category_repository::ids_existing(conn, ids).await?;
        if let Some(missing) = first_missing(ids, &existing) {
            return Err(ServiceError::NotFound(format!("Category with id {missing} not found")));
        }
    }
    if let Some(ids) = tag_ids {
        let existing = tag_repository::ids_existing(conn, ids).await?;
        if let Some(missing) = first_missing(ids, &existing) {
            return Err(ServiceError::NotFound(format!("Tag with id {missing} not found")));
        }
    }
    if let Some(ids) = provider_ids {
        let existing = provider_repository::ids_existing(conn, ids).await?;
        if let Some(missing) = first_missing(ids, &existing) {
            return Err(ServiceError::NotFound(format!("Provider with id {missing} not found")));
        }
    }
    Ok(())
}

fn first_missing(requested: &[i64], existing: &[i64]) -> Option<i64> {
    requested.iter().find(|id| !existing.contains(id)).copied()
}

/// Which of `valid_count` fresh uploads becomes primary. `None` when nothing
/// was uploaded or the product keeps its current primary; an out-of-range
/// request falls back to the first image so the single-primary invariant
/// cannot be skipped.
fn effective_primary_index(valid_count: usize, requested: Option<usize>) -> Option<usize> {
    if valid_count == 0 {
        return None;
    }
    let requested = requested.unwrap_or(0);
    Some(if requested < valid_count { requested } else { 0 })
}

/// The image promoted to primary after `removed_id` is deleted: the first
/// remaining one in display order.
fn promote_candidate(images: &[ProductImage], removed_id: i64) -> Option<i64> {
    images.iter().find(|img| img.id != removed_id).map(|img| img.id)
}

fn split_valid_uploads(uploads: Vec<UploadedImage>) -> (Vec<UploadedImage>, Vec<String>) {
    let allowed = &config::config().uploads.allowed_extensions;
    let mut valid = Vec::new();
    let mut skipped = Vec::new();
    for upload in uploads {
        if is_allowed_image(&upload.filename, allowed) {
            valid.push(upload);
        } else {
            skipped.push(upload.filename);
        }
    }
    (valid, skipped)
}

/// Persist uploads through the image store and record them, starting at
/// `start_order`. When `assign_primary` is set the chosen image becomes
/// primary and the legacy mirror column follows it.
async fn store_images(
    conn: &mut PgConnection,
    store: &dyn ImageStore,
    product_id: i64,
    uploads: Vec<UploadedImage>,
    requested_primary: Option<usize>,
    start_order: i32,
    assign_primary: bool,
) -> Result<Vec<ProductImage>, ServiceError> {
    let (valid, skipped) = split_valid_uploads(uploads);
    for name in &skipped {
        tracing::warn!("skipping upload with unsupported extension: {name}");
    }

    let primary_index = if assign_primary {
        effective_primary_index(valid.len(), requested_primary)
    } else {
        None
    };

    let mut saved = Vec::with_capacity(valid.len());
    for (i, upload) in valid.into_iter().enumerate() {
        let reference = store.save(&upload.filename, &upload.bytes).await?;
        let image = product_image_repository::insert(
            &mut *conn,
            product_id,
            &reference,
            primary_index == Some(i),
            start_order + i as i32,
        )
        .await?;
        saved.push(image);
    }

    if let Some(index) = primary_index {
        product_repository::set_image_path(conn, product_id, Some(&saved[index].image_path))
            .await?;
    }

    Ok(saved)
}

pub async fn create(
    pool: &PgPool,
    store: &dyn ImageStore,
    actor: &Actor,
    data: ProductCreate,
    uploads: Vec<UploadedImage>,
) -> Result<ProductDetail, ServiceError> {
    let mut tx = pool.begin().await?;

    resolve_relations(
        &mut tx,
        Some(&data.category_ids),
        Some(&data.tag_ids),
        Some(&data.provider_ids),
    )
    .await?;

    let product =
        product_repository::insert(&mut tx, &data.name, data.description.as_deref(), data.price)
            .await?;
    product_repository::replace_categories(&mut tx, product.id, &data.category_ids).await?;
    product_repository::replace_tags(&mut tx, product.id, &data.tag_ids).await?;
    product_repository::replace_providers(&mut tx, product.id, &data.provider_ids).await?;

    store_images(&mut tx, store, product.id, uploads, data.primary_index, 0, true).await?;

    audit_service::record(
        &mut tx,
        actor,
        AuditAction::Create,
        Some("product"),
        Some(product.id),
        Some(json!({ "name": product.name })),
    )
    .await?;

    let detail = detail_on(&mut tx, product.id).await?;
    tx.commit().await?;

    Ok(detail)
}

pub async fn update(
    pool: &PgPool,
    store: &dyn ImageStore,
    actor: &Actor,
    product_id: i64,
    data: ProductUpdate,
    uploads: Vec<UploadedImage>,
) -> Result<ProductDetail, ServiceError> {
    let mut tx = pool.begin().await?;

    let product = product_repository::find_by_id(&mut tx, product_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Product not found".into()))?;
    let old_image = product.image_path.clone();

    resolve_relations(
        &mut tx,
        data.category_ids.as_deref(),
        data.tag_ids.as_deref(),
        data.provider_ids.as_deref(),
    )
    .await?;

    let updated = product_repository::update_fields(&mut tx, product_id, &data).await?;

    // Relation lists are replaced only when the request included them.
    if let Some(ids) = &data.category_ids {
        product_repository::replace_categories(&mut tx, product_id, ids).await?;
    }
    if let Some(ids) = &data.tag_ids {
        product_repository::replace_tags(&mut tx, product_id, ids).await?;
    }
    if let Some(ids) = &data.provider_ids {
        product_repository::replace_providers(&mut tx, product_id, ids).await?;
    }

    // New uploads are appended; they only take over primary when the product
    // had no images at all.
    let existing = product_image_repository::list_for_product(&mut tx, product_id).await?;
    let start_order = product_image_repository::max_display_order(&mut tx, product_id)
        .await?
        .map_or(0, |max| max + 1);
    store_images(
        &mut tx,
        store,
        product_id,
        uploads,
        data.primary_index,
        start_order,
        existing.is_empty(),
    )
    .await?;

    let detail = detail_on(&mut tx, product_id).await?;
    audit_service::record(
        &mut tx,
        actor,
        AuditAction::Update,
        Some("product"),
        Some(product_id),
        Some(json!({
            "name": updated.name,
            "image_changed": old_image != detail.product.image_path,
        })),
    )
    .await?;
    tx.commit().await?;

    Ok(detail)
}

/// Delete the product row (images cascade) and then request external file
/// deletion; storage failures are logged, never surfaced.
pub async fn delete(
    pool: &PgPool,
    store: &dyn ImageStore,
    actor: &Actor,
    product_id: i64,
) -> Result<String, ServiceError> {
    let mut tx = pool.begin().await?;

    let product = product_repository::find_by_id(&mut tx, product_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Product not found".into()))?;
    let images = product_image_repository::list_for_product(&mut tx, product_id).await?;

    product_repository::delete(&mut tx, product_id).await?;

    audit_service::record(
        &mut tx,
        actor,
        AuditAction::Delete,
        Some("product"),
        Some(product_id),
        Some(json!({ "name": product.name })),
    )
    .await?;
    tx.commit().await?;

    let mut references: Vec<String> = images.into_iter().map(|img| img.image_path).collect();
    if let Some(legacy) = product.image_path {
        if !references.contains(&legacy) {
            references.push(legacy);
        }
    }
    for reference in references {
        if let Err(e) = store.delete(&reference).await {
            tracing::warn!("failed to delete stored image {reference}: {e}");
        }
    }

    Ok(product.name)
}

pub async fn add_images(
    pool: &PgPool,
    store: &dyn ImageStore,
    actor: &Actor,
    product_id: i64,
    uploads: Vec<UploadedImage>,
    requested_primary: Option<usize>,
) -> Result<ProductDetail, ServiceError> {
    if uploads.is_empty() {
        return Err(ServiceError::Invalid("At least one image file is required".into()));
    }

    let mut tx = pool.begin().await?;

    product_repository::find_by_id(&mut tx, product_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Product not found".into()))?;

    let existing = product_image_repository::list_for_product(&mut tx, product_id).await?;
    let start_order = product_image_repository::max_display_order(&mut tx, product_id)
        .await?
        .map_or(0, |max| max + 1);

    let saved = store_images(
        &mut tx,
        store,
        product_id,
        uploads,
        requested_primary,
        start_order,
        existing.is_empty(),
    )
    .await?;
    if saved.is_empty() {
        return Err(ServiceError::Invalid("No valid image files were provided".into()));
    }

    audit_service::record(
        &mut tx,
        actor,
        AuditAction::AddImages,
        Some("product"),
        Some(product_id),
        Some(json!({ "images_added": saved.len() })),
    )
    .await?;

    let detail = detail_on(&mut tx, product_id).await?;
    tx.commit().await?;

    Ok(detail)
}

/// Delete one image. The sole remaining image of a product cannot be
/// removed; deleting the primary promotes the next image in display order
/// and refreshes the legacy mirror.
pub async fn delete_image(
    pool: &PgPool,
    store: &dyn ImageStore,
    actor: &Actor,
    product_id: i64,
    image_id: i64,
) -> Result<ProductDetail, ServiceError> {
    let mut tx = pool.begin().await?;

    product_repository::find_by_id(&mut tx, product_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Product not found".into()))?;

    let images = product_image_repository::list_for_product(&mut tx, product_id).await?;
    let target = images
        .iter()
        .find(|img| img.id == image_id)
        .cloned()
        .ok_or_else(|| ServiceError::NotFound("Image not found".into()))?;

    if images.len() == 1 {
        return Err(ServiceError::Invalid(
            "The only image of a product cannot be deleted".into(),
        ));
    }

    product_image_repository::delete(&mut tx, image_id).await?;

    if target.is_primary {
        if let Some(next_id) = promote_candidate(&images, image_id) {
            product_image_repository::set_primary_flag(&mut tx, next_id, true).await?;
            let next = images
                .iter()
                .find(|img| img.id == next_id)
                .ok_or_else(|| ServiceError::NotFound("Image not found".into()))?;
            product_repository::set_image_path(&mut tx, product_id, Some(&next.image_path))
                .await?;
        }
    }

    audit_service::record(
        &mut tx,
        actor,
        AuditAction::DeleteImage,
        Some("product"),
        Some(product_id),
        Some(json!({ "image_id": image_id, "image_url": target.image_path })),
    )
    .await?;

    let detail = detail_on(&mut tx, product_id).await?;
    tx.commit().await?;

    if let Err(e) = store.delete(&target.image_path).await {
        tracing::warn!("failed to delete stored image {}: {e}", target.image_path);
    }

    Ok(detail)
}

/// Make one image the primary: demote every image of the product first,
/// then promote the target and update the legacy mirror.
pub async fn set_primary_image(
    pool: &PgPool,
    actor: &Actor,
    product_id: i64,
    image_id: i64,
) -> Result<ProductDetail, ServiceError> {
    let mut tx = pool.begin().await?;

    product_repository::find_by_id(&mut tx, product_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Product not found".into()))?;

    let target = product_image_repository::find_for_product(&mut tx, product_id, image_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Image not found".into()))?;

    product_image_repository::demote_all(&mut tx, product_id).await?;
    product_image_repository::set_primary_flag(&mut tx, image_id, true).await?;
    product_repository::set_image_path(&mut tx, product_id, Some(&target.image_path)).await?;

    audit_service::record(
        &mut tx,
        actor,
        AuditAction::SetPrimaryImage,
        Some("product"),
        Some(product_id),
        Some(json!({ "image_id": image_id, "image_url": target.image_path })),
    )
    .await?;

    let detail = detail_on(&mut tx, product_id).await?;
    tx.commit().await?;

    Ok(detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn image(id: i64, display_order: i32, is_primary: bool) -> ProductImage {
        ProductImage {
            id,
            product_id: 1,
            image_path: format!("/media/{id}.webp"),
            is_primary,
            display_order,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn primary_defaults_to_first_upload() {
        assert_eq!(effective_primary_index(3, None), Some(0));
        assert_eq!(effective_primary_index(3, Some(2)), Some(2));
    }

    #[test]
    fn out_of_range_primary_falls_back_to_first() {
        assert_eq!(effective_primary_index(2, Some(5)), Some(0));
    }

    #[test]
    fn no_uploads_means_no_primary() {
        assert_eq!(effective_primary_index(0, None), None);
        assert_eq!(effective_primary_index(0, Some(1)), None);
    }

    #[test]
    fn promotion_picks_next_by_display_order() {
        let images = vec![image(10, 0, true), image(11, 1, false), image(12, 2, false)];
        assert_eq!(promote_candidate(&images, 10), Some(11));
    }

    #[test]
    fn promotion_skips_only_the_removed_image() {
        let images = vec![image(10, 0, false), image(11, 1, true), image(12, 2, false)];
        assert_eq!(promote_candidate(&images, 11), Some(10));
    }

    #[test]
    fn promotion_with_no_remaining_images() {
        let images = vec![image(10, 0, true)];
        assert_eq!(promote_candidate(&images, 10), None);
    }

    #[test]
    fn missing_relation_ids_are_reported_first() {
        assert_eq!(first_missing(&[1, 2, 3], &[1, 3]), Some(2));
        assert_eq!(first_missing(&[1, 2], &[2, 1]), None);
        assert_eq!(first_missing(&[], &[]), None);
    }
}
