use std::collections::HashMap;

use sqlx::PgConnection;

use crate::database::models::ProductImage;

pub async fn list_for_product(
    conn: &mut PgConnection,
    product_id: i64,
) -> Result<Vec<ProductImage>, sqlx::Error> {
    sqlx::query_as::<_, ProductImage>(
        "SELECT * FROM product_images WHERE product_id = $1 ORDER BY display_order, id",
    )
    .bind(product_id)
    .fetch_all(conn)
    .await
}

/// Images for a page of products, grouped by product id.
pub async fn list_for_products(
    conn: &mut PgConnection,
    product_ids: &[i64],
) -> Result<HashMap<i64, Vec<ProductImage>>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ProductImage>(
        "SELECT * FROM product_images WHERE product_id = ANY($1) \
         ORDER BY product_id, display_order, id",
    )
    .bind(product_ids)
    .fetch_all(conn)
    .await?;

    let mut grouped: HashMap<i64, Vec<ProductImage>> = HashMap::new();
    for row in rows {
        grouped.entry(row.product_id).or_default().push(row);
    }
    Ok(grouped)
}

pub async fn find_for_product(
    conn: &mut PgConnection,
    product_id: i64,
    image_id: i64,
) -> Result<Option<ProductImage>, sqlx::Error> {
    sqlx::query_as::<_, ProductImage>(
        "SELECT * FROM product_images WHERE product_id = $1 AND id = $2",
    )
    .bind(product_id)
    .bind(image_id)
    .fetch_optional(conn)
    .await
}

pub async fn insert(
    conn: &mut PgConnection,
    product_id: i64,
    image_path: &str,
    is_primary: bool,
    display_order: i32,
) -> Result<ProductImage, sqlx::Error> {
    sqlx::query_as::<_, ProductImage>(
        "INSERT INTO product_images (product_id, image_path, is_primary, display_order) \
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(product_id)
    .bind(image_path)
    .bind(is_primary)
    .bind(display_order)
    .fetch_one(conn)
    .await
}

pub async fn delete(conn: &mut PgConnection, image_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM product_images WHERE id = $1")
        .bind(image_id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Clear the primary flag on every image of the product.
pub async fn demote_all(conn: &mut PgConnection, product_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE product_images SET is_primary = FALSE WHERE product_id = $1")
        .bind(product_id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn set_primary_flag(
    conn: &mut PgConnection,
    image_id: i64,
    is_primary: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE product_images SET is_primary = $2 WHERE id = $1")
        .bind(image_id)
        .bind(is_primary)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn max_display_order(
    conn: &mut PgConnection,
    product_id: i64,
) -> Result<Option<i32>, sqlx::Error> {
    let (max,): (Option<i32>,) =
        sqlx::query_as("SELECT MAX(display_order) FROM product_images WHERE product_id = $1")
            .bind(product_id)
            .fetch_one(conn)
            .await?;
    Ok(max)
}
