use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection};

use crate::database::models::{NamedRef, Product, ProductDetail};
use crate::repositories::product_image_repository;
use crate::schemas::product::ProductUpdate;

/// Catalog listing filter: sets are OR-combined internally, AND-combined
/// with each other; `search` is a case-insensitive substring on the name.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category_ids: Option<Vec<i64>>,
    pub tag_ids: Option<Vec<i64>>,
    pub provider_ids: Option<Vec<i64>>,
    pub search: Option<String>,
}

const FILTER_WHERE: &str = "WHERE \
    ($1::bigint[] IS NULL OR p.id IN \
        (SELECT product_id FROM product_categories WHERE category_id = ANY($1))) \
    AND ($2::bigint[] IS NULL OR p.id IN \
        (SELECT product_id FROM product_tags WHERE tag_id = ANY($2))) \
    AND ($3::bigint[] IS NULL OR p.id IN \
        (SELECT product_id FROM product_providers WHERE provider_id = ANY($3))) \
    AND ($4::text IS NULL OR p.name ILIKE '%' || $4 || '%')";

/// Escape LIKE wildcards so a search term matches literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

fn search_param(filter: &ProductFilter) -> Option<String> {
    filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(escape_like)
}

pub async fn count_filtered(
    conn: &mut PgConnection,
    filter: &ProductFilter,
) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) =
        sqlx::query_as(&format!("SELECT COUNT(*) FROM products p {FILTER_WHERE}"))
            .bind(&filter.category_ids)
            .bind(&filter.tag_ids)
            .bind(&filter.provider_ids)
            .bind(search_param(filter))
            .fetch_one(conn)
            .await?;
    Ok(count)
}

pub async fn list_filtered(
    conn: &mut PgConnection,
    filter: &ProductFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(&format!(
        "SELECT p.* FROM products p {FILTER_WHERE} ORDER BY p.name, p.id LIMIT $5 OFFSET $6"
    ))
    .bind(&filter.category_ids)
    .bind(&filter.tag_ids)
    .bind(&filter.provider_ids)
    .bind(search_param(filter))
    .bind(limit)
    .bind(offset)
    .fetch_all(conn)
    .await
}

pub async fn find_by_id(conn: &mut PgConnection, id: i64) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn insert(
    conn: &mut PgConnection,
    name: &str,
    description: Option<&str>,
    price: Decimal,
) -> Result<Product, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        "INSERT INTO products (name, description, price) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(name)
    .bind(description)
    .bind(price)
    .fetch_one(conn)
    .await
}

/// Allow-listed scalar update; relation lists and images are handled
/// separately. An empty provided description clears the column.
pub async fn update_fields(
    conn: &mut PgConnection,
    id: i64,
    data: &ProductUpdate,
) -> Result<Product, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        "UPDATE products SET \
            name        = COALESCE($2, name), \
            description = CASE WHEN $3 THEN NULLIF($4, '') ELSE description END, \
            price       = COALESCE($5, price), \
            updated_at  = now() \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&data.name)
    .bind(data.description.is_some())
    .bind(data.description.as_deref().unwrap_or(""))
    .bind(data.price)
    .fetch_one(conn)
    .await
}

/// Keep the legacy single-image column mirroring the current primary image.
pub async fn set_image_path(
    conn: &mut PgConnection,
    id: i64,
    image_path: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE products SET image_path = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(image_path)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn delete(conn: &mut PgConnection, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

async fn replace_links(
    conn: &mut PgConnection,
    table: &str,
    column: &str,
    product_id: i64,
    ids: &[i64],
) -> Result<(), sqlx::Error> {
    sqlx::query(&format!("DELETE FROM {table} WHERE product_id = $1"))
        .bind(product_id)
        .execute(&mut *conn)
        .await?;
    if !ids.is_empty() {
        sqlx::query(&format!(
            "INSERT INTO {table} (product_id, {column}) SELECT $1, unnest($2::bigint[])"
        ))
        .bind(product_id)
        .bind(ids)
        .execute(conn)
        .await?;
    }
    Ok(())
}

pub async fn replace_categories(
    conn: &mut PgConnection,
    product_id: i64,
    ids: &[i64],
) -> Result<(), sqlx::Error> {
    replace_links(conn, "product_categories", "category_id", product_id, ids).await
}

pub async fn replace_tags(
    conn: &mut PgConnection,
    product_id: i64,
    ids: &[i64],
) -> Result<(), sqlx::Error> {
    replace_links(conn, "product_tags", "tag_id", product_id, ids).await
}

pub async fn replace_providers(
    conn: &mut PgConnection,
    product_id: i64,
    ids: &[i64],
) -> Result<(), sqlx::Error> {
    replace_links(conn, "product_providers", "provider_id", product_id, ids).await
}

#[derive(Debug, FromRow)]
struct LinkedRef {
    product_id: i64,
    id: i64,
    name: String,
}

async fn linked_refs(
    conn: &mut PgConnection,
    query: &str,
    product_ids: &[i64],
) -> Result<HashMap<i64, Vec<NamedRef>>, sqlx::Error> {
    let rows = sqlx::query_as::<_, LinkedRef>(query)
        .bind(product_ids)
        .fetch_all(conn)
        .await?;
    let mut grouped: HashMap<i64, Vec<NamedRef>> = HashMap::new();
    for row in rows {
        grouped
            .entry(row.product_id)
            .or_default()
            .push(NamedRef { id: row.id, name: row.name });
    }
    Ok(grouped)
}

/// Assemble relations and images for a page of products in four batched
/// queries, preserving the incoming order.
pub async fn load_details(
    conn: &mut PgConnection,
    products: Vec<Product>,
) -> Result<Vec<ProductDetail>, sqlx::Error> {
    let ids: Vec<i64> = products.iter().map(|p| p.id).collect();

    let mut categories = linked_refs(
        conn,
        "SELECT pc.product_id, c.id, c.name FROM categories c \
         JOIN product_categories pc ON pc.category_id = c.id \
         WHERE pc.product_id = ANY($1) ORDER BY c.name",
        &ids,
    )
    .await?;
    let mut tags = linked_refs(
        conn,
        "SELECT pt.product_id, t.id, t.name FROM tags t \
         JOIN product_tags pt ON pt.tag_id = t.id \
         WHERE pt.product_id = ANY($1) ORDER BY t.name",
        &ids,
    )
    .await?;
    let mut providers = linked_refs(
        conn,
        "SELECT pp.product_id, v.id, v.name FROM providers v \
         JOIN product_providers pp ON pp.provider_id = v.id \
         WHERE pp.product_id = ANY($1) ORDER BY v.name",
        &ids,
    )
    .await?;
    let mut images = product_image_repository::list_for_products(conn, &ids).await?;

    Ok(products
        .into_iter()
        .map(|product| {
            let id = product.id;
            ProductDetail {
                product,
                categories: categories.remove(&id).unwrap_or_default(),
                tags: tags.remove(&id).unwrap_or_default(),
                providers: providers.remove(&id).unwrap_or_default(),
                images: images.remove(&id).unwrap_or_default(),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(escape_like("50%_off\\now"), "50\\%\\_off\\\\now");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn blank_search_becomes_none() {
        let filter = ProductFilter { search: Some("   ".into()), ..Default::default() };
        assert_eq!(search_param(&filter), None);

        let filter = ProductFilter { search: Some(" tile ".into()), ..Default::default() };
        assert_eq!(search_param(&filter), Some("tile".into()));
    }
}
