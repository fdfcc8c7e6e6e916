use axum::extract::{FromRequest, Multipart, Path, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::Json;
use axum::Extension;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{PageParams, Paginated};
use crate::error::ApiError;
use crate::middleware::auth::CurrentAdmin;
use crate::middleware::client_ip::ClientIp;
use crate::repositories::product_repository::ProductFilter;
use crate::schemas::product::{ProductPayload, ProductResponse};
use crate::schemas::FieldErrors;
use crate::services::audit_service::Actor;
use crate::services::product_service::{self, PRODUCTS_DEFAULT_PER_PAGE};
use crate::state::AppState;
use crate::storage::UploadedImage;

/// Catalog listing query string. Filter keys repeat (`?category_id=1&category_id=2`),
/// which is why this uses `axum_extra`'s Query instead of axum's.
#[derive(Debug, Default, Deserialize)]
pub struct ProductListParams {
    #[serde(default)]
    pub category_id: Vec<i64>,
    #[serde(default)]
    pub tag_id: Vec<i64>,
    #[serde(default)]
    pub provider_id: Vec<i64>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl ProductListParams {
    fn filter(&self) -> ProductFilter {
        fn non_empty(ids: &[i64]) -> Option<Vec<i64>> {
            (!ids.is_empty()).then(|| ids.to_vec())
        }
        ProductFilter {
            category_ids: non_empty(&self.category_id),
            tag_ids: non_empty(&self.tag_id),
            provider_ids: non_empty(&self.provider_id),
            search: self.search.clone(),
        }
    }

    fn page_params(&self) -> PageParams {
        PageParams { page: self.page, per_page: self.per_page }
    }
}

async fn list_shaped(
    state: &AppState,
    params: &ProductListParams,
    shape: fn(&crate::database::models::ProductDetail) -> ProductResponse,
) -> Result<Json<Paginated<ProductResponse>>, ApiError> {
    let page = params.page_params().resolve(PRODUCTS_DEFAULT_PER_PAGE);
    let (details, total) = product_service::list(&state.pool, &params.filter(), &page).await?;
    let items = details.iter().map(shape).collect();
    Ok(Json(Paginated::new(items, total, &page)))
}

/// GET /api/products - public listing, no price/providers
pub async fn list_public(
    State(state): State<AppState>,
    axum_extra::extract::Query(params): axum_extra::extract::Query<ProductListParams>,
) -> Result<Json<Paginated<ProductResponse>>, ApiError> {
    list_shaped(&state, &params, ProductResponse::public).await
}

/// GET /api/admin/products - full shape
pub async fn list_admin(
    State(state): State<AppState>,
    axum_extra::extract::Query(params): axum_extra::extract::Query<ProductListParams>,
) -> Result<Json<Paginated<ProductResponse>>, ApiError> {
    list_shaped(&state, &params, ProductResponse::admin).await
}

/// GET /api/products/:id
pub async fn get_public(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> Result<Json<ProductResponse>, ApiError> {
    let detail = product_service::get(&state.pool, product_id).await?;
    Ok(Json(ProductResponse::public(&detail)))
}

/// GET /api/admin/products/:id
pub async fn get_admin(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> Result<Json<ProductResponse>, ApiError> {
    let detail = product_service::get(&state.pool, product_id).await?;
    Ok(Json(ProductResponse::admin(&detail)))
}

/// POST /api/admin/products - JSON body or multipart form with image files
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    ip: ClientIp,
    request: Request,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let (payload, uploads) = parse_product_request(request).await?;
    let data = payload.validate_create()?;
    let actor = Actor::new(&current, &ip);
    let detail =
        product_service::create(&state.pool, state.images.as_ref(), &actor, data, uploads).await?;
    Ok((StatusCode::CREATED, Json(ProductResponse::admin(&detail))))
}

/// PUT /api/admin/products/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    ip: ClientIp,
    Path(product_id): Path<i64>,
    request: Request,
) -> Result<Json<ProductResponse>, ApiError> {
    let (payload, uploads) = parse_product_request(request).await?;
    let data = payload.validate_update()?;
    let actor = Actor::new(&current, &ip);
    let detail = product_service::update(
        &state.pool,
        state.images.as_ref(),
        &actor,
        product_id,
        data,
        uploads,
    )
    .await?;
    Ok(Json(ProductResponse::admin(&detail)))
}

/// DELETE /api/admin/products/:id
pub async fn remove(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    ip: ClientIp,
    Path(product_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let actor = Actor::new(&current, &ip);
    product_service::delete(&state.pool, state.images.as_ref(), &actor, product_id).await?;
    Ok(Json(json!({ "message": "Product deleted" })))
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}

/// Read a product create/update request in either of its two encodings:
/// a plain JSON body, or a multipart form whose scalar fields mirror the
/// JSON keys (relation id fields repeated per value) plus any number of
/// `images` file parts.
pub(crate) async fn parse_product_request(
    request: Request,
) -> Result<(ProductPayload, Vec<UploadedImage>), ApiError> {
    if !is_multipart(&request) {
        let Json(payload) = Json::<ProductPayload>::from_request(request, &())
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {e}")))?;
        return Ok((payload, Vec::new()));
    }

    let multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {e}")))?;
    parse_multipart(multipart).await
}

async fn parse_multipart(
    mut multipart: Multipart,
) -> Result<(ProductPayload, Vec<UploadedImage>), ApiError> {
    let mut payload = ProductPayload::default();
    let mut uploads = Vec::new();
    let mut errors = FieldErrors::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "images" {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {e}")))?;
            // Empty file inputs submit a part with no filename; skip them.
            if !filename.is_empty() && !bytes.is_empty() {
                uploads.push(UploadedImage { filename, bytes: bytes.to_vec() });
            }
            continue;
        }

        let text = field
            .text()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read field {name}: {e}")))?;

        match name.as_str() {
            "name" => payload.name = Some(text),
            "description" => payload.description = Some(text),
            "price" => match text.trim().parse() {
                Ok(price) => payload.price = Some(price),
                Err(_) => {
                    errors.insert("price".into(), "Price must be a decimal number".into());
                }
            },
            "category_ids" => push_id(&mut payload.category_ids, &name, &text, &mut errors),
            "tag_ids" => push_id(&mut payload.tag_ids, &name, &text, &mut errors),
            "provider_ids" => push_id(&mut payload.provider_ids, &name, &text, &mut errors),
            "primary_index" => match text.trim().parse() {
                Ok(index) => payload.primary_index = Some(index),
                Err(_) => {
                    errors.insert(
                        "primary_index".into(),
                        "Primary index must be a non-negative integer".into(),
                    );
                }
            },
            _ => {}
        }
    }

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    Ok((payload, uploads))
}

fn push_id(target: &mut Option<Vec<i64>>, name: &str, text: &str, errors: &mut FieldErrors) {
    // An empty value still marks the list as provided, so a form can submit
    // an explicit "no relations".
    let list = target.get_or_insert_with(Vec::new);
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    match text.parse() {
        Ok(id) => list.push(id),
        Err(_) => {
            errors.insert(name.into(), format!("{name} values must be integers"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn multipart_request(parts: &[(&str, Option<&str>, &str)]) -> Request {
        let boundary = "test-boundary";
        let mut body = String::new();
        for (name, filename, value) in parts {
            body.push_str(&format!("--{boundary}\r\n"));
            match filename {
                Some(f) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )),
                None => {
                    body.push_str(&format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"))
                }
            }
            body.push_str(value);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{boundary}--\r\n"));

        Request::builder()
            .method("POST")
            .uri("/api/admin/products")
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn parses_json_body_without_uploads() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/admin/products")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"name":"Tile A","price":10.50,"category_ids":[1,2]}"#,
            ))
            .unwrap();

        let (payload, uploads) = parse_product_request(request).await.unwrap();
        assert_eq!(payload.name.as_deref(), Some("Tile A"));
        assert_eq!(payload.category_ids, Some(vec![1, 2]));
        assert!(uploads.is_empty());
    }

    #[tokio::test]
    async fn rejects_malformed_json() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/admin/products")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        assert!(matches!(
            parse_product_request(request).await,
            Err(ApiError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn parses_multipart_fields_and_files() {
        let request = multipart_request(&[
            ("name", None, "Tile A"),
            ("price", None, "10.50"),
            ("category_ids", None, "1"),
            ("category_ids", None, "2"),
            ("primary_index", None, "1"),
            ("images", Some("a.png"), "png-bytes"),
            ("images", Some("b.webp"), "webp-bytes"),
        ]);

        let (payload, uploads) = parse_product_request(request).await.unwrap();
        assert_eq!(payload.name.as_deref(), Some("Tile A"));
        assert_eq!(payload.price.unwrap().to_string(), "10.50");
        assert_eq!(payload.category_ids, Some(vec![1, 2]));
        assert_eq!(payload.primary_index, Some(1));
        assert_eq!(uploads.len(), 2);
        assert_eq!(uploads[0].filename, "a.png");
        assert_eq!(uploads[1].bytes, b"webp-bytes");
    }

    #[tokio::test]
    async fn empty_relation_field_marks_list_provided() {
        let request = multipart_request(&[("name", None, "Tile"), ("tag_ids", None, "")]);
        let (payload, _) = parse_product_request(request).await.unwrap();
        assert_eq!(payload.tag_ids, Some(vec![]));
        assert!(payload.category_ids.is_none());
    }

    #[tokio::test]
    async fn bad_numeric_fields_become_field_errors() {
        let request = multipart_request(&[
            ("price", None, "ten dollars"),
            ("category_ids", None, "abc"),
        ]);
        match parse_product_request(request).await {
            Err(ApiError::Validation(errors)) => {
                assert!(errors.contains_key("price"));
                assert!(errors.contains_key("category_ids"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn skips_empty_file_parts() {
        let request = multipart_request(&[("name", None, "Tile"), ("images", Some(""), "")]);
        let (_, uploads) = parse_product_request(request).await.unwrap();
        assert!(uploads.is_empty());
    }
}
