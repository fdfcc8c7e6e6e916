use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{trimmed, FieldErrors};
use crate::database::models::{NamedRef, ProductDetail, ProductImage};

const MAX_NAME_LEN: usize = 200;

/// Product fields as received from either a JSON body or a multipart form.
/// Relation lists are `Option` so updates can distinguish "replace with this
/// set" from "leave unchanged".
#[derive(Debug, Default, Deserialize)]
pub struct ProductPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category_ids: Option<Vec<i64>>,
    pub tag_ids: Option<Vec<i64>>,
    pub provider_ids: Option<Vec<i64>>,
    pub primary_index: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category_ids: Vec<i64>,
    pub tag_ids: Vec<i64>,
    pub provider_ids: Vec<i64>,
    pub primary_index: Option<usize>,
}

/// Allow-listed product update; `None` leaves a field untouched. A provided
/// empty description clears it.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category_ids: Option<Vec<i64>>,
    pub tag_ids: Option<Vec<i64>>,
    pub provider_ids: Option<Vec<i64>>,
    pub primary_index: Option<usize>,
}

fn check_price(price: Decimal, errors: &mut FieldErrors) -> Option<Decimal> {
    if price.is_sign_negative() {
        errors.insert("price".into(), "Price cannot be negative".into());
        None
    } else {
        Some(price)
    }
}

impl ProductPayload {
    pub fn validate_create(self) -> Result<ProductCreate, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = match trimmed(&self.name) {
            None => {
                errors.insert("name".into(), "Name is required".into());
                None
            }
            Some(n) if n.chars().count() > MAX_NAME_LEN => {
                errors.insert(
                    "name".into(),
                    format!("Name cannot exceed {MAX_NAME_LEN} characters"),
                );
                None
            }
            Some(n) => Some(n.to_string()),
        };

        let price = match self.price {
            None => {
                errors.insert("price".into(), "Price is required".into());
                None
            }
            Some(p) => check_price(p, &mut errors),
        };

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(ProductCreate {
            name: name.unwrap(),
            description: trimmed(&self.description).map(str::to_string),
            price: price.unwrap(),
            category_ids: self.category_ids.unwrap_or_default(),
            tag_ids: self.tag_ids.unwrap_or_default(),
            provider_ids: self.provider_ids.unwrap_or_default(),
            primary_index: self.primary_index,
        })
    }

    pub fn validate_update(self) -> Result<ProductUpdate, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut update = ProductUpdate::default();

        if self.name.is_some() {
            match trimmed(&self.name) {
                None => {
                    errors.insert("name".into(), "Name cannot be empty".into());
                }
                Some(n) if n.chars().count() > MAX_NAME_LEN => {
                    errors.insert(
                        "name".into(),
                        format!("Name cannot exceed {MAX_NAME_LEN} characters"),
                    );
                }
                Some(n) => update.name = Some(n.to_string()),
            }
        }

        if let Some(description) = &self.description {
            update.description = Some(description.trim().to_string());
        }

        if let Some(price) = self.price {
            update.price = check_price(price, &mut errors);
        }

        update.category_ids = self.category_ids;
        update.tag_ids = self.tag_ids;
        update.provider_ids = self.provider_ids;
        update.primary_index = self.primary_index;

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(update)
    }
}

#[derive(Debug, Serialize)]
pub struct ProductImageResponse {
    pub id: i64,
    pub image_url: String,
    pub is_primary: bool,
    pub display_order: i32,
}

impl From<&ProductImage> for ProductImageResponse {
    fn from(image: &ProductImage) -> Self {
        Self {
            id: image.id,
            image_url: image.image_path.clone(),
            is_primary: image.is_primary,
            display_order: image.display_order,
        }
    }
}

/// Product response in its two shapes: the public one omits `price` and
/// `providers` entirely, the admin one always carries both.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub categories: Vec<NamedRef>,
    pub tags: Vec<NamedRef>,
    pub images: Vec<ProductImageResponse>,
    /// Primary image, kept for clients that predate multi-image support.
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub providers: Option<Vec<NamedRef>>,
}

impl ProductResponse {
    fn base(detail: &ProductDetail) -> Self {
        Self {
            id: detail.product.id,
            name: detail.product.name.clone(),
            description: detail.product.description.clone(),
            categories: detail.categories.clone(),
            tags: detail.tags.clone(),
            images: detail.images.iter().map(ProductImageResponse::from).collect(),
            image_url: detail.product.image_path.clone(),
            price: None,
            providers: None,
        }
    }

    pub fn public(detail: &ProductDetail) -> Self {
        Self::base(detail)
    }

    pub fn admin(detail: &ProductDetail) -> Self {
        Self {
            price: Some(detail.product.price),
            providers: Some(detail.providers.clone()),
            ..Self::base(detail)
        }
    }
}
