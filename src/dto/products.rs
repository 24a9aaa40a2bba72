use std::str::FromStr;

use axum::extract::Multipart;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Category, Product},
};

/// Largest accepted product photo, in bytes.
pub const MAX_PHOTO_BYTES: usize = 1_000_000;

#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub data: Vec<u8>,
    pub content_type: String,
}

impl PhotoUpload {
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn too_large(&self) -> bool {
        self.size() > MAX_PHOTO_BYTES
    }
}

/// The multipart form behind create-product and update-product. Every field
/// arrives as text; [`ProductForm::validate`] turns it into typed values.
#[derive(Debug, Default, Clone, ToSchema)]
pub struct ProductForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<String>,
    pub shipping: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub photo: Option<PhotoUpload>,
}

/// A product form whose fields are all present and well formed.
#[derive(Debug, Clone)]
pub struct ValidProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category_id: Uuid,
    pub quantity: i32,
    pub shipping: bool,
    pub photo: Option<PhotoUpload>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_shipping(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

impl ProductForm {
    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = ProductForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if name == "photo" {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_owned();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                if !data.is_empty() {
                    form.photo = Some(PhotoUpload {
                        data: data.to_vec(),
                        content_type,
                    });
                }
                continue;
            }

            let text = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            let slot = match name.as_str() {
                "name" => &mut form.name,
                "description" => &mut form.description,
                "price" => &mut form.price,
                "category" => &mut form.category,
                "quantity" => &mut form.quantity,
                "shipping" => &mut form.shipping,
                other => {
                    tracing::debug!(field = other, "ignoring unknown product form field");
                    continue;
                }
            };
            *slot = Some(text);
        }

        Ok(form)
    }

    /// Reports the first missing field in form order, then the first
    /// malformed one. Photo rules differ between create and update and are
    /// left to the caller.
    pub fn validate(self) -> AppResult<ValidProduct> {
        let required = [
            (&self.name, "Name is Required"),
            (&self.description, "Description is Required"),
            (&self.price, "Price is Required"),
            (&self.category, "Category is Required"),
            (&self.quantity, "Quantity is Required"),
            (&self.shipping, "Shipping is Required"),
        ];
        if let Some((_, message)) = required.iter().find(|(value, _)| present(value).is_none()) {
            return Err(AppError::Validation((*message).to_string()));
        }

        let field = |value: &Option<String>| present(value).unwrap_or_default().to_owned();

        let price = Decimal::from_str(&field(&self.price))
            .ok()
            .filter(|p| !p.is_sign_negative())
            .ok_or_else(|| AppError::Validation("Price must be a non-negative number".into()))?;
        let category_id = Uuid::parse_str(&field(&self.category))
            .map_err(|_| AppError::Validation("Category must be a valid id".into()))?;
        let quantity = field(&self.quantity)
            .parse::<i32>()
            .ok()
            .filter(|q| *q >= 0)
            .ok_or_else(|| AppError::Validation("Quantity must be a non-negative integer".into()))?;
        let shipping = parse_shipping(&field(&self.shipping))
            .ok_or_else(|| AppError::Validation("Shipping must be true or false".into()))?;

        Ok(ValidProduct {
            name: field(&self.name),
            description: field(&self.description),
            price,
            category_id,
            quantity,
            shipping,
            photo: self.photo,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SavedProduct {
    pub products: Product,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductList {
    #[serde(rename = "countTotal")]
    pub count_total: usize,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SingleProduct {
    pub product: Product,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Products {
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductCount {
    pub total: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryProducts {
    pub category: Category,
    pub products: Vec<Product>,
}

/// `checked` holds category ids; `radio` is a `[min, max]` price range
/// and counts only when it has exactly two entries.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ProductFilters {
    #[serde(default)]
    pub checked: Vec<Uuid>,
    #[serde(default)]
    pub radio: Vec<Decimal>,
}

impl ProductFilters {
    pub fn price_range(&self) -> Option<(Decimal, Decimal)> {
        match self.radio.as_slice() {
            [min, max] => Some((*min, *max)),
            _ => None,
        }
    }
}
