use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{categories, products, users};

pub use crate::entity::sea_orm_active_enums::{InvalidStatus, OrderStatus, Role};

/// A user as the API shows it: the password hash and security answer never leave the server.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[schema(value_type = i16)]
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// A product's category, either as a bare id or populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum CategoryRef {
    Populated(Category),
    Id(Uuid),
}

impl CategoryRef {
    pub fn id(&self) -> Uuid {
        match self {
            CategoryRef::Populated(category) => category.id,
            CategoryRef::Id(id) => *id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Decimal,
    pub category: CategoryRef,
    pub quantity: i32,
    pub shipping: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Buyer {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
}

/// An order with its products and buyer populated, as the order pages read it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub products: Vec<Product>,
    #[schema(value_type = Object)]
    pub payment: Value,
    pub buyer: Buyer,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An order with references left as ids.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub products: Vec<Uuid>,
    #[schema(value_type = Object)]
    pub payment: Value,
    pub buyer: Uuid,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderValidationError {
    #[error("An order should have at least 1 product.")]
    NoProducts,
    #[error("Order validation failed: buyer: Path `buyer` is required.")]
    MissingBuyer,
    #[error(transparent)]
    InvalidStatus(#[from] InvalidStatus),
}

/// An order about to be written. Nothing reaches the `orders` table without
/// passing [`NewOrder::validate`].
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub products: Vec<Uuid>,
    pub payment: Value,
    pub buyer: Option<Uuid>,
    pub status: OrderStatus,
}

impl NewOrder {
    pub fn new(products: Vec<Uuid>, payment: Value, buyer: Uuid) -> Self {
        Self {
            products,
            payment,
            buyer: Some(buyer),
            status: OrderStatus::default(),
        }
    }

    /// Returns the buyer once the order is known to be storable.
    pub fn validate(&self) -> Result<Uuid, OrderValidationError> {
        if self.products.is_empty() {
            return Err(OrderValidationError::NoProducts);
        }
        self.buyer.ok_or(OrderValidationError::MissingBuyer)
    }
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            address: model.address,
            role: model.role,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<categories::Model> for Category {
    fn from(model: categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
        }
    }
}

impl Product {
    /// Builds the API view of a product row. The category is populated when
    /// the caller loaded it, otherwise it stays an id.
    pub fn from_entity(model: products::Model, category: Option<categories::Model>) -> Self {
        let category = match category {
            Some(category) => CategoryRef::Populated(category.into()),
            None => CategoryRef::Id(model.category_id),
        };
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            description: model.description,
            price: model.price,
            category,
            quantity: model.quantity,
            shipping: model.shipping,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
