use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Stored as a small integer; `0` is a customer and `1` an administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "i16", db_type = "SmallInteger")]
#[serde(into = "i16", try_from = "i16")]
pub enum Role {
    #[default]
    #[sea_orm(num_value = 0)]
    Customer,
    #[sea_orm(num_value = 1)]
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("role must be 0 or 1, got {0}")]
pub struct InvalidRole(pub i16);

impl From<Role> for i16 {
    fn from(role: Role) -> Self {
        match role {
            Role::Customer => 0,
            Role::Admin => 1,
        }
    }
}

impl TryFrom<i16> for Role {
    type Error = InvalidRole;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Role::Customer),
            1 => Ok(Role::Admin),
            other => Err(InvalidRole(other)),
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum OrderStatus {
    #[default]
    #[sea_orm(string_value = "Not Processed")]
    #[serde(rename = "Not Processed")]
    NotProcessed,
    #[sea_orm(string_value = "Processing")]
    Processing,
    #[sea_orm(string_value = "Shipped")]
    Shipped,
    #[sea_orm(string_value = "Delivered")]
    Delivered,
    #[sea_orm(string_value = "Cancelled")]
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::NotProcessed,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::NotProcessed => "Not Processed",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Order validation failed: status: `{0}` is not a valid enum value for path `status`.")]
pub struct InvalidStatus(pub String);

impl FromStr for OrderStatus {
    type Err = InvalidStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| InvalidStatus(value.to_string()))
    }
}
