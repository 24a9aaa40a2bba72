use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Category;

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CategoryRequest {
    #[serde(default)]
    pub name: Option<String>,
}

impl CategoryRequest {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryList {
    pub category: Vec<Category>,
}
