use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// One cart entry as the storefront posts it. The snapshot carries more
/// fields; only the id and price matter here.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CartLine {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub price: Decimal,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PaymentRequest {
    pub nonce: String,
    #[serde(default)]
    pub cart: Vec<CartLine>,
}

impl PaymentRequest {
    /// Sum of the line prices, or `None` when it does not fit a `Decimal`.
    pub fn total(&self) -> Option<Decimal> {
        self.cart
            .iter()
            .try_fold(Decimal::ZERO, |total, line| total.checked_add(line.price))
    }

    pub fn product_ids(&self) -> Vec<Uuid> {
        self.cart.iter().map(|line| line.id).collect()
    }
}
