//! Payment gateway seam.
//!
//! Controllers only see [`PaymentGateway`]; the process builds one
//! implementation at startup and shares it through the application state.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;

pub mod braintree;

pub use braintree::{BraintreeConfig, BraintreeEnvironment, BraintreeGateway};

/// Token the browser drop-in needs before it can tokenize a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientToken {
    pub client_token: String,
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequest {
    pub amount: Decimal,
    pub payment_method_nonce: String,
}

impl SaleRequest {
    /// A sale that is captured and submitted for settlement in one step.
    pub fn settle(amount: Decimal, nonce: impl Into<String>) -> Self {
        Self {
            amount,
            payment_method_nonce: nonce.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("payment gateway credentials not configured")]
    NotConfigured,

    #[error("payment gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The gateway answered and refused; `details` is its error payload untouched.
    #[error("payment gateway rejected the request: {message}")]
    Rejected { message: String, details: Value },

    #[error("unexpected payment gateway response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Body sent back to the caller when a gateway call fails.
    pub fn to_json(&self) -> Value {
        match self {
            GatewayError::Rejected { message, details } => serde_json::json!({
                "success": false,
                "message": message,
                "errors": details,
            }),
            other => serde_json::json!({
                "success": false,
                "message": other.to_string(),
            }),
        }
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn generate_client_token(&self) -> Result<ClientToken, GatewayError>;

    /// Runs a sale. `Ok` carries the gateway's result object, which is what
    /// gets stored on the order as its payment.
    async fn sale(&self, request: SaleRequest) -> Result<Value, GatewayError>;
}
