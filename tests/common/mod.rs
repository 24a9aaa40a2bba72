#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, prelude::DateTimeWithTimeZone};
use serde_json::{Value, json};
use shopfront_api::{
    entity::{categories, orders, products, users},
    gateway::{ClientToken, GatewayError, PaymentGateway, SaleRequest},
    models::{OrderStatus, Role},
    state::AppState,
};
use uuid::Uuid;

pub const SECRET: &str = "test-secret";

/// Records every sale it is asked for and answers from a fixed script.
#[derive(Default)]
pub struct FakeGateway {
    pub sales: Mutex<Vec<SaleRequest>>,
    pub decline: bool,
}

impl FakeGateway {
    pub fn approving() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn declining() -> Arc<Self> {
        Arc::new(Self {
            decline: true,
            ..Self::default()
        })
    }

    pub fn recorded(&self) -> Vec<SaleRequest> {
        self.sales.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn generate_client_token(&self) -> Result<ClientToken, GatewayError> {
        Ok(ClientToken {
            client_token: "fake-client-token".into(),
            success: true,
        })
    }

    async fn sale(&self, request: SaleRequest) -> Result<Value, GatewayError> {
        if let Ok(mut sales) = self.sales.lock() {
            sales.push(request.clone());
        }
        if self.decline {
            return Err(GatewayError::Rejected {
                message: "Do Not Honor".into(),
                details: json!([{ "message": "Do Not Honor" }]),
            });
        }
        Ok(json!({
            "success": true,
            "transaction": { "id": "txn_1", "status": "SUBMITTED_FOR_SETTLEMENT" }
        }))
    }
}

pub fn state_with(orm: DatabaseConnection, gateway: Arc<FakeGateway>) -> AppState {
    AppState::new(orm, gateway, SECRET)
}

pub fn ts() -> DateTimeWithTimeZone {
    Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0)
        .single()
        .unwrap_or_default()
        .fixed_offset()
}

pub fn user_model(role: Role) -> users::Model {
    users::Model {
        id: Uuid::new_v4(),
        name: "Jane".into(),
        email: "jane@example.com".into(),
        password: "not-a-hash".into(),
        phone: "555-0100".into(),
        address: "1 Main Street".into(),
        answer: "blue".into(),
        role,
        created_at: ts(),
        updated_at: ts(),
    }
}

pub fn category_model(name: &str, slug: &str) -> categories::Model {
    categories::Model {
        id: Uuid::new_v4(),
        name: name.into(),
        slug: slug.into(),
    }
}

pub fn product_model(category_id: Uuid, name: &str, price: Decimal) -> products::Model {
    products::Model {
        id: Uuid::new_v4(),
        name: name.into(),
        slug: shopfront_api::slug::slugify(name),
        description: format!("{name} description"),
        price,
        category_id,
        quantity: 5,
        shipping: true,
        created_at: ts(),
        updated_at: ts(),
    }
}

pub fn order_model(buyer_id: Uuid, status: OrderStatus) -> orders::Model {
    orders::Model {
        id: Uuid::new_v4(),
        buyer_id,
        payment: json!({ "success": true }),
        status,
        created_at: ts(),
        updated_at: ts(),
    }
}

/// Every statement the mock connection saw, in Debug form. Consumes the
/// state, so call it once the services are done with it.
pub fn logged_sql(state: AppState) -> String {
    let AppState { orm, .. } = state;
    let conn = Arc::try_unwrap(orm)
        .unwrap_or_else(|_| panic!("connection still shared when reading its log"));
    format!("{:?}", conn.into_transaction_log())
}

pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}
