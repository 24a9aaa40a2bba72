mod common;

use rust_decimal::Decimal;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use shopfront_api::{
    dto::payment::{CartLine, PaymentRequest},
    entity::products,
    error::AppError,
    middleware::auth::AuthUser,
    models::OrderStatus,
    services::payment_service,
};
use uuid::Uuid;

use common::{
    FakeGateway, count_occurrences, logged_sql, order_model, product_model, state_with,
};

fn cart() -> Vec<CartLine> {
    vec![
        CartLine {
            id: Uuid::new_v4(),
            price: Decimal::new(199, 0),
        },
        CartLine {
            id: Uuid::new_v4(),
            price: Decimal::new(299, 0),
        },
    ]
}

/// Stored products matching the cart lines, as the existence check reads them.
fn stored(lines: &[CartLine]) -> Vec<products::Model> {
    lines
        .iter()
        .map(|line| products::Model {
            id: line.id,
            ..product_model(Uuid::new_v4(), "Stored", line.price)
        })
        .collect()
}

#[tokio::test]
async fn successful_sale_settles_total_and_records_one_order() {
    let buyer = AuthUser {
        user_id: Uuid::new_v4(),
    };
    let lines = cart();
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([stored(&lines)])
        .append_query_results([vec![order_model(buyer.user_id, OrderStatus::NotProcessed)]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 2,
        }])
        .into_connection();
    let gateway = FakeGateway::approving();
    let state = state_with(orm, gateway.clone());

    let ok = payment_service::checkout(
        &state,
        &buyer,
        PaymentRequest {
            nonce: "fake-valid-nonce".into(),
            cart: lines.clone(),
        },
    )
    .await
    .expect("payment accepted");
    assert!(ok.ok);

    let sales = gateway.recorded();
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0].amount, Decimal::new(498, 0));
    assert_eq!(sales[0].payment_method_nonce, "fake-valid-nonce");

    let sql = logged_sql(state);
    assert_eq!(count_occurrences(&sql, r#"INSERT INTO \"orders\""#), 1);
    assert_eq!(count_occurrences(&sql, r#"INSERT INTO \"order_products\""#), 1);
    assert!(sql.contains(&buyer.user_id.to_string()));
    for line in &lines {
        assert!(sql.contains(&line.id.to_string()));
    }
    assert!(sql.contains("Not Processed"));
}

#[tokio::test]
async fn gateway_error_creates_no_order() {
    let lines = cart();
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([stored(&lines)])
        .into_connection();
    let gateway = FakeGateway::declining();
    let state = state_with(orm, gateway.clone());
    let buyer = AuthUser {
        user_id: Uuid::new_v4(),
    };

    let err = payment_service::checkout(
        &state,
        &buyer,
        PaymentRequest {
            nonce: "fake-declined-nonce".into(),
            cart: lines,
        },
    )
    .await
    .expect_err("gateway declined");

    assert!(matches!(err, AppError::Gateway(_)));
    assert_eq!(gateway.recorded().len(), 1);
    assert!(!logged_sql(state).contains("INSERT"));
}

#[tokio::test]
async fn empty_cart_never_reaches_the_gateway() {
    let orm = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let gateway = FakeGateway::approving();
    let state = state_with(orm, gateway.clone());
    let buyer = AuthUser {
        user_id: Uuid::new_v4(),
    };

    let err = payment_service::checkout(
        &state,
        &buyer,
        PaymentRequest {
            nonce: "fake-valid-nonce".into(),
            cart: Vec::new(),
        },
    )
    .await
    .expect_err("cart is empty");

    assert!(matches!(err, AppError::BadRequest(ref m) if m == "Cart is empty"));
    assert!(gateway.recorded().is_empty());
    assert_eq!(logged_sql(state), "[]");
}

#[tokio::test]
async fn overflowing_total_is_rejected_before_the_gateway() {
    let orm = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let gateway = FakeGateway::approving();
    let state = state_with(orm, gateway.clone());
    let buyer = AuthUser {
        user_id: Uuid::new_v4(),
    };
    let payload: PaymentRequest = serde_json::from_value(serde_json::json!({
        "nonce": "fake-valid-nonce",
        "cart": [
            { "_id": Uuid::new_v4(), "price": 70000000000000000000000000000.0 },
            { "_id": Uuid::new_v4(), "price": 70000000000000000000000000000.0 }
        ]
    }))
    .expect("prices parse");
    assert!(payload.total().is_none());

    let err = payment_service::checkout(&state, &buyer, payload)
        .await
        .expect_err("total overflows");

    assert!(matches!(err, AppError::BadRequest(ref m) if m == "Cart total is out of range"));
    assert!(gateway.recorded().is_empty());
    assert_eq!(logged_sql(state), "[]");
}

#[tokio::test]
async fn unknown_cart_product_is_rejected_before_the_gateway() {
    let lines = cart();
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([stored(&lines[..1])])
        .into_connection();
    let gateway = FakeGateway::approving();
    let state = state_with(orm, gateway.clone());
    let buyer = AuthUser {
        user_id: Uuid::new_v4(),
    };

    let err = payment_service::checkout(
        &state,
        &buyer,
        PaymentRequest {
            nonce: "fake-valid-nonce".into(),
            cart: lines,
        },
    )
    .await
    .expect_err("second product is unknown");

    assert!(
        matches!(err, AppError::BadRequest(ref m) if m == "Cart contains an unknown product")
    );
    assert!(gateway.recorded().is_empty());
    assert!(!logged_sql(state).contains("INSERT"));
}

#[tokio::test]
async fn client_token_is_forwarded() {
    let orm = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let state = state_with(orm, FakeGateway::approving());

    let token = payment_service::client_token(&state).await.expect("token");
    let body = serde_json::to_value(&token).expect("serializable");

    assert_eq!(
        body,
        serde_json::json!({ "clientToken": "fake-client-token", "success": true })
    );
}
