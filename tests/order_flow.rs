mod common;

use sea_orm::{DatabaseBackend, MockDatabase};
use shopfront_api::{
    dto::orders::OrderStatusRequest,
    entity::{order_products, orders},
    error::AppError,
    models::{OrderStatus, Role},
    services::order_service,
};
use uuid::Uuid;

use common::{FakeGateway, logged_sql, order_model, state_with, user_model};

#[tokio::test]
async fn unknown_status_is_rejected_before_storage() {
    let orm = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let state = state_with(orm, FakeGateway::approving());

    let err = order_service::update_status(
        &state,
        Uuid::new_v4(),
        OrderStatusRequest {
            status: "Lost".into(),
        },
    )
    .await
    .expect_err("invalid status");

    assert!(matches!(
        err,
        AppError::BadRequest(ref m)
            if m == "Order validation failed: status: `Lost` is not a valid enum value for path `status`."
    ));
    assert_eq!(logged_sql(state), "[]");
}

#[tokio::test]
async fn any_status_may_follow_any_other() {
    let buyer = user_model(Role::Customer);
    let order = order_model(buyer.id, OrderStatus::Cancelled);
    let product_id = Uuid::new_v4();
    let mut reopened = order.clone();
    reopened.status = OrderStatus::NotProcessed;

    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![reopened.clone()]])
        .append_query_results([vec![order_products::Model {
            order_id: order.id,
            position: 0,
            product_id,
        }]])
        .into_connection();
    let state = state_with(orm, FakeGateway::approving());

    let record = order_service::update_status(
        &state,
        order.id,
        OrderStatusRequest {
            status: "Not Processed".into(),
        },
    )
    .await
    .expect("status updated");

    assert_eq!(record.status, OrderStatus::NotProcessed);
    assert_eq!(record.products, vec![product_id]);
    assert_eq!(record.buyer, buyer.id);
    assert!(logged_sql(state).contains(r#"UPDATE \"orders\""#));
}

#[tokio::test]
async fn missing_order_is_not_found() {
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<orders::Model>::new()])
        .into_connection();
    let state = state_with(orm, FakeGateway::approving());

    let err = order_service::update_status(
        &state,
        Uuid::new_v4(),
        OrderStatusRequest {
            status: "Shipped".into(),
        },
    )
    .await
    .expect_err("no such order");

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn buyer_orders_are_populated_in_cart_order() {
    let buyer = user_model(Role::Customer);
    let order = order_model(buyer.id, OrderStatus::Processing);
    let category_id = Uuid::new_v4();
    let first = common::product_model(category_id, "Laptop", rust_decimal::Decimal::new(1499, 0));
    let second = common::product_model(category_id, "Mouse", rust_decimal::Decimal::new(25, 0));

    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![order.clone()]])
        .append_query_results([vec![
            order_products::Model {
                order_id: order.id,
                position: 0,
                product_id: second.id,
            },
            order_products::Model {
                order_id: order.id,
                position: 1,
                product_id: first.id,
            },
        ]])
        .append_query_results([vec![first.clone(), second.clone()]])
        .append_query_results([vec![buyer.clone()]])
        .into_connection();
    let state = state_with(orm, FakeGateway::approving());

    let orders = order_service::buyer_orders(
        &state,
        &shopfront_api::middleware::auth::AuthUser { user_id: buyer.id },
    )
    .await
    .expect("orders listed");

    assert_eq!(orders.len(), 1);
    let names: Vec<&str> = orders[0].products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Mouse", "Laptop"]);
    assert_eq!(orders[0].buyer.name, "Jane");

    let body = serde_json::to_value(&orders).expect("serializable");
    assert_eq!(body[0]["buyer"]["name"], "Jane");
    assert_eq!(body[0]["status"], "Processing");
    assert!(body[0]["createdAt"].is_string());
}
