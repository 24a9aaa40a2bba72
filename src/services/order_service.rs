use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    dto::orders::OrderStatusRequest,
    entity::{
        OrderProducts, Orders, Products, Users,
        order_products::Column as LineCol,
        orders::{ActiveModel as OrderActive, Column as OrderCol, Model as OrderModel},
        products::Column as ProductCol,
        users::Column as UserCol,
    },
    error::{AppError, AppResult, OrFail},
    middleware::auth::AuthUser,
    models::{Buyer, Order, OrderRecord, OrderStatus, Product},
    state::AppState,
};

const LIST_FAILED: &str = "Error while getting orders.";
const STATUS_FAILED: &str = "Error while updating orders.";

/// Product ids of each order, in cart order.
async fn order_lines(state: &AppState, order_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<Uuid>>, DbErr> {
    let lines = OrderProducts::find()
        .filter(LineCol::OrderId.is_in(order_ids.iter().copied()))
        .order_by_asc(LineCol::OrderId)
        .order_by_asc(LineCol::Position)
        .all(state.db())
        .await?;

    let mut by_order: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for line in lines {
        by_order.entry(line.order_id).or_default().push(line.product_id);
    }
    Ok(by_order)
}

/// Fills in products and buyer names. Products deleted since the sale are
/// left out of the order they belonged to.
async fn populate(state: &AppState, orders: Vec<OrderModel>) -> Result<Vec<Order>, DbErr> {
    if orders.is_empty() {
        return Ok(Vec::new());
    }

    let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let mut lines = order_lines(state, &order_ids).await?;

    let mut product_ids: Vec<Uuid> = lines.values().flatten().copied().collect();
    product_ids.sort_unstable();
    product_ids.dedup();
    let products: HashMap<Uuid, Product> = Products::find()
        .filter(ProductCol::Id.is_in(product_ids))
        .all(state.db())
        .await?
        .into_iter()
        .map(|p| (p.id, Product::from_entity(p, None)))
        .collect();

    let mut buyer_ids: Vec<Uuid> = orders.iter().map(|o| o.buyer_id).collect();
    buyer_ids.sort_unstable();
    buyer_ids.dedup();
    let buyers: HashMap<Uuid, String> = Users::find()
        .filter(UserCol::Id.is_in(buyer_ids))
        .all(state.db())
        .await?
        .into_iter()
        .map(|u| (u.id, u.name))
        .collect();

    Ok(orders
        .into_iter()
        .map(|order| Order {
            id: order.id,
            products: lines
                .remove(&order.id)
                .unwrap_or_default()
                .iter()
                .filter_map(|id| products.get(id).cloned())
                .collect(),
            payment: order.payment,
            buyer: Buyer {
                id: order.buyer_id,
                name: buyers.get(&order.buyer_id).cloned().unwrap_or_default(),
            },
            status: order.status,
            created_at: order.created_at.with_timezone(&Utc),
            updated_at: order.updated_at.with_timezone(&Utc),
        })
        .collect())
}

pub async fn buyer_orders(state: &AppState, user: &AuthUser) -> AppResult<Vec<Order>> {
    let orders = Orders::find()
        .filter(OrderCol::BuyerId.eq(user.user_id))
        .order_by_desc(OrderCol::CreatedAt)
        .all(state.db())
        .await
        .or_fail(LIST_FAILED)?;

    populate(state, orders).await.or_fail(LIST_FAILED)
}

pub async fn all_orders(state: &AppState) -> AppResult<Vec<Order>> {
    let orders = Orders::find()
        .order_by_desc(OrderCol::CreatedAt)
        .all(state.db())
        .await
        .or_fail(LIST_FAILED)?;

    populate(state, orders).await.or_fail(LIST_FAILED)
}

/// Any status may follow any other; only the value itself is checked.
pub async fn update_status(
    state: &AppState,
    order_id: Uuid,
    payload: OrderStatusRequest,
) -> AppResult<OrderRecord> {
    let status: OrderStatus = payload
        .status
        .parse()
        .map_err(|e: crate::models::InvalidStatus| AppError::BadRequest(e.to_string()))?;

    let updated = OrderActive {
        id: Set(order_id),
        buyer_id: NotSet,
        payment: NotSet,
        status: Set(status),
        created_at: NotSet,
        updated_at: Set(Utc::now().fixed_offset()),
    }
    .update(state.db())
    .await;

    let order = match updated {
        Ok(order) => order,
        Err(DbErr::RecordNotUpdated) => {
            return Err(AppError::NotFound("Order not found".into()));
        }
        Err(err) => return Err(err).or_fail(STATUS_FAILED),
    };

    let products = order_lines(state, &[order.id])
        .await
        .or_fail(STATUS_FAILED)?
        .remove(&order.id)
        .unwrap_or_default();

    tracing::info!(order_id = %order.id, status = %order.status.as_str(), "order status updated");
    Ok(OrderRecord {
        id: order.id,
        products,
        payment: order.payment,
        buyer: order.buyer_id,
        status: order.status,
        created_at: order.created_at.with_timezone(&Utc),
        updated_at: order.updated_at.with_timezone(&Utc),
    })
}
