use chrono::Utc;
use std::collections::HashSet;

use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    dto::payment::PaymentRequest,
    entity::{
        OrderProducts, Products,
        order_products::ActiveModel as LineActive,
        orders::ActiveModel as OrderActive,
        products::Column as ProductCol,
    },
    error::{AppError, AppResult, OrFail},
    gateway::{ClientToken, SaleRequest},
    middleware::auth::AuthUser,
    models::NewOrder,
    response::OkFlag,
    state::AppState,
};

pub async fn client_token(state: &AppState) -> AppResult<ClientToken> {
    Ok(state.gateway.generate_client_token().await?)
}

/// Every id in the cart has to name a stored product.
async fn ensure_products_exist(state: &AppState, ids: &[Uuid]) -> AppResult<()> {
    let wanted: HashSet<Uuid> = ids.iter().copied().collect();
    let found: HashSet<Uuid> = Products::find()
        .filter(ProductCol::Id.is_in(wanted.iter().copied()))
        .all(state.db())
        .await
        .or_fail("Error in payment")?
        .into_iter()
        .map(|product| product.id)
        .collect();

    match wanted.difference(&found).next() {
        Some(missing) => {
            tracing::debug!(product_id = %missing, "cart names an unknown product");
            Err(AppError::BadRequest("Cart contains an unknown product".into()))
        }
        None => Ok(()),
    }
}

/// Writes the order header and its product lines together.
async fn record_order(state: &AppState, order: NewOrder) -> AppResult<Uuid> {
    let buyer = order
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let now = Utc::now().fixed_offset();
    let order_id = Uuid::new_v4();
    let lines: Vec<LineActive> = order
        .products
        .iter()
        .enumerate()
        .map(|(position, product_id)| LineActive {
            order_id: Set(order_id),
            position: Set(position as i32),
            product_id: Set(*product_id),
        })
        .collect();

    let txn = state.db().begin().await.or_fail("Error while saving order")?;
    OrderActive {
        id: Set(order_id),
        buyer_id: Set(buyer),
        payment: Set(order.payment),
        status: Set(order.status),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await
    .or_fail("Error while saving order")?;
    OrderProducts::insert_many(lines)
        .exec_without_returning(&txn)
        .await
        .or_fail("Error while saving order")?;
    txn.commit().await.or_fail("Error while saving order")?;

    Ok(order_id)
}

/// Charges the cart total and, only once the gateway accepts, records one
/// order for the caller. A failure after the charge leaves the money
/// captured without an order; that case is logged loudly.
pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    payload: PaymentRequest,
) -> AppResult<OkFlag> {
    if payload.cart.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    let amount = payload
        .total()
        .ok_or_else(|| AppError::BadRequest("Cart total is out of range".into()))?;
    let products = payload.product_ids();
    ensure_products_exist(state, &products).await?;

    let result: Value = state
        .gateway
        .sale(SaleRequest::settle(amount, payload.nonce))
        .await?;

    let order = NewOrder::new(products, result, user.user_id);
    match record_order(state, order).await {
        Ok(order_id) => {
            tracing::info!(%order_id, buyer = %user.user_id, %amount, "order placed");
            Ok(OkFlag::yes())
        }
        Err(err) => {
            tracing::error!(
                buyer = %user.user_id,
                %amount,
                error = %err,
                "payment captured but order was not recorded"
            );
            Err(err)
        }
    }
}
