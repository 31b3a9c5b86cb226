//! Delivery Management Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::repository::{cart, delivery};
use crate::money::{self, OrderTotals};
use crate::utils::AppResult;
use shared::models::{CartLine, Delivery, DeliveryWithUser};

/// One board row: the delivery with its customer, lines and totals
#[derive(Debug, Serialize)]
pub struct DeliveryView {
    pub delivery: DeliveryWithUser,
    pub items: Vec<CartLine>,
    #[serde(flatten)]
    pub totals: OrderTotals,
}

/// GET /manage_deliveries/ - 配送看板 (全部订单, 新单在前)
pub async fn board(State(state): State<ServerState>) -> AppResult<Json<Vec<DeliveryView>>> {
    let pool = state.get_pool();
    let deliveries = delivery::find_all_with_user(pool).await?;

    let mut board = Vec::with_capacity(deliveries.len());
    for d in deliveries {
        let items = cart::lines(pool, d.cart_id).await?;
        let totals = money::order_totals(&items, d.delivery_fee);
        board.push(DeliveryView {
            delivery: d,
            items,
            totals,
        });
    }

    Ok(Json(board))
}

/// POST /mark_as_delivered/{delivery_id}/ - 标记送达
///
/// 重复标记是无害的幂等操作; 不提供反向操作
pub async fn mark_as_delivered(
    State(state): State<ServerState>,
    Path(delivery_id): Path<i64>,
) -> AppResult<Json<Delivery>> {
    let delivery = delivery::mark_delivered(state.get_pool(), delivery_id).await?;

    tracing::info!(delivery_id = %delivery_id, "Delivery marked as delivered");

    Ok(Json(delivery))
}
