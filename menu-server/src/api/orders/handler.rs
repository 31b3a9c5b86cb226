//! Order Handlers
//!
//! Checkout, cancellation, confirmation page and order history

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::api::cart::{CartView, cart_view};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, cart, delivery};
use crate::money::{self, OrderTotals};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{CartLine, Delivery, DeliveryCreate};

/// POST /place_order/ payload; `action` picks confirm or cancel
#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub action: String,
    pub address: Option<String>,
    pub comment: Option<String>,
}

/// One completed order: the delivery plus its frozen lines and totals
#[derive(Debug, Serialize)]
pub struct OrderView {
    pub delivery: Delivery,
    pub items: Vec<CartLine>,
    #[serde(flatten)]
    pub totals: OrderTotals,
}

/// Assemble the view of a completed order.
///
/// 合计用配送单上存的费用, 而不是当前配置值; 后续调价不回写历史订单
async fn order_view(pool: &SqlitePool, delivery: Delivery) -> AppResult<OrderView> {
    let items = cart::lines(pool, delivery.cart_id).await?;
    let totals = money::order_totals(&items, delivery.delivery_fee);

    Ok(OrderView {
        delivery,
        items,
        totals,
    })
}

/// GET /place_order/ - 结账页 (当前购物车 + 合计预览)
pub async fn checkout_page(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<CartView>> {
    let view = cart_view(state.get_pool(), user.id, state.delivery_fee()).await?;
    Ok(Json(view))
}

/// POST /place_order/ - 下单或撤单
///
/// `action = "confirm_order"`: 校验地址, 冻结购物车为配送单, 开新空车,
/// 返回订单视图; 空车下单是 422 而不是 400。
/// `action = "cancel_order"`: 清空当前购物车但保留购物车本身, 返回空车视图。
pub async fn place_order(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<PlaceOrderRequest>,
) -> AppResult<Response> {
    let pool = state.get_pool();

    match req.action.as_str() {
        "confirm_order" => {
            let address = req
                .address
                .ok_or_else(|| AppError::validation("address is required"))?;
            validate_required_text(&address, "address", MAX_ADDRESS_LEN)?;
            validate_optional_text(&req.comment, "comment", MAX_NOTE_LEN)?;

            let data = DeliveryCreate {
                address,
                comment: req.comment,
            };

            let delivery = match cart::checkout(pool, user.id, &data, state.delivery_fee()).await {
                Ok(delivery) => delivery,
                // Confirming an empty cart is a state conflict, not a malformed request
                Err(RepoError::Validation(msg)) => return Err(AppError::business_rule(msg)),
                Err(e) => return Err(e.into()),
            };

            tracing::info!(
                user_id = %user.id,
                delivery_id = %delivery.id,
                "Order placed"
            );

            let view = order_view(pool, delivery).await?;
            Ok(Json(view).into_response())
        }
        "cancel_order" => {
            let removed = cart::clear_active(pool, user.id).await?;

            tracing::info!(user_id = %user.id, removed_lines = removed, "Order cancelled");

            let view = cart_view(pool, user.id, state.delivery_fee()).await?;
            Ok(Json(view).into_response())
        }
        other => Err(AppError::validation(format!(
            "Unknown action '{other}'; expected 'confirm_order' or 'cancel_order'"
        ))),
    }
}

/// GET /order_confirmed/{delivery_id}/ - 订单确认页
///
/// 只有下单人本人可见; 其他人 (包括管理员) 一律 403
pub async fn confirmed(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(delivery_id): Path<i64>,
) -> AppResult<Json<OrderView>> {
    let found = delivery::find_with_user(state.get_pool(), delivery_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {delivery_id} not found")))?;

    if found.user_id != user.id {
        return Err(AppError::forbidden("This order belongs to another account"));
    }

    let view = order_view(state.get_pool(), found.into()).await?;
    Ok(Json(view))
}

/// GET /order_history/ - 本人历史订单, 最新在前
pub async fn history(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<OrderView>>> {
    let deliveries = delivery::find_for_user(state.get_pool(), user.id).await?;

    let mut orders = Vec::with_capacity(deliveries.len());
    for delivery in deliveries {
        orders.push(order_view(state.get_pool(), delivery).await?);
    }

    Ok(Json(orders))
}
