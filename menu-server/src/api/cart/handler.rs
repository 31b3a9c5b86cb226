//! Cart Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::cart;
use crate::money::{self, OrderTotals};
use crate::utils::{AppError, AppResult};
use shared::models::CartLine;

/// Active cart with its lines and running totals
#[derive(Debug, Serialize)]
pub struct CartView {
    pub cart_id: i64,
    pub items: Vec<CartLine>,
    #[serde(flatten)]
    pub totals: OrderTotals,
}

/// Assemble the caller's active cart view, creating the cart lazily.
///
/// 行价取当前菜价 (菜还在) 或加入时的快照价 (菜已删),
/// 合计全部走 money 层, 与结账和历史页共用同一套算法。
pub async fn cart_view(pool: &SqlitePool, user_id: i64, delivery_fee: f64) -> AppResult<CartView> {
    let cart = cart::get_or_create_active(pool, user_id).await?;
    let items = cart::lines(pool, cart.id).await?;
    let totals = money::order_totals(&items, delivery_fee);

    Ok(CartView {
        cart_id: cart.id,
        items,
        totals,
    })
}

/// GET /cart/ - 当前购物车
pub async fn show(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<CartView>> {
    let view = cart_view(state.get_pool(), user.id, state.delivery_fee()).await?;
    Ok(Json(view))
}

/// GET /add_to_cart/{dish_id}/ - 加一份菜
///
/// 同一道菜重复添加只加数量; 新行会快照当前名称和价格
pub async fn add(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(dish_id): Path<i64>,
) -> AppResult<Json<CartView>> {
    cart::add_dish(state.get_pool(), user.id, dish_id).await?;

    let view = cart_view(state.get_pool(), user.id, state.delivery_fee()).await?;
    Ok(Json(view))
}

/// GET /cart/increment/{item_id}/ - 数量加一
///
/// 行必须属于调用者的活跃购物车, 否则 404 (不区分"不存在"和"别人的")
pub async fn increment(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(item_id): Path<i64>,
) -> AppResult<Json<CartView>> {
    cart::increment_item(state.get_pool(), user.id, item_id).await?;

    let view = cart_view(state.get_pool(), user.id, state.delivery_fee()).await?;
    Ok(Json(view))
}

/// GET /cart/decrement/{item_id}/ - 数量减一, 减到零删行
pub async fn decrement(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(item_id): Path<i64>,
) -> AppResult<Json<CartView>> {
    cart::decrement_item(state.get_pool(), user.id, item_id).await?;

    let view = cart_view(state.get_pool(), user.id, state.delivery_fee()).await?;
    Ok(Json(view))
}

/// GET /cart/remove/{item_id}/ - 整行移除
pub async fn remove(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(item_id): Path<i64>,
) -> AppResult<Json<CartView>> {
    let removed = cart::remove_item(state.get_pool(), user.id, item_id).await?;
    if !removed {
        return Err(AppError::not_found(format!("Cart item {item_id} not found")));
    }

    let view = cart_view(state.get_pool(), user.id, state.delivery_fee()).await?;
    Ok(Json(view))
}
