//! 购物车 API (需登录)
//!
//! 通过链接式 GET 操作购物车 (加菜/加减数量/移除), 每次操作都返回
//! 最新的购物车视图。数量归零即删行, 不存在数量为 0 的行。

mod handler;

pub use handler::{CartView, cart_view};

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/add_to_cart/{dish_id}/", get(handler::add))
        .route("/cart/", get(handler::show))
        .route("/cart/increment/{item_id}/", get(handler::increment))
        .route("/cart/decrement/{item_id}/", get(handler::decrement))
        .route("/cart/remove/{item_id}/", get(handler::remove))
}
