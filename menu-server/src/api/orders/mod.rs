//! 下单 API (需登录)
//!
//! 结账页 (GET /place_order/)、下单/撤单 (POST /place_order/)、
//! 订单确认页和历史订单。结账把活跃购物车整体冻结为一条配送单。

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/place_order/",
            get(handler::checkout_page).post(handler::place_order),
        )
        .route("/order_confirmed/{delivery_id}/", get(handler::confirmed))
        .route("/order_history/", get(handler::history))
}
