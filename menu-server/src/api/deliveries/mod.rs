//! 配送管理 API (仅 manager)
//!
//! 配送看板列出所有订单 (新单在前), 标记送达是唯一的状态变更,
//! 且只许单向翻转。

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_manager;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/manage_deliveries/", get(handler::board))
        .route(
            "/mark_as_delivered/{delivery_id}/",
            post(handler::mark_as_delivered),
        )
        .layer(middleware::from_fn(require_manager))
}
