//! 目录数据 API (公共)
//!
//! `/api/` 前缀的原始数据端点, 供程序化消费 (移动端、看板)。
//! 与浏览页相同的数据, 不带页面组装。

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/categories/", get(handler::list_categories))
        .route("/api/dishes/", get(handler::list_dishes))
}
