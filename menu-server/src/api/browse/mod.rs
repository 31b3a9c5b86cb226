//! 菜单浏览 API (公共)
//!
//! 顾客无需登录即可浏览: 首页和 `/categories/` 列出分类,
//! `/dishes/{category_id}/` 列出单个分类下的菜品。

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::index))
        .route("/categories/", get(handler::categories))
        .route("/dishes/{category_id}/", get(handler::dishes_by_category))
}
