//! 分类管理 API (仅 manager)
//!
//! 管理面板首页和分类增删改。整组路由挂 `require_manager`,
//! 非管理员一律 403。

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_manager;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/management_panel/", get(handler::management_panel))
        .route("/create_category/", post(handler::create))
        .route("/edit_category/{category_id}/", post(handler::update))
        .route("/delete_category/{category_id}/", get(handler::delete))
        .layer(middleware::from_fn(require_manager))
}
