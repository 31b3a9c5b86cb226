//! 菜品管理 API (仅 manager)

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_manager;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/manage_dishes/", get(handler::manage_dishes))
        .route("/create_dish/", post(handler::create))
        .route("/edit_dish/{dish_id}/", post(handler::update))
        .route("/delete_dish/{dish_id}/", get(handler::delete))
        .layer(middleware::from_fn(require_manager))
}
