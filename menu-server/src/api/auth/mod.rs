//! 账号 API
//!
//! 注册、登录、登出与账号维护。`/register/` 和 `/user_login/` 是公共路由
//! (见 `auth::middleware::is_public_path`)，其余需要令牌。

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/register/", post(handler::register))
        .route("/user_login/", post(handler::login))
        .route("/logout/", post(handler::logout))
        .route("/me/", get(handler::me))
        .route("/update_details/", post(handler::update_details))
        .route("/password_change/", post(handler::password_change))
}
