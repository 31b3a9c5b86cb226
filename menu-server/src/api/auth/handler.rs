//! Account Handlers
//!
//! Handles registration, login, logout and account maintenance

use std::time::Duration;

use axum::{Extension, Json, extract::State};

use crate::auth::{CurrentUser, hash_password, verify_password};
use crate::core::ServerState;
use crate::db::repository::user;
use crate::security_log;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_PASSWORD_LEN, MIN_PASSWORD_LEN, validate_required_text,
};
use crate::utils::{AppError, AppResult};

// Re-use shared DTOs for API consistency
use shared::client::{LoginRequest, LoginResponse, PasswordChangeRequest, UserInfo};
use shared::models::{ROLE_CUSTOMER, UserCreate, UserUpdate};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

fn validate_password(password: &str) -> AppResult<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at most {MAX_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_register(payload: &UserCreate) -> AppResult<()> {
    validate_required_text(&payload.username, "username", MAX_NAME_LEN)?;
    validate_required_text(&payload.email, "email", MAX_EMAIL_LEN)?;
    validate_password(&payload.password)?;
    if payload.first_name.len() > MAX_NAME_LEN {
        return Err(AppError::validation(format!(
            "first_name is too long (max {MAX_NAME_LEN})"
        )));
    }
    if payload.last_name.len() > MAX_NAME_LEN {
        return Err(AppError::validation(format!(
            "last_name is too long (max {MAX_NAME_LEN})"
        )));
    }
    Ok(())
}

fn validate_details(payload: &UserUpdate) -> AppResult<()> {
    if let Some(email) = &payload.email {
        validate_required_text(email, "email", MAX_EMAIL_LEN)?;
    }
    if let Some(first_name) = &payload.first_name
        && first_name.len() > MAX_NAME_LEN
    {
        return Err(AppError::validation(format!(
            "first_name is too long (max {MAX_NAME_LEN})"
        )));
    }
    if let Some(last_name) = &payload.last_name
        && last_name.len() > MAX_NAME_LEN
    {
        return Err(AppError::validation(format!(
            "last_name is too long (max {MAX_NAME_LEN})"
        )));
    }
    Ok(())
}

/// POST /register/ - 注册新账号
///
/// 新账号固定为 customer 角色; 管理员只通过启动引导创建。
/// 注册成功后客户端跳转登录, 不自动签发令牌。
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<UserInfo>> {
    validate_register(&payload)?;

    let hash_pass = hash_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;

    let user = user::create(state.get_pool(), &payload, &hash_pass, ROLE_CUSTOMER).await?;

    tracing::info!(user_id = %user.id, username = %user.username, "New account registered");

    Ok(Json(user.into()))
}

/// POST /user_login/ - 登录
///
/// Authenticates user credentials and returns a JWT token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let username = req.username.clone();

    let user = user::find_by_username(state.get_pool(), &username).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Check authentication result - unified error message to prevent username enumeration
    let user = match user {
        Some(u) => {
            if !verify_password(&req.password, &u.hash_pass) {
                security_log!(
                    "WARN",
                    "login_failed",
                    username = username.clone(),
                    reason = "invalid_credentials"
                );
                tracing::warn!(username = %username, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }
            u
        }
        None => {
            security_log!(
                "WARN",
                "login_failed",
                username = username.clone(),
                reason = "user_not_found"
            );
            tracing::warn!(username = %username, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    // Generate JWT token
    let token = state
        .get_jwt_service()
        .generate_token(user.id, &user.username, &user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(
        user_id = %user.id,
        username = %user.username,
        role = %user.role,
        "User logged in successfully"
    );

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

/// POST /logout/ - 登出
///
/// 令牌是无状态的, 服务端只记录事件; 客户端丢弃令牌即完成登出
pub async fn logout(Extension(user): Extension<CurrentUser>) -> AppResult<Json<()>> {
    tracing::info!(
        user_id = %user.id,
        username = %user.username,
        "User logged out"
    );

    Ok(Json(()))
}

/// GET /me/ - 当前账号信息
///
/// 从数据库取最新数据, 令牌里的快照可能落后于改名/改邮箱
pub async fn me(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<UserInfo>> {
    let fresh = user::find_by_id(state.get_pool(), user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", user.id)))?;

    Ok(Json(fresh.into()))
}

/// POST /update_details/ - 更新姓名/邮箱
pub async fn update_details(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<UserInfo>> {
    validate_details(&payload)?;

    let updated = user::update_details(state.get_pool(), user.id, payload).await?;

    tracing::info!(user_id = %user.id, "Account details updated");

    Ok(Json(updated.into()))
}

/// POST /password_change/ - 修改密码
///
/// 校验旧密码后换新; 旧密码错误与登录共用统一错误消息
pub async fn password_change(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<PasswordChangeRequest>,
) -> AppResult<Json<()>> {
    let current = user::find_by_id(state.get_pool(), user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", user.id)))?;

    // Fixed delay to prevent timing attacks (same budget as login)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    if !verify_password(&req.old_password, &current.hash_pass) {
        security_log!(
            "WARN",
            "password_change_failed",
            user_id = user.id,
            username = user.username.clone()
        );
        return Err(AppError::invalid_credentials());
    }

    validate_password(&req.new_password)?;

    let hash_pass = hash_password(&req.new_password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;
    user::update_password(state.get_pool(), user.id, &hash_pass).await?;

    security_log!(
        "INFO",
        "password_changed",
        user_id = user.id,
        username = user.username.clone()
    );

    Ok(Json(()))
}
