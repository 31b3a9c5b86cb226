//! Category Management Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::category;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{Category, CategoryCreate, CategoryUpdate};

fn validate_create(payload: &CategoryCreate) -> AppResult<()> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;
    Ok(())
}

fn validate_update(payload: &CategoryUpdate) -> AppResult<()> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;
    Ok(())
}

/// GET /management_panel/ - 管理面板首页 (全部分类)
pub async fn management_panel(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let categories = category::find_all(state.get_pool()).await?;
    Ok(Json(categories))
}

/// POST /create_category/ - 创建分类
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    validate_create(&payload)?;

    // Duplicate names would make the browse pages ambiguous
    if category::find_by_name(state.get_pool(), &payload.name)
        .await?
        .is_some()
    {
        return Err(AppError::conflict(format!(
            "Category '{}' already exists",
            payload.name
        )));
    }

    let item = category::create(state.get_pool(), payload).await?;

    tracing::info!(category_id = %item.id, name = %item.name, "Category created");

    Ok(Json(item))
}

/// POST /edit_category/{category_id}/ - 更新分类
pub async fn update(
    State(state): State<ServerState>,
    Path(category_id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    validate_update(&payload)?;

    let item = category::update(state.get_pool(), category_id, payload).await?;

    tracing::info!(category_id = %category_id, "Category updated");

    Ok(Json(item))
}

/// GET /delete_category/{category_id}/ - 删除分类
///
/// 级联删除其菜品; 历史订单行保留快照 (dish_id 置 NULL)
pub async fn delete(
    State(state): State<ServerState>,
    Path(category_id): Path<i64>,
) -> AppResult<Json<bool>> {
    let deleted = category::delete(state.get_pool(), category_id).await?;
    if !deleted {
        return Err(AppError::not_found(format!(
            "Category {category_id} not found"
        )));
    }

    tracing::info!(category_id = %category_id, "Category deleted");

    Ok(Json(true))
}
