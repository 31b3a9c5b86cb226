//! Dish Management Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::{category, dish};
use crate::money;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{Dish, DishCreate, DishUpdate};

fn validate_create(payload: &DishCreate) -> AppResult<()> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    if payload.description.len() > MAX_NOTE_LEN {
        return Err(AppError::validation(format!(
            "description is too long (max {MAX_NOTE_LEN})"
        )));
    }
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;
    Ok(())
}

fn validate_update(payload: &DishUpdate) -> AppResult<()> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(description) = &payload.description
        && description.len() > MAX_NOTE_LEN
    {
        return Err(AppError::validation(format!(
            "description is too long (max {MAX_NOTE_LEN})"
        )));
    }
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;
    Ok(())
}

/// GET /manage_dishes/ - 全部菜品 (管理视图)
pub async fn manage_dishes(State(state): State<ServerState>) -> AppResult<Json<Vec<Dish>>> {
    let dishes = dish::find_all(state.get_pool()).await?;
    Ok(Json(dishes))
}

/// POST /create_dish/ - 创建菜品
///
/// 分类必须已存在; 价格经 money 层校验并归一到两位小数
pub async fn create(
    State(state): State<ServerState>,
    Json(mut payload): Json<DishCreate>,
) -> AppResult<Json<Dish>> {
    validate_create(&payload)?;
    payload.price = money::validate_price(payload.price, "price")?;

    category::find_by_id(state.get_pool(), payload.category_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Category {} not found", payload.category_id))
        })?;

    let item = dish::create(state.get_pool(), payload).await?;

    tracing::info!(dish_id = %item.id, name = %item.name, "Dish created");

    Ok(Json(item))
}

/// POST /edit_dish/{dish_id}/ - 更新菜品
///
/// 换分类时目标分类必须存在; 改价只影响活跃购物车, 已结账订单保持快照价
pub async fn update(
    State(state): State<ServerState>,
    Path(dish_id): Path<i64>,
    Json(mut payload): Json<DishUpdate>,
) -> AppResult<Json<Dish>> {
    validate_update(&payload)?;
    if let Some(price) = payload.price {
        payload.price = Some(money::validate_price(price, "price")?);
    }
    if let Some(category_id) = payload.category_id {
        category::find_by_id(state.get_pool(), category_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Category {category_id} not found")))?;
    }

    let item = dish::update(state.get_pool(), dish_id, payload).await?;

    tracing::info!(dish_id = %dish_id, "Dish updated");

    Ok(Json(item))
}

/// GET /delete_dish/{dish_id}/ - 删除菜品
///
/// 同一事务内先摘除购物车行的 dish_id 引用, 快照价和名称保留
pub async fn delete(
    State(state): State<ServerState>,
    Path(dish_id): Path<i64>,
) -> AppResult<Json<bool>> {
    let deleted = dish::delete(state.get_pool(), dish_id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Dish {dish_id} not found")));
    }

    tracing::info!(dish_id = %dish_id, "Dish deleted");

    Ok(Json(true))
}
