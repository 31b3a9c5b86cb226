//! Menu Browsing Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::repository::{category, dish};
use crate::utils::{AppError, AppResult};
use shared::models::{Category, Dish};

/// One category with its dishes, as shown on the category page
#[derive(Debug, Serialize)]
pub struct CategoryDishes {
    pub category: Category,
    pub dishes: Vec<Dish>,
}

/// GET / - 首页即分类列表
pub async fn index(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let categories = category::find_all(state.get_pool()).await?;
    Ok(Json(categories))
}

/// GET /categories/ - 所有分类
pub async fn categories(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let categories = category::find_all(state.get_pool()).await?;
    Ok(Json(categories))
}

/// GET /dishes/{category_id}/ - 单个分类下的菜品
pub async fn dishes_by_category(
    State(state): State<ServerState>,
    Path(category_id): Path<i64>,
) -> AppResult<Json<CategoryDishes>> {
    let category = category::find_by_id(state.get_pool(), category_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category {category_id} not found")))?;

    let dishes = dish::find_by_category(state.get_pool(), category_id).await?;

    Ok(Json(CategoryDishes { category, dishes }))
}
