//! Catalog Data Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::{category, dish};
use crate::utils::AppResult;
use shared::models::{Category, Dish};

#[derive(Debug, Deserialize)]
pub struct DishFilter {
    pub category_id: Option<i64>,
}

/// GET /api/categories/ - 分类原始数据
pub async fn list_categories(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let categories = category::find_all(state.get_pool()).await?;
    Ok(Json(categories))
}

/// GET /api/dishes/ - 菜品原始数据, 可按 ?category_id= 过滤
///
/// 未知分类按空过滤结果处理, 返回空列表而非 404
pub async fn list_dishes(
    State(state): State<ServerState>,
    Query(filter): Query<DishFilter>,
) -> AppResult<Json<Vec<Dish>>> {
    let dishes = match filter.category_id {
        Some(category_id) => dish::find_by_category(state.get_pool(), category_id).await?,
        None => dish::find_all(state.get_pool()).await?,
    };
    Ok(Json(dishes))
}
