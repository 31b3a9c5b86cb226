//! Dish Model

use serde::{Deserialize, Serialize};

/// Dish entity. Price is currency with 2 decimal places, capped at 999.99
/// (stored as REAL, rounded through the money helpers on the way in).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Dish {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub image: Option<String>,
    pub is_gluten_free: bool,
    pub is_vegetarian: bool,
}

/// Create dish payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishCreate {
    pub category_id: i64,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub image: Option<String>,
    #[serde(default)]
    pub is_gluten_free: bool,
    #[serde(default)]
    pub is_vegetarian: bool,
}

/// Update dish payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishUpdate {
    pub category_id: Option<i64>,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub is_gluten_free: Option<bool>,
    pub is_vegetarian: Option<bool>,
}
