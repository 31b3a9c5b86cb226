//! Dish Repository

use super::{RepoError, RepoResult};
use shared::models::{Dish, DishCreate, DishUpdate};
use sqlx::SqlitePool;

const DISH_SELECT: &str = "SELECT id, category_id, name, price, description, image, is_gluten_free, is_vegetarian FROM dishes";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Dish>> {
    let sql = format!("{DISH_SELECT} ORDER BY name");
    let dishes = sqlx::query_as::<_, Dish>(&sql).fetch_all(pool).await?;
    Ok(dishes)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Dish>> {
    let sql = format!("{DISH_SELECT} WHERE id = ?");
    let dish = sqlx::query_as::<_, Dish>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(dish)
}

pub async fn find_by_category(pool: &SqlitePool, category_id: i64) -> RepoResult<Vec<Dish>> {
    let sql = format!("{DISH_SELECT} WHERE category_id = ? ORDER BY name");
    let dishes = sqlx::query_as::<_, Dish>(&sql)
        .bind(category_id)
        .fetch_all(pool)
        .await?;
    Ok(dishes)
}

pub async fn create(pool: &SqlitePool, data: DishCreate) -> RepoResult<Dish> {
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO dishes (id, category_id, name, price, description, image, is_gluten_free, is_vegetarian) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(id)
    .bind(data.category_id)
    .bind(&data.name)
    .bind(data.price)
    .bind(&data.description)
    .bind(&data.image)
    .bind(data.is_gluten_free)
    .bind(data.is_vegetarian)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create dish".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: DishUpdate) -> RepoResult<Dish> {
    let rows = sqlx::query(
        "UPDATE dishes SET category_id = COALESCE(?1, category_id), name = COALESCE(?2, name), price = COALESCE(?3, price), description = COALESCE(?4, description), image = COALESCE(?5, image), is_gluten_free = COALESCE(?6, is_gluten_free), is_vegetarian = COALESCE(?7, is_vegetarian) WHERE id = ?8",
    )
    .bind(data.category_id)
    .bind(&data.name)
    .bind(data.price)
    .bind(&data.description)
    .bind(&data.image)
    .bind(data.is_gluten_free)
    .bind(data.is_vegetarian)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Dish {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Dish {id} not found")))
}

/// Delete a dish, first detaching any cart items that point at it so their
/// name/price snapshots keep telling the story.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE items SET dish_id = NULL WHERE dish_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let rows = sqlx::query("DELETE FROM dishes WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(rows.rows_affected() > 0)
}
