//! Category Repository

use super::{RepoError, RepoResult};
use shared::models::{Category, CategoryCreate, CategoryUpdate};
use sqlx::SqlitePool;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Category>> {
    let categories =
        sqlx::query_as::<_, Category>("SELECT id, name, image FROM categories ORDER BY name")
            .fetch_all(pool)
            .await?;
    Ok(categories)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Category>> {
    let category =
        sqlx::query_as::<_, Category>("SELECT id, name, image FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(category)
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(
        "SELECT id, name, image FROM categories WHERE name = ? LIMIT 1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(category)
}

pub async fn create(pool: &SqlitePool, data: CategoryCreate) -> RepoResult<Category> {
    let id = shared::util::snowflake_id();
    sqlx::query("INSERT INTO categories (id, name, image) VALUES (?1, ?2, ?3)")
        .bind(id)
        .bind(&data.name)
        .bind(&data.image)
        .execute(pool)
        .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create category".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: CategoryUpdate) -> RepoResult<Category> {
    let rows = sqlx::query(
        "UPDATE categories SET name = COALESCE(?1, name), image = COALESCE(?2, image) WHERE id = ?3",
    )
    .bind(&data.name)
    .bind(&data.image)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Category {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))
}

/// Delete a category. Its dishes go with it (FK cascade); cart items that
/// referenced those dishes keep their snapshots with `dish_id` nulled.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    /// In-memory pool with the menu tables and foreign keys enabled.
    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&pool)
            .await
            .unwrap();

        sqlx::query(
            "CREATE TABLE categories (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                image TEXT
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query(
            "CREATE TABLE dishes (
                id INTEGER PRIMARY KEY,
                category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                price REAL NOT NULL DEFAULT 0,
                description TEXT NOT NULL DEFAULT '',
                image TEXT,
                is_gluten_free INTEGER NOT NULL DEFAULT 0,
                is_vegetarian INTEGER NOT NULL DEFAULT 0
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        pool
    }

    #[tokio::test]
    async fn create_and_find() {
        let pool = test_pool().await;
        let created = create(
            &pool,
            CategoryCreate {
                name: "Pizzas".into(),
                image: Some("categories/pizzas.png".into()),
            },
        )
        .await
        .unwrap();

        let found = find_by_id(&pool, created.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Pizzas");
        assert_eq!(found.image.as_deref(), Some("categories/pizzas.png"));
        assert!(find_by_name(&pool, "Pizzas").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn update_keeps_unset_fields() {
        let pool = test_pool().await;
        let created = create(
            &pool,
            CategoryCreate {
                name: "Starters".into(),
                image: Some("categories/starters.png".into()),
            },
        )
        .await
        .unwrap();

        let updated = update(
            &pool,
            created.id,
            CategoryUpdate {
                name: Some("Appetizers".into()),
                image: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.name, "Appetizers");
        // COALESCE keeps the previous image
        assert_eq!(updated.image.as_deref(), Some("categories/starters.png"));
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let pool = test_pool().await;
        let err = update(
            &pool,
            999,
            CategoryUpdate {
                name: Some("Ghost".into()),
                image: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_cascades_to_dishes() {
        let pool = test_pool().await;
        let category = create(
            &pool,
            CategoryCreate {
                name: "Desserts".into(),
                image: None,
            },
        )
        .await
        .unwrap();

        sqlx::query("INSERT INTO dishes (id, category_id, name, price) VALUES (1, ?, 'Tiramisu', 6.5)")
            .bind(category.id)
            .execute(&pool)
            .await
            .unwrap();

        assert!(delete(&pool, category.id).await.unwrap());
        assert!(!delete(&pool, category.id).await.unwrap());

        let dishes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dishes")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(dishes, 0);
    }
}
