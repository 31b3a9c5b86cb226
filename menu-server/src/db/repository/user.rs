//! User Repository

use super::{RepoError, RepoResult};
use shared::models::{User, UserCreate, UserUpdate};
use sqlx::SqlitePool;

const USER_SELECT: &str = "SELECT id, username, email, first_name, last_name, hash_pass, role, created_at FROM users";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ?");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE username = ? LIMIT 1");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Insert a new account. The password is already hashed by the auth layer.
pub async fn create(
    pool: &SqlitePool,
    data: &UserCreate,
    hash_pass: &str,
    role: &str,
) -> RepoResult<User> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO users (id, username, email, first_name, last_name, hash_pass, role, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(id)
    .bind(&data.username)
    .bind(&data.email)
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(hash_pass)
    .bind(role)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => {
            RepoError::Duplicate(format!("Username '{}' is already taken", data.username))
        }
        other => other,
    })?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

/// Update name/email details; unset fields keep their value.
pub async fn update_details(pool: &SqlitePool, id: i64, data: UserUpdate) -> RepoResult<User> {
    let rows = sqlx::query(
        "UPDATE users SET email = COALESCE(?1, email), first_name = COALESCE(?2, first_name), last_name = COALESCE(?3, last_name) WHERE id = ?4",
    )
    .bind(&data.email)
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
}

pub async fn update_password(pool: &SqlitePool, id: i64, hash_pass: &str) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE users SET hash_pass = ? WHERE id = ?")
        .bind(hash_pass)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::query(
            "CREATE TABLE users (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL DEFAULT '',
                first_name TEXT NOT NULL DEFAULT '',
                last_name TEXT NOT NULL DEFAULT '',
                hash_pass TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'customer',
                created_at INTEGER NOT NULL
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        pool
    }

    fn alice() -> UserCreate {
        UserCreate {
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: "ignored-by-repo".into(),
            first_name: "Alice".into(),
            last_name: "Crumb".into(),
        }
    }

    #[tokio::test]
    async fn create_and_find_by_username() {
        let pool = test_pool().await;
        let user = create(&pool, &alice(), "$argon2id$stub", "customer")
            .await
            .unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, "customer");
        assert!(!user.is_manager());

        let found = find_by_username(&pool, "alice").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(find_by_username(&pool, "bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let pool = test_pool().await;
        create(&pool, &alice(), "$argon2id$stub", "customer")
            .await
            .unwrap();
        let err = create(&pool, &alice(), "$argon2id$stub", "customer")
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn update_details_keeps_unset_fields() {
        let pool = test_pool().await;
        let user = create(&pool, &alice(), "$argon2id$stub", "customer")
            .await
            .unwrap();

        let updated = update_details(
            &pool,
            user.id,
            UserUpdate {
                email: Some("new@example.com".into()),
                first_name: None,
                last_name: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.email, "new@example.com");
        assert_eq!(updated.first_name, "Alice");
    }

    #[tokio::test]
    async fn update_password_swaps_hash() {
        let pool = test_pool().await;
        let user = create(&pool, &alice(), "$argon2id$old", "manager")
            .await
            .unwrap();
        assert!(user.is_manager());

        update_password(&pool, user.id, "$argon2id$new")
            .await
            .unwrap();
        let reloaded = find_by_id(&pool, user.id).await.unwrap().unwrap();
        assert_eq!(reloaded.hash_pass, "$argon2id$new");

        assert!(matches!(
            update_password(&pool, 999, "$argon2id$x").await.unwrap_err(),
            RepoError::NotFound(_)
        ));
    }
}
