//! Delivery Repository

use super::{RepoError, RepoResult};
use shared::models::{Delivery, DeliveryWithUser};
use sqlx::SqlitePool;

const DELIVERY_SELECT: &str = "SELECT id, cart_id, address, comment, is_delivered, created_at, delivery_time, delivery_fee FROM deliveries";

const WITH_USER_SELECT: &str = "SELECT d.id, d.cart_id, d.address, d.comment, d.is_delivered, d.created_at, d.delivery_time, d.delivery_fee, c.user_id, u.username FROM deliveries d JOIN carts c ON d.cart_id = c.id JOIN users u ON c.user_id = u.id";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Delivery>> {
    let sql = format!("{DELIVERY_SELECT} WHERE id = ?");
    let delivery = sqlx::query_as::<_, Delivery>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(delivery)
}

/// Delivery plus the customer it belongs to, for ownership checks and the
/// management board.
pub async fn find_with_user(pool: &SqlitePool, id: i64) -> RepoResult<Option<DeliveryWithUser>> {
    let sql = format!("{WITH_USER_SELECT} WHERE d.id = ?");
    let delivery = sqlx::query_as::<_, DeliveryWithUser>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(delivery)
}

/// A customer's past orders, newest first.
pub async fn find_for_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Delivery>> {
    let deliveries = sqlx::query_as::<_, Delivery>(
        "SELECT d.id, d.cart_id, d.address, d.comment, d.is_delivered, d.created_at, d.delivery_time, d.delivery_fee FROM deliveries d JOIN carts c ON d.cart_id = c.id WHERE c.user_id = ? ORDER BY d.created_at DESC, d.id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(deliveries)
}

/// Every delivery in the system with its customer, newest first.
pub async fn find_all_with_user(pool: &SqlitePool) -> RepoResult<Vec<DeliveryWithUser>> {
    let sql = format!("{WITH_USER_SELECT} ORDER BY d.id DESC");
    let deliveries = sqlx::query_as::<_, DeliveryWithUser>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(deliveries)
}

/// Flip a delivery to delivered. The flag is one-way; there is no unset.
pub async fn mark_delivered(pool: &SqlitePool, id: i64) -> RepoResult<Delivery> {
    let rows = sqlx::query("UPDATE deliveries SET is_delivered = 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Delivery {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to load delivery after update".into()))
}
