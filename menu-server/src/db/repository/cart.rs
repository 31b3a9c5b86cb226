//! Cart Repository
//!
//! Active-cart lookup, line accumulation with copy-on-add snapshots, and
//! the checkout transaction that freezes a cart into a delivery.

use super::{RepoError, RepoResult};
use shared::models::{Cart, CartLine, Delivery, DeliveryCreate, Item};
use sqlx::SqlitePool;

const ITEM_SELECT: &str =
    "SELECT id, cart_id, dish_id, amount, dish_name, dish_price FROM items";

const EMPTY_CART_MSG: &str = "Your cart is empty. Please add some dishes before placing an order.";

/// Effective lines for display and totals: current dish name/price while the
/// dish exists, falling back to the add-time snapshot once it is gone.
const LINES_SELECT: &str = "SELECT i.id AS item_id, i.dish_id, COALESCE(d.name, i.dish_name) AS name, COALESCE(d.price, i.dish_price) AS unit_price, i.amount FROM items i LEFT JOIN dishes d ON i.dish_id = d.id";

pub async fn find_active(pool: &SqlitePool, user_id: i64) -> RepoResult<Option<Cart>> {
    let cart = sqlx::query_as::<_, Cart>(
        "SELECT id, user_id, is_active FROM carts WHERE user_id = ? AND is_active = 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(cart)
}

/// Get the user's active cart, creating one lazily on first access.
///
/// A concurrent first access can race the insert; the partial unique index
/// turns the loser's insert into a duplicate, which we resolve by
/// re-selecting the winner's cart.
pub async fn get_or_create_active(pool: &SqlitePool, user_id: i64) -> RepoResult<Cart> {
    if let Some(cart) = find_active(pool, user_id).await? {
        return Ok(cart);
    }

    let id = shared::util::snowflake_id();
    let inserted = sqlx::query("INSERT INTO carts (id, user_id, is_active) VALUES (?1, ?2, 1)")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await;

    match inserted {
        Ok(_) => Ok(Cart {
            id,
            user_id,
            is_active: true,
        }),
        Err(e) => match RepoError::from(e) {
            RepoError::Duplicate(_) => find_active(pool, user_id)
                .await?
                .ok_or_else(|| RepoError::Database("Active cart vanished during create".into())),
            other => Err(other),
        },
    }
}

pub async fn lines(pool: &SqlitePool, cart_id: i64) -> RepoResult<Vec<CartLine>> {
    let sql = format!("{LINES_SELECT} WHERE i.cart_id = ? ORDER BY i.id");
    let lines = sqlx::query_as::<_, CartLine>(&sql)
        .bind(cart_id)
        .fetch_all(pool)
        .await?;
    Ok(lines)
}

pub async fn count_items(pool: &SqlitePool, cart_id: i64) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM items WHERE cart_id = ?")
        .bind(cart_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

async fn find_item(pool: &SqlitePool, item_id: i64) -> RepoResult<Option<Item>> {
    let sql = format!("{ITEM_SELECT} WHERE id = ?");
    let item = sqlx::query_as::<_, Item>(&sql)
        .bind(item_id)
        .fetch_optional(pool)
        .await?;
    Ok(item)
}

/// Add one unit of a dish to the user's active cart.
///
/// First add of a dish creates the line with amount 1 and snapshots the
/// dish's name/price; subsequent adds of the same dish only bump the
/// amount — the snapshot is never rewritten.
pub async fn add_dish(pool: &SqlitePool, user_id: i64, dish_id: i64) -> RepoResult<Item> {
    let dish = super::dish::find_by_id(pool, dish_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Dish {dish_id} not found")))?;

    let cart = get_or_create_active(pool, user_id).await?;

    let existing = sqlx::query_as::<_, Item>(&format!(
        "{ITEM_SELECT} WHERE cart_id = ? AND dish_id = ?"
    ))
    .bind(cart.id)
    .bind(dish_id)
    .fetch_optional(pool)
    .await?;

    let item_id = match existing {
        Some(item) => {
            sqlx::query("UPDATE items SET amount = amount + 1 WHERE id = ?")
                .bind(item.id)
                .execute(pool)
                .await?;
            item.id
        }
        None => {
            let id = shared::util::snowflake_id();
            sqlx::query(
                "INSERT INTO items (id, cart_id, dish_id, amount, dish_name, dish_price) VALUES (?1, ?2, ?3, 1, ?4, ?5)",
            )
            .bind(id)
            .bind(cart.id)
            .bind(dish_id)
            .bind(&dish.name)
            .bind(dish.price)
            .execute(pool)
            .await?;
            id
        }
    };

    find_item(pool, item_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to add item to cart".into()))
}

/// Increment an item in the user's active cart. Items outside that cart are
/// reported as missing, not touched.
pub async fn increment_item(pool: &SqlitePool, user_id: i64, item_id: i64) -> RepoResult<Item> {
    let rows = sqlx::query(
        "UPDATE items SET amount = amount + 1 WHERE id = ?1 AND cart_id IN (SELECT id FROM carts WHERE user_id = ?2 AND is_active = 1)",
    )
    .bind(item_id)
    .bind(user_id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Item {item_id} not found")));
    }
    find_item(pool, item_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Item {item_id} not found")))
}

/// Decrement an item in the user's active cart. Returns `None` when the
/// amount reached zero and the line was deleted.
pub async fn decrement_item(
    pool: &SqlitePool,
    user_id: i64,
    item_id: i64,
) -> RepoResult<Option<Item>> {
    let item = sqlx::query_as::<_, Item>(&format!(
        "{ITEM_SELECT} WHERE id = ?1 AND cart_id IN (SELECT id FROM carts WHERE user_id = ?2 AND is_active = 1)"
    ))
    .bind(item_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| RepoError::NotFound(format!("Item {item_id} not found")))?;

    if item.amount <= 1 {
        // No zero-amount rows are ever persisted
        sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(item.id)
            .execute(pool)
            .await?;
        return Ok(None);
    }

    sqlx::query("UPDATE items SET amount = amount - 1 WHERE id = ?")
        .bind(item.id)
        .execute(pool)
        .await?;
    find_item(pool, item.id).await
}

/// Remove an item from the user's active cart unconditionally.
pub async fn remove_item(pool: &SqlitePool, user_id: i64, item_id: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "DELETE FROM items WHERE id = ?1 AND cart_id IN (SELECT id FROM carts WHERE user_id = ?2 AND is_active = 1)",
    )
    .bind(item_id)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Empty the active cart (checkout `cancel_order`). The cart itself stays
/// active. Returns the number of lines removed.
pub async fn clear_active(pool: &SqlitePool, user_id: i64) -> RepoResult<u64> {
    let Some(cart) = find_active(pool, user_id).await? else {
        return Ok(0);
    };
    let rows = sqlx::query("DELETE FROM items WHERE cart_id = ?")
        .bind(cart.id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}

/// Checkout (`confirm_order`): freeze the active cart into a delivery.
///
/// Runs as one transaction: insert the delivery, deactivate the cart,
/// create the fresh active cart. A cart with no lines aborts with a
/// validation error and changes nothing. The UNIQUE cart_id on deliveries
/// plus the active-cart index make a concurrent double-confirm lose
/// instead of double-charging.
pub async fn checkout(
    pool: &SqlitePool,
    user_id: i64,
    data: &DeliveryCreate,
    delivery_fee: f64,
) -> RepoResult<Delivery> {
    let mut tx = pool.begin().await?;

    let cart = sqlx::query_as::<_, Cart>(
        "SELECT id, user_id, is_active FROM carts WHERE user_id = ? AND is_active = 1",
    )
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?;

    // A missing active cart counts as empty
    let Some(cart) = cart else {
        return Err(RepoError::Validation(EMPTY_CART_MSG.into()));
    };
    let item_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM items WHERE cart_id = ?")
        .bind(cart.id)
        .fetch_one(&mut *tx)
        .await?;
    if item_count == 0 {
        return Err(RepoError::Validation(EMPTY_CART_MSG.into()));
    }

    let delivery_id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO deliveries (id, cart_id, address, comment, is_delivered, created_at, delivery_time, delivery_fee) VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5, ?6)",
    )
    .bind(delivery_id)
    .bind(cart.id)
    .bind(&data.address)
    .bind(&data.comment)
    .bind(now)
    .bind(delivery_fee)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE carts SET is_active = 0 WHERE id = ?")
        .bind(cart.id)
        .execute(&mut *tx)
        .await?;

    // Fresh active cart so future additions have a home
    sqlx::query("INSERT INTO carts (id, user_id, is_active) VALUES (?1, ?2, 1)")
        .bind(shared::util::snowflake_id())
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    let delivery = sqlx::query_as::<_, Delivery>(
        "SELECT id, cart_id, address, comment, is_delivered, created_at, delivery_time, delivery_fee FROM deliveries WHERE id = ?",
    )
    .bind(delivery_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(delivery)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money;
    use sqlx::sqlite::SqlitePoolOptions;

    /// In-memory pool with the full ordering schema and two seeded dishes
    /// (Pizza 12.99, Soda 2.50) plus users 1 (customer) and 2 (manager).
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

        sqlx::query(
            "CREATE TABLE carts (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                is_active INTEGER NOT NULL DEFAULT 1
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query(
            "CREATE UNIQUE INDEX idx_carts_user_active ON carts(user_id) WHERE is_active = 1",
        )
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query(
            "CREATE TABLE items (
                id INTEGER PRIMARY KEY,
                cart_id INTEGER NOT NULL REFERENCES carts(id) ON DELETE CASCADE,
                dish_id INTEGER REFERENCES dishes(id) ON DELETE SET NULL,
                amount INTEGER NOT NULL DEFAULT 1,
                dish_name TEXT NOT NULL DEFAULT 'Unnamed Dish',
                dish_price REAL NOT NULL DEFAULT 0
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query(
            "CREATE TABLE deliveries (
                id INTEGER PRIMARY KEY,
                cart_id INTEGER NOT NULL UNIQUE REFERENCES carts(id) ON DELETE CASCADE,
                address TEXT NOT NULL,
                comment TEXT,
                is_delivered INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL,
                delivery_time INTEGER NOT NULL,
                delivery_fee REAL NOT NULL DEFAULT 5.0
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query(
            "INSERT INTO users (id, username, hash_pass, role, created_at) VALUES
                (1, 'alice', 'x', 'customer', 0),
                (2, 'boss', 'x', 'manager', 0)",
        )
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query("INSERT INTO categories (id, name) VALUES (10, 'Mains')")
            .execute(&pool)
            .await
            .unwrap();

        sqlx::query(
            "INSERT INTO dishes (id, category_id, name, price) VALUES
                (100, 10, 'Pizza', 12.99),
                (101, 10, 'Soda', 2.50)",
        )
        .execute(&pool)
        .await
        .unwrap();

        pool
    }

    async fn active_cart_count(pool: &SqlitePool, user_id: i64) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM carts WHERE user_id = ? AND is_active = 1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn get_or_create_is_lazy_and_idempotent() {
        let pool = test_pool().await;
        assert!(find_active(&pool, 1).await.unwrap().is_none());

        let first = get_or_create_active(&pool, 1).await.unwrap();
        let second = get_or_create_active(&pool, 1).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(active_cart_count(&pool, 1).await, 1);
    }

    #[tokio::test]
    async fn second_active_cart_is_rejected_by_index() {
        let pool = test_pool().await;
        let cart = get_or_create_active(&pool, 1).await.unwrap();

        let err = sqlx::query("INSERT INTO carts (id, user_id, is_active) VALUES (?, 1, 1)")
            .bind(cart.id + 1)
            .execute(&pool)
            .await
            .map_err(RepoError::from)
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn adding_same_dish_twice_bumps_amount() {
        let pool = test_pool().await;
        let first = add_dish(&pool, 1, 100).await.unwrap();
        assert_eq!(first.amount, 1);
        assert_eq!(first.dish_name, "Pizza");
        assert_eq!(first.dish_price, 12.99);

        let second = add_dish(&pool, 1, 100).await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.amount, 2);

        let cart = find_active(&pool, 1).await.unwrap().unwrap();
        assert_eq!(count_items(&pool, cart.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn snapshot_is_copy_on_add() {
        let pool = test_pool().await;
        let item = add_dish(&pool, 1, 100).await.unwrap();

        // Re-price the dish after the first add
        sqlx::query("UPDATE dishes SET price = 15.00, name = 'Pizza Royale' WHERE id = 100")
            .execute(&pool)
            .await
            .unwrap();
        let bumped = add_dish(&pool, 1, 100).await.unwrap();

        // Same line, amount 2, snapshot untouched by the edit
        assert_eq!(bumped.id, item.id);
        assert_eq!(bumped.amount, 2);
        assert_eq!(bumped.dish_name, "Pizza");
        assert_eq!(bumped.dish_price, 12.99);

        // Display lines follow the live dish while it exists
        let cart = find_active(&pool, 1).await.unwrap().unwrap();
        let live = lines(&pool, cart.id).await.unwrap();
        assert_eq!(live[0].name, "Pizza Royale");
        assert_eq!(live[0].unit_price, 15.00);

        // After the dish is deleted the snapshot takes over
        crate::db::repository::dish::delete(&pool, 100).await.unwrap();
        let frozen = lines(&pool, cart.id).await.unwrap();
        assert_eq!(frozen[0].dish_id, None);
        assert_eq!(frozen[0].name, "Pizza");
        assert_eq!(frozen[0].unit_price, 12.99);
        assert_eq!(frozen[0].amount, 2);
    }

    #[tokio::test]
    async fn decrement_at_one_removes_line() {
        let pool = test_pool().await;
        let item = add_dish(&pool, 1, 101).await.unwrap();
        let cart = find_active(&pool, 1).await.unwrap().unwrap();

        let up = increment_item(&pool, 1, item.id).await.unwrap();
        assert_eq!(up.amount, 2);

        let down = decrement_item(&pool, 1, item.id).await.unwrap().unwrap();
        assert_eq!(down.amount, 1);

        let removed = decrement_item(&pool, 1, item.id).await.unwrap();
        assert!(removed.is_none());
        assert_eq!(count_items(&pool, cart.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn foreign_items_are_invisible() {
        let pool = test_pool().await;
        let item = add_dish(&pool, 1, 100).await.unwrap();

        // User 2 cannot touch user 1's line
        assert!(matches!(
            increment_item(&pool, 2, item.id).await.unwrap_err(),
            RepoError::NotFound(_)
        ));
        assert!(matches!(
            decrement_item(&pool, 2, item.id).await.unwrap_err(),
            RepoError::NotFound(_)
        ));
        assert!(!remove_item(&pool, 2, item.id).await.unwrap());

        let untouched = find_item(&pool, item.id).await.unwrap().unwrap();
        assert_eq!(untouched.amount, 1);
    }

    #[tokio::test]
    async fn remove_deletes_unconditionally() {
        let pool = test_pool().await;
        let item = add_dish(&pool, 1, 100).await.unwrap();
        increment_item(&pool, 1, item.id).await.unwrap();

        assert!(remove_item(&pool, 1, item.id).await.unwrap());
        assert!(find_item(&pool, item.id).await.unwrap().is_none());
        assert!(!remove_item(&pool, 1, item.id).await.unwrap());
    }

    #[tokio::test]
    async fn cancel_empties_cart_but_keeps_it_active() {
        let pool = test_pool().await;
        add_dish(&pool, 1, 100).await.unwrap();
        add_dish(&pool, 1, 101).await.unwrap();
        let cart = find_active(&pool, 1).await.unwrap().unwrap();

        assert_eq!(clear_active(&pool, 1).await.unwrap(), 2);

        let after = find_active(&pool, 1).await.unwrap().unwrap();
        assert_eq!(after.id, cart.id);
        assert_eq!(count_items(&pool, cart.id).await.unwrap(), 0);

        // No cart at all is the same as an empty one
        assert_eq!(clear_active(&pool, 2).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn empty_checkout_is_refused_without_side_effects() {
        let pool = test_pool().await;
        let cart = get_or_create_active(&pool, 1).await.unwrap();

        let err = checkout(
            &pool,
            1,
            &DeliveryCreate {
                address: "1 Main St".into(),
                comment: None,
            },
            5.00,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));

        // Cart unchanged, no delivery created
        let still = find_active(&pool, 1).await.unwrap().unwrap();
        assert_eq!(still.id, cart.id);
        let deliveries: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM deliveries")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(deliveries, 0);
    }

    #[tokio::test]
    async fn checkout_freezes_cart_and_opens_a_new_one() {
        let pool = test_pool().await;
        add_dish(&pool, 1, 100).await.unwrap();
        add_dish(&pool, 1, 100).await.unwrap();
        add_dish(&pool, 1, 101).await.unwrap();
        let old_cart = find_active(&pool, 1).await.unwrap().unwrap();

        let delivery = checkout(
            &pool,
            1,
            &DeliveryCreate {
                address: "1 Main St".into(),
                comment: Some("ring twice".into()),
            },
            5.00,
        )
        .await
        .unwrap();

        assert_eq!(delivery.cart_id, old_cart.id);
        assert_eq!(delivery.address, "1 Main St");
        assert_eq!(delivery.delivery_fee, 5.00);
        assert!(!delivery.is_delivered);
        assert_eq!(delivery.created_at, delivery.delivery_time);

        // Old cart frozen, exactly one fresh active cart
        let old: Cart = sqlx::query_as("SELECT id, user_id, is_active FROM carts WHERE id = ?")
            .bind(old_cart.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert!(!old.is_active);
        assert_eq!(active_cart_count(&pool, 1).await, 1);
        let fresh = find_active(&pool, 1).await.unwrap().unwrap();
        assert_ne!(fresh.id, old_cart.id);
        assert_eq!(count_items(&pool, fresh.id).await.unwrap(), 0);

        // Frozen lines still price the order: 12.99×2 + 2.50 + 5.00 = 33.48
        let frozen = lines(&pool, old_cart.id).await.unwrap();
        let totals = money::order_totals(&frozen, delivery.delivery_fee);
        assert_eq!(totals.subtotal, 28.48);
        assert_eq!(totals.total, 33.48);

        // A second confirm sees only the empty fresh cart
        let err = checkout(
            &pool,
            1,
            &DeliveryCreate {
                address: "1 Main St".into(),
                comment: None,
            },
            5.00,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }
}
