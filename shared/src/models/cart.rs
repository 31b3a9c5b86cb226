//! Cart Model

use serde::{Deserialize, Serialize};

/// Shopping cart entity.
///
/// At most one cart per user has `is_active = true` (enforced by a partial
/// unique index). Checkout deactivates the cart instead of deleting it so
/// deliveries keep their frozen line items.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Cart {
    pub id: i64,
    pub user_id: i64,
    pub is_active: bool,
}
