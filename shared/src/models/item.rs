//! Cart Item Model

use serde::{Deserialize, Serialize};

/// One line in a cart: a dish reference plus quantity.
///
/// `dish_name` / `dish_price` are copied from the dish when the line is
/// first created (copy-on-add) and never rewritten. `dish_id` goes NULL if
/// the dish is later deleted; the snapshot keeps order history readable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Item {
    pub id: i64,
    pub cart_id: i64,
    pub dish_id: Option<i64>,
    /// Quantity, always >= 1; a decrement to zero deletes the row instead
    pub amount: i64,
    pub dish_name: String,
    pub dish_price: f64,
}

/// One displayable cart/order line with the effective name and unit price
/// (current dish values when the dish still exists, else the snapshot).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartLine {
    pub item_id: i64,
    pub dish_id: Option<i64>,
    pub name: String,
    pub unit_price: f64,
    pub amount: i64,
}
