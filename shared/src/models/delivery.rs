//! Delivery Model

use serde::{Deserialize, Serialize};

/// Delivery (order) entity, one-to-one with the cart frozen at checkout.
///
/// Created exactly once per completed order. The only mutation in normal
/// flow is a manager flipping `is_delivered` to true; the flag is never
/// reset by the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Delivery {
    pub id: i64,
    pub cart_id: i64,
    pub address: String,
    pub comment: Option<String>,
    pub is_delivered: bool,
    pub created_at: i64,
    /// Scheduled delivery time; defaults to the creation instant
    pub delivery_time: i64,
    /// Fee fixed at creation; later changes to the configured default do
    /// not touch existing deliveries
    pub delivery_fee: f64,
}

/// Checkout payload (`action = confirm_order`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryCreate {
    pub address: String,
    pub comment: Option<String>,
}

/// Delivery joined with the ordering customer, for the confirmation page
/// (owner check) and the management board (username column).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DeliveryWithUser {
    pub id: i64,
    pub cart_id: i64,
    pub address: String,
    pub comment: Option<String>,
    pub is_delivered: bool,
    pub created_at: i64,
    pub delivery_time: i64,
    pub delivery_fee: f64,
    pub user_id: i64,
    pub username: String,
}

impl From<DeliveryWithUser> for Delivery {
    fn from(d: DeliveryWithUser) -> Self {
        Delivery {
            id: d.id,
            cart_id: d.cart_id,
            address: d.address,
            comment: d.comment,
            is_delivered: d.is_delivered,
            created_at: d.created_at,
            delivery_time: d.delivery_time,
            delivery_fee: d.delivery_fee,
        }
    }
}
