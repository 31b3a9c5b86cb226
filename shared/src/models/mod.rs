//! Data models
//!
//! Shared between the server and any API consumer.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), all timestamps are
//! Unix milliseconds.

pub mod cart;
pub mod category;
pub mod delivery;
pub mod dish;
pub mod item;
pub mod user;

// Re-exports
pub use cart::*;
pub use category::*;
pub use delivery::*;
pub use dish::*;
pub use item::*;
pub use user::*;
