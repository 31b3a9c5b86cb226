//! Shared types for the menu server
//!
//! Entity models, create/update payloads and API DTOs used by the server
//! crate, plus small utilities (millisecond clock, snowflake IDs).

pub mod client;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
