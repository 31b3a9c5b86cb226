//! User Model

use serde::{Deserialize, Serialize};

/// Customer role (default for registrations)
pub const ROLE_CUSTOMER: &str = "customer";
/// Manager role, gates every administrative route
pub const ROLE_MANAGER: &str = "manager";

/// User account entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Argon2 PHC string; never serialized out through the API layer
    #[serde(skip_serializing, default)]
    pub hash_pass: String,
    pub role: String,
    pub created_at: i64,
}

impl User {
    pub fn is_manager(&self) -> bool {
        self.role == ROLE_MANAGER
    }
}

/// Registration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Account detail update payload (name and email only; password and role
/// change through their own endpoints)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}
