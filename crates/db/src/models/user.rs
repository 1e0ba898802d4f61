//! User entity model and DTOs.

use inkpost_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash and refresh token hash -- NEVER serialize
/// this to API responses directly. Use [`UserResponse`] for external-facing
/// output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub avatar_url: String,
    /// SHA-256 hash of the single active refresh token, if any.
    ///
    /// One slot per user: a new login or refresh overwrites it, which
    /// invalidates whatever refresh token was issued before.
    pub refresh_token_hash: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no credential fields).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    #[serde(rename = "avatar")]
    pub avatar_url: String,
    #[serde(rename = "createdAt")]
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            avatar_url: user.avatar_url,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user. The password arrives already hashed.
#[derive(Debug)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub avatar_url: String,
}

/// DTO for a partial profile update. `None` fields keep their prior values.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserInfo {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}
