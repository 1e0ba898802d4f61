//! Repository for the `users` table.

use inkpost_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, UpdateUserInfo, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, full_name, password_hash, avatar_url, \
                        refresh_token_hash, created_at, updated_at";

/// Provides CRUD and credential operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, full_name, password_hash, avatar_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.full_name)
            .bind(&input.password_hash)
            .bind(&input.avatar_url)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username or email; login accepts either identifier.
    pub async fn find_by_identifier(
        pool: &PgPool,
        identifier: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1 OR email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(identifier)
            .fetch_optional(pool)
            .await
    }

    /// Check whether a username or email is already taken.
    pub async fn exists_by_username_or_email(
        pool: &PgPool,
        username: &str,
        email: &str,
    ) -> Result<bool, sqlx::Error> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1 OR email = $2)",
        )
        .bind(username)
        .bind(email)
        .fetch_one(pool)
        .await?;
        Ok(exists.0)
    }

    /// Apply a partial profile update. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_info(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUserInfo,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                full_name = COALESCE($2, full_name),
                email = COALESCE($3, email),
                avatar_url = COALESCE($4, avatar_url),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.avatar_url)
            .fetch_optional(pool)
            .await
    }

    /// Update a user's password hash. Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(password_hash)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Overwrite the single refresh-token slot.
    ///
    /// Passing `Some(hash)` installs a new token (invalidating any prior
    /// one); passing `None` revokes the slot on logout. Returns `true` if
    /// the row was updated.
    pub async fn set_refresh_token_hash(
        pool: &PgPool,
        id: DbId,
        hash: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET refresh_token_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
