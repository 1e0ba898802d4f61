//! Repository for the `blogs` table.

use inkpost_core::types::DbId;
use sqlx::PgPool;

use crate::models::blog::{Blog, CreateBlog, UpdateBlog};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, category, description, image_url, \
                        author_id, author_username, author_avatar_url, created_at, updated_at";

/// Provides CRUD operations for blogs. Ownership checks happen in the
/// handlers against the loaded row's `author_id`.
pub struct BlogRepo;

impl BlogRepo {
    /// Insert a new blog with its author snapshot, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateBlog) -> Result<Blog, sqlx::Error> {
        let query = format!(
            "INSERT INTO blogs (title, category, description, image_url,
                                author_id, author_username, author_avatar_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Blog>(&query)
            .bind(&input.title)
            .bind(&input.category)
            .bind(&input.description)
            .bind(&input.image_url)
            .bind(input.author.id)
            .bind(&input.author.username)
            .bind(&input.author.avatar_url)
            .fetch_one(pool)
            .await
    }

    /// Find a blog by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Blog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM blogs WHERE id = $1");
        sqlx::query_as::<_, Blog>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all blogs, newest first. The id tie-break keeps the order
    /// strict when rows share a creation timestamp.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Blog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM blogs ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Blog>(&query).fetch_all(pool).await
    }

    /// List all blogs by the given author, newest first.
    pub async fn list_by_author(
        pool: &PgPool,
        author_id: DbId,
    ) -> Result<Vec<Blog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM blogs WHERE author_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Blog>(&query)
            .bind(author_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a partial update. Only non-`None` fields are applied; the
    /// author snapshot is immutable after creation.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBlog,
    ) -> Result<Option<Blog>, sqlx::Error> {
        let query = format!(
            "UPDATE blogs SET
                title = COALESCE($2, title),
                category = COALESCE($3, category),
                description = COALESCE($4, description),
                image_url = COALESCE($5, image_url),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Blog>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.category)
            .bind(&input.description)
            .bind(&input.image_url)
            .fetch_optional(pool)
            .await
    }

    /// Delete a blog. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
