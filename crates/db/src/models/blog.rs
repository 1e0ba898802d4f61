//! Blog entity model and DTOs.

use inkpost_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full blog row from the `blogs` table.
///
/// The `author_*` columns are a point-in-time copy of the author's
/// identity captured at creation, not a live join: editing the user
/// profile later does not change already-created blogs.
#[derive(Debug, Clone, FromRow)]
pub struct Blog {
    pub id: DbId,
    pub title: String,
    pub category: String,
    pub description: String,
    pub image_url: String,
    pub author_id: DbId,
    pub author_username: String,
    pub author_avatar_url: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Denormalized author identity embedded in blog responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorSnapshot {
    pub id: DbId,
    pub username: String,
    #[serde(rename = "avatar")]
    pub avatar_url: String,
}

/// Blog representation for API responses, with the author snapshot nested
/// the way clients consume it.
#[derive(Debug, Clone, Serialize)]
pub struct BlogResponse {
    pub id: DbId,
    pub title: String,
    pub category: String,
    pub description: String,
    #[serde(rename = "blogImage")]
    pub image_url: String,
    pub author: AuthorSnapshot,
    #[serde(rename = "createdAt")]
    pub created_at: Timestamp,
    #[serde(rename = "updatedAt")]
    pub updated_at: Timestamp,
}

impl From<Blog> for BlogResponse {
    fn from(blog: Blog) -> Self {
        Self {
            id: blog.id,
            title: blog.title,
            category: blog.category,
            description: blog.description,
            image_url: blog.image_url,
            author: AuthorSnapshot {
                id: blog.author_id,
                username: blog.author_username,
                avatar_url: blog.author_avatar_url,
            },
            created_at: blog.created_at,
            updated_at: blog.updated_at,
        }
    }
}

/// DTO for creating a new blog. The author snapshot is stamped from the
/// authenticated actor, never from client input.
#[derive(Debug)]
pub struct CreateBlog {
    pub title: String,
    pub category: String,
    pub description: String,
    pub image_url: String,
    pub author: AuthorSnapshot,
}

/// DTO for a partial blog update. `None` fields keep their prior values.
#[derive(Debug, Default)]
pub struct UpdateBlog {
    pub title: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}
