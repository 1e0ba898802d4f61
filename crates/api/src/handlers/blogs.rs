//! Handlers for the `/blogs` resource: public listing/reads plus
//! ownership-checked create/update/delete.

use axum::extract::{Multipart, State};

use inkpost_core::error::CoreError;
use inkpost_core::types::DbId;
use inkpost_core::validation::require_all_non_empty;
use inkpost_db::models::blog::{AuthorSnapshot, Blog, BlogResponse, CreateBlog, UpdateBlog};
use inkpost_db::repositories::BlogRepo;
use inkpost_media::MediaStore;

use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path};
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::upload::{promote, stage_form};

/// GET /api/blogs/all
///
/// Public listing, newest first.
pub async fn all_blogs(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<BlogResponse>>>> {
    let blogs = BlogRepo::list_all(&state.pool).await?;
    let data = blogs.into_iter().map(BlogResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "All blogs fetched")))
}

/// GET /api/blogs/user/blog/getBlog/{id}
pub async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<BlogResponse>>> {
    let blog = BlogRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound("Blog not found".into())))?;
    Ok(Json(ApiResponse::ok(blog.into(), "Blog fetched successfully")))
}

/// GET /api/blogs/user/blogs
///
/// The authenticated caller's blogs, newest first. An empty list is a
/// normal result.
pub async fn user_blogs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<BlogResponse>>>> {
    let blogs = BlogRepo::list_by_author(&state.pool, auth.user.id).await?;
    let data = blogs.into_iter().map(BlogResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "User blogs fetched")))
}

/// POST /api/blogs/create
///
/// Multipart: title, category, description, blogImage (file). All
/// required; the author snapshot is stamped from the authenticated user.
pub async fn create_blog(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<BlogResponse>>> {
    let mut form =
        stage_form(multipart, &state.config.upload_staging_dir, &["blogImage"]).await?;

    let title = form.text_owned("title").unwrap_or_default();
    let category = form.text_owned("category").unwrap_or_default();
    let description = form.text_owned("description").unwrap_or_default();
    require_all_non_empty(&[
        ("title", &title),
        ("category", &category),
        ("description", &description),
    ])?;

    let image = form.take_file("blogImage").ok_or_else(|| {
        AppError::Core(CoreError::Validation("Blog image is required".into()))
    })?;
    let stored = promote(state.media.as_ref(), image).await?;

    let blog = BlogRepo::create(
        &state.pool,
        &CreateBlog {
            title,
            category,
            description,
            image_url: stored.url,
            author: author_snapshot(&auth),
        },
    )
    .await?;

    Ok(Json(ApiResponse::ok(blog.into(), "Blog created successfully")))
}

/// PATCH /api/blogs/user/blog/update/{id}
///
/// Owner-only partial update. Multipart: optional newTitle, newCategory,
/// newDescription, blogImage (file). A replaced cover image's old remote
/// copy is deleted best-effort after the row is updated.
pub async fn update_blog(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<BlogResponse>>> {
    let mut form =
        stage_form(multipart, &state.config.upload_staging_dir, &["blogImage"]).await?;

    let blog = load_owned_blog(&state, &auth, id).await?;

    let new_title = form.text_owned("newTitle");
    let new_category = form.text_owned("newCategory");
    let new_description = form.text_owned("newDescription");
    let image = form.take_file("blogImage");

    if new_title.is_none() && new_category.is_none() && new_description.is_none() && image.is_none()
    {
        return Err(AppError::Core(CoreError::Validation(
            "Nothing to update".into(),
        )));
    }

    let new_image_url = match image {
        Some(staged) => Some(promote(state.media.as_ref(), staged).await?.url),
        None => None,
    };
    let replacing_image = new_image_url.is_some();
    let old_image_url = blog.image_url.clone();

    let patch = UpdateBlog {
        title: new_title,
        category: new_category,
        description: new_description,
        image_url: new_image_url,
    };
    let updated = match BlogRepo::update(&state.pool, id, &patch).await? {
        Some(updated) => updated,
        None => {
            // The row vanished between the ownership check and the update
            // (concurrent delete); don't orphan the image promoted for it.
            if let Some(url) = &patch.image_url {
                discard_remote_image(state.media.as_ref(), url).await;
            }
            return Err(AppError::Core(CoreError::NotFound("Blog not found".into())));
        }
    };

    // Best-effort cleanup; never blocks the metadata update.
    if replacing_image {
        discard_remote_image(state.media.as_ref(), &old_image_url).await;
    }

    Ok(Json(ApiResponse::ok(
        updated.into(),
        "Blog updated successfully",
    )))
}

/// DELETE /api/blogs/user/blog/delete/{id}
///
/// Owner-only.
pub async fn delete_blog(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    load_owned_blog(&state, &auth, id).await?;
    BlogRepo::delete(&state.pool, id).await?;

    Ok(Json(ApiResponse::ok(
        serde_json::json!({}),
        "Blog deleted successfully",
    )))
}

/// Load a blog and enforce that the caller authored it.
///
/// Not-found wins over forbidden: probing an id that doesn't exist tells
/// the caller nothing about other users' content.
async fn load_owned_blog(state: &AppState, auth: &AuthUser, id: DbId) -> AppResult<Blog> {
    let blog = BlogRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound("Blog not found".into())))?;

    if blog.author_id != auth.user.id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You are not the author of this blog".into(),
        )));
    }
    Ok(blog)
}

/// Point-in-time copy of the author's identity for embedding at creation.
fn author_snapshot(auth: &AuthUser) -> AuthorSnapshot {
    AuthorSnapshot {
        id: auth.user.id,
        username: auth.user.username.clone(),
        avatar_url: auth.user.avatar_url.clone(),
    }
}

/// Best-effort removal of a remote image that is no longer referenced.
///
/// Failures are logged, never surfaced; the metadata outcome is already
/// decided by the time this runs.
async fn discard_remote_image(media: &dyn MediaStore, url: &str) {
    if let Err(e) = media.delete(url).await {
        tracing::warn!(url = %url, error = %e, "Failed to delete unreferenced blog image");
    }
}
