//! Route definitions for the `/blogs` resource.

use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::handlers::blogs;
use crate::state::AppState;

/// Routes mounted at `/blogs`. The `/user/...` prefix on the per-blog
/// paths is part of the public API surface clients already depend on.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/all", get(blogs::all_blogs))
        .route("/create", post(blogs::create_blog))
        .route("/user/blogs", get(blogs::user_blogs))
        .route("/user/blog/getBlog/{id}", get(blogs::get_blog))
        .route("/user/blog/update/{id}", patch(blogs::update_blog))
        .route("/user/blog/delete/{id}", delete(blogs::delete_blog))
}
