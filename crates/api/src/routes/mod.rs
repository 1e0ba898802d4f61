pub mod blogs;
pub mod health;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /users/register                      register (public, multipart)
/// /users/login                         login (public)
/// /users/logout                        logout (requires auth)
/// /users/refresh-token                 refresh (public, cookie or body token)
/// /users/change-password               change password (requires auth)
/// /users/current-user                  current identity (requires auth)
/// /users/update-info                   profile update (requires auth, multipart)
///
/// /blogs/all                           list all blogs (public)
/// /blogs/create                        create blog (requires auth, multipart)
/// /blogs/user/blogs                    caller's blogs (requires auth)
/// /blogs/user/blog/getBlog/{id}        read one blog (public)
/// /blogs/user/blog/update/{id}         update blog (requires auth, owner only)
/// /blogs/user/blog/delete/{id}         delete blog (requires auth, owner only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/blogs", blogs::router())
}
