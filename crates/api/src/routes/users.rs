//! Route definitions for the `/users` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/logout", post(users::logout))
        .route("/refresh-token", post(users::refresh_token))
        .route("/change-password", post(users::change_password))
        .route("/current-user", get(users::current_user))
        .route("/update-info", patch(users::update_info))
}
