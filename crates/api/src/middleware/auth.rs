//! Authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use inkpost_core::error::CoreError;
use inkpost_db::models::user::User;
use inkpost_db::repositories::UserRepo;

use crate::auth::cookies::ACCESS_COOKIE;
use crate::auth::jwt::validate_access_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user resolved from the access token.
///
/// Looks for the `accessToken` cookie first, then falls back to an
/// `Authorization: Bearer` header. The full user row is loaded so
/// handlers can stamp author snapshots from current profile data.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = auth.user.id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug)]
pub struct AuthUser {
    pub user: User,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let token = jar
            .get(ACCESS_COOKIE)
            .map(|c| c.value().to_string())
            .or_else(|| bearer_token(parts))
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Unauthorized request".into()))
            })?;

        let claims = validate_access_token(&token, &state.config.tokens).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
            })?;

        Ok(AuthUser { user })
    }
}

/// Extract a token from an `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.to_string())
}
