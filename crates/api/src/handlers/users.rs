//! Handlers for the `/users` resource: registration, the session
//! lifecycle (login, refresh, logout), and profile management.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use validator::Validate;

use inkpost_core::error::CoreError;
use inkpost_core::types::DbId;
use inkpost_db::models::user::{CreateUser, UpdateUserInfo, UserResponse};
use inkpost_db::repositories::UserRepo;

use crate::auth::cookies::{auth_cookies, clear_auth_cookies, REFRESH_COOKIE};
use crate::auth::jwt::{
    generate_access_token, generate_refresh_token, hash_refresh_token, validate_refresh_token,
};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::Json;
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::upload::{promote, stage_form};

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Registration fields, assembled from the multipart form.
#[derive(Debug, Validate)]
struct RegisterInput {
    #[validate(length(min = 1, message = "Full name is required"))]
    full_name: String,
    #[validate(email(message = "Email must be a valid address"))]
    email: String,
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    password: String,
}

/// Request body for `POST /users/login`. Either identifier works.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
}

/// Request body for `POST /users/refresh-token`; the cookie takes
/// precedence when both are present.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    #[serde(rename = "refreshToken")]
    pub refresh_token: Option<String>,
}

/// Request body for `POST /users/change-password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(rename = "oldPassword")]
    pub old_password: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: String,
}

/// Payload for a successful login.
#[derive(Debug, Serialize)]
pub struct LoginData {
    pub user: UserResponse,
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// Payload for a successful token rotation.
#[derive(Debug, Serialize)]
pub struct TokenPairData {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/users/register
///
/// Multipart: fullName, email, username, password, avatar (file, required).
pub async fn register(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ApiResponse<UserResponse>>)> {
    let mut form = stage_form(multipart, &state.config.upload_staging_dir, &["avatar"]).await?;

    let input = RegisterInput {
        full_name: form.text_owned("fullName").unwrap_or_default(),
        email: form.text_owned("email").unwrap_or_default(),
        // Handles are stored lowercased so lookups are case-stable.
        username: form
            .text_owned("username")
            .unwrap_or_default()
            .to_lowercase(),
        password: form.text_owned("password").unwrap_or_default(),
    };
    input
        .validate()
        .map_err(|e| CoreError::Validation(validation_message(&e)))?;

    let taken =
        UserRepo::exists_by_username_or_email(&state.pool, &input.username, &input.email).await?;
    if taken {
        return Err(AppError::Core(CoreError::Validation(
            "User with email or username already exists".into(),
        )));
    }

    let avatar = form
        .take_file("avatar")
        .ok_or_else(|| AppError::Core(CoreError::Validation("Avatar file is required".into())))?;
    let stored = promote(state.media.as_ref(), avatar).await?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username,
            email: input.email,
            full_name: input.full_name,
            password_hash,
            avatar_url: stored.url,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            StatusCode::CREATED,
            user.into(),
            "User registered successfully",
        )),
    ))
}

/// POST /api/users/login
///
/// Authenticate with username-or-email + password. Sets both session
/// cookies and returns the token pair in the body as well.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<ApiResponse<LoginData>>)> {
    let identifier = input
        .username
        .as_deref()
        .or(input.email.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation("Username or email is required".into()))
        })?;

    let user = UserRepo::find_by_identifier(&state.pool, identifier)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound("User does not exist".into())))?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid user credentials".into(),
        )));
    }

    let (access_token, refresh_token) = issue_tokens(&state, user.id).await?;
    let (access_cookie, refresh_cookie) = auth_cookies(&access_token, &refresh_token);
    let jar = jar.add(access_cookie).add(refresh_cookie);

    Ok((
        jar,
        Json(ApiResponse::ok(
            LoginData {
                user: user.into(),
                access_token,
                refresh_token,
            },
            "User logged in successfully",
        )),
    ))
}

/// POST /api/users/logout
///
/// Clears the stored refresh slot and expires both cookies; the
/// previously issued refresh token becomes permanently unusable.
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<ApiResponse<serde_json::Value>>)> {
    UserRepo::set_refresh_token_hash(&state.pool, auth.user.id, None).await?;

    let (access_cookie, refresh_cookie) = clear_auth_cookies();
    let jar = jar.add(access_cookie).add(refresh_cookie);

    Ok((
        jar,
        Json(ApiResponse::ok(serde_json::json!({}), "User logged out")),
    ))
}

/// POST /api/users/refresh-token
///
/// Exchange a valid refresh token (cookie or body) for a rotated pair.
/// A token superseded by a later login or refresh is rejected even if
/// its signature is still valid.
pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Option<Json<RefreshRequest>>,
) -> AppResult<(CookieJar, Json<ApiResponse<TokenPairData>>)> {
    let incoming = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .or_else(|| body.and_then(|Json(b)| b.refresh_token))
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Unauthorized request".into()))
        })?;

    let claims = validate_refresh_token(&incoming, &state.config.tokens).map_err(|_| {
        AppError::Core(CoreError::Unauthorized("Invalid refresh token".into()))
    })?;

    let user = UserRepo::find_by_id(&state.pool, claims.sub)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Invalid refresh token".into())))?;

    // The stored hash is the source of truth for revocation: a rotated or
    // logged-out token fails here even though its signature verifies.
    let stored = user.refresh_token_hash.as_deref().ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized("Refresh token expired".into()))
    })?;
    if hash_refresh_token(&incoming) != stored {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Refresh token expired".into(),
        )));
    }

    let (access_token, refresh_token) = issue_tokens(&state, user.id).await?;
    let (access_cookie, refresh_cookie) = auth_cookies(&access_token, &refresh_token);
    let jar = jar.add(access_cookie).add(refresh_cookie);

    Ok((
        jar,
        Json(ApiResponse::ok(
            TokenPairData {
                access_token,
                refresh_token,
            },
            "Access token refreshed",
        )),
    ))
}

/// POST /api/users/change-password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    if input.new_password != input.confirm_password {
        return Err(AppError::Core(CoreError::Validation(
            "New password and confirm password must match".into(),
        )));
    }
    if input.new_password.len() < 8 {
        return Err(AppError::Core(CoreError::Validation(
            "Password must be at least 8 characters".into(),
        )));
    }

    let old_valid = verify_password(&input.old_password, &auth.user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !old_valid {
        return Err(AppError::Core(CoreError::Validation("Wrong password".into())));
    }

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    let updated = UserRepo::update_password(&state.pool, auth.user.id, &password_hash).await?;
    if !updated {
        return Err(AppError::InternalError(
            "Password update affected no rows".into(),
        ));
    }

    Ok(Json(ApiResponse::ok(
        serde_json::json!({}),
        "Password changed successfully",
    )))
}

/// GET /api/users/current-user
pub async fn current_user(auth: AuthUser) -> Json<ApiResponse<UserResponse>> {
    Json(ApiResponse::ok(auth.user.into(), "Current user fetched"))
}

/// Optional profile fields accepted by update-info.
#[derive(Debug, Validate)]
struct UpdateInfoInput {
    #[validate(email(message = "Email must be a valid address"))]
    email: Option<String>,
}

/// PATCH /api/users/update-info
///
/// Multipart: optional newFullName, newEmail, avatar (file). Partial
/// update; omitted fields keep their prior values. A replaced avatar's
/// old remote image is deleted best-effort after the row is updated.
pub async fn update_info(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let mut form = stage_form(multipart, &state.config.upload_staging_dir, &["avatar"]).await?;

    let new_full_name = form.text_owned("newFullName");
    let new_email = form.text_owned("newEmail");
    let avatar = form.take_file("avatar");

    if new_full_name.is_none() && new_email.is_none() && avatar.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "Nothing to update".into(),
        )));
    }

    UpdateInfoInput {
        email: new_email.clone(),
    }
    .validate()
    .map_err(|e| CoreError::Validation(validation_message(&e)))?;

    let new_avatar_url = match avatar {
        Some(staged) => Some(promote(state.media.as_ref(), staged).await?.url),
        None => None,
    };
    let replacing_avatar = new_avatar_url.is_some();
    let old_avatar_url = auth.user.avatar_url.clone();

    let patch = UpdateUserInfo {
        full_name: new_full_name,
        email: new_email,
        avatar_url: new_avatar_url,
    };
    let user = UserRepo::update_info(&state.pool, auth.user.id, &patch)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound("User does not exist".into())))?;

    // Best-effort cleanup of the superseded remote image; a failure here
    // must never undo the profile update.
    if replacing_avatar {
        if let Err(e) = state.media.delete(&old_avatar_url).await {
            tracing::warn!(url = %old_avatar_url, error = %e, "Failed to delete old avatar");
        }
    }

    Ok(Json(ApiResponse::ok(
        user.into(),
        "User info updated successfully",
    )))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Issue a fresh access/refresh pair and persist the refresh hash into
/// the user's single slot, superseding whatever token was there.
///
/// Any failure is surfaced as an opaque 500; token internals never reach
/// the client.
async fn issue_tokens(state: &AppState, user_id: DbId) -> AppResult<(String, String)> {
    let access_token = generate_access_token(user_id, &state.config.tokens)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let (refresh_token, refresh_hash) = generate_refresh_token(user_id, &state.config.tokens)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let updated =
        UserRepo::set_refresh_token_hash(&state.pool, user_id, Some(&refresh_hash)).await?;
    if !updated {
        return Err(AppError::InternalError(format!(
            "Refresh slot write affected no rows for user {user_id}"
        )));
    }

    Ok((access_token, refresh_token))
}

/// First human-readable message out of a validator error set.
fn validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|field| field.iter())
        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .next()
        .unwrap_or_else(|| "Invalid input".to_string())
}
