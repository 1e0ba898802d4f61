//! Session cookie pair: `accessToken` and `refreshToken`.
//!
//! Both cookies are HTTP-only, secure, SameSite=Lax, path `/`, with a
//! uniform 7-day max-age. The access token expires (cryptographically)
//! long before its cookie does; the stale cookie then simply fails
//! verification and drives the client to the refresh endpoint.

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

/// Cookie carrying the short-lived access token.
pub const ACCESS_COOKIE: &str = "accessToken";
/// Cookie carrying the long-lived refresh token.
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Uniform max-age applied to both cookies.
const COOKIE_MAX_AGE_DAYS: i64 = 7;

fn session_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::days(COOKIE_MAX_AGE_DAYS))
        .build()
}

/// Build the cookie pair for a freshly issued token pair.
pub fn auth_cookies(
    access_token: &str,
    refresh_token: &str,
) -> (Cookie<'static>, Cookie<'static>) {
    (
        session_cookie(ACCESS_COOKIE, access_token.to_string()),
        session_cookie(REFRESH_COOKIE, refresh_token.to_string()),
    )
}

/// Build removal cookies for both slots (logout).
pub fn clear_auth_cookies() -> (Cookie<'static>, Cookie<'static>) {
    let clear = |name: &'static str| {
        Cookie::build((name, ""))
            .http_only(true)
            .secure(true)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(Duration::ZERO)
            .build()
    };
    (clear(ACCESS_COOKIE), clear(REFRESH_COOKIE))
}
