//! Request-pipeline extractors.
//!
//! - [`auth::AuthUser`] -- resolves the authenticated user from the
//!   `accessToken` cookie (or a Bearer header) before a handler runs.

pub mod auth;
