//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- access/refresh claim generation, validation, and the
//!   refresh-token hash helpers.
//! - [`cookies`] -- the `accessToken`/`refreshToken` session cookie pair.

pub mod cookies;
pub mod jwt;
pub mod password;
