//! Access/refresh token generation and validation.
//!
//! Both tokens are HS256-signed JWTs with distinct secrets and expiries:
//! the access token is short-lived and verified statelessly; the refresh
//! token is long-lived and additionally mirrored (as a SHA-256 hash) into
//! the user's single refresh slot, which makes it revocable by overwrite.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use inkpost_core::types::DbId;

/// Claims embedded in an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessClaims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4).
    pub jti: String,
}

/// Claims embedded in a refresh token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RefreshClaims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4); guarantees rotated tokens differ
    /// even when minted within the same second.
    pub jti: String,
}

/// Configuration for token generation and validation.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// HMAC-SHA256 secret for access tokens.
    pub access_secret: String,
    /// Access token lifetime in minutes (default: 15).
    pub access_expiry_mins: i64,
    /// HMAC-SHA256 secret for refresh tokens.
    pub refresh_secret: String,
    /// Refresh token lifetime in days (default: 7).
    pub refresh_expiry_days: i64,
}

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;
/// Default refresh token expiry in days.
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 7;

impl TokenConfig {
    /// Load token configuration from environment variables.
    ///
    /// | Env Var                      | Required | Default |
    /// |------------------------------|----------|---------|
    /// | `ACCESS_TOKEN_SECRET`        | **yes**  | --      |
    /// | `ACCESS_TOKEN_EXPIRY_MINS`   | no       | `15`    |
    /// | `REFRESH_TOKEN_SECRET`       | **yes**  | --      |
    /// | `REFRESH_TOKEN_EXPIRY_DAYS`  | no       | `7`     |
    ///
    /// # Panics
    ///
    /// Panics if either secret is not set, is empty, or the two secrets
    /// are identical (a shared secret would let an access token pass as a
    /// refresh token).
    pub fn from_env() -> Self {
        let access_secret = std::env::var("ACCESS_TOKEN_SECRET")
            .expect("ACCESS_TOKEN_SECRET must be set in the environment");
        assert!(!access_secret.is_empty(), "ACCESS_TOKEN_SECRET must not be empty");

        let refresh_secret = std::env::var("REFRESH_TOKEN_SECRET")
            .expect("REFRESH_TOKEN_SECRET must be set in the environment");
        assert!(!refresh_secret.is_empty(), "REFRESH_TOKEN_SECRET must not be empty");
        assert!(
            access_secret != refresh_secret,
            "ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET must differ"
        );

        let access_expiry_mins: i64 = std::env::var("ACCESS_TOKEN_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("ACCESS_TOKEN_EXPIRY_MINS must be a valid i64");

        let refresh_expiry_days: i64 = std::env::var("REFRESH_TOKEN_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_REFRESH_EXPIRY_DAYS.to_string())
            .parse()
            .expect("REFRESH_TOKEN_EXPIRY_DAYS must be a valid i64");

        Self {
            access_secret,
            access_expiry_mins,
            refresh_secret,
            refresh_expiry_days,
        }
    }
}

/// Generate an HS256 access token for the given user.
pub fn generate_access_token(
    user_id: DbId,
    config: &TokenConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = AccessClaims {
        sub: user_id,
        exp: now + config.access_expiry_mins * 60,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.access_secret.as_bytes()),
    )
}

/// Validate and decode an access token, returning the embedded [`AccessClaims`].
///
/// Validates the signature and expiration automatically. Callers normalize
/// every failure mode (malformed, expired, wrong secret) to 401.
pub fn validate_access_token(
    token: &str,
    config: &TokenConfig,
) -> Result<AccessClaims, jsonwebtoken::errors::Error> {
    let token_data = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(config.access_secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

/// Generate an HS256 refresh token for the given user.
///
/// Returns `(token, sha256_hex_hash)`. The token is sent to the client;
/// only the hash is persisted into the user's refresh slot.
pub fn generate_refresh_token(
    user_id: DbId,
    config: &TokenConfig,
) -> Result<(String, String), jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = RefreshClaims {
        sub: user_id,
        exp: now + config.refresh_expiry_days * 24 * 60 * 60,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.refresh_secret.as_bytes()),
    )?;
    let hash = hash_refresh_token(&token);
    Ok((token, hash))
}

/// Validate and decode a refresh token, returning the embedded [`RefreshClaims`].
///
/// Signature/expiry only; the caller must still compare the token's hash
/// against the user's stored slot to reject superseded tokens.
pub fn validate_refresh_token(
    token: &str,
    config: &TokenConfig,
) -> Result<RefreshClaims, jsonwebtoken::errors::Error> {
    let token_data = decode::<RefreshClaims>(
        token,
        &DecodingKey::from_secret(config.refresh_secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// Compute the SHA-256 hex digest of a refresh token.
///
/// Use this to compare an incoming refresh token against the stored hash.
pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
