use std::path::PathBuf;

use crate::auth::jwt::TokenConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the token secrets and media credentials have
/// defaults suitable for local development. Loaded once at startup into
/// an immutable value shared through [`crate::state::AppState`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory where multipart uploads are staged before the media
    /// collaborator receives them.
    pub upload_staging_dir: PathBuf,
    /// Token signing configuration (secrets, expiry durations).
    pub tokens: TokenConfig,
    /// Image host connection settings.
    pub media: MediaConfig,
}

/// Connection settings for the hosted image service.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Service root URL.
    pub base_url: String,
    /// Bearer credential.
    pub api_key: String,
    /// Per-request timeout in seconds (default: `30`).
    pub timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `8000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `UPLOAD_STAGING_DIR`   | `/tmp/inkpost-staging`     |
    /// | `MEDIA_BASE_URL`       | **required**               |
    /// | `MEDIA_API_KEY`        | **required**               |
    /// | `MEDIA_TIMEOUT_SECS`   | `30`                       |
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing or unparseable; startup
    /// misconfiguration should fail fast.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let upload_staging_dir = PathBuf::from(
            std::env::var("UPLOAD_STAGING_DIR")
                .unwrap_or_else(|_| "/tmp/inkpost-staging".into()),
        );

        let tokens = TokenConfig::from_env();
        let media = MediaConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            upload_staging_dir,
            tokens,
            media,
        }
    }
}

impl MediaConfig {
    /// Load image-host settings from the environment.
    ///
    /// # Panics
    ///
    /// Panics if `MEDIA_BASE_URL` or `MEDIA_API_KEY` is not set.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("MEDIA_BASE_URL").expect("MEDIA_BASE_URL must be set in the environment");
        let api_key =
            std::env::var("MEDIA_API_KEY").expect("MEDIA_API_KEY must be set in the environment");

        let timeout_secs: u64 = std::env::var("MEDIA_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("MEDIA_TIMEOUT_SECS must be a valid u64");

        Self {
            base_url,
            api_key,
            timeout_secs,
        }
    }
}
