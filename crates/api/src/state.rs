use std::sync::Arc;

use inkpost_media::MediaStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: inkpost_db::DbPool,
    /// Immutable server configuration, loaded once at startup.
    pub config: Arc<ServerConfig>,
    /// Image-hosting collaborator (remote in production, local in tests).
    pub media: Arc<dyn MediaStore>,
}
