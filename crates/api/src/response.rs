//! Uniform success envelope for API handlers.
//!
//! Every successful response is `{statusCode, data, message, success}`.
//! Clients branch on `success`, so the shape must stay stable; use
//! [`ApiResponse`] instead of ad-hoc `serde_json::json!` payloads. The
//! error half of the envelope lives in [`crate::error`].

use axum::http::StatusCode;
use serde::Serialize;

/// Standard success envelope wrapping any serializable payload.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub data: T,
    pub message: String,
    pub success: bool,
}

impl<T: Serialize> ApiResponse<T> {
    /// Build an envelope for the given status. `success` is derived from
    /// the status class, mirroring the error envelope's `success: false`.
    pub fn new(status: StatusCode, data: T, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            data,
            message: message.into(),
            success: status.as_u16() < 400,
        }
    }

    /// Shorthand for a 200 OK envelope.
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, data, message)
    }
}
