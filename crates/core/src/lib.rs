//! Shared domain types for the Inkpost platform.
//!
//! Contains the error taxonomy, id/timestamp aliases, and input
//! validation helpers used by the database and API crates.

pub mod error;
pub mod types;
pub mod validation;
