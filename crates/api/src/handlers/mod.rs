//! Request handlers.
//!
//! Each submodule provides async handler functions for a single resource.
//! Handlers delegate to repositories in `inkpost_db` and to the media
//! collaborator, propagating typed errors via [`crate::error::AppError`].

pub mod blogs;
pub mod users;
