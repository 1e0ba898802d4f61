//! Repositories: stateless structs with async CRUD operations.
//!
//! Each repository takes `&PgPool` per call and returns raw `sqlx`
//! results; status classification happens at the API boundary.

pub mod blog_repo;
pub mod user_repo;

pub use blog_repo::BlogRepo;
pub use user_repo::UserRepo;
