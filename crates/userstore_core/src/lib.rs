//! SQLite-backed record store for `User` entities.
//! This crate owns the `users` schema and every statement run against it.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{DbTarget, StoreConfig};
pub use error::{ArgumentError, StoreError, StoreErrorKind, StoreResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::user::{User, UserId, MAX_NAME_CHARS, UNASSIGNED_USER_ID};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use service::user_service::UserService;
pub use store::UserStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
