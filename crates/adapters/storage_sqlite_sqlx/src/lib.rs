//! # robohub-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `robohub-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//! - Back the single-default-robot invariant with a partial unique index
//!   and a transactional promotion
//!
//! ## Dependency rule
//! Depends on `robohub-app` (for port traits) and `robohub-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod config_repo;
pub mod error;
pub mod pool;
pub mod robot_repo;

pub use config_repo::SqliteAutomationConfigRepository;
pub use error::StorageError;
pub use pool::{Config, Database};
pub use robot_repo::SqliteRobotRepository;
