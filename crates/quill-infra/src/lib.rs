//! # Quill Infrastructure
//!
//! Concrete implementations of the store ports defined in `quill-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL store via SeaORM
//! - `minimal` - No external dependencies, in-memory only

pub mod database;

pub use database::{
    DatabaseConfig, DatabaseConnections, InMemoryAuthorRepository, InMemoryPostRepository,
};

#[cfg(feature = "postgres")]
pub use database::{PostgresAuthorRepository, PostgresPostRepository};
