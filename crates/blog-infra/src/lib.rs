//! # Blog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`.
//! This crate contains the PostgreSQL and in-memory storage backends.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL database support via SeaORM

pub mod config;
pub mod database;
pub mod memory;
pub mod store;

// Re-exports
pub use config::{ConfigError, DatabaseConfig};
pub use memory::InMemoryStore;
pub use store::BlogStore;

#[cfg(feature = "postgres")]
pub use database::BlogDatabase;
