//! # Blog Core
//!
//! The domain layer of the blog.
//! Posts, comments, tags and the repository ports that store them.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod query;

pub use error::{DomainError, RepoError};
pub use query::PostScope;
