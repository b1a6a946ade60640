//! SeaORM entities mirroring the migrated schema.

pub mod comment;
pub mod post;
pub mod tag;
pub mod tagged_item;
pub mod user;
