//! Domain entities - the core business objects.

mod comment;
pub mod fields;
mod post;
pub mod tag;
mod user;

pub use comment::{Comment, NewComment};
pub use post::{NewPost, Post, PostStatus};
pub use tag::{Tag, TaggedItem, TaggedObject};
pub use user::{NewUser, User};
