use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{Comment, NewComment, NewPost, NewUser, Post, Tag, TaggedObject, User};
use crate::error::RepoError;
use crate::query::PostScope;

/// Generic repository trait shared by every stored entity.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Delete an entity by its ID. Dependent rows go with it.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository - just enough to own posts.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i64> {
    async fn create(&self, user: NewUser) -> Result<User, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i64> {
    /// Insert a post. `created`/`updated` are stamped here and `publish`
    /// defaults to the insertion time.
    ///
    /// Fails with [`RepoError::Constraint`] when another post already uses the
    /// slug on the same publish date, or the author does not exist.
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Persist changes to a stored post. `created` is preserved and `updated`
    /// is refreshed.
    async fn update(&self, post: Post) -> Result<Post, RepoError>;

    /// Posts visible in `scope`, newest `publish` first.
    async fn list(&self, scope: PostScope) -> Result<Vec<Post>, RepoError>;

    /// Posts visible in `scope` carrying the tag with `tag_slug`.
    async fn list_tagged(&self, scope: PostScope, tag_slug: &str)
    -> Result<Vec<Post>, RepoError>;

    /// Permalink lookup: the post published on `date` (UTC) under `slug`.
    async fn find_by_date_and_slug(
        &self,
        date: NaiveDate,
        slug: &str,
        scope: PostScope,
    ) -> Result<Option<Post>, RepoError>;

    async fn find_by_author(&self, author_id: i64) -> Result<Vec<Post>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, i64> {
    /// Insert a comment on an existing post.
    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError>;

    /// Persist changes (typically moderation) to a stored comment.
    async fn update(&self, comment: Comment) -> Result<Comment, RepoError>;

    /// Comments on a post, oldest first. `active_only` hides moderated ones.
    async fn find_by_post(&self, post_id: i64, active_only: bool)
    -> Result<Vec<Comment>, RepoError>;
}

/// Generic tagging relation.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Tags attached to `object`, sorted by name.
    async fn tags_for(&self, object: TaggedObject) -> Result<Vec<Tag>, RepoError>;

    /// Replace the tags on `object` with `names`, creating missing tags.
    async fn set_tags(&self, object: TaggedObject, names: &[String])
    -> Result<Vec<Tag>, RepoError>;

    /// Attach `names` to `object` in addition to its current tags.
    async fn add_tags(&self, object: TaggedObject, names: &[String])
    -> Result<Vec<Tag>, RepoError>;

    /// Detach every tag from `object`. Tags themselves are kept.
    async fn clear(&self, object: TaggedObject) -> Result<(), RepoError>;

    /// Every known tag, sorted by name.
    async fn all(&self) -> Result<Vec<Tag>, RepoError>;
}
