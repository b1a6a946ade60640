//! Blog store - the repositories the application layer reads and writes through.

use std::sync::Arc;

use blog_core::domain::{Post, Tag};
use blog_core::error::RepoError;
use blog_core::ports::{CommentRepository, PostRepository, TagRepository, UserRepository};
use blog_core::query::PostScope;

use crate::config::DatabaseConfig;
use crate::memory::InMemoryStore;

#[cfg(feature = "postgres")]
use crate::database::{
    BlogDatabase, PostgresCommentRepository, PostgresPostRepository, PostgresTagRepository,
    PostgresUserRepository,
};

/// Shared handles to every blog repository.
#[derive(Clone)]
pub struct BlogStore {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub tags: Arc<dyn TagRepository>,
}

impl BlogStore {
    /// Store backed by process memory.
    pub fn in_memory() -> Self {
        Self::from_memory(InMemoryStore::new())
    }

    pub fn from_memory(store: InMemoryStore) -> Self {
        Self {
            users: Arc::new(store.users()),
            posts: Arc::new(store.posts()),
            comments: Arc::new(store.comments()),
            tags: Arc::new(store.tags()),
        }
    }

    /// Store backed by an open PostgreSQL pool.
    #[cfg(feature = "postgres")]
    pub fn postgres(db: &BlogDatabase) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::shared(Arc::clone(&db.conn))),
            posts: Arc::new(PostgresPostRepository::shared(Arc::clone(&db.conn))),
            comments: Arc::new(PostgresCommentRepository::shared(Arc::clone(&db.conn))),
            tags: Arc::new(PostgresTagRepository::shared(Arc::clone(&db.conn))),
        }
    }

    /// Build the store with the appropriate implementations.
    ///
    /// Without a database configuration the blog runs in memory.
    pub async fn from_config(config: Option<&DatabaseConfig>) -> Result<Self, RepoError> {
        match config {
            Some(config) => Self::connect(config).await,
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Ok(Self::in_memory())
            }
        }
    }

    #[cfg(feature = "postgres")]
    async fn connect(config: &DatabaseConfig) -> Result<Self, RepoError> {
        let db = BlogDatabase::connect(config)
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;
        tracing::info!("Blog store using PostgreSQL");
        Ok(Self::postgres(&db))
    }

    #[cfg(not(feature = "postgres"))]
    async fn connect(_config: &DatabaseConfig) -> Result<Self, RepoError> {
        tracing::warn!("Built without postgres feature - ignoring DATABASE_URL");
        Ok(Self::in_memory())
    }

    /// Every post, drafts included, newest first.
    pub async fn all_posts(&self) -> Result<Vec<Post>, RepoError> {
        self.posts.list(PostScope::All).await
    }

    /// Published posts only, newest first.
    pub async fn published_posts(&self) -> Result<Vec<Post>, RepoError> {
        self.posts.list(PostScope::Published).await
    }

    /// Replace a post's tags from free-form input such as `rust, "web dev"`.
    pub async fn tag_post(&self, post: &Post, input: &str) -> Result<Vec<Tag>, RepoError> {
        let names = blog_core::domain::tag::parse_tags(input);
        self.tags.set_tags(post.tag_target(), &names).await
    }
}

#[cfg(test)]
mod tests {
    use blog_core::domain::{NewComment, NewPost, NewUser, PostStatus};

    use super::*;

    #[tokio::test]
    async fn from_config_without_database_runs_in_memory() {
        let store = BlogStore::from_config(None).await.unwrap();
        assert!(store.all_posts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn accessors_split_drafts_from_published() {
        let store = BlogStore::in_memory();
        let author = store
            .users
            .create(NewUser::new("admin", "admin@example.com"))
            .await
            .unwrap();

        store
            .posts
            .create(NewPost::new(author.id, "Draft", "draft", "body"))
            .await
            .unwrap();
        let live = store
            .posts
            .create(
                NewPost::new(author.id, "Live", "live", "body")
                    .with_status(PostStatus::Published),
            )
            .await
            .unwrap();

        assert_eq!(store.all_posts().await.unwrap().len(), 2);
        assert_eq!(store.published_posts().await.unwrap(), vec![live.clone()]);

        store
            .comments
            .create(NewComment::new(live.id, "Ann", "ann@example.com", "Great"))
            .await
            .unwrap();
        assert_eq!(store.comments.find_by_post(live.id, true).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn tag_post_parses_input() {
        let store = BlogStore::in_memory();
        let author = store
            .users
            .create(NewUser::new("admin", ""))
            .await
            .unwrap();
        let post = store
            .posts
            .create(NewPost::new(author.id, "Hello", "hello", "body"))
            .await
            .unwrap();

        let tags = store.tag_post(&post, "rust, \"web dev\"").await.unwrap();
        let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["rust", "web dev"]);
    }
}
