//! Repository handles over the shared in-memory state.

use async_trait::async_trait;
use chrono::NaiveDate;

use blog_core::domain::fields::mask_email;
use blog_core::domain::{
    Comment, NewComment, NewPost, NewUser, Post, Tag, TaggedObject, User,
};
use blog_core::error::{DomainError, RepoError};
use blog_core::ports::{
    BaseRepository, CommentRepository, PostRepository, TagRepository, UserRepository,
};
use blog_core::query::PostScope;

use super::{InMemoryStore, check_tag_names, next_id};

macro_rules! handle {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone)]
        pub struct $name {
            store: InMemoryStore,
        }

        impl $name {
            pub fn new(store: InMemoryStore) -> Self {
                Self { store }
            }
        }
    };
}

handle!(InMemoryUserRepository, "In-memory user repository.");
handle!(InMemoryPostRepository, "In-memory post repository.");
handle!(InMemoryCommentRepository, "In-memory comment repository.");
handle!(InMemoryTagRepository, "In-memory tagging relation.");

#[async_trait]
impl BaseRepository<User, i64> for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        let state = self.store.state.read().await;
        Ok(state.users.get(&id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut state = self.store.state.write().await;
        if !state.delete_user(id) {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, RepoError> {
        user.validate()?;

        let mut state = self.store.state.write().await;
        if state.users.values().any(|u| u.username == user.username) {
            return Err(DomainError::Duplicate(format!(
                "username '{}' is taken",
                user.username
            ))
            .into());
        }

        let id = next_id(&mut state.sequences.users);
        let stored = User {
            id,
            username: user.username,
            email: user.email,
            date_joined: self.store.clock.now(),
        };
        state.users.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let state = self.store.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");
        let state = self.store.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl BaseRepository<Post, i64> for InMemoryPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        let state = self.store.state.read().await;
        Ok(state.posts.get(&id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut state = self.store.state.write().await;
        if !state.delete_post(id) {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        post.validate()?;

        let now = self.store.clock.now();
        let publish = post.publish.unwrap_or(now);

        let mut state = self.store.state.write().await;
        state.require_author(post.author_id)?;
        let date = publish.date_naive();
        if state.slug_taken(&post.slug, date, None) {
            return Err(Post::slug_taken(&post.slug, date).into());
        }

        let id = next_id(&mut state.sequences.posts);
        let stored = Post {
            id,
            title: post.title,
            slug: post.slug,
            author_id: post.author_id,
            body: post.body,
            publish,
            created: now,
            updated: now,
            status: post.status,
        };
        tracing::debug!(post_id = id, slug = %stored.slug, "Created post");
        state.posts.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        post.validate()?;

        let mut state = self.store.state.write().await;
        let created = state
            .posts
            .get(&post.id)
            .map(|existing| existing.created)
            .ok_or(DomainError::NotFound {
                entity_type: "post",
                id: post.id,
            })?;
        state.require_author(post.author_id)?;
        let date = post.publish_date();
        if state.slug_taken(&post.slug, date, Some(post.id)) {
            return Err(Post::slug_taken(&post.slug, date).into());
        }

        let stored = Post {
            created,
            updated: self.store.clock.now(),
            ..post
        };
        state.posts.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn list(&self, scope: PostScope) -> Result<Vec<Post>, RepoError> {
        let state = self.store.state.read().await;
        Ok(scope.apply(state.posts.values()))
    }

    async fn list_tagged(
        &self,
        scope: PostScope,
        tag_slug: &str,
    ) -> Result<Vec<Post>, RepoError> {
        let state = self.store.state.read().await;
        let ids = state.tagged_ids(Post::CONTENT_TYPE, tag_slug);
        Ok(scope.apply(ids.iter().filter_map(|id| state.posts.get(id))))
    }

    async fn find_by_date_and_slug(
        &self,
        date: NaiveDate,
        slug: &str,
        scope: PostScope,
    ) -> Result<Option<Post>, RepoError> {
        let state = self.store.state.read().await;
        Ok(state
            .posts
            .values()
            .find(|post| scope.matches(post) && post.slug == slug && post.publish_date() == date)
            .cloned())
    }

    async fn find_by_author(&self, author_id: i64) -> Result<Vec<Post>, RepoError> {
        let state = self.store.state.read().await;
        Ok(PostScope::All.apply(
            state
                .posts
                .values()
                .filter(|post| post.author_id == author_id),
        ))
    }
}

#[async_trait]
impl BaseRepository<Comment, i64> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, RepoError> {
        let state = self.store.state.read().await;
        Ok(state.comments.get(&id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut state = self.store.state.write().await;
        state
            .comments
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError> {
        comment.validate()?;

        let now = self.store.clock.now();
        let mut state = self.store.state.write().await;
        state.require_post(comment.post_id)?;

        let id = next_id(&mut state.sequences.comments);
        let stored = Comment {
            id,
            post_id: comment.post_id,
            name: comment.name,
            email: comment.email,
            body: comment.body,
            created: now,
            updated: now,
            active: comment.active,
        };
        tracing::debug!(
            comment_id = id,
            post_id = stored.post_id,
            email = %mask_email(&stored.email),
            "Created comment"
        );
        state.comments.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        comment.validate()?;

        let mut state = self.store.state.write().await;
        let created = state
            .comments
            .get(&comment.id)
            .map(|existing| existing.created)
            .ok_or(DomainError::NotFound {
                entity_type: "comment",
                id: comment.id,
            })?;
        state.require_post(comment.post_id)?;

        let stored = Comment {
            created,
            updated: self.store.clock.now(),
            ..comment
        };
        state.comments.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_by_post(
        &self,
        post_id: i64,
        active_only: bool,
    ) -> Result<Vec<Comment>, RepoError> {
        let state = self.store.state.read().await;
        let mut comments: Vec<Comment> = state
            .comments
            .values()
            .filter(|c| c.post_id == post_id && (c.active || !active_only))
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created.cmp(&b.created).then(a.id.cmp(&b.id)));
        Ok(comments)
    }
}

#[async_trait]
impl TagRepository for InMemoryTagRepository {
    async fn tags_for(&self, object: TaggedObject) -> Result<Vec<Tag>, RepoError> {
        let state = self.store.state.read().await;
        Ok(state.tags_for(&object))
    }

    async fn set_tags(
        &self,
        object: TaggedObject,
        names: &[String],
    ) -> Result<Vec<Tag>, RepoError> {
        check_tag_names(names)?;

        let mut state = self.store.state.write().await;
        state.detach_all(&object);
        state.attach(&object, names)?;
        Ok(state.tags_for(&object))
    }

    async fn add_tags(
        &self,
        object: TaggedObject,
        names: &[String],
    ) -> Result<Vec<Tag>, RepoError> {
        check_tag_names(names)?;

        let mut state = self.store.state.write().await;
        state.attach(&object, names)?;
        Ok(state.tags_for(&object))
    }

    async fn clear(&self, object: TaggedObject) -> Result<(), RepoError> {
        let mut state = self.store.state.write().await;
        state.detach_all(&object);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<Tag>, RepoError> {
        let state = self.store.state.read().await;
        let mut tags: Vec<Tag> = state.tags.values().cloned().collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }
}
