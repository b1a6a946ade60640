//! In-memory storage - used when no database is configured, and in tests.
//!
//! Mirrors the relational schema's guarantees: cascading deletes,
//! `(slug, publish date)` uniqueness and the default orderings.
//! Note: Data is lost on process restart.

mod repos;


use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::RwLock;

use blog_core::domain::tag::{suffixed_slug, tag_slug};
use blog_core::domain::{Comment, Post, Tag, TaggedItem, TaggedObject, User};
use blog_core::error::RepoError;
use blog_core::ports::{Clock, SystemClock};

pub use repos::{
    InMemoryCommentRepository, InMemoryPostRepository, InMemoryTagRepository,
    InMemoryUserRepository,
};

/// Shared in-memory store. Cloning shares the underlying data.
#[derive(Clone)]
pub struct InMemoryStore {
    state: Arc<RwLock<MemoryState>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Store stamping `created` / `updated` from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState::default())),
            clock,
        }
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository::new(self.clone())
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository::new(self.clone())
    }

    pub fn comments(&self) -> InMemoryCommentRepository {
        InMemoryCommentRepository::new(self.clone())
    }

    pub fn tags(&self) -> InMemoryTagRepository {
        InMemoryTagRepository::new(self.clone())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Last id handed out per table.
#[derive(Default)]
struct Sequences {
    users: i64,
    posts: i64,
    comments: i64,
    tags: i64,
    tagged_items: i64,
}

fn clean_names(names: &[String]) -> impl Iterator<Item = &str> {
    names.iter().map(|n| n.trim()).filter(|n| !n.is_empty())
}

/// Rejects the batch before anything is written.
fn check_tag_names(names: &[String]) -> Result<(), RepoError> {
    for name in clean_names(names) {
        tag_slug(name)?;
    }
    Ok(())
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

#[derive(Default)]
struct MemoryState {
    users: BTreeMap<i64, User>,
    posts: BTreeMap<i64, Post>,
    comments: BTreeMap<i64, Comment>,
    tags: BTreeMap<i64, Tag>,
    tagged_items: Vec<TaggedItem>,
    sequences: Sequences,
}

impl MemoryState {
    /// Whether another post already uses `slug` on `date`.
    fn slug_taken(&self, slug: &str, date: NaiveDate, except: Option<i64>) -> bool {
        self.posts.values().any(|post| {
            Some(post.id) != except && post.slug == slug && post.publish_date() == date
        })
    }

    fn require_author(&self, author_id: i64) -> Result<(), RepoError> {
        if self.users.contains_key(&author_id) {
            Ok(())
        } else {
            Err(RepoError::Constraint(format!(
                "author {author_id} does not exist"
            )))
        }
    }

    fn require_post(&self, post_id: i64) -> Result<(), RepoError> {
        if self.posts.contains_key(&post_id) {
            Ok(())
        } else {
            Err(RepoError::Constraint(format!("post {post_id} does not exist")))
        }
    }

    /// Removes a post with its comments and tag links.
    fn delete_post(&mut self, post_id: i64) -> bool {
        if self.posts.remove(&post_id).is_none() {
            return false;
        }
        self.comments.retain(|_, comment| comment.post_id != post_id);
        let target = TaggedObject::post(post_id);
        self.tagged_items.retain(|item| !item.points_at(&target));
        true
    }

    /// Removes a user with everything they authored.
    fn delete_user(&mut self, user_id: i64) -> bool {
        if self.users.remove(&user_id).is_none() {
            return false;
        }
        let authored: Vec<i64> = self
            .posts
            .values()
            .filter(|post| post.author_id == user_id)
            .map(|post| post.id)
            .collect();
        for post_id in authored {
            self.delete_post(post_id);
        }
        true
    }

    fn tags_for(&self, object: &TaggedObject) -> Vec<Tag> {
        let mut tags: Vec<Tag> = self
            .tagged_items
            .iter()
            .filter(|item| item.points_at(object))
            .filter_map(|item| self.tags.get(&item.tag_id).cloned())
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        tags
    }

    fn detach_all(&mut self, object: &TaggedObject) {
        self.tagged_items.retain(|item| !item.points_at(object));
    }

    fn get_or_create_tag(&mut self, name: &str) -> Result<i64, RepoError> {
        if let Some(tag) = self.tags.values().find(|tag| tag.name == name) {
            return Ok(tag.id);
        }

        let base = tag_slug(name)?;
        let mut slug = base.clone();
        let mut suffix = 1;
        while self.tags.values().any(|tag| tag.slug == slug) {
            slug = suffixed_slug(&base, suffix);
            suffix += 1;
        }

        let id = next_id(&mut self.sequences.tags);
        self.tags.insert(
            id,
            Tag {
                id,
                name: name.to_string(),
                slug,
            },
        );
        Ok(id)
    }

    fn attach(&mut self, object: &TaggedObject, names: &[String]) -> Result<(), RepoError> {
        for name in clean_names(names) {
            let tag_id = self.get_or_create_tag(name)?;
            let linked = self
                .tagged_items
                .iter()
                .any(|item| item.tag_id == tag_id && item.points_at(object));
            if linked {
                continue;
            }

            let id = next_id(&mut self.sequences.tagged_items);
            self.tagged_items.push(TaggedItem {
                id,
                tag_id,
                content_type: object.content_type.to_string(),
                object_id: object.object_id,
            });
        }
        Ok(())
    }

    /// Ids of `content_type` objects carrying the tag with `slug`.
    fn tagged_ids(&self, content_type: &str, slug: &str) -> Vec<i64> {
        let Some(tag) = self.tags.values().find(|tag| tag.slug == slug) else {
            return Vec::new();
        };
        self.tagged_items
            .iter()
            .filter(|item| item.tag_id == tag.id && item.content_type == content_type)
            .map(|item| item.object_id)
            .collect()
    }
}
