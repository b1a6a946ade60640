use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::fields::{self, TITLE_MAX_LEN};
use super::tag::TaggedObject;
use crate::error::DomainError;

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PostStatus {
    #[default]
    #[serde(rename = "DF")]
    Draft,
    #[serde(rename = "PB")]
    Published,
}

impl PostStatus {
    /// Two-letter code stored in the `status` column.
    pub fn code(self) -> &'static str {
        match self {
            PostStatus::Draft => "DF",
            PostStatus::Published => "PB",
        }
    }

    /// Human-readable label shown to editors.
    pub fn label(self) -> &'static str {
        match self {
            PostStatus::Draft => "Чорновик",
            PostStatus::Published => "Публікація",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "DF" => Some(PostStatus::Draft),
            "PB" => Some(PostStatus::Published),
            _ => None,
        }
    }
}

/// Post entity - a blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub author_id: i64,
    pub body: String,
    pub publish: DateTime<Utc>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub status: PostStatus,
}

impl Post {
    /// Content type label used by the generic tagging relation.
    pub const CONTENT_TYPE: &'static str = "blog.post";

    /// The calendar date (UTC) that scopes slug uniqueness.
    pub fn publish_date(&self) -> NaiveDate {
        self.publish.date_naive()
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// Permalink path: `/blog/{year}/{month}/{day}/{slug}/`.
    pub fn absolute_url(&self) -> String {
        let date = self.publish_date();
        format!(
            "/blog/{}/{}/{}/{}/",
            date.year(),
            date.month(),
            date.day(),
            self.slug
        )
    }

    pub fn tag_target(&self) -> TaggedObject {
        TaggedObject::post(self.id)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate_post_fields(&self.title, &self.slug, &self.body)
    }

    /// Error for a write that would reuse `slug` on the publish date `date`.
    pub fn slug_taken(slug: &str, date: NaiveDate) -> DomainError {
        DomainError::Duplicate(format!(
            "slug '{slug}' is already used by a post published on {date}"
        ))
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// A post that has not been stored yet.
///
/// `publish` falls back to the insertion time when left unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub slug: String,
    pub author_id: i64,
    pub body: String,
    pub publish: Option<DateTime<Utc>>,
    pub status: PostStatus,
}

impl NewPost {
    pub fn new(
        author_id: i64,
        title: impl Into<String>,
        slug: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            author_id,
            body: body.into(),
            publish: None,
            status: PostStatus::default(),
        }
    }

    pub fn published_at(mut self, publish: DateTime<Utc>) -> Self {
        self.publish = Some(publish);
        self
    }

    pub fn with_status(mut self, status: PostStatus) -> Self {
        self.status = status;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate_post_fields(&self.title, &self.slug, &self.body)
    }
}

fn validate_post_fields(title: &str, slug: &str, body: &str) -> Result<(), DomainError> {
    fields::require_text("title", title, TITLE_MAX_LEN)?;
    fields::validate_slug(slug)?;
    fields::require_body("body", body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(publish: DateTime<Utc>) -> Post {
        Post {
            id: 7,
            title: "Hello".to_string(),
            slug: "hello".to_string(),
            author_id: 1,
            body: "First post".to_string(),
            publish,
            created: publish,
            updated: publish,
            status: PostStatus::Draft,
        }
    }

    #[test]
    fn new_post_defaults_to_draft() {
        let post = NewPost::new(1, "Hello", "hello", "body");
        assert_eq!(post.status, PostStatus::Draft);
        assert!(post.publish.is_none());
    }

    #[test]
    fn absolute_url_uses_publish_date() {
        let post = sample(Utc.with_ymd_and_hms(2024, 3, 5, 23, 59, 0).unwrap());
        assert_eq!(post.absolute_url(), "/blog/2024/3/5/hello/");
    }

    #[test]
    fn displays_as_title() {
        let post = sample(Utc::now());
        assert_eq!(post.to_string(), "Hello");
    }

    #[test]
    fn status_codes_round_trip() {
        for status in [PostStatus::Draft, PostStatus::Published] {
            assert_eq!(PostStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(PostStatus::from_code("XX"), None);
        assert_eq!(PostStatus::Published.label(), "Публікація");
    }

    #[test]
    fn status_serializes_as_code() {
        let json = serde_json::to_string(&PostStatus::Published).unwrap();
        assert_eq!(json, "\"PB\"");
    }

    #[test]
    fn validation_rejects_long_title_and_bad_slug() {
        let long_title = "t".repeat(TITLE_MAX_LEN + 1);
        assert!(NewPost::new(1, long_title, "ok", "body").validate().is_err());
        assert!(NewPost::new(1, "Title", "not a slug", "body").validate().is_err());
        assert!(NewPost::new(1, "Title", "ok", "   ").validate().is_err());
        assert!(NewPost::new(1, "Title", "ok", "body").validate().is_ok());
    }
}
