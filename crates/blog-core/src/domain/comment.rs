use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Post;
use super::fields::{self, COMMENT_NAME_MAX_LEN};
use crate::error::DomainError;

/// Comment entity - an unauthenticated reader comment on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub name: String,
    pub email: String,
    pub body: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    /// Moderation flag. Inactive comments stay stored but hidden.
    pub active: bool,
}

impl Comment {
    /// Short description, e.g. `Comment by Olena on Hello`.
    pub fn summary(&self, post: &Post) -> String {
        format!("Comment by {} on {}", self.name, post)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate_comment_fields(&self.name, &self.email, &self.body)
    }
}

/// A comment that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub post_id: i64,
    pub name: String,
    pub email: String,
    pub body: String,
    pub active: bool,
}

impl NewComment {
    pub fn new(
        post_id: i64,
        name: impl Into<String>,
        email: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            post_id,
            name: name.into(),
            email: email.into(),
            body: body.into(),
            active: true,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate_comment_fields(&self.name, &self.email, &self.body)
    }
}

fn validate_comment_fields(name: &str, email: &str, body: &str) -> Result<(), DomainError> {
    fields::require_text("name", name, COMMENT_NAME_MAX_LEN)?;
    fields::validate_email(email)?;
    fields::require_body("body", body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PostStatus;

    #[test]
    fn new_comment_is_active() {
        let comment = NewComment::new(1, "Olena", "olena@example.com", "Nice post");
        assert!(comment.active);
        assert!(comment.validate().is_ok());
    }

    #[test]
    fn rejects_malformed_email_and_long_name() {
        let bad_email = NewComment::new(1, "Olena", "olena-at-example", "Nice");
        assert!(bad_email.validate().is_err());

        let long_name = NewComment::new(1, "n".repeat(81), "olena@example.com", "Nice");
        assert!(long_name.validate().is_err());
    }

    #[test]
    fn summary_names_commenter_and_post() {
        let now = Utc::now();
        let post = Post {
            id: 1,
            title: "Hello".into(),
            slug: "hello".into(),
            author_id: 1,
            body: "body".into(),
            publish: now,
            created: now,
            updated: now,
            status: PostStatus::Published,
        };
        let comment = Comment {
            id: 3,
            post_id: 1,
            name: "Olena".into(),
            email: "olena@example.com".into(),
            body: "Nice".into(),
            created: now,
            updated: now,
            active: true,
        };
        assert_eq!(comment.summary(&post), "Comment by Olena on Hello");
    }
}
