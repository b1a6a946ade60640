use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fields::{self, USERNAME_MAX_LEN};
use crate::error::DomainError;

/// User entity - the author of posts.
///
/// Accounts are owned by the surrounding application; the blog only needs
/// enough of them for author references to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub date_joined: DateTime<Utc>,
}

/// A user that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

impl NewUser {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        fields::require_text("username", &self.username, USERNAME_MAX_LEN)?;
        if !self.email.is_empty() {
            fields::validate_email(&self.email)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fields::EMAIL_MAX_LEN;

    #[test]
    fn email_is_optional_for_users() {
        assert!(NewUser::new("admin", "").validate().is_ok());
        assert!(NewUser::new("admin", "bad").validate().is_err());
        assert!(NewUser::new(" ", "admin@example.com").validate().is_err());
    }

    #[test]
    fn overlong_email_is_rejected() {
        let email = format!("{}@example.com", "a".repeat(EMAIL_MAX_LEN));
        assert!(NewUser::new("admin", email).validate().is_err());
    }
}
