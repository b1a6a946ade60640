//! Field-level validation shared by the entities.

use email_address::EmailAddress;

use crate::error::DomainError;

pub const TITLE_MAX_LEN: usize = 250;
pub const SLUG_MAX_LEN: usize = 250;
pub const COMMENT_NAME_MAX_LEN: usize = 80;
pub const EMAIL_MAX_LEN: usize = 254;
pub const USERNAME_MAX_LEN: usize = 150;
pub const TAG_MAX_LEN: usize = 100;

/// Checks that a text value is non-blank and at most `max` characters.
pub fn require_text(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{field} must not be blank")));
    }
    let len = value.chars().count();
    if len > max {
        return Err(DomainError::Validation(format!(
            "{field} must be at most {max} characters (got {len})"
        )));
    }
    Ok(())
}

/// Checks that a body text is not blank. Bodies have no length limit.
pub fn require_body(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{field} must not be blank")));
    }
    Ok(())
}

/// Validates a slug: ASCII letters, digits, underscores and hyphens only.
pub fn validate_slug(slug: &str) -> Result<(), DomainError> {
    require_text("slug", slug, SLUG_MAX_LEN)?;
    if !slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(DomainError::Validation(format!(
            "slug '{slug}' may only contain letters, numbers, underscores or hyphens"
        )));
    }
    Ok(())
}

/// Validates an email address.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    if email.len() > EMAIL_MAX_LEN {
        return Err(DomainError::Validation(format!(
            "email must be at most {EMAIL_MAX_LEN} characters"
        )));
    }

    if !EmailAddress::is_valid(email) {
        return Err(DomainError::Validation(
            "email is not a valid email address".to_string(),
        ));
    }

    Ok(())
}

/// Masks an email for logging to avoid PII in logs.
pub fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        let masked_local = match local.chars().next() {
            Some(first) if local.chars().count() > 1 => format!("{first}***"),
            _ => "***".to_string(),
        };
        format!("{masked_local}{domain}")
    } else {
        "***".to_string()
    }
}

/// Builds a slug from free text.
///
/// Keeps letters and digits of any script plus `_`, lowercased. Runs of
/// whitespace and hyphens become a single hyphen; everything else is dropped.
/// Leading and trailing separators are trimmed.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;

    for c in value.chars() {
        if c.is_whitespace() || c == '-' {
            pending_dash = !slug.is_empty();
        } else if c.is_alphanumeric() || c == '_' {
            if pending_dash {
                slug.push('-');
                pending_dash = false;
            }
            slug.extend(c.to_lowercase());
        }
    }

    slug.trim_matches(|c| c == '-' || c == '_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_accepts_url_safe_characters() {
        assert!(validate_slug("hello-world_2024").is_ok());
    }

    #[test]
    fn slug_rejects_spaces_and_unicode() {
        assert!(validate_slug("hello world").is_err());
        assert!(validate_slug("привіт").is_err());
        assert!(validate_slug("").is_err());
    }

    #[test]
    fn slug_length_is_capped() {
        let ok = "a".repeat(SLUG_MAX_LEN);
        let too_long = "a".repeat(SLUG_MAX_LEN + 1);
        assert!(validate_slug(&ok).is_ok());
        assert!(validate_slug(&too_long).is_err());
    }

    #[test]
    fn text_length_counts_characters_not_bytes() {
        let name = "ї".repeat(COMMENT_NAME_MAX_LEN);
        assert!(require_text("name", &name, COMMENT_NAME_MAX_LEN).is_ok());
    }

    #[test]
    fn email_validation() {
        assert!(validate_email("reader@example.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("two@@example.com").is_err());

        let long = format!("{}@example.com", "a".repeat(EMAIL_MAX_LEN));
        assert!(validate_email(&long).is_err());
    }

    #[test]
    fn masks_local_part() {
        assert_eq!(mask_email("reader@example.com"), "r***@example.com");
        assert_eq!(mask_email("r@example.com"), "***@example.com");
        assert_eq!(mask_email("garbage"), "***");
    }

    #[test]
    fn slugify_normalises_text() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Rust & Django!  "), "rust-django");
        assert_eq!(slugify("already-a-slug"), "already-a-slug");
        assert_eq!(slugify("Тест"), "тест");
        assert_eq!(slugify("Rust Новини"), "rust-новини");
        assert_eq!(slugify("!!!"), "");
    }
}
