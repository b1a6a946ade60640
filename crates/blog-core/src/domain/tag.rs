//! Free-text labels attached to any entity through a generic relation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::Post;
use super::fields::{self, TAG_MAX_LEN};
use crate::error::DomainError;

/// A label shared across entity types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// Identifies the entity a tag is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TaggedObject {
    /// `app.model` label, e.g. `blog.post`.
    pub content_type: &'static str,
    pub object_id: i64,
}

impl TaggedObject {
    pub fn new(content_type: &'static str, object_id: i64) -> Self {
        Self {
            content_type,
            object_id,
        }
    }

    pub fn post(post_id: i64) -> Self {
        Self::new(Post::CONTENT_TYPE, post_id)
    }
}

/// Link row between a tag and a tagged object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedItem {
    pub id: i64,
    pub tag_id: i64,
    pub content_type: String,
    pub object_id: i64,
}

impl TaggedItem {
    pub fn points_at(&self, object: &TaggedObject) -> bool {
        self.content_type == object.content_type && self.object_id == object.object_id
    }
}

/// Validates a tag name and derives its slug.
///
/// The slug is capped at [`TAG_MAX_LEN`] characters. Names without a single
/// letter or digit are rejected.
pub fn tag_slug(name: &str) -> Result<String, DomainError> {
    fields::require_text("tag", name, TAG_MAX_LEN)?;
    let slug: String = fields::slugify(name).chars().take(TAG_MAX_LEN).collect();
    let slug = slug.trim_end_matches(['-', '_']);
    if slug.is_empty() {
        return Err(DomainError::Validation(format!(
            "tag '{name}' has no letters or digits to build a slug from"
        )));
    }
    Ok(slug.to_string())
}

/// `base` with a `_{n}` suffix, shortened so the whole slug still fits
/// [`TAG_MAX_LEN`].
pub fn suffixed_slug(base: &str, n: u32) -> String {
    let suffix = format!("_{n}");
    let keep = TAG_MAX_LEN.saturating_sub(suffix.len());
    let mut slug: String = base.chars().take(keep).collect();
    slug.push_str(&suffix);
    slug
}

/// Parses user tag input into a sorted, de-duplicated list of names.
///
/// Commas separate tags when present, otherwise spaces do. Double quotes
/// group words into a single tag regardless of the separator.
pub fn parse_tags(input: &str) -> Vec<String> {
    let input = input.trim();
    if input.is_empty() {
        return Vec::new();
    }

    let mut names = BTreeSet::new();

    if !input.contains('"') {
        let separator = if input.contains(',') { ',' } else { ' ' };
        for part in input.split(separator) {
            push_name(&mut names, part);
        }
        return names.into_iter().collect();
    }

    // Quoted groups are taken verbatim; the leftovers are split as usual.
    let mut leftovers = String::new();
    let mut quoted = String::new();
    let mut in_quotes = false;
    for c in input.chars() {
        match c {
            '"' if in_quotes => {
                push_name(&mut names, &quoted);
                quoted.clear();
                in_quotes = false;
            }
            '"' => in_quotes = true,
            _ if in_quotes => quoted.push(c),
            _ => leftovers.push(c),
        }
    }
    if in_quotes {
        leftovers.push_str(&quoted);
    }

    let separator = if leftovers.contains(',') { ',' } else { ' ' };
    for part in leftovers.split(separator) {
        push_name(&mut names, part);
    }

    names.into_iter().collect()
}

fn push_name(names: &mut BTreeSet<String>, raw: &str) {
    let name = raw.trim();
    if !name.is_empty() {
        names.insert(name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_space_separated() {
        assert_eq!(parse_tags("rust django rust"), vec!["django", "rust"]);
    }

    #[test]
    fn commas_take_precedence_over_spaces() {
        assert_eq!(
            parse_tags("web dev, rust ,  "),
            vec!["rust".to_string(), "web dev".to_string()]
        );
    }

    #[test]
    fn quotes_group_words() {
        assert_eq!(
            parse_tags("\"web dev\" rust"),
            vec!["rust".to_string(), "web dev".to_string()]
        );
    }

    #[test]
    fn unterminated_quote_is_treated_as_text() {
        assert_eq!(parse_tags("\"rust web"), vec!["rust", "web"]);
    }

    #[test]
    fn empty_input_yields_no_tags() {
        assert!(parse_tags("   ").is_empty());
    }

    #[test]
    fn tag_slugs() {
        assert_eq!(tag_slug("Web Dev").unwrap(), "web-dev");
        assert_eq!(tag_slug("Новини дня").unwrap(), "новини-дня");
        assert_eq!(tag_slug("Rust Новини").unwrap(), "rust-новини");
        assert!(tag_slug("").is_err());
    }

    #[test]
    fn names_without_letters_or_digits_are_rejected() {
        assert!(matches!(tag_slug("!!!"), Err(DomainError::Validation(_))));
        assert!(matches!(tag_slug("- -"), Err(DomainError::Validation(_))));
    }

    #[test]
    fn slugs_fit_the_column() {
        let name = "a".repeat(TAG_MAX_LEN);
        assert_eq!(tag_slug(&name).unwrap().chars().count(), TAG_MAX_LEN);

        // Lowercasing can lengthen a name: 'İ' becomes two characters.
        let dotted = "İ".repeat(TAG_MAX_LEN);
        assert!(tag_slug(&dotted).unwrap().chars().count() <= TAG_MAX_LEN);
    }

    #[test]
    fn suffix_shortens_the_base() {
        let base = "a".repeat(TAG_MAX_LEN);
        let slug = suffixed_slug(&base, 12);
        assert_eq!(slug.chars().count(), TAG_MAX_LEN);
        assert!(slug.ends_with("a_12"));

        assert_eq!(suffixed_slug("rust", 1), "rust_1");
    }

    #[test]
    fn tagged_item_matches_object() {
        let item = TaggedItem {
            id: 1,
            tag_id: 2,
            content_type: "blog.post".into(),
            object_id: 5,
        };
        assert!(item.points_at(&TaggedObject::post(5)));
        assert!(!item.points_at(&TaggedObject::post(6)));
        assert!(!item.points_at(&TaggedObject::new("shop.product", 5)));
    }
}
