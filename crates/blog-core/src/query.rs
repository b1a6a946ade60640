//! Query scopes for post listings.

use serde::{Deserialize, Serialize};

use crate::domain::{Post, PostStatus};

/// Which posts a listing may return.
///
/// `All` is the administrative view (drafts included); `Published` is what
/// readers see. Both are ordered newest `publish` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostScope {
    #[default]
    All,
    Published,
}

impl PostScope {
    /// The status a post must have to be visible, if any.
    pub fn required_status(self) -> Option<PostStatus> {
        match self {
            PostScope::All => None,
            PostScope::Published => Some(PostStatus::Published),
        }
    }

    pub fn matches(self, post: &Post) -> bool {
        self.required_status()
            .is_none_or(|status| post.status == status)
    }

    /// Filters and orders posts the way a listing returns them.
    pub fn apply<'a, I>(self, posts: I) -> Vec<Post>
    where
        I: IntoIterator<Item = &'a Post>,
    {
        let mut visible: Vec<Post> = posts
            .into_iter()
            .filter(|post| self.matches(post))
            .cloned()
            .collect();
        sort_newest_first(&mut visible);
        visible
    }
}

/// Default post ordering: descending `publish`, ties broken by newest id.
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.publish.cmp(&a.publish).then(b.id.cmp(&a.id)));
}
