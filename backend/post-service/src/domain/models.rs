use serde::{Deserialize, Serialize};

/// Maximum comment length, counted in characters
pub const MAX_COMMENT_LENGTH: usize = 2000;

/// A post. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(rename = "commentsEnabled")]
    pub comments_enabled: bool,
}

/// A comment on a post, optionally threaded under another comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub content: String,
    #[serde(rename = "postID")]
    pub post_id: String,
    /// `None` for top-level comments
    #[serde(rename = "parentID", default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl Comment {
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Length of `content` as the comment length limit counts it.
///
/// Counts Unicode scalar values, matching PostgreSQL `length()` on text.
pub fn comment_length(content: &str) -> usize {
    content.chars().count()
}
