//! In-memory post repository
//!
//! Keeps posts and comments in ordered maps behind one `RwLock`. Ids are
//! minted from counters that live in the same locked state as the maps, so
//! allocating an id and inserting the row happen in a single critical section.

use super::PostRepository;
use crate::domain::{comment_length, Comment, PageRequest, Post, MAX_COMMENT_LENGTH};
use crate::error::{RepositoryError, RepositoryResult};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
struct MemoryStore {
    posts: BTreeMap<u64, Post>,
    comments: BTreeMap<u64, Comment>,
    last_post_id: u64,
    last_comment_id: u64,
}

impl MemoryStore {
    fn post(&self, post_id: &str) -> Option<&Post> {
        parse_id(post_id).and_then(|id| self.posts.get(&id))
    }

    fn comment(&self, comment_id: &str) -> Option<&Comment> {
        parse_id(comment_id).and_then(|id| self.comments.get(&id))
    }

    fn comments_on(&self, post_id: &str) -> impl Iterator<Item = &Comment> + '_ {
        let post_id = post_id.to_string();
        self.comments
            .values()
            .filter(move |comment| comment.post_id == post_id)
    }
}

/// Ids are minted as decimal strings; anything else cannot name a stored row.
fn parse_id(id: &str) -> Option<u64> {
    id.parse().ok()
}

/// Post repository backed by process memory. Cloning shares the same store.
#[derive(Clone, Default)]
pub struct InMemoryPostRepository {
    store: Arc<RwLock<MemoryStore>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn get_posts(&self) -> RepositoryResult<Vec<Post>> {
        let store = self.store.read().await;
        Ok(store.posts.values().cloned().collect())
    }

    async fn get_post_by_id(&self, post_id: &str) -> RepositoryResult<Post> {
        let store = self.store.read().await;
        store
            .post(post_id)
            .cloned()
            .ok_or_else(|| RepositoryError::post_not_found(post_id))
    }

    async fn create_post(
        &self,
        title: &str,
        content: &str,
        comments_enabled: bool,
    ) -> RepositoryResult<Post> {
        let mut store = self.store.write().await;
        store.last_post_id += 1;
        let id = store.last_post_id;
        let post = Post {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            comments_enabled,
        };
        store.posts.insert(id, post.clone());

        debug!(post_id = %post.id, "Created post in memory");
        Ok(post)
    }

    async fn get_comments_by_post(
        &self,
        post_id: &str,
        page: PageRequest,
    ) -> RepositoryResult<Vec<Comment>> {
        let store = self.store.read().await;
        let post = store
            .post(post_id)
            .ok_or_else(|| RepositoryError::post_not_found(post_id))?;

        let matching: Vec<Comment> = store.comments_on(&post.id).cloned().collect();
        Ok(page.apply(matching))
    }

    async fn count_comments_by_post(&self, post_id: &str) -> RepositoryResult<u64> {
        let store = self.store.read().await;
        let post = store
            .post(post_id)
            .ok_or_else(|| RepositoryError::post_not_found(post_id))?;
        Ok(store.comments_on(&post.id).count() as u64)
    }

    async fn create_comment(
        &self,
        post_id: &str,
        parent_id: Option<String>,
        content: &str,
    ) -> RepositoryResult<Comment> {
        let length = comment_length(content);
        if length > MAX_COMMENT_LENGTH {
            return Err(RepositoryError::content_too_long(length, MAX_COMMENT_LENGTH));
        }

        let mut store = self.store.write().await;

        let post = store
            .post(post_id)
            .ok_or_else(|| RepositoryError::post_not_found(post_id))?;
        if !post.comments_enabled {
            return Err(RepositoryError::comments_disabled(post_id));
        }
        // Stored form of the post id, so "01" and "1" cannot diverge
        let post_id = post.id.clone();

        let parent_id = match parent_id {
            Some(parent_id) => {
                let parent = store
                    .comment(&parent_id)
                    .ok_or_else(|| RepositoryError::comment_not_found(&parent_id))?;
                // Replies stay on the parent's thread
                if parent.post_id != post_id {
                    return Err(RepositoryError::parent_on_other_post(&parent_id, &post_id));
                }
                Some(parent.id.clone())
            }
            None => None,
        };

        store.last_comment_id += 1;
        let id = store.last_comment_id;
        let comment = Comment {
            id: id.to_string(),
            content: content.to_string(),
            post_id,
            parent_id,
        };
        store.comments.insert(id, comment.clone());

        debug!(
            comment_id = %comment.id,
            post_id = %comment.post_id,
            "Created comment in memory"
        );
        Ok(comment)
    }

    async fn get_children_comments(&self, parent_id: &str) -> RepositoryResult<Vec<Comment>> {
        let Some(key) = parse_id(parent_id) else {
            return Ok(Vec::new());
        };
        // Compare against the stored form so "01" finds the replies to "1"
        let parent_id = key.to_string();

        let store = self.store.read().await;
        Ok(store
            .comments
            .values()
            .filter(|comment| comment.parent_id.as_deref() == Some(parent_id.as_str()))
            .cloned()
            .collect())
    }
}
