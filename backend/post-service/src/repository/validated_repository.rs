//! Validating repository wrapper
//!
//! Wraps any `PostRepository` and enforces the rules every backend must
//! share: comment length, parent id normalization, the out-of-range page
//! policy and an optional per-operation deadline.

use super::PostRepository;
use crate::domain::{
    comment_length, Comment, OutOfRangePolicy, PageRequest, Post, MAX_COMMENT_LENGTH,
};
use crate::error::{RepositoryError, RepositoryResult};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Repository wrapper that validates input before reaching the backend
#[derive(Clone)]
pub struct ValidatedPostRepository {
    /// Inner repository (in-memory or PostgreSQL)
    inner: Arc<dyn PostRepository>,
    out_of_range: OutOfRangePolicy,
    /// Deadline applied to each operation; `None` waits indefinitely
    operation_timeout: Option<Duration>,
}

impl ValidatedPostRepository {
    pub fn new(inner: Arc<dyn PostRepository>) -> Self {
        Self {
            inner,
            out_of_range: OutOfRangePolicy::default(),
            operation_timeout: None,
        }
    }

    pub fn with_out_of_range_policy(mut self, policy: OutOfRangePolicy) -> Self {
        self.out_of_range = policy;
        self
    }

    pub fn with_operation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// Run one operation under the configured deadline and log its failure
    async fn run<T, F>(&self, operation: &'static str, fut: F) -> RepositoryResult<T>
    where
        F: Future<Output = RepositoryResult<T>>,
    {
        let result = match self.operation_timeout {
            Some(limit) => match tokio::time::timeout(limit, fut).await {
                Ok(result) => result,
                Err(_) => Err(RepositoryError::DeadlineExceeded(limit)),
            },
            None => fut.await,
        };

        if let Err(e) = &result {
            if e.is_client_error() {
                debug!(operation, kind = e.kind().as_str(), error = %e, "Request rejected");
            } else {
                warn!(operation, kind = e.kind().as_str(), error = %e, "Repository operation failed");
            }
        }
        result
    }

    async fn comments_page(
        &self,
        post_id: &str,
        page: PageRequest,
    ) -> RepositoryResult<Vec<Comment>> {
        if self.out_of_range == OutOfRangePolicy::Reject && page != PageRequest::All {
            let total = self.inner.count_comments_by_post(post_id).await?;
            if page.is_out_of_range(total) {
                return Err(RepositoryError::OutOfRange(format!(
                    "page starting at offset {} is past the {} comments of post {}",
                    page.offset(),
                    total,
                    post_id
                )));
            }
        }
        self.inner.get_comments_by_post(post_id, page).await
    }
}

/// The API passes `""` for a top-level comment
fn normalize_parent_id(parent_id: Option<String>) -> Option<String> {
    parent_id.filter(|id| !id.trim().is_empty())
}

#[async_trait::async_trait]
impl PostRepository for ValidatedPostRepository {
    async fn get_posts(&self) -> RepositoryResult<Vec<Post>> {
        self.run("get_posts", self.inner.get_posts()).await
    }

    async fn get_post_by_id(&self, post_id: &str) -> RepositoryResult<Post> {
        self.run("get_post_by_id", self.inner.get_post_by_id(post_id))
            .await
    }

    async fn create_post(
        &self,
        title: &str,
        content: &str,
        comments_enabled: bool,
    ) -> RepositoryResult<Post> {
        self.run(
            "create_post",
            self.inner.create_post(title, content, comments_enabled),
        )
        .await
    }

    async fn get_comments_by_post(
        &self,
        post_id: &str,
        page: PageRequest,
    ) -> RepositoryResult<Vec<Comment>> {
        self.run("get_comments_by_post", self.comments_page(post_id, page))
            .await
    }

    async fn count_comments_by_post(&self, post_id: &str) -> RepositoryResult<u64> {
        self.run(
            "count_comments_by_post",
            self.inner.count_comments_by_post(post_id),
        )
        .await
    }

    async fn create_comment(
        &self,
        post_id: &str,
        parent_id: Option<String>,
        content: &str,
    ) -> RepositoryResult<Comment> {
        let length = comment_length(content);
        if length > MAX_COMMENT_LENGTH {
            let err = RepositoryError::content_too_long(length, MAX_COMMENT_LENGTH);
            debug!(post_id, error = %err, "Request rejected");
            return Err(err);
        }

        let parent_id = normalize_parent_id(parent_id);
        self.run(
            "create_comment",
            self.inner.create_comment(post_id, parent_id, content),
        )
        .await
    }

    async fn get_children_comments(&self, parent_id: &str) -> RepositoryResult<Vec<Comment>> {
        self.run(
            "get_children_comments",
            self.inner.get_children_comments(parent_id),
        )
        .await
    }

    async fn health_check(&self) -> RepositoryResult<()> {
        self.run("health_check", self.inner.health_check()).await
    }
}
