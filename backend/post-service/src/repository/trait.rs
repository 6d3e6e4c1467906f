use crate::domain::{Comment, PageRequest, Post};
use crate::error::RepositoryResult;

/// Storage contract for posts and threaded comments.
///
/// Implemented by `InMemoryPostRepository`, `PostgresPostRepository` and the
/// `ValidatedPostRepository` decorator. Every backend must behave the same
/// for the same inputs, modulo persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PostRepository: Send + Sync {
    /// All posts, ordered by id
    async fn get_posts(&self) -> RepositoryResult<Vec<Post>>;

    /// Fails with `NotFound` if no post has this id
    async fn get_post_by_id(&self, post_id: &str) -> RepositoryResult<Post>;

    /// Create a post and return it with its store-assigned id
    async fn create_post(
        &self,
        title: &str,
        content: &str,
        comments_enabled: bool,
    ) -> RepositoryResult<Post>;

    /// Comments on a post ordered by id, sliced by `page`.
    ///
    /// Fails with `NotFound` if the post does not exist. A page past the
    /// last comment yields an empty vector here; the decorator decides
    /// whether that becomes `OutOfRange`.
    async fn get_comments_by_post(
        &self,
        post_id: &str,
        page: PageRequest,
    ) -> RepositoryResult<Vec<Comment>>;

    /// Number of comments on a post. Fails with `NotFound` for unknown posts.
    async fn count_comments_by_post(&self, post_id: &str) -> RepositoryResult<u64>;

    /// Create a comment, optionally replying to `parent_id`.
    ///
    /// Errors:
    /// - `InvalidArgument`: content longer than `MAX_COMMENT_LENGTH`, or a
    ///   parent comment that belongs to another post
    /// - `NotFound`: post or parent comment missing
    /// - `FailedPrecondition`: comments disabled on the post
    async fn create_comment(
        &self,
        post_id: &str,
        parent_id: Option<String>,
        content: &str,
    ) -> RepositoryResult<Comment>;

    /// Direct replies to a comment, ordered by id. Empty when there are none.
    async fn get_children_comments(&self, parent_id: &str) -> RepositoryResult<Vec<Comment>>;

    /// Comments on a post using the raw `(page, page_size)` pair from the API.
    ///
    /// `(-1, -1)` requests every comment; other pairs need both values >= 1.
    async fn get_comments_paged(
        &self,
        post_id: &str,
        page: i64,
        page_size: i64,
    ) -> RepositoryResult<Vec<Comment>> {
        let page = PageRequest::from_raw(page, page_size)?;
        self.get_comments_by_post(post_id, page).await
    }

    /// Health check (optional)
    async fn health_check(&self) -> RepositoryResult<()> {
        Ok(())
    }
}
