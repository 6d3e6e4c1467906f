/// Error types for post-service repositories
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed precondition: {0}")]
    FailedPrecondition(String),

    #[error("Out of range: {0}")]
    OutOfRange(String),

    #[error("Deadline exceeded after {0:?}")]
    DeadlineExceeded(Duration),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Coarse classification the API layer maps onto protocol responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidArgument,
    FailedPrecondition,
    OutOfRange,
    DeadlineExceeded,
    Unavailable,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::InvalidArgument => "INVALID_ARGUMENT",
            ErrorKind::FailedPrecondition => "FAILED_PRECONDITION",
            ErrorKind::OutOfRange => "OUT_OF_RANGE",
            ErrorKind::DeadlineExceeded => "DEADLINE_EXCEEDED",
            ErrorKind::Unavailable => "UNAVAILABLE",
        }
    }
}

impl RepositoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepositoryError::NotFound(_) => ErrorKind::NotFound,
            RepositoryError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            RepositoryError::FailedPrecondition(_) => ErrorKind::FailedPrecondition,
            RepositoryError::OutOfRange(_) => ErrorKind::OutOfRange,
            RepositoryError::DeadlineExceeded(_) => ErrorKind::DeadlineExceeded,
            RepositoryError::Database(_) => ErrorKind::Unavailable,
        }
    }

    /// True for errors caused by the caller's input rather than the backend
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self.kind(),
            ErrorKind::Unavailable | ErrorKind::DeadlineExceeded
        )
    }

    pub(crate) fn post_not_found(post_id: &str) -> Self {
        RepositoryError::NotFound(format!("no post found with ID {}", post_id))
    }

    pub(crate) fn comment_not_found(comment_id: &str) -> Self {
        RepositoryError::NotFound(format!("no comment found with ID {}", comment_id))
    }

    pub(crate) fn parent_on_other_post(parent_id: &str, post_id: &str) -> Self {
        RepositoryError::InvalidArgument(format!(
            "parent comment {} does not belong to post with ID {}",
            parent_id, post_id
        ))
    }

    pub(crate) fn comments_disabled(post_id: &str) -> Self {
        RepositoryError::FailedPrecondition(format!(
            "comments are disabled for post with ID {}",
            post_id
        ))
    }

    pub(crate) fn content_too_long(length: usize, max: usize) -> Self {
        RepositoryError::InvalidArgument(format!(
            "comment content exceeds {} characters (got {})",
            max, length
        ))
    }
}

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;
