/// Post Service Library
///
/// Storage core for posts and threaded comments. A GraphQL layer sits on top
/// of the `PostRepository` contract; this crate provides the contract and its
/// two backends.
///
/// # Modules
///
/// - `domain`: Post and comment models, pagination
/// - `repository`: Repository contract, in-memory and PostgreSQL backends,
///   and the validating wrapper shared by both
/// - `error`: Error types and classification
/// - `config`: Configuration management
pub mod config;
pub mod domain;
pub mod error;
pub mod repository;

pub use config::{Config, StorageBackend};
pub use domain::{Comment, OutOfRangePolicy, PageRequest, Post, MAX_COMMENT_LENGTH};
pub use error::{ErrorKind, RepositoryError, RepositoryResult};
pub use repository::{
    InMemoryPostRepository, PostRepository, PostgresPostRepository, ValidatedPostRepository,
};

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

/// Build the configured backend wrapped in `ValidatedPostRepository`.
///
/// For PostgreSQL this connects the pool and applies the schema.
pub async fn build_repository(config: &Config) -> Result<Arc<dyn PostRepository>> {
    let backend: Arc<dyn PostRepository> = match config.backend {
        StorageBackend::Memory => Arc::new(InMemoryPostRepository::new()),
        StorageBackend::Postgres => {
            let db_config = config
                .database
                .clone()
                .context("PostgreSQL backend selected without database configuration")?;
            let repo = PostgresPostRepository::connect(db_config)
                .await
                .context("Failed to initialize PostgreSQL repository")?;
            Arc::new(repo)
        }
    };

    info!(
        backend = config.backend.as_str(),
        out_of_range = ?config.repository.out_of_range,
        operation_timeout = ?config.repository.operation_timeout,
        "Post repository initialized"
    );

    Ok(Arc::new(
        ValidatedPostRepository::new(backend)
            .with_out_of_range_policy(config.repository.out_of_range)
            .with_operation_timeout(config.repository.operation_timeout),
    ))
}
