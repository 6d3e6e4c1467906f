//! Relational schema for posts and comments.
//!
//! Every statement is idempotent and safe to run on each startup.

use crate::domain::MAX_COMMENT_LENGTH;
use sqlx::PgPool;
use tracing::info;

pub const CREATE_POSTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS posts (
        id SERIAL PRIMARY KEY,
        title VARCHAR(255) NOT NULL,
        content TEXT NOT NULL,
        comments_enabled BOOLEAN NOT NULL DEFAULT true
    )
"#;

pub const CREATE_COMMENTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS comments (
        id SERIAL PRIMARY KEY,
        content TEXT NOT NULL CHECK (length(content) <= 2000),
        post_id INTEGER NOT NULL,
        parent_id INTEGER,
        FOREIGN KEY (post_id) REFERENCES posts (id) ON DELETE CASCADE,
        FOREIGN KEY (parent_id) REFERENCES comments (id) ON DELETE CASCADE
    )
"#;

pub const CREATE_COMMENTS_POST_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_comments_post_id ON comments (post_id, id)";

pub const CREATE_COMMENTS_PARENT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_comments_parent_id ON comments (parent_id, id)";

/// Statements in dependency order
pub const SCHEMA: [&str; 4] = [
    CREATE_POSTS_TABLE,
    CREATE_COMMENTS_TABLE,
    CREATE_COMMENTS_POST_INDEX,
    CREATE_COMMENTS_PARENT_INDEX,
];

/// Create tables and indexes if they do not exist yet
pub async fn apply(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!(
        max_comment_length = MAX_COMMENT_LENGTH,
        "Post schema is up to date"
    );
    Ok(())
}
