use super::{schema, PostRepository};
use crate::domain::{comment_length, Comment, PageRequest, Post, MAX_COMMENT_LENGTH};
use crate::error::{RepositoryError, RepositoryResult};
use sqlx::PgPool;
use tracing::{debug, info};

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: i32,
    title: String,
    content: String,
    comments_enabled: bool,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.id.to_string(),
            title: row.title,
            content: row.content,
            comments_enabled: row.comments_enabled,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    id: i32,
    content: String,
    post_id: i32,
    parent_id: Option<i32>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id.to_string(),
            content: row.content,
            post_id: row.post_id.to_string(),
            parent_id: row.parent_id.map(|id| id.to_string()),
        }
    }
}

/// Ids are SERIAL columns; a string that is not an int4 cannot name a row.
fn parse_id(id: &str) -> Option<i32> {
    id.parse().ok()
}

/// Map constraint violations raised by inserts onto contract errors
fn map_write_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_check_violation() {
            return RepositoryError::InvalidArgument(format!(
                "comment content exceeds {} characters",
                MAX_COMMENT_LENGTH
            ));
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::NotFound(format!(
                "referenced row does not exist: {}",
                db_err.message()
            ));
        }
    }
    RepositoryError::Database(err)
}

/// PostgreSQL repository for posts and comments
#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect using `config`, then make sure the schema exists
    pub async fn connect(config: db_pool::DbConfig) -> RepositoryResult<Self> {
        config.log_config();
        let pool = db_pool::create_pool(config).await?;
        let repo = Self::new(pool);
        repo.ensure_schema().await?;
        info!("PostgreSQL post repository ready");
        Ok(repo)
    }

    /// Create the posts and comments tables if they are missing
    pub async fn ensure_schema(&self) -> RepositoryResult<()> {
        schema::apply(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn post_exists(&self, post_id: i32) -> RepositoryResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM posts WHERE id = $1)")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Resolve a post id to its key, failing with `NotFound` when it does not exist
    async fn existing_post_key(&self, post_id: &str) -> RepositoryResult<i32> {
        let key = parse_id(post_id).ok_or_else(|| RepositoryError::post_not_found(post_id))?;
        if !self.post_exists(key).await? {
            return Err(RepositoryError::post_not_found(post_id));
        }
        Ok(key)
    }
}

#[async_trait::async_trait]
impl PostRepository for PostgresPostRepository {
    async fn get_posts(&self) -> RepositoryResult<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(
            "SELECT id, title, content, comments_enabled FROM posts ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn get_post_by_id(&self, post_id: &str) -> RepositoryResult<Post> {
        let key = parse_id(post_id).ok_or_else(|| RepositoryError::post_not_found(post_id))?;

        let row = sqlx::query_as::<_, PostRow>(
            "SELECT id, title, content, comments_enabled FROM posts WHERE id = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Post::from)
            .ok_or_else(|| RepositoryError::post_not_found(post_id))
    }

    async fn create_post(
        &self,
        title: &str,
        content: &str,
        comments_enabled: bool,
    ) -> RepositoryResult<Post> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (title, content, comments_enabled)
            VALUES ($1, $2, $3)
            RETURNING id, title, content, comments_enabled
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(comments_enabled)
        .fetch_one(&self.pool)
        .await?;

        debug!("Created post in PostgreSQL: {}", row.id);
        Ok(row.into())
    }

    async fn get_comments_by_post(
        &self,
        post_id: &str,
        page: PageRequest,
    ) -> RepositoryResult<Vec<Comment>> {
        let key = self.existing_post_key(post_id).await?;

        let rows = match page.limit() {
            None => {
                sqlx::query_as::<_, CommentRow>(
                    r#"
                    SELECT id, content, post_id, parent_id
                    FROM comments
                    WHERE post_id = $1
                    ORDER BY id
                    "#,
                )
                .bind(key)
                .fetch_all(&self.pool)
                .await?
            }
            Some(limit) => {
                sqlx::query_as::<_, CommentRow>(
                    r#"
                    SELECT id, content, post_id, parent_id
                    FROM comments
                    WHERE post_id = $1
                    ORDER BY id
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(key)
                .bind(i64::try_from(limit).unwrap_or(i64::MAX))
                .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn count_comments_by_post(&self, post_id: &str) -> RepositoryResult<u64> {
        let key = self.existing_post_key(post_id).await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE post_id = $1")
            .bind(key)
            .fetch_one(&self.pool)
            .await?;

        Ok(u64::try_from(count).unwrap_or_default())
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

        let post_key = parse_id(post_id).ok_or_else(|| RepositoryError::post_not_found(post_id))?;

        // FOR SHARE holds the post row until commit, so comments cannot be
        // disabled between the check and the insert.
        let mut tx = self.pool.begin().await?;

        let comments_enabled: Option<bool> =
            sqlx::query_scalar("SELECT comments_enabled FROM posts WHERE id = $1 FOR SHARE")
                .bind(post_key)
                .fetch_optional(&mut *tx)
                .await?;
        match comments_enabled {
            None => return Err(RepositoryError::post_not_found(post_id)),
            Some(false) => return Err(RepositoryError::comments_disabled(post_id)),
            Some(true) => {}
        }

        let parent_key = match parent_id.as_deref() {
            Some(parent_id) => {
                let parent: Option<(i32, i32)> = match parse_id(parent_id) {
                    Some(key) => {
                        sqlx::query_as("SELECT id, post_id FROM comments WHERE id = $1 FOR SHARE")
                            .bind(key)
                            .fetch_optional(&mut *tx)
                            .await?
                    }
                    None => None,
                };
                let (parent_key, parent_post) =
                    parent.ok_or_else(|| RepositoryError::comment_not_found(parent_id))?;
                // Replies stay on the parent's thread
                if parent_post != post_key {
                    return Err(RepositoryError::parent_on_other_post(parent_id, post_id));
                }
                Some(parent_key)
            }
            None => None,
        };

        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            INSERT INTO comments (content, post_id, parent_id)
            VALUES ($1, $2, $3)
            RETURNING id, content, post_id, parent_id
            "#,
        )
        .bind(content)
        .bind(post_key)
        .bind(parent_key)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit().await?;

        debug!(
            "Created comment in PostgreSQL: {} on post {}",
            row.id, row.post_id
        );
        Ok(row.into())
    }

    async fn get_children_comments(&self, parent_id: &str) -> RepositoryResult<Vec<Comment>> {
        let Some(key) = parse_id(parent_id) else {
            return Ok(Vec::new());
        };

        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, content, post_id, parent_id
            FROM comments
            WHERE parent_id = $1
            ORDER BY id
            "#,
        )
        .bind(key)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn health_check(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_accepts_only_int4() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id(""), None);
        assert_eq!(parse_id("99999999999"), None);
    }

    #[test]
    fn test_comment_row_conversion() {
        let comment: Comment = CommentRow {
            id: 5,
            content: "reply".to_string(),
            post_id: 1,
            parent_id: Some(3),
        }
        .into();
        assert_eq!(comment.id, "5");
        assert_eq!(comment.post_id, "1");
        assert_eq!(comment.parent_id.as_deref(), Some("3"));

        let top: Comment = CommentRow {
            id: 6,
            content: "top".to_string(),
            post_id: 1,
            parent_id: None,
        }
        .into();
        assert!(top.is_top_level());
    }

    #[test]
    fn test_non_database_errors_pass_through() {
        let err = map_write_error(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, RepositoryError::Database(_)));
    }
}
