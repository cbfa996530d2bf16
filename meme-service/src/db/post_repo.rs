use crate::error::{AppError, Result};
use crate::models::{Post, PostUpdate};
use sqlx::PgPool;

/// Storage contract for meme posts.
///
/// Ids are assigned upstream (by the sequence allocator); the store accepts
/// whatever post it is handed. Ordering and limiting are caller concerns.
#[async_trait::async_trait]
pub trait PostRepository: Send + Sync {
    /// Fetch every stored post, in no particular order.
    async fn list_all(&self) -> Result<Vec<Post>>;

    /// Fetch a post by id.
    async fn get(&self, post_id: i64) -> Result<Post>;

    /// Insert a post that already carries its allocated id.
    async fn insert(&self, post: &Post) -> Result<i64>;

    /// Apply the present fields of `update` to a post; absent fields keep
    /// their stored values.
    async fn update(&self, post_id: i64, update: &PostUpdate) -> Result<()>;
}

/// Postgres-backed post repository.
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PostRepository for PgPostRepository {
    async fn list_all(&self) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, name, url, caption, date_posted
            FROM posts
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn get(&self, post_id: i64) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, name, url, caption, date_posted
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        post.ok_or_else(|| AppError::NotFound(format!("post {} not found", post_id)))
    }

    async fn insert(&self, post: &Post) -> Result<i64> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, name, url, caption, date_posted)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(post.id)
        .bind(&post.name)
        .bind(&post.url)
        .bind(&post.caption)
        .bind(post.date_posted)
        .execute(&self.pool)
        .await?;

        Ok(post.id)
    }

    async fn update(&self, post_id: i64, update: &PostUpdate) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET url = COALESCE($2, url), caption = COALESCE($3, caption)
            WHERE id = $1
            "#,
        )
        .bind(post_id)
        .bind(update.url.as_deref())
        .bind(update.caption.as_deref())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("post {} not found", post_id)));
        }

        Ok(())
    }
}
