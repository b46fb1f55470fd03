use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostChanges, PostDetails, PostFilter};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: Post) -> Result<Post, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError>;
    async fn find_details(&self, id: Uuid) -> Result<Option<PostDetails>, DomainError>;
    async fn update_post(&self, id: Uuid, changes: PostChanges)
    -> Result<Option<Post>, DomainError>;
    /// Returns whether a row was removed. Comments go with the post.
    async fn delete_post(&self, id: Uuid) -> Result<bool, DomainError>;
    async fn count(&self, filter: PostFilter) -> Result<usize, DomainError>;
    /// Newest first.
    async fn list(
        &self,
        filter: PostFilter,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<PostDetails>, DomainError>;
}

const DETAILS_SELECT: &str = r#"
    SELECT p.id, p.text, p.image, p.created_at, p.author_id, u.username AS author,
           p.group_id, g.slug AS group_slug, g.title AS group_title
    FROM posts p
    JOIN users u ON u.id = p.author_id
    LEFT JOIN groups g ON g.id = p.group_id
"#;

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: PostFilter) {
    match filter {
        PostFilter::All => {}
        PostFilter::Group(group_id) => {
            qb.push(" WHERE p.group_id = ").push_bind(group_id);
        }
        PostFilter::Author(author_id) => {
            qb.push(" WHERE p.author_id = ").push_bind(author_id);
        }
        PostFilter::FollowedBy(user_id) => {
            qb.push(" WHERE p.author_id IN (SELECT f.author_id FROM follows f WHERE f.user_id = ")
                .push_bind(user_id)
                .push(")");
        }
    }
}

#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, post: Post) -> Result<Post, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, author_id, group_id, text, image, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(post.id)
        .bind(post.author_id)
        .bind(post.group_id)
        .bind(&post.text)
        .bind(&post.image)
        .bind(post.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create post: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        info!(post_id = %post.id, author_id = %post.author_id, "post created");
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, author_id, group_id, text, image, created_at
            FROM posts WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("db error find_by_id {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn find_details(&self, id: Uuid) -> Result<Option<PostDetails>, DomainError> {
        let mut qb = QueryBuilder::<Postgres>::new(DETAILS_SELECT);
        qb.push(" WHERE p.id = ").push_bind(id);
        qb.build_query_as::<PostDetails>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("db error find_details {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })
    }

    async fn update_post(
        &self,
        id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>, DomainError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET
                text = $1,
                group_id = $2,
                image = COALESCE($3, image)
            WHERE id = $4
            RETURNING id, author_id, group_id, text, image, created_at
            "#,
        )
        .bind(&changes.text)
        .bind(changes.group_id)
        .bind(&changes.image)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to update post {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })?;

        if post.is_some() {
            info!(post_id = %id, "post updated");
        }

        Ok(post)
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let removed = deleted.rows_affected() > 0;
        if removed {
            info!(post_id = %id, "post deleted");
        }
        Ok(removed)
    }

    async fn count(&self, filter: PostFilter) -> Result<usize, DomainError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM posts p");
        push_filter(&mut qb, filter);
        let total: i64 = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while counting posts: {}", e);
                DomainError::Internal(e.to_string())
            })?;
        Ok(total as usize)
    }

    async fn list(
        &self,
        filter: PostFilter,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<PostDetails>, DomainError> {
        let mut qb = QueryBuilder::<Postgres>::new(DETAILS_SELECT);
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY p.created_at DESC, p.seq DESC LIMIT ")
            .push_bind(limit as i64)
            .push(" OFFSET ")
            .push_bind(offset as i64);

        qb.build_query_as::<PostDetails>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while fetching posts: {}", e);
                DomainError::Internal(e.to_string())
            })
    }
}
