use crate::domain::error::DomainError;
use crate::domain::follow::Follow;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Inserts the edge unless the pair already exists; returns whether it was new.
    async fn create(&self, follow: Follow) -> Result<bool, DomainError>;
    /// Returns the number of edges removed (0 or 1).
    async fn delete(&self, user_id: Uuid, author_id: Uuid) -> Result<u64, DomainError>;
    async fn exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, DomainError>;
}

#[derive(Clone)]
pub struct PostgresFollowRepository {
    pool: PgPool,
}

impl PostgresFollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FollowRepository for PostgresFollowRepository {
    async fn create(&self, follow: Follow) -> Result<bool, DomainError> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO follows (id, user_id, author_id, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, author_id) DO NOTHING
            "#,
        )
        .bind(follow.id)
        .bind(follow.user_id)
        .bind(follow.author_id)
        .bind(follow.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create follow: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        let created = inserted.rows_affected() > 0;
        if created {
            info!(user_id = %follow.user_id, author_id = %follow.author_id, "follow created");
        }
        Ok(created)
    }

    async fn delete(&self, user_id: Uuid, author_id: Uuid) -> Result<u64, DomainError> {
        let deleted = sqlx::query("DELETE FROM follows WHERE user_id = $1 AND author_id = $2")
            .bind(user_id)
            .bind(author_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if deleted.rows_affected() > 0 {
            info!(user_id = %user_id, author_id = %author_id, "follow removed");
        }
        Ok(deleted.rows_affected())
    }

    async fn exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, DomainError> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE user_id = $1 AND author_id = $2)",
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while checking follow: {}", e);
            DomainError::Internal(e.to_string())
        })
    }
}
