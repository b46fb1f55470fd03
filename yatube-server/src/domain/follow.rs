use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Directed edge: `user_id` receives `author_id`'s posts in their feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Follow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Follow {
    pub fn new(user_id: Uuid, author_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            author_id,
            created_at: Utc::now(),
        }
    }
}
