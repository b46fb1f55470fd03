use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
    pub text: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn new(author_id: Uuid, group_id: Option<Uuid>, text: String, image: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            group_id,
            text,
            image,
            created_at: Utc::now(),
        }
    }
}

/// Fields an author may change on an existing post. `image: None` keeps the
/// current picture.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub text: String,
    pub group_id: Option<Uuid>,
    pub image: Option<String>,
}

/// A post joined with its author's username and its group, as shown in
/// feeds and on the detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PostDetails {
    pub id: Uuid,
    pub text: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub author: String,
    pub group_id: Option<Uuid>,
    pub group_slug: Option<String>,
    pub group_title: Option<String>,
}

/// Which posts a feed is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Group(Uuid),
    Author(Uuid),
    FollowedBy(Uuid),
}
