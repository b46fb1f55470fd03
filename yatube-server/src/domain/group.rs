use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A community posts can be filed under, addressed by its slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl Group {
    pub fn new(title: String, slug: String, description: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            slug,
            description,
        }
    }
}
