use std::sync::Arc;

use tracing::{debug, instrument};
use uuid::Uuid;

use crate::data::follow_repository::FollowRepository;
use crate::domain::error::DomainError;
use crate::domain::follow::Follow;

#[derive(Clone)]
pub struct FollowService {
    repo: Arc<dyn FollowRepository>,
}

impl FollowService {
    pub fn new(repo: Arc<dyn FollowRepository>) -> Self {
        Self { repo }
    }

    /// Self-follows and repeated follows are ignored; returns whether an edge was added.
    #[instrument(skip(self))]
    pub async fn follow(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, DomainError> {
        if user_id == author_id {
            debug!("ignoring self-follow");
            return Ok(false);
        }
        if self.repo.exists(user_id, author_id).await? {
            return Ok(false);
        }
        self.repo.create(Follow::new(user_id, author_id)).await
    }

    #[instrument(skip(self))]
    pub async fn unfollow(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, DomainError> {
        if user_id == author_id {
            return Ok(false);
        }
        Ok(self.repo.delete(user_id, author_id).await? > 0)
    }

    pub async fn is_following(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, DomainError> {
        self.repo.exists(user_id, author_id).await
    }
}
