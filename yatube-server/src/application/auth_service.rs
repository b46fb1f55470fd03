use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::data::user_repository::UserRepository;
use crate::domain::{error::DomainError, user::User};
use crate::infrastructure::security::{JwtKeys, hash_password, verify_password};

#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn UserRepository>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(repo: Arc<dyn UserRepository>, keys: JwtKeys) -> Self {
        Self { repo, keys }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(id.to_string()))
    }

    pub async fn get_by_username(&self, username: &str) -> Result<User, DomainError> {
        self.repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(username.to_string()))
    }

    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        username: String,
        email: Option<String>,
        password: String,
    ) -> Result<User, DomainError> {
        let hash =
            hash_password(&password).map_err(|err| DomainError::Internal(err.to_string()))?;
        let user = User::new(username, email.map(|e| e.to_lowercase()), hash);
        self.repo.create(user).await
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<String, DomainError> {
        let user = self
            .repo
            .find_by_username(username)
            .await?
            .ok_or(DomainError::Unauthorized)?;

        let valid = verify_password(password, &user.password_hash)
            .map_err(|_| DomainError::Unauthorized)?;
        if !valid {
            return Err(DomainError::Unauthorized);
        }

        self.issue_token(&user)
    }

    pub fn issue_token(&self, user: &User) -> Result<String, DomainError> {
        self.keys
            .generate_token(user.id)
            .map_err(|err| DomainError::Internal(err.to_string()))
    }
}
