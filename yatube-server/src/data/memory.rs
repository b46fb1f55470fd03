use std::cmp::Reverse;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::data::comment_repository::CommentRepository;
use crate::data::follow_repository::FollowRepository;
use crate::data::group_repository::GroupRepository;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::comment::{Comment, CommentDetails};
use crate::domain::error::DomainError;
use crate::domain::follow::Follow;
use crate::domain::group::Group;
use crate::domain::post::{Post, PostChanges, PostDetails, PostFilter};
use crate::domain::user::User;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    groups: Vec<Group>,
    /// Insertion sequence breaks ties between posts created in the same instant.
    posts: Vec<(u64, Post)>,
    comments: Vec<Comment>,
    follows: Vec<Follow>,
    next_seq: u64,
}

impl Tables {
    fn username(&self, id: Uuid) -> String {
        self.users
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.username.clone())
            .unwrap_or_default()
    }

    fn matches(&self, post: &Post, filter: PostFilter) -> bool {
        match filter {
            PostFilter::All => true,
            PostFilter::Group(group_id) => post.group_id == Some(group_id),
            PostFilter::Author(author_id) => post.author_id == author_id,
            PostFilter::FollowedBy(user_id) => self
                .follows
                .iter()
                .any(|f| f.user_id == user_id && f.author_id == post.author_id),
        }
    }

    fn details(&self, post: &Post) -> PostDetails {
        let group = post
            .group_id
            .and_then(|id| self.groups.iter().find(|g| g.id == id));
        PostDetails {
            id: post.id,
            text: post.text.clone(),
            image: post.image.clone(),
            created_at: post.created_at,
            author_id: post.author_id,
            author: self.username(post.author_id),
            group_id: group.map(|g| g.id),
            group_slug: group.map(|g| g.slug.clone()),
            group_title: group.map(|g| g.title.clone()),
        }
    }

    fn user_exists(&self, id: Uuid) -> bool {
        self.users.iter().any(|u| u.id == id)
    }
}

/// Process-local store behind the same repository traits as PostgreSQL.
/// Used when no `DATABASE_URL` is configured, and by the test suite.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(DomainError::UserAlreadyExists(user.username));
        }
        tables.users.push(user.clone());
        info!(user_id = %user.id, username = %user.username, "user created");
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl GroupRepository for MemoryStore {
    async fn create(&self, group: Group) -> Result<Group, DomainError> {
        let mut tables = self.tables.write().await;
        if tables.groups.iter().any(|g| g.slug == group.slug) {
            return Err(DomainError::Internal(format!(
                "group slug already taken: {}",
                group.slug
            )));
        }
        tables.groups.push(group.clone());
        info!(group_id = %group.id, slug = %group.slug, "group created");
        Ok(group)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.groups.iter().find(|g| g.slug == slug).cloned())
    }

    async fn list(&self) -> Result<Vec<Group>, DomainError> {
        let tables = self.tables.read().await;
        let mut groups = tables.groups.clone();
        groups.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(groups)
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create(&self, post: Post) -> Result<Post, DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.user_exists(post.author_id) {
            return Err(DomainError::Internal(format!(
                "author does not exist: {}",
                post.author_id
            )));
        }
        let seq = tables.next_seq;
        tables.next_seq += 1;
        tables.posts.push((seq, post.clone()));
        info!(post_id = %post.id, author_id = %post.author_id, "post created");
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .iter()
            .find(|(_, p)| p.id == id)
            .map(|(_, p)| p.clone()))
    }

    async fn find_details(&self, id: Uuid) -> Result<Option<PostDetails>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .iter()
            .find(|(_, p)| p.id == id)
            .map(|(_, p)| tables.details(p)))
    }

    async fn update_post(
        &self,
        id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>, DomainError> {
        let mut tables = self.tables.write().await;
        let Some((_, post)) = tables.posts.iter_mut().find(|(_, p)| p.id == id) else {
            return Ok(None);
        };
        post.text = changes.text;
        post.group_id = changes.group_id;
        if let Some(image) = changes.image {
            post.image = Some(image);
        }
        info!(post_id = %id, "post updated");
        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        let before = tables.posts.len();
        tables.posts.retain(|(_, p)| p.id != id);
        let removed = tables.posts.len() < before;
        if removed {
            tables.comments.retain(|c| c.post_id != id);
            info!(post_id = %id, "post deleted");
        }
        Ok(removed)
    }

    async fn count(&self, filter: PostFilter) -> Result<usize, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .iter()
            .filter(|(_, p)| tables.matches(p, filter))
            .count())
    }

    async fn list(
        &self,
        filter: PostFilter,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<PostDetails>, DomainError> {
        let tables = self.tables.read().await;
        let mut selected: Vec<&(u64, Post)> = tables
            .posts
            .iter()
            .filter(|(_, p)| tables.matches(p, filter))
            .collect();
        selected.sort_by_key(|(seq, p)| Reverse((p.created_at, *seq)));
        Ok(selected
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|(_, p)| tables.details(p))
            .collect())
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create(&self, comment: Comment) -> Result<Comment, DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.iter().any(|(_, p)| p.id == comment.post_id) {
            return Err(DomainError::PostNotFound(comment.post_id));
        }
        tables.comments.push(comment.clone());
        info!(comment_id = %comment.id, post_id = %comment.post_id, "comment created");
        Ok(comment)
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentDetails>, DomainError> {
        let tables = self.tables.read().await;
        // comments are appended in creation order
        Ok(tables
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .map(|c| CommentDetails {
                id: c.id,
                post_id: c.post_id,
                author_id: c.author_id,
                author: tables.username(c.author_id),
                text: c.text.clone(),
                created_at: c.created_at,
            })
            .collect())
    }
}

#[async_trait]
impl FollowRepository for MemoryStore {
    async fn create(&self, follow: Follow) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        let duplicate = tables
            .follows
            .iter()
            .any(|f| f.user_id == follow.user_id && f.author_id == follow.author_id);
        if duplicate || follow.user_id == follow.author_id {
            return Ok(false);
        }
        info!(user_id = %follow.user_id, author_id = %follow.author_id, "follow created");
        tables.follows.push(follow);
        Ok(true)
    }

    async fn delete(&self, user_id: Uuid, author_id: Uuid) -> Result<u64, DomainError> {
        let mut tables = self.tables.write().await;
        let before = tables.follows.len();
        tables
            .follows
            .retain(|f| !(f.user_id == user_id && f.author_id == author_id));
        let removed = (before - tables.follows.len()) as u64;
        if removed > 0 {
            info!(user_id = %user_id, author_id = %author_id, "follow removed");
        }
        Ok(removed)
    }

    async fn exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .iter()
            .any(|f| f.user_id == user_id && f.author_id == author_id))
    }
}
