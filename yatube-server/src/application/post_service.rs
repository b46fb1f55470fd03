use tracing::instrument;
use uuid::Uuid;

use crate::data::Store;
use crate::domain::comment::{Comment, CommentDetails};
use crate::domain::error::DomainError;
use crate::domain::forms::{CommentForm, PostForm};
use crate::domain::group::Group;
use crate::domain::post::{Post, PostChanges, PostDetails, PostFilter};
use crate::infrastructure::media::MediaStorage;
use crate::pagination::{Page, Paginator};

#[derive(Clone)]
pub struct PostService {
    store: Store,
    media: MediaStorage,
    paginator: Paginator,
}

impl PostService {
    pub fn new(store: Store, media: MediaStorage, paginator: Paginator) -> Self {
        Self {
            store,
            media,
            paginator,
        }
    }

    pub fn media(&self) -> &MediaStorage {
        &self.media
    }

    /// Counts the feed first so the requested page can be clamped, then loads
    /// only that page.
    pub async fn feed_page(
        &self,
        filter: PostFilter,
        page: Option<&str>,
    ) -> Result<Page<PostDetails>, DomainError> {
        let total = self.store.posts.count(filter).await?;
        let window = self.paginator.window(total, page);
        let posts = self
            .store
            .posts
            .list(filter, window.limit, window.offset)
            .await?;
        Ok(Page::new(window, total, posts))
    }

    pub async fn group_by_slug(&self, slug: &str) -> Result<Group, DomainError> {
        self.store
            .groups
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::GroupNotFound(slug.to_string()))
    }

    pub async fn groups(&self) -> Result<Vec<Group>, DomainError> {
        self.store.groups.list().await
    }

    pub async fn author_post_count(&self, author_id: Uuid) -> Result<usize, DomainError> {
        self.store.posts.count(PostFilter::Author(author_id)).await
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.store
            .posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }

    pub async fn get_post_details(&self, id: Uuid) -> Result<PostDetails, DomainError> {
        self.store
            .posts
            .find_details(id)
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }

    pub async fn comments(&self, post_id: Uuid) -> Result<Vec<CommentDetails>, DomainError> {
        self.store.comments.list_for_post(post_id).await
    }

    #[instrument(skip(self, form))]
    pub async fn create_post(&self, author_id: Uuid, form: &PostForm) -> Result<Post, DomainError> {
        let groups = self.groups().await?;
        let cleaned = form.clean(&groups).map_err(DomainError::Validation)?;
        let image = match &cleaned.image {
            Some(upload) => Some(
                self.media
                    .save_post_image(&upload.path, &upload.extension)
                    .await?,
            ),
            None => None,
        };
        let post = Post::new(author_id, cleaned.group_id, cleaned.text, image);
        self.store.posts.create(post).await
    }

    /// Authorship is checked by the caller; this only applies the form.
    #[instrument(skip(self, form))]
    pub async fn update_post(&self, post_id: Uuid, form: &PostForm) -> Result<Post, DomainError> {
        let groups = self.groups().await?;
        let cleaned = form.clean(&groups).map_err(DomainError::Validation)?;
        let image = match &cleaned.image {
            Some(upload) => Some(
                self.media
                    .save_post_image(&upload.path, &upload.extension)
                    .await?,
            ),
            None => None,
        };
        let changes = PostChanges {
            text: cleaned.text,
            group_id: cleaned.group_id,
            image,
        };
        self.store
            .posts
            .update_post(post_id, changes)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))
    }

    #[instrument(skip(self, form))]
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        form: &CommentForm,
    ) -> Result<Comment, DomainError> {
        self.get_post(post_id).await?;
        let text = form.clean().map_err(DomainError::Validation)?;
        self.store
            .comments
            .create(Comment::new(post_id, author_id, text))
            .await
    }

    pub async fn delete_post(&self, post_id: Uuid) -> Result<(), DomainError> {
        if self.store.posts.delete_post(post_id).await? {
            Ok(())
        } else {
            Err(DomainError::PostNotFound(post_id))
        }
    }
}
