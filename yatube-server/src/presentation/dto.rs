use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::comment::CommentDetails;
use crate::domain::forms::{CommentForm, FormErrors, ImageUpload, PostForm, valid_username};
use crate::domain::group::Group;
use crate::domain::post::PostDetails;
use crate::domain::user::User;
use crate::pagination::Page;

// ======================= AUTH =======================

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(
        length(min = 1, max = 150, message = "Username must be 1 to 150 characters"),
        custom(
            function = "valid_username",
            message = "Username may contain only letters, digits and @/./+/-/_"
        )
    )]
    pub username: String,
    #[serde(default)]
    #[validate(email(message = "Enter a valid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginPageQuery {
    pub next: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginPageContext {
    pub next: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(rename = "token_type")]
    pub token_type: String, // "Bearer"
}

// ======================= FEEDS =======================

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct IndexContext {
    pub title: String,
    pub page_obj: Page<PostDetails>,
}

#[derive(Debug, Serialize)]
pub struct GroupContext {
    pub title: String,
    pub group: Group,
    pub page_obj: Page<PostDetails>,
}

#[derive(Debug, Serialize)]
pub struct ProfileContext {
    pub title: String,
    pub author: User,
    pub page_obj: Page<PostDetails>,
    pub author_posts_count: usize,
    pub following: bool,
}

#[derive(Debug, Serialize)]
pub struct FollowContext {
    pub title: String,
    pub page_obj: Page<PostDetails>,
}

// ======================= POSTS =======================

/// A form as handed to the renderer: submitted values plus field errors.
#[derive(Debug, Serialize)]
pub struct BoundForm<T> {
    pub data: T,
    pub errors: FormErrors,
}

impl<T> BoundForm<T> {
    pub fn blank(data: T) -> Self {
        Self {
            data,
            errors: FormErrors::default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostDetailContext {
    pub post: PostDetails,
    pub author_posts_count: usize,
    pub comments: Vec<CommentDetails>,
    pub form: BoundForm<CommentForm>,
}

#[derive(Debug, Serialize)]
pub struct PostFormContext {
    pub form: BoundForm<PostForm>,
    pub group_choices: Vec<Group>,
    pub is_edit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<Uuid>,
}

#[derive(MultipartForm)]
pub struct PostUpload {
    pub text: Option<Text<String>>,
    pub group: Option<Text<String>>,
    #[multipart(limit = "10MB")]
    pub image: Option<TempFile>,
}

impl PostUpload {
    /// Splits the upload into the form to validate and the temp file backing
    /// its image, which must stay alive until the image has been stored.
    pub fn into_form(self) -> (PostForm, Option<TempFile>) {
        let file = self
            .image
            .filter(|f| f.file_name.as_deref().is_some_and(|name| !name.is_empty()));
        let image = file.as_ref().map(|f| ImageUpload {
            file_name: f.file_name.clone().unwrap_or_default(),
            content_type: f.content_type.as_ref().map(|m| m.to_string()),
            path: f.file.path().to_path_buf(),
        });
        let form = PostForm {
            text: self.text.map(|t| t.0).unwrap_or_default(),
            group: self.group.map(|g| g.0),
            image,
        };
        (form, file)
    }
}
