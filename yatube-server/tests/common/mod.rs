#![allow(dead_code)]

use actix_web::http::header::{AUTHORIZATION, CONTENT_TYPE};
use tempfile::TempDir;
use uuid::Uuid;

use yatube_server::AppState;
use yatube_server::data::Store;
use yatube_server::domain::group::Group;
use yatube_server::domain::post::Post;
use yatube_server::domain::user::User;
use yatube_server::infrastructure::config::AppConfig;

pub const BOUNDARY: &str = "----yatube-test-boundary";

/// 2x1 GIF used as an uploaded picture.
pub const SMALL_GIF: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x02, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
    0x00, 0xFF, 0xFF, 0xFF, 0x21, 0xF9, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2C, 0x00, 0x00,
    0x00, 0x00, 0x02, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x0C, 0x0A, 0x00, 0x3B,
];

pub struct TestContext {
    pub state: AppState,
    pub media: TempDir,
}

pub fn config(media_root: &TempDir, page_cache_ttl_secs: u64) -> AppConfig {
    AppConfig {
        host: "127.0.0.1".into(),
        port: 0,
        database_url: None,
        jwt_secret: "test-secret".into(),
        cors_origins: vec![],
        media_root: media_root.path().to_string_lossy().into_owned(),
        page_cache_ttl_secs,
        posts_per_page: 10,
    }
}

/// Fresh in-memory state with the index cache switched off.
pub fn context() -> TestContext {
    context_with_cache(0)
}

pub fn context_with_cache(ttl_secs: u64) -> TestContext {
    let media = tempfile::tempdir().expect("media dir");
    let state = AppState::new(&config(&media, ttl_secs), Store::in_memory());
    TestContext { state, media }
}

impl TestContext {
    /// Registers a user and returns it together with a bearer token.
    pub async fn user(&self, username: &str) -> (User, String) {
        let user = self
            .state
            .auth
            .register(username.to_string(), None, "password123".to_string())
            .await
            .expect("register user");
        let token = self.state.auth.issue_token(&user).expect("token");
        (user, token)
    }

    pub async fn group(&self, title: &str, slug: &str) -> Group {
        self.state
            .store
            .groups
            .create(Group::new(
                title.to_string(),
                slug.to_string(),
                format!("{title} description"),
            ))
            .await
            .expect("create group")
    }

    pub async fn post(&self, author: &User, text: &str, group: Option<&Group>) -> Post {
        self.state
            .store
            .posts
            .create(Post::new(
                author.id,
                group.map(|g| g.id),
                text.to_string(),
                None,
            ))
            .await
            .expect("create post")
    }

    pub async fn post_count(&self) -> usize {
        self.state
            .store
            .posts
            .count(yatube_server::domain::post::PostFilter::All)
            .await
            .expect("count posts")
    }

    pub async fn comment_count(&self, post_id: Uuid) -> usize {
        self.state
            .store
            .comments
            .list_for_post(post_id)
            .await
            .expect("list comments")
            .len()
    }
}

pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

pub fn multipart_header() -> (actix_web::http::header::HeaderName, String) {
    (
        CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    )
}

/// Builds a multipart body from text fields and an optional
/// `(field, file name, content type, bytes)` file part.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some((name, file_name, content_type, bytes)) = file {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
