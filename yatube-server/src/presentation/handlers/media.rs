use std::io::ErrorKind;

use crate::application::post_service::PostService;
use crate::domain::error::DomainError;
use actix_web::{HttpResponse, get, web};
use tracing::error;

#[get("/media/{path:.*}")]
pub async fn media_file(
    posts: web::Data<PostService>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let Some(file) = posts.media().resolve(&path.into_inner()) else {
        return Ok(HttpResponse::NotFound().finish());
    };

    match tokio::fs::read(&file).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(&file).first_or_octet_stream();
            Ok(HttpResponse::Ok()
                .content_type(mime.to_string())
                .body(bytes))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(HttpResponse::NotFound().finish()),
        Err(e) => {
            error!("failed to read media file {}: {}", file.display(), e);
            Err(DomainError::Internal(e.to_string()))
        }
    }
}
