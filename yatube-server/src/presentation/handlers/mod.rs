pub mod about;
pub mod auth;
pub mod follow;
pub mod media;
pub mod posts;

use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .service(auth::scope())
        .service(about::scope())
        .service(posts::index)
        .service(posts::group_posts)
        .service(posts::profile)
        .service(posts::post_detail)
        .service(posts::post_create_form)
        .service(posts::post_create)
        .service(posts::post_edit_form)
        .service(posts::post_edit)
        .service(posts::add_comment)
        .service(follow::follow_index)
        .service(follow::profile_follow)
        .service(follow::profile_unfollow)
        .service(media::media_file);
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "error": "not found" }))
}
