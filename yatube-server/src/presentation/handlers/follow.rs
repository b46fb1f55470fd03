use crate::application::auth_service::AuthService;
use crate::application::follow_service::FollowService;
use crate::application::post_service::PostService;
use crate::domain::error::DomainError;
use crate::domain::post::PostFilter;
use crate::presentation::dto::{FollowContext, PageQuery};
use crate::presentation::utils::{AuthenticatedUser, profile_url, redirect, request_id};
use actix_web::{HttpRequest, HttpResponse, get, web};
use tracing::info;

#[get("/follow/")]
pub async fn follow_index(
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, DomainError> {
    let page_obj = posts
        .feed_page(PostFilter::FollowedBy(user.id), query.page.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(FollowContext {
        title: "Posts by authors you follow".to_string(),
        page_obj,
    }))
}

#[get("/profile/{username}/follow/")]
pub async fn profile_follow(
    req: HttpRequest,
    user: AuthenticatedUser,
    auth: web::Data<AuthService>,
    follows: web::Data<FollowService>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let author = auth.get_by_username(&path.into_inner()).await?;
    if follows.follow(user.id, author.id).await? {
        info!(
            request_id = %request_id(&req),
            username = %user.username,
            author = %author.username,
            "author followed"
        );
    }
    Ok(redirect(profile_url(&author.username)))
}

#[get("/profile/{username}/unfollow/")]
pub async fn profile_unfollow(
    req: HttpRequest,
    user: AuthenticatedUser,
    auth: web::Data<AuthService>,
    follows: web::Data<FollowService>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let author = auth.get_by_username(&path.into_inner()).await?;
    if follows.unfollow(user.id, author.id).await? {
        info!(
            request_id = %request_id(&req),
            username = %user.username,
            author = %author.username,
            "author unfollowed"
        );
    }
    Ok(redirect(profile_url(&author.username)))
}
