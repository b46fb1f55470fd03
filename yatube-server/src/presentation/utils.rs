use actix_web::dev::Payload;
use actix_web::http::header::LOCATION;
use actix_web::{FromRequest, HttpMessage, HttpRequest, HttpResponse, error::ErrorUnauthorized};
use futures_util::future::{Ready, ready};
use uuid::Uuid;

use crate::application::auth_service::AuthService;
use crate::domain::error::DomainError;
use crate::infrastructure::security::JwtKeys;
use crate::presentation::middleware::RequestId;

pub fn is_owner(item_author: &Uuid, user_id: &Uuid) -> bool {
    item_author == user_id
}

pub fn redirect(location: impl AsRef<str>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((LOCATION, location.as_ref()))
        .finish()
}

pub fn profile_url(username: &str) -> String {
    format!("/profile/{}/", urlencoding::encode(username))
}

pub fn post_url(id: &Uuid) -> String {
    format!("/posts/{}/", id)
}

pub fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|rid| rid.0.clone())
        .unwrap_or_else(|| "unknown".into())
}

/// The caller, as attached by the identity middleware. Extracting it on an
/// anonymous request sends the client to the login page instead.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = DomainError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => {
                let next = req
                    .uri()
                    .path_and_query()
                    .map(|pq| pq.as_str().to_owned())
                    .unwrap_or_else(|| req.path().to_owned());
                ready(Err(DomainError::LoginRequired { next }))
            }
        }
    }
}

pub async fn extract_user_from_token(
    token: &str,
    keys: &JwtKeys,
    auth_service: &AuthService,
) -> Result<AuthenticatedUser, actix_web::Error> {
    let claims = keys
        .verify_token(token)
        .map_err(|_| ErrorUnauthorized("invalid token"))?;
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| ErrorUnauthorized("invalid token"))?;

    let user = auth_service
        .get_user(user_id)
        .await
        .map_err(|_| ErrorUnauthorized("user not found"))?;

    Ok(AuthenticatedUser {
        id: user.id,
        username: user.username,
    })
}
