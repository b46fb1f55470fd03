use crate::application::auth_service::AuthService;
use crate::domain::error::DomainError;
use crate::domain::forms::FormErrors;
use crate::infrastructure::security::TOKEN_TTL_SECS;
use crate::presentation::dto::{
    AuthResponse, LoginPageContext, LoginPageQuery, LoginRequest, SignupRequest,
};
use actix_web::{HttpResponse, Responder, Scope, get, post, web};
use tracing::info;
use validator::Validate;

pub fn scope() -> Scope {
    web::scope("/auth")
        .service(signup)
        .service(login_page)
        .service(login)
}

#[post("/signup/")]
async fn signup(
    service: web::Data<AuthService>,
    payload: web::Json<SignupRequest>,
) -> Result<impl Responder, DomainError> {
    payload
        .validate()
        .map_err(|e| DomainError::Validation(FormErrors::from(e)))?;

    let SignupRequest {
        username,
        email,
        password,
    } = payload.into_inner();
    let user = service.register(username, email, password).await?;
    let jwt = service.issue_token(&user)?;

    info!(user_id = %user.id, username = %user.username, "user registered");

    Ok(HttpResponse::Created().json(AuthResponse {
        access_token: jwt,
        expires_in: TOKEN_TTL_SECS,
        token_type: "Bearer".to_string(),
    }))
}

/// Where login-required views send anonymous callers.
#[get("/login/")]
async fn login_page(query: web::Query<LoginPageQuery>) -> impl Responder {
    HttpResponse::Ok().json(LoginPageContext {
        next: query.into_inner().next,
    })
}

#[post("/login/")]
async fn login(
    service: web::Data<AuthService>,
    payload: web::Json<LoginRequest>,
) -> Result<impl Responder, DomainError> {
    let jwt = service.login(&payload.username, &payload.password).await?;

    info!(username = %payload.username, "user logged in");

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: jwt,
        expires_in: TOKEN_TTL_SECS,
        token_type: "Bearer".to_string(),
    }))
}
