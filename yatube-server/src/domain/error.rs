use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::forms::FormErrors;

pub const LOGIN_URL: &str = "/auth/login/";

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error("user already exists: {0}")]
    UserAlreadyExists(String),
    #[error("group not found: {0}")]
    GroupNotFound(String),
    #[error("post not found: {0}")]
    PostNotFound(Uuid),
    #[error("unauthorized")]
    Unauthorized,
    #[error("login required")]
    LoginRequired { next: String },
    #[error("validation failed")]
    Validation(FormErrors),
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn login_url(next: &str) -> String {
        format!("{}?next={}", LOGIN_URL, urlencoding::encode(next))
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::UserNotFound(_)
            | DomainError::GroupNotFound(_)
            | DomainError::PostNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Unauthorized => StatusCode::UNAUTHORIZED,
            DomainError::LoginRequired { .. } => StatusCode::FOUND,
            DomainError::UserAlreadyExists(_) => StatusCode::CONFLICT,
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let DomainError::LoginRequired { next } = self {
            return HttpResponse::Found()
                .insert_header((LOCATION, DomainError::login_url(next)))
                .finish();
        }

        let message = self.to_string();
        let details = match self {
            DomainError::UserNotFound(resource) | DomainError::GroupNotFound(resource) => {
                Some(json!({ "resource": resource }))
            }
            DomainError::PostNotFound(resource) => Some(json!({ "resource": resource })),
            DomainError::Validation(errors) => serde_json::to_value(errors).ok(),
            // internals stay in the logs
            DomainError::Internal(_) => {
                return HttpResponse::InternalServerError().json(ErrorBody {
                    error: "internal error",
                    details: None,
                });
            }
            _ => None,
        };
        let body = ErrorBody {
            error: message.as_str(),
            details,
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_required_redirects_with_next() {
        let err = DomainError::LoginRequired {
            next: "/posts/1/comment/".into(),
        };
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(LOCATION).unwrap(),
            "/auth/login/?next=%2Fposts%2F1%2Fcomment%2F"
        );
    }

    #[test]
    fn not_found_variants_map_to_404() {
        assert_eq!(
            DomainError::GroupNotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            DomainError::PostNotFound(Uuid::nil()).status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
