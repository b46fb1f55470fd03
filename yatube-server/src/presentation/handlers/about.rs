use actix_web::{HttpResponse, Scope, get, web};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StaticPageContext {
    pub title: &'static str,
    pub body: &'static str,
}

pub fn scope() -> Scope {
    web::scope("/about").service(author).service(tech)
}

#[get("/author/")]
async fn author() -> HttpResponse {
    HttpResponse::Ok().json(StaticPageContext {
        title: "About the author",
        body: "Yatube is a small blogging platform built as a study project.",
    })
}

#[get("/tech/")]
async fn tech() -> HttpResponse {
    HttpResponse::Ok().json(StaticPageContext {
        title: "Technologies",
        body: "Rust, actix-web, sqlx with PostgreSQL, moka for page caching.",
    })
}
