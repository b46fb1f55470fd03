pub mod application;
pub mod data;
pub mod domain;
pub mod infrastructure;
pub mod pagination;
pub mod presentation;
pub mod server;

use std::time::Duration;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{App, Error, web};

use application::auth_service::AuthService;
use application::follow_service::FollowService;
use application::post_service::PostService;
use data::Store;
use infrastructure::cache::PageCache;
use infrastructure::config::AppConfig;
use infrastructure::media::MediaStorage;
use infrastructure::security::JwtKeys;
use pagination::Paginator;
use presentation::handlers;
use presentation::middleware::{JwtAuthMiddleware, RequestIdMiddleware, TimingMiddleware};

/// Everything the handlers share, built once and cloned into each worker.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub auth: AuthService,
    pub posts: PostService,
    pub follows: FollowService,
    pub page_cache: PageCache,
}

impl AppState {
    pub fn new(config: &AppConfig, store: Store) -> Self {
        let auth = AuthService::new(store.users.clone(), JwtKeys::new(config.jwt_secret.clone()));
        let posts = PostService::new(
            store.clone(),
            MediaStorage::new(&config.media_root),
            Paginator::new(config.posts_per_page),
        );
        let follows = FollowService::new(store.follows.clone());
        let page_cache = PageCache::new(Duration::from_secs(config.page_cache_ttl_secs));

        Self {
            store,
            auth,
            posts,
            follows,
            page_cache,
        }
    }
}

pub fn create_app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(JwtAuthMiddleware::new(state.auth.keys().clone()))
        .wrap(Logger::default())
        .wrap(TimingMiddleware)
        .wrap(RequestIdMiddleware)
        .wrap(
            DefaultHeaders::new()
                .add(("X-Content-Type-Options", "nosniff"))
                .add(("Referrer-Policy", "no-referrer"))
                .add(("Permissions-Policy", "geolocation=()"))
                .add(("Cross-Origin-Opener-Policy", "same-origin")),
        )
        .app_data(web::Data::new(state.auth))
        .app_data(web::Data::new(state.posts))
        .app_data(web::Data::new(state.follows))
        .app_data(web::Data::new(state.page_cache))
        .configure(handlers::configure)
        .default_service(web::to(handlers::not_found))
}
