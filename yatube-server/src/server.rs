use actix_cors::Cors;
use actix_web::HttpServer;
use tracing::info;

use crate::infrastructure::config::AppConfig;
use crate::{AppState, create_app};

pub async fn start_rest_server(config: AppConfig, state: AppState) -> anyhow::Result<()> {
    let bind_address = (config.host.clone(), config.port);

    info!(
        host = %bind_address.0,
        port = bind_address.1,
        "HTTP server starting"
    );

    HttpServer::new(move || {
        let cors = build_cors(&config);
        create_app(state.clone()).wrap(cors)
    })
    .bind(bind_address)?
    .run()
    .await
    .map_err(anyhow::Error::new)?;

    Ok(())
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
        ])
        .supports_credentials()
        .max_age(3600);

    for origin in &config.cors_origins {
        cors = if origin == "*" {
            cors.allow_any_origin()
        } else {
            cors.allowed_origin(origin)
        };
    }

    cors
}
