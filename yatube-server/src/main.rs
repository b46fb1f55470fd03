use yatube_server::AppState;
use yatube_server::data::Store;
use yatube_server::infrastructure::config::AppConfig;
use yatube_server::infrastructure::database::{create_pool, run_migrations};
use yatube_server::infrastructure::logging::init_logging;
use yatube_server::server::start_rest_server;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env()?;

    let store = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            run_migrations(&pool).await?;
            Store::postgres(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, keeping data in memory");
            Store::in_memory()
        }
    };

    let state = AppState::new(&config, store);
    start_rest_server(config, state).await
}
