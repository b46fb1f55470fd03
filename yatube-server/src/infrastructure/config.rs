use crate::pagination::POSTS_PER_PAGE;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Without a database URL the server keeps everything in memory.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub cors_origins: Vec<String>,
    pub media_root: String,
    pub page_cache_ttl_secs: u64,
    pub posts_per_page: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PORT: {}", e))?;
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());
        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;
        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let media_root = std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".into());
        let page_cache_ttl_secs = std::env::var("PAGE_CACHE_TTL_SECS")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PAGE_CACHE_TTL_SECS: {}", e))?;
        let posts_per_page = match std::env::var("POSTS_PER_PAGE") {
            Ok(raw) => raw
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid POSTS_PER_PAGE: {}", e))?,
            Err(_) => POSTS_PER_PAGE,
        };
        if posts_per_page == 0 {
            anyhow::bail!("POSTS_PER_PAGE must be positive");
        }

        Ok(Self {
            host,
            port,
            database_url,
            jwt_secret,
            cors_origins,
            media_root,
            page_cache_ttl_secs,
            posts_per_page,
        })
    }
}
