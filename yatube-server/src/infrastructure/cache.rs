use std::time::Duration;

use actix_web::web::Bytes;
use moka::future::Cache;
use tracing::debug;

const MAX_CACHED_PAGES: u64 = 1_000;

/// Rendered page bodies keyed by request path and query. Entries live for a
/// fixed TTL and are not touched by writes, so readers may see stale pages
/// until the TTL passes or `invalidate_all` runs.
#[derive(Clone)]
pub struct PageCache {
    inner: Option<Cache<String, Bytes>>,
}

impl PageCache {
    /// A zero TTL turns caching off.
    pub fn new(ttl: Duration) -> Self {
        if ttl.is_zero() {
            return Self::disabled();
        }
        let cache = Cache::builder()
            .max_capacity(MAX_CACHED_PAGES)
            .time_to_live(ttl)
            .build();
        Self { inner: Some(cache) }
    }

    pub fn disabled() -> Self {
        Self { inner: None }
    }

    pub async fn get(&self, key: &str) -> Option<Bytes> {
        let hit = self.inner.as_ref()?.get(key).await;
        if hit.is_some() {
            debug!(key, "page cache hit");
        }
        hit
    }

    pub async fn insert(&self, key: String, body: Bytes) {
        if let Some(cache) = &self.inner {
            cache.insert(key, body).await;
        }
    }

    pub fn invalidate_all(&self) {
        if let Some(cache) = &self.inner {
            cache.invalidate_all();
            debug!("page cache cleared");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_until_invalidated() {
        let cache = PageCache::new(Duration::from_secs(60));
        cache.insert("/".into(), Bytes::from_static(b"page")).await;
        assert_eq!(cache.get("/").await, Some(Bytes::from_static(b"page")));
        assert_eq!(cache.get("/?page=2").await, None);

        cache.invalidate_all();
        assert_eq!(cache.get("/").await, None);
    }

    #[tokio::test]
    async fn zero_ttl_disables_caching() {
        let cache = PageCache::new(Duration::ZERO);
        cache.insert("/".into(), Bytes::from_static(b"page")).await;
        assert_eq!(cache.get("/").await, None);
    }

    #[tokio::test]
    async fn entries_expire() {
        let cache = PageCache::new(Duration::from_millis(50));
        cache.insert("/".into(), Bytes::from_static(b"page")).await;
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(cache.get("/").await, None);
    }
}
