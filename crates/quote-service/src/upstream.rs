use polygon_client::{FetchError, PolygonClient};
use serde_json::Value;
use std::sync::Arc;

use crate::cache::ResultCache;

/// The vendor client behind the result cache.
///
/// A miss goes upstream once and stores the raw payload, but only after it
/// decodes. Two callers missing the same key at the same moment may both
/// fetch; the later write wins.
pub struct CachedUpstream {
    client: PolygonClient,
    cache: Arc<ResultCache<Value>>,
}

impl CachedUpstream {
    pub fn new(client: PolygonClient, cache: Arc<ResultCache<Value>>) -> Self {
        Self { client, cache }
    }

    pub fn client(&self) -> &PolygonClient {
        &self.client
    }

    pub fn cache(&self) -> &ResultCache<Value> {
        &self.cache
    }

    /// Serve `key` from cache, or fetch `url`, decode it, and cache it.
    ///
    /// Failed fetches and payloads `decode` rejects are never stored.
    pub async fn fetch<T, F>(&self, key: String, url: Result<String, FetchError>, decode: F) -> Result<T, FetchError>
    where
        F: Fn(&Value) -> Result<T, FetchError>,
    {
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!("Cache hit for {}", key);
            return decode(&hit);
        }

        tracing::debug!("Cache miss for {}, fetching upstream", key);
        let payload = self.client.fetch(&url?).await?;
        let decoded = decode(&payload)?;
        self.cache.insert(key, payload);
        Ok(decoded)
    }
}
