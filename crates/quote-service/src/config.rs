use polygon_client::DEFAULT_TIMEOUT;
use std::time::Duration;

/// Tunables for the quote engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Hard deadline for one upstream call
    pub request_timeout: Duration,
    /// How long an upstream payload is served from cache
    pub cache_ttl: Duration,
    /// Maximum cached payloads
    pub cache_capacity: usize,
    /// Per-ticker lookups in flight at once during a batch
    pub max_concurrent_lookups: usize,
    /// Closes kept in `Quote::historical_prices`
    pub history_window: usize,
    /// Maximum search hits returned
    pub search_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_TIMEOUT,
            cache_ttl: Duration::from_secs(60),
            cache_capacity: 500,
            max_concurrent_lookups: 10,
            history_window: 30,
            search_limit: 10,
        }
    }
}
