use analysis_core::{Clock, Quote, QuoteError, SystemClock, TickerMatch};
use futures_util::stream::{self, StreamExt};
use polygon_client::{parse_search, PolygonClient};
use serde_json::Value;
use std::sync::Arc;

use crate::assembler::SnapshotAssembler;
use crate::cache::ResultCache;
use crate::config::EngineConfig;
use crate::ticker::sanitize_query;
use crate::upstream::CachedUpstream;

/// Public entry point: single quotes, batches and ticker search.
pub struct QuoteService {
    upstream: Arc<CachedUpstream>,
    assembler: SnapshotAssembler,
    config: EngineConfig,
}

impl QuoteService {
    /// Service on the system clock
    pub fn new(client: PolygonClient, config: EngineConfig) -> Self {
        Self::with_client(client, config, Arc::new(SystemClock))
    }

    pub fn with_client(client: PolygonClient, config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        let cache = Arc::new(ResultCache::new(config.cache_capacity, config.cache_ttl, Arc::clone(&clock)));
        let upstream = Arc::new(CachedUpstream::new(client, cache));
        let assembler = SnapshotAssembler::new(Arc::clone(&upstream), clock, config.history_window);

        tracing::info!(
            "Quote service ready (cache ttl {:?}, capacity {}, batch concurrency {})",
            config.cache_ttl,
            config.cache_capacity,
            config.max_concurrent_lookups
        );

        Self {
            upstream,
            assembler,
            config,
        }
    }

    pub fn cache(&self) -> &ResultCache<Value> {
        self.upstream.cache()
    }

    /// Full quote for one ticker
    pub async fn get_quote(&self, ticker: &str) -> Result<Quote, QuoteError> {
        self.assembler.assemble(ticker).await
    }

    /// Quotes for many tickers, in input order.
    ///
    /// Tickers that fail are left out; the call itself never fails.
    pub async fn get_quotes<S: AsRef<str>>(&self, tickers: &[S]) -> Vec<Quote> {
        let limit = self.config.max_concurrent_lookups.max(1);
        tracing::info!("Batch quote for {} tickers ({} at a time)", tickers.len(), limit);

        let results: Vec<Result<Quote, QuoteError>> = stream::iter(
            tickers
                .iter()
                .map(|t| self.get_quote(t.as_ref()))
                .collect::<Vec<_>>(),
        )
        .buffered(limit)
        .collect()
        .await;

        let quotes: Vec<Quote> = results
            .into_iter()
            .zip(tickers.iter())
            .filter_map(|(result, ticker)| match result {
                Ok(quote) => Some(quote),
                Err(e) => {
                    tracing::info!("Skipping {} in batch: {}", ticker.as_ref(), e);
                    None
                }
            })
            .collect();

        tracing::info!(
            "Batch complete: {}/{} quotes ({} payloads cached)",
            quotes.len(),
            tickers.len(),
            self.cache().len()
        );
        quotes
    }

    /// Tickers matching free text, at most `search_limit` of them.
    ///
    /// Empty input and upstream failures both give an empty list.
    pub async fn search_tickers(&self, query: &str) -> Vec<TickerMatch> {
        let query = match sanitize_query(query) {
            Some(q) => q,
            None => return Vec::new(),
        };

        let limit = self.config.search_limit;
        let key = format!("search:{}", query);
        let url = self.upstream.client().search_url(&query, limit);

        match self
            .upstream
            .fetch(key, url, |payload| parse_search(payload, limit))
            .await
        {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!("Ticker search for {:?} failed: {}", query, e);
                Vec::new()
            }
        }
    }
}
