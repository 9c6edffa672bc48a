use analysis_core::{Bar, TickerMatch};
use chrono::{DateTime, NaiveDate};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

pub mod error;
pub mod fetcher;
pub mod symbols;

pub use error::{classify_status, FetchError};
pub use fetcher::{Fetcher, HttpFetcher, DEFAULT_TIMEOUT};
pub use symbols::{asset_class, to_vendor_symbol, AssetClass};

pub const BASE_URL: &str = "https://api.polygon.io";

/// Upper bound on daily bars requested in one call; a year is ~252.
const AGGREGATES_LIMIT: u32 = 5000;

/// Builds vendor URLs and hands them to a `Fetcher`.
///
/// Responses come back as raw JSON so callers can cache them untouched;
/// the `parse_*` functions turn them into typed values.
#[derive(Clone)]
pub struct PolygonClient {
    api_key: String,
    base_url: String,
    fetcher: Arc<dyn Fetcher>,
}

impl PolygonClient {
    /// Client over HTTP with a per-call deadline of `timeout`
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Self {
        Self::with_fetcher(api_key, base_url, Arc::new(HttpFetcher::new(timeout)))
    }

    pub fn with_fetcher(api_key: String, base_url: String, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            fetcher,
        }
    }

    /// Single attempt through the underlying fetcher
    pub async fn fetch(&self, url: &str) -> Result<Value, FetchError> {
        self.fetcher.fetch(url).await
    }

    fn url(&self, path: &str, params: &[(&str, &str)]) -> Result<String, FetchError> {
        let mut query: Vec<(&str, &str)> = params.to_vec();
        query.push(("apiKey", self.api_key.as_str()));
        Url::parse_with_params(&format!("{}{}", self.base_url, path), &query)
            .map(String::from)
            .map_err(|e| FetchError::InvalidUrl(e.to_string()))
    }

    /// Latest snapshot (today's bar, previous day, last trade)
    pub fn snapshot_url(&self, vendor_symbol: &str) -> Result<String, FetchError> {
        let path = match asset_class(vendor_symbol) {
            AssetClass::Stock => format!("/v2/snapshot/locale/us/markets/stocks/tickers/{}", vendor_symbol),
            AssetClass::Crypto => format!("/v2/snapshot/locale/global/markets/crypto/tickers/{}", vendor_symbol),
        };
        self.url(&path, &[])
    }

    /// Reference details (name, market cap)
    pub fn details_url(&self, vendor_symbol: &str) -> Result<String, FetchError> {
        self.url(&format!("/v3/reference/tickers/{}", vendor_symbol), &[])
    }

    /// Daily bars over `[from, to]`, oldest first
    pub fn aggregates_url(&self, vendor_symbol: &str, from: NaiveDate, to: NaiveDate) -> Result<String, FetchError> {
        let path = format!(
            "/v2/aggs/ticker/{}/range/1/day/{}/{}",
            vendor_symbol,
            from.format("%Y-%m-%d"),
            to.format("%Y-%m-%d")
        );
        let limit = AGGREGATES_LIMIT.to_string();
        self.url(&path, &[("adjusted", "true"), ("sort", "asc"), ("limit", &limit)])
    }

    /// Active tickers matching a free-text query
    pub fn search_url(&self, query: &str, limit: usize) -> Result<String, FetchError> {
        let limit = limit.to_string();
        self.url("/v3/reference/tickers", &[("search", query), ("active", "true"), ("limit", &limit)])
    }
}

fn decode<T: for<'de> Deserialize<'de>>(payload: &Value) -> Result<T, FetchError> {
    T::deserialize(payload).map_err(|e| FetchError::Decode(e.to_string()))
}

/// Decode a snapshot payload
pub fn parse_snapshot(payload: &Value) -> Result<SnapshotTicker, FetchError> {
    let response: SnapshotResponse = decode(payload)?;
    Ok(response.ticker)
}

/// Decode a ticker details payload
pub fn parse_details(payload: &Value) -> Result<TickerDetails, FetchError> {
    let response: TickerDetailsResponse = decode(payload)?;
    Ok(response.results)
}

/// Decode an aggregates payload into bars sorted oldest first.
///
/// Bars with a missing timestamp or an unusable close are dropped.
pub fn parse_aggregates(payload: &Value) -> Result<Vec<Bar>, FetchError> {
    let response: AggregateResponse = decode(payload)?;

    let mut bars: Vec<Bar> = response
        .results
        .into_iter()
        .filter(|r| analysis_core::is_valid_price(r.c))
        .filter_map(|r| {
            DateTime::from_timestamp_millis(r.t).map(|timestamp| Bar {
                timestamp,
                open: r.o,
                high: r.h,
                low: r.l,
                close: r.c,
                volume: r.v,
            })
        })
        .collect();

    bars.sort_by_key(|b| b.timestamp);
    Ok(bars)
}

/// Decode a ticker search payload, keeping at most `limit` hits
pub fn parse_search(payload: &Value, limit: usize) -> Result<Vec<TickerMatch>, FetchError> {
    let response: TickerListResponse = decode(payload)?;

    Ok(response
        .results
        .into_iter()
        .take(limit)
        .map(|t| TickerMatch {
            name: t.name.unwrap_or_else(|| t.ticker.clone()),
            symbol: t.ticker,
            kind: t.ticker_type.or(t.market).unwrap_or_else(|| "unknown".to_string()),
        })
        .collect())
}

// Ticker list response
#[derive(Debug, Deserialize)]
struct TickerListResponse {
    #[serde(default)]
    results: Vec<TickerListEntry>,
}

#[derive(Debug, Deserialize)]
struct TickerListEntry {
    ticker: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    market: Option<String>,
    #[serde(default, rename = "type")]
    ticker_type: Option<String>,
}

// Response structures
#[derive(Debug, Deserialize)]
struct AggregateResponse {
    #[serde(default)]
    results: Vec<AggregateResult>,
}

#[derive(Debug, Deserialize)]
struct AggregateResult {
    t: i64, // timestamp
    o: f64, // open
    h: f64, // high
    l: f64, // low
    c: f64, // close
    #[serde(default)]
    v: f64, // volume
}

#[derive(Debug, Deserialize)]
struct TickerDetailsResponse {
    results: TickerDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerDetails {
    pub ticker: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub market_cap: Option<f64>,
}

// Snapshot types
#[derive(Debug, Deserialize)]
struct SnapshotResponse {
    ticker: SnapshotTicker,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotTicker {
    pub day: Option<SnapshotDay>,
    #[serde(rename = "prevDay")]
    pub prev_day: Option<SnapshotDay>,
}

impl SnapshotTicker {
    /// Today's close so far; the vendor reports 0 before the session opens.
    pub fn intraday_close(&self) -> Option<f64> {
        self.day.as_ref().and_then(|d| d.c)
    }

    pub fn previous_close(&self) -> Option<f64> {
        self.prev_day.as_ref().and_then(|d| d.c)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotDay {
    /// Close so far (today) or final close (previous day)
    pub c: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> PolygonClient {
        PolygonClient::with_fetcher(
            "test-key".to_string(),
            "https://api.example.test/".to_string(),
            Arc::new(HttpFetcher::new(DEFAULT_TIMEOUT)),
        )
    }

    #[test]
    fn test_snapshot_url_by_asset_class() {
        let c = client();
        let stock = c.snapshot_url("AAPL").unwrap();
        assert!(stock.starts_with("https://api.example.test/v2/snapshot/locale/us/markets/stocks/tickers/AAPL?"));
        assert!(stock.contains("apiKey=test-key"));

        let crypto = c.snapshot_url("X:BTCUSD").unwrap();
        assert!(crypto.contains("/v2/snapshot/locale/global/markets/crypto/tickers/X:BTCUSD"));
    }

    #[test]
    fn test_aggregates_url() {
        let c = client();
        let from = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let url = c.aggregates_url("MSFT", from, to).unwrap();
        assert!(url.contains("/v2/aggs/ticker/MSFT/range/1/day/2023-06-01/2024-06-01?"));
        assert!(url.contains("sort=asc"));
        assert!(url.contains("limit=5000"));
    }

    #[test]
    fn test_search_url_encodes_query() {
        let url = client().search_url("apple inc", 10).unwrap();
        assert!(url.contains("search=apple+inc"));
        assert!(url.contains("limit=10"));
    }

    #[test]
    fn test_parse_snapshot() {
        let payload = json!({
            "status": "OK",
            "ticker": {
                "ticker": "AAPL",
                "day": { "o": 189.0, "h": 191.0, "l": 188.5, "c": 190.25, "v": 51234567.0 },
                "prevDay": { "o": 187.0, "h": 189.5, "l": 186.0, "c": 188.0, "v": 48000000.0 },
                "lastTrade": { "p": 190.3, "s": 100, "t": 1717000000000i64 },
                "todaysChangePerc": 1.2
            }
        });
        let snap = parse_snapshot(&payload).unwrap();
        assert_eq!(snap.intraday_close(), Some(190.25));
        assert_eq!(snap.previous_close(), Some(188.0));
    }

    #[test]
    fn test_parse_details_tolerates_missing_fields() {
        let payload = json!({ "results": { "ticker": "X:BTCUSD", "name": "Bitcoin - United States Dollar", "market": "crypto" } });
        let details = parse_details(&payload).unwrap();
        assert_eq!(details.name.as_deref(), Some("Bitcoin - United States Dollar"));
        assert!(details.market_cap.is_none());
    }

    #[test]
    fn test_parse_aggregates_sorts_and_filters() {
        let payload = json!({
            "results": [
                { "t": 1704240000000i64, "o": 2.0, "h": 2.5, "l": 1.5, "c": 2.0, "v": 10.0 },
                { "t": 1704153600000i64, "o": 1.0, "h": 1.5, "l": 0.5, "c": 1.0, "v": 10.0 },
                { "t": 1704326400000i64, "o": 3.0, "h": 3.5, "l": 2.5, "c": 0.0, "v": 10.0 }
            ]
        });
        let bars = parse_aggregates(&payload).unwrap();
        assert_eq!(bars.len(), 2);
        assert!(bars[0].timestamp < bars[1].timestamp);
        assert_eq!(bars[0].close, 1.0);
    }

    #[test]
    fn test_parse_aggregates_empty_results() {
        let bars = parse_aggregates(&json!({ "resultsCount": 0 })).unwrap();
        assert!(bars.is_empty());
    }

    #[test]
    fn test_parse_search_limits_and_falls_back() {
        let payload = json!({
            "results": [
                { "ticker": "AAPL", "name": "Apple Inc.", "market": "stocks", "type": "CS" },
                { "ticker": "X:BTCUSD", "name": "Bitcoin", "market": "crypto" },
                { "ticker": "APLE" }
            ]
        });
        let hits = parse_search(&payload, 10).unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].kind, "CS");
        assert_eq!(hits[1].kind, "crypto");
        assert_eq!(hits[2].name, "APLE");
        assert_eq!(hits[2].kind, "unknown");

        assert_eq!(parse_search(&payload, 1).unwrap().len(), 1);
    }

    #[test]
    fn test_decode_error_on_wrong_shape() {
        let err = parse_details(&json!({ "status": "NOT_FOUND" })).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
