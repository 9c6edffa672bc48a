//! Quote engine: resilient upstream access, a shared result cache, and the
//! assembly of per-ticker quotes with indicators and signals.

pub mod assembler;
pub mod cache;
pub mod config;
pub mod service;
pub mod ticker;
pub mod upstream;


pub use assembler::{build_quote, resolve_price, SnapshotAssembler};
pub use cache::ResultCache;
pub use config::EngineConfig;
pub use service::QuoteService;
pub use ticker::{sanitize_query, sanitize_ticker, MAX_QUERY_LEN, MAX_TICKER_LEN};
pub use upstream::CachedUpstream;
