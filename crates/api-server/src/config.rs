use anyhow::{Context, Result};
use quote_service::EngineConfig;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub api_key: String,
    pub base_url: String,
    pub bind_addr: SocketAddr,
    pub engine: EngineConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Unset variables take defaults; set
    /// but unparsable ones are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("POLYGON_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .context("POLYGON_API_KEY must be set")?;

        let base_url = lookup("POLYGON_BASE_URL")
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| polygon_client::BASE_URL.to_string());

        let bind_addr = parse_or(&lookup, "BIND_ADDR", || {
            SocketAddr::from_str(DEFAULT_BIND_ADDR).context("default bind address")
        })?;

        let defaults = EngineConfig::default();
        let engine = EngineConfig {
            request_timeout: parse_or(&lookup, "QUOTE_REQUEST_TIMEOUT_SECS", || Ok(defaults.request_timeout.as_secs()))
                .map(Duration::from_secs)?,
            cache_ttl: parse_or(&lookup, "QUOTE_CACHE_TTL_SECS", || Ok(defaults.cache_ttl.as_secs()))
                .map(Duration::from_secs)?,
            cache_capacity: parse_or(&lookup, "QUOTE_CACHE_CAPACITY", || Ok(defaults.cache_capacity))?,
            max_concurrent_lookups: parse_or(&lookup, "QUOTE_MAX_CONCURRENCY", || Ok(defaults.max_concurrent_lookups))?,
            ..defaults
        };

        Ok(Self {
            api_key,
            base_url,
            bind_addr,
            engine,
        })
    }
}

fn parse_or<F, T, D>(lookup: &F, name: &str, default: D) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    D: FnOnce() -> Result<T>,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", name, raw)),
        None => default(),
    }
}
