use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::error::{classify_status, FetchError};

/// Default per-request deadline
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// One bounded attempt at an upstream GET. Implementations never retry.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Value, FetchError>;
}

/// `Fetcher` over HTTP with a hard deadline per call.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("quote-engine/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, timeout }
    }

    async fn send(&self, url: &str) -> Result<Value, FetchError> {
        let response = self.client.get(url).send().await?;
        classify_status(response.status().as_u16())?;
        let body = response.json::<Value>().await?;
        Ok(body)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Value, FetchError> {
        // Covers the body read too; the request is dropped when it trips
        match tokio::time::timeout(self.timeout, self.send(url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout),
        }
    }
}
