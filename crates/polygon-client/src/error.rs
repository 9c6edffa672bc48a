use thiserror::Error;

/// Outcome of a single failed upstream call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Upstream request timed out")]
    Timeout,

    #[error("Rate limited by upstream (HTTP 429)")]
    RateLimited,

    #[error("Upstream returned HTTP {0}")]
    UpstreamError(u16),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid upstream payload: {0}")]
    Decode(String),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return FetchError::Timeout;
        }
        if let Some(status) = e.status() {
            return classify_status(status.as_u16()).err().unwrap_or(FetchError::UpstreamError(status.as_u16()));
        }
        if e.is_decode() {
            return FetchError::Decode(e.without_url().to_string());
        }
        // The URL carries the API key, so it never goes into the message
        FetchError::Transport(e.without_url().to_string())
    }
}

/// Map an HTTP status to the fetch taxonomy. 2xx is success.
pub fn classify_status(status: u16) -> Result<(), FetchError> {
    match status {
        200..=299 => Ok(()),
        429 => Err(FetchError::RateLimited),
        other => Err(FetchError::UpstreamError(other)),
    }
}
