use thiserror::Error;

/// The only failures a quote lookup can surface to its caller.
///
/// Transport problems never show up here: they are absorbed per facet while
/// the quote is assembled, and only total absence of data becomes `NotFound`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteError {
    #[error("Invalid ticker: nothing left after sanitization")]
    InvalidTicker,

    #[error("No market data found for ticker")]
    NotFound,
}
