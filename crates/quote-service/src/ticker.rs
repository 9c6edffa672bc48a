//! Input hygiene for tickers and search text.
//!
//! Everything that reaches a cache key or an upstream URL has been through
//! one of these functions first.

pub const MAX_TICKER_LEN: usize = 20;
pub const MAX_QUERY_LEN: usize = 50;

fn is_ticker_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':' | '^')
}

fn is_query_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ' ' | '.' | '-')
}

/// Strip disallowed characters, cap at 20, uppercase.
///
/// `None` when no letter or digit is left, so punctuation-only input such
/// as `.` or `..` never becomes a URL path segment. Idempotent.
pub fn sanitize_ticker(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| is_ticker_char(*c))
        .take(MAX_TICKER_LEN)
        .collect::<String>()
        .to_ascii_uppercase();

    if !cleaned.chars().any(|c| c.is_ascii_alphanumeric()) {
        None
    } else {
        Some(cleaned)
    }
}

/// Keep letters, digits, spaces, dots and hyphens; trim; cap at 50.
///
/// `None` when nothing is left.
pub fn sanitize_query(raw: &str) -> Option<String> {
    let filtered: String = raw.chars().filter(|c| is_query_char(*c)).collect();
    let capped: String = filtered.trim().chars().take(MAX_QUERY_LEN).collect();
    let cleaned = capped.trim_end();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}
