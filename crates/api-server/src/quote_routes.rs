//! Quote and Search API Routes
//!
//! Single quotes, batch quotes and ticker search.

use analysis_core::{Quote, TickerMatch};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::{quote_err, ApiResponse, AppError, AppState};

/// Most tickers accepted by one batch request
pub const MAX_BATCH_TICKERS: usize = 50;

#[derive(Deserialize)]
pub struct QuotesQuery {
    /// Comma-separated tickers
    #[serde(default)]
    pub tickers: String,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub fn quote_routes() -> Router<AppState> {
    Router::new()
        .route("/api/quote/:ticker", get(get_quote))
        .route("/api/quotes", get(get_quotes))
        .route("/api/search", get(search_tickers))
}

async fn get_quote(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<ApiResponse<Quote>>, AppError> {
    let quote = state.quotes.get_quote(&ticker).await.map_err(quote_err)?;
    Ok(Json(ApiResponse::success(quote)))
}

async fn get_quotes(
    State(state): State<AppState>,
    Query(query): Query<QuotesQuery>,
) -> Result<Json<ApiResponse<Vec<Quote>>>, AppError> {
    let tickers: Vec<&str> = query
        .tickers
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    if tickers.len() > MAX_BATCH_TICKERS {
        return Err(AppError::bad_request(format!(
            "Too many tickers: {} (max {})",
            tickers.len(),
            MAX_BATCH_TICKERS
        )));
    }

    let quotes = state.quotes.get_quotes(&tickers).await;
    Ok(Json(ApiResponse::success(quotes)))
}

async fn search_tickers(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<ApiResponse<Vec<TickerMatch>>> {
    let matches = state.quotes.search_tickers(&query.q).await;
    Json(ApiResponse::success(matches))
}
