//! HTTP front for the quote engine.
//!
//! Wires configuration, logging and the router around one shared
//! `QuoteService`. All responses use the `ApiResponse` envelope.

use analysis_core::QuoteError;
use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use polygon_client::PolygonClient;
use quote_service::QuoteService;
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
mod quote_routes;


pub use config::ServerConfig;
pub use quote_routes::{quote_routes, MAX_BATCH_TICKERS};

#[derive(Clone)]
pub struct AppState {
    pub quotes: Arc<QuoteService>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Handler error carrying the status to answer with.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    error: anyhow::Error,
}

impl AppError {
    pub fn with_status(status: StatusCode, error: anyhow::Error) -> Self {
        Self { status, error }
    }

    pub fn bad_request(message: impl std::fmt::Display) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, anyhow::anyhow!("{}", message))
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("Request failed: {:#}", self.error);
        } else {
            tracing::debug!("Request rejected ({}): {}", self.status, self.error);
        }

        let body = Json(ApiResponse::<()>::error(self.error.to_string()));
        (self.status, body).into_response()
    }
}

/// Map a facade error to its HTTP status.
pub fn quote_err(e: QuoteError) -> AppError {
    let status = match e {
        QuoteError::InvalidTicker => StatusCode::BAD_REQUEST,
        QuoteError::NotFound => StatusCode::NOT_FOUND,
    };
    AppError::with_status(status, e.into())
}

async fn health() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::success("ok"))
}

/// Full router with tracing and CORS layers applied.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .merge(quote_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Install the global subscriber. `RUST_LOG_FORMAT=json` switches to JSON lines.
pub fn init_tracing() {
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }
}

pub fn build_service(config: &ServerConfig) -> QuoteService {
    let client = PolygonClient::new(
        config.api_key.clone(),
        config.base_url.clone(),
        config.engine.request_timeout,
    );
    QuoteService::new(client, config.engine.clone())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env()?;
    tracing::info!("Starting quote API on {}", config.bind_addr);
    tracing::info!("  Upstream: {}", config.base_url);

    let state = AppState {
        quotes: Arc::new(build_service(&config)),
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
