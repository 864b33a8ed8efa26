// src/api.rs

//! HTTP API handlers and routes using axum.
//!
//! Routes:
//! - GET /health - Liveness check
//! - GET /earthquake/latest - Most recent event today
//! - GET /earthquake/biggest - Largest event today
//! - GET /earthquake/biggerthan/{threshold} - Events above a magnitude

use std::future::Future;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use tokio::net::TcpListener;

use crate::error::{AppError, Result, UpstreamError};
use crate::services::EarthquakeFeed;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub feed: Arc<dyn EarthquakeFeed>,
}

/// Create the API router.
pub fn create_router(feed: Arc<dyn EarthquakeFeed>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/earthquake/latest", get(latest_handler))
        .route("/earthquake/biggest", get(biggest_handler))
        .route("/earthquake/biggerthan/{threshold}", get(bigger_than_handler))
        .with_state(AppState { feed })
}

/// Serve the API on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, feed: Arc<dyn EarthquakeFeed>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, create_router(feed))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

async fn health_handler() -> &'static str {
    "ok"
}

async fn latest_handler(State(state): State<AppState>) -> std::result::Result<Response, ApiError> {
    log::info!("GET /earthquake/latest");
    let latest = state.feed.latest().await?;
    log::info!("Returning {} from GET /earthquake/latest", latest.location);
    Ok(Pretty(latest).into_response())
}

async fn biggest_handler(State(state): State<AppState>) -> std::result::Result<Response, ApiError> {
    log::info!("GET /earthquake/biggest");
    let biggest = state.feed.biggest().await?;
    log::info!("Returning {} from GET /earthquake/biggest", biggest.location);
    Ok(Pretty(biggest).into_response())
}

async fn bigger_than_handler(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> std::result::Result<Response, ApiError> {
    log::info!("GET /earthquake/biggerthan/{raw}");
    let threshold = parse_threshold(&raw).ok_or(ApiError::InvalidThreshold(raw))?;

    let earthquakes = state.feed.bigger_than(threshold).await?;
    if earthquakes.is_empty() {
        return Err(ApiError::NoMatches(threshold));
    }

    log::info!(
        "Returning {} earthquakes from GET /earthquake/biggerthan/{threshold}",
        earthquakes.len()
    );
    Ok(Pretty(earthquakes).into_response())
}

/// Parse a magnitude threshold. Only finite numbers are accepted.
pub fn parse_threshold(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|t| t.is_finite())
}

// ============================================================================
// Responses
// ============================================================================

/// JSON body rendered with indentation.
pub struct Pretty<T>(pub T);

impl<T: Serialize> IntoResponse for Pretty<T> {
    fn into_response(self) -> Response {
        match serde_json::to_string_pretty(&self.0) {
            Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
            Err(e) => {
                log::error!("Failed to serialize response: {e}");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Failures visible to API callers.
#[derive(Debug)]
pub enum ApiError {
    /// Threshold path segment is not a finite number
    InvalidThreshold(String),
    /// Feed had events, none above the threshold
    NoMatches(f64),
    /// Error raised by the feed
    Feed(AppError),
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self::Feed(error)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidThreshold(_) => StatusCode::BAD_REQUEST,
            Self::NoMatches(_) => StatusCode::NOT_FOUND,
            Self::Feed(error) => status_for(error),
        }
    }
}

/// HTTP status for a feed error.
pub fn status_for(error: &AppError) -> StatusCode {
    match error {
        AppError::NoData => StatusCode::NOT_FOUND,
        AppError::Upstream(UpstreamError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
        e if e.is_upstream() => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::InvalidThreshold(raw) => format!("Invalid threshold: {raw}"),
            Self::NoMatches(threshold) => {
                format!("No earthquakes found above magnitude {threshold:?}.")
            }
            Self::Feed(AppError::NoData) => "No earthquakes recorded today.".to_string(),
            Self::Feed(error) => {
                log::error!("Request failed: {error}");
                error.to_string()
            }
        };
        (status, message).into_response()
    }
}
