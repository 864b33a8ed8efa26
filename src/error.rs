// src/error.rs

//! Unified error handling for the feed client and API.

use std::fmt;

use thiserror::Error;

/// Result type alias for quakefeed operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Why an upstream feed call did not succeed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// The feed answered with a non-success HTTP status
    #[error("upstream returned status {0}")]
    Status(u16),

    /// The request did not complete within the configured bound
    #[error("upstream request timed out")]
    Timeout,

    /// Connection, DNS or TLS failure before a response arrived
    #[error("upstream transport failure: {0}")]
    Transport(String),
}

impl UpstreamError {
    /// Classify a `reqwest` failure.
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(error.to_string())
        }
    }
}

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Upstream feed call failed
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// The feed was empty but the operation needs at least one event
    #[error("No earthquakes recorded today")]
    NoData,

    /// Upstream body did not match the expected feed shape
    #[error("Malformed feed: {0}")]
    Feed(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client construction failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a malformed-feed error.
    pub fn feed(message: impl fmt::Display) -> Self {
        Self::Feed(message.to_string())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the failure originated at the upstream feed, including a body
    /// that could not be parsed.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream(_) | Self::Feed(_) | Self::Json(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_status_is_carried() {
        let err = AppError::from(UpstreamError::Status(503));
        assert!(matches!(err, AppError::Upstream(UpstreamError::Status(503))));
        assert_eq!(err.to_string(), "Upstream error: upstream returned status 503");
    }

    #[test]
    fn is_upstream_covers_feed_failures_only() {
        assert!(AppError::from(UpstreamError::Timeout).is_upstream());
        assert!(AppError::feed("bad timestamp").is_upstream());
        assert!(!AppError::NoData.is_upstream());
        assert!(!AppError::validation("missing").is_upstream());
    }
}
