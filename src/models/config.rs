//! Application configuration structures.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream feed settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// Inbound HTTP API settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.feed.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::validation(format!(
                "feed.base_url must be http(s), got {}",
                url.scheme()
            )));
        }
        if self.feed.user_agent.trim().is_empty() {
            return Err(AppError::validation("feed.user_agent is empty"));
        }
        if self.feed.timeout_secs == 0 {
            return Err(AppError::validation("feed.timeout_secs must be > 0"));
        }
        if self.feed.connect_timeout_secs == 0 {
            return Err(AppError::validation(
                "feed.connect_timeout_secs must be > 0",
            ));
        }
        if self.feed.connect_timeout_secs > self.feed.timeout_secs {
            return Err(AppError::validation(
                "feed.connect_timeout_secs must not exceed feed.timeout_secs",
            ));
        }
        self.server.bind_addr()?;
        Ok(())
    }
}

/// Upstream feed and HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// FDSN event query endpoint
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for upstream requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Connection setup timeout in seconds
    #[serde(default = "defaults::connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            connect_timeout_secs: defaults::connect_timeout(),
        }
    }
}

/// Inbound HTTP API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address, `host:port`
    #[serde(default = "defaults::bind")]
    pub bind: String,
}

impl ServerConfig {
    /// Parse the listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.bind
            .parse()
            .map_err(|e| AppError::validation(format!("server.bind '{}': {e}", self.bind)))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: defaults::bind(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level filter when `RUST_LOG` is unset
    #[serde(default = "defaults::level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::level(),
        }
    }
}

mod defaults {
    pub fn base_url() -> String {
        "https://earthquake.usgs.gov/fdsnws/event/1/query".into()
    }
    pub fn user_agent() -> String {
        concat!("quakefeed/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn timeout() -> u64 {
        10
    }
    pub fn connect_timeout() -> u64 {
        5
    }
    pub fn bind() -> String {
        "127.0.0.1:8080".into()
    }
    pub fn level() -> String {
        "info".into()
    }
}
