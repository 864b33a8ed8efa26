// src/models/mod.rs

//! Domain models for the earthquake feed.

mod config;
mod earthquake;

pub use config::{Config, FeedConfig, LoggingConfig, ServerConfig};
pub use earthquake::{Earthquake, Feature, FeatureProperties, FeedResponse};
