//! Service layer for the earthquake feed.
//!
//! This module contains:
//! - The upstream feed client and its derived views (`FeedClient`)
//! - The pure derivation rules behind those views (`derive`)
//! - Observability hooks threaded through feed calls (`FeedObserver`)

pub mod derive;
mod feed;
mod observer;

pub use feed::{EarthquakeFeed, FeedClient};
pub use observer::{FeedObserver, LogObserver, NoopObserver, Span};
