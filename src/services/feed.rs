// src/services/feed.rs

//! Earthquake feed service.
//!
//! Fetches today's events from the upstream FDSN endpoint and exposes the
//! derived views on top of that single fetch primitive.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

use crate::error::{AppError, Result, UpstreamError};
use crate::models::{Earthquake, FeedConfig, FeedResponse};
use crate::services::derive;
use crate::services::observer::{FeedObserver, NoopObserver, Span};
use crate::utils::http::create_async_client;
use crate::utils::{Clock, SystemClock};

/// A source of today's earthquakes.
///
/// Only `fetch_all` is required; every derived view performs its own fresh
/// fetch and shares no state with other calls.
#[async_trait]
pub trait EarthquakeFeed: Send + Sync {
    /// All events since local midnight, in upstream order.
    async fn fetch_all(&self) -> Result<Vec<Earthquake>>;

    /// Observer that receives span events for this feed.
    fn observer(&self) -> &dyn FeedObserver {
        &NoopObserver
    }

    /// Most recent event, taken as the first one upstream returns.
    async fn latest(&self) -> Result<Earthquake> {
        let span = Span::enter(self.observer(), "latest");
        log::info!("Entering latest()");

        let latest = derive::latest(self.fetch_all().await?)?;
        span.tag("location", &latest.location);
        span.tag("magnitude", &latest.magnitude);
        span.tag("occurred_at", &latest.occurred_at);

        log::info!(
            "Exiting latest() with {} (M{}) at {}",
            latest.location,
            latest.magnitude,
            latest.occurred_at
        );
        Ok(latest)
    }

    /// Event with the largest magnitude.
    async fn biggest(&self) -> Result<Earthquake> {
        let span = Span::enter(self.observer(), "biggest");
        log::info!("Entering biggest()");

        let biggest = derive::biggest(self.fetch_all().await?)?;
        span.tag("location", &biggest.location);
        span.tag("magnitude", &biggest.magnitude);
        span.tag("occurred_at", &biggest.occurred_at);

        log::info!(
            "Exiting biggest() with {} (M{}) at {}",
            biggest.location,
            biggest.magnitude,
            biggest.occurred_at
        );
        Ok(biggest)
    }

    /// Events with magnitude strictly above `threshold`.
    async fn bigger_than(&self, threshold: f64) -> Result<Vec<Earthquake>> {
        let span = Span::enter(self.observer(), "bigger_than");
        span.tag("threshold", &threshold);
        log::info!("Entering bigger_than(threshold={threshold})");

        let matches = derive::bigger_than(self.fetch_all().await?, threshold);
        span.tag("count", &matches.len());

        log::info!(
            "Exiting bigger_than(threshold={threshold}) with {} earthquakes",
            matches.len()
        );
        Ok(matches)
    }
}

/// HTTP client for the USGS FDSN event feed.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct FeedClient {
    client: Client,
    base_url: Url,
    clock: Arc<dyn Clock>,
    observer: Arc<dyn FeedObserver>,
}

impl FeedClient {
    /// Create a feed client on the system clock with no observer.
    pub fn new(config: &FeedConfig) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
            base_url: Url::parse(&config.base_url)?,
            clock: Arc::new(SystemClock),
            observer: Arc::new(NoopObserver),
        })
    }

    /// Replace the clock used for the query date and event times.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the observer that receives span events.
    pub fn with_observer(mut self, observer: Arc<dyn FeedObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// URL for "events since local midnight today", newest first.
    pub fn query_url(&self) -> Url {
        let today = self.clock.today().format("%Y-%m-%d").to_string();
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("format", "geojson")
            .append_pair("starttime", &today)
            .append_pair("orderby", "time");
        url
    }

    async fn fetch_body(&self, url: Url) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(&e))?;

        let status = response.status();
        if status != StatusCode::OK {
            log::error!("Error response received from upstream feed: {status}");
            return Err(UpstreamError::Status(status.as_u16()).into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::from_reqwest(&e))?;
        Ok(body)
    }
}

#[async_trait]
impl EarthquakeFeed for FeedClient {
    async fn fetch_all(&self) -> Result<Vec<Earthquake>> {
        let span = Span::enter(self.observer.as_ref(), "fetch_all");
        log::info!("Entering fetch_all()");

        let url = self.query_url();
        log::debug!("GET {url}");

        let body = self.fetch_body(url).await.inspect_err(|e| {
            if let AppError::Upstream(UpstreamError::Timeout) = e {
                log::error!("Upstream feed did not answer in time");
            }
        })?;
        let earthquakes = FeedResponse::parse(&body)?.into_earthquakes(self.clock.as_ref())?;

        span.tag("count", &earthquakes.len());
        log::info!("Exiting fetch_all() with {} earthquakes", earthquakes.len());
        Ok(earthquakes)
    }

    fn observer(&self) -> &dyn FeedObserver {
        self.observer.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, FixedOffset, Utc};

    use super::*;
    use crate::utils::FixedClock;

    fn client_at(now: &str, offset_hours: i32) -> FeedClient {
        let now = DateTime::parse_from_rfc3339(now).unwrap().with_timezone(&Utc);
        let offset = FixedOffset::east_opt(offset_hours * 3600).unwrap();
        FeedClient::new(&FeedConfig::default())
            .unwrap()
            .with_clock(Arc::new(FixedClock::new(now, offset)))
    }

    #[test]
    fn query_url_carries_local_date() {
        let url = client_at("2026-10-18T10:00:00Z", 0).query_url();
        assert_eq!(
            url.as_str(),
            "https://earthquake.usgs.gov/fdsnws/event/1/query?format=geojson&starttime=2026-10-18&orderby=time"
        );
    }

    #[test]
    fn query_url_follows_clock_offset() {
        let url = client_at("2026-10-18T20:00:00Z", 9).query_url();
        let starttime = url
            .query_pairs()
            .find(|(k, _)| k == "starttime")
            .map(|(_, v)| v.into_owned());
        assert_eq!(starttime.as_deref(), Some("2026-10-19"));
    }

    #[test]
    fn new_rejects_bad_base_url() {
        let config = FeedConfig {
            base_url: "::nope".to_string(),
            ..FeedConfig::default()
        };
        assert!(matches!(FeedClient::new(&config), Err(AppError::Url(_))));
    }
}
