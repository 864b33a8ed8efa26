//! Earthquake record and the upstream GeoJSON wire shape.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::utils::Clock;

/// One earthquake as exposed by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Earthquake {
    /// Human-readable place, as received from upstream
    pub location: String,

    /// Magnitude; may be negative
    pub magnitude: f64,

    /// Local time of the event, `yyyy-MM-dd HH:mm:ss`
    #[serde(rename = "timeGMT")]
    pub occurred_at: String,
}

/// Top-level GeoJSON feed body. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedResponse {
    pub features: Vec<Feature>,
}

/// One feed entry.
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    pub properties: FeatureProperties,
}

/// Event properties we care about.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureProperties {
    /// USGS occasionally publishes `null` here; such a feed fails to parse
    /// rather than dropping the event.
    pub mag: f64,
    pub place: String,
    /// Epoch milliseconds
    pub time: i64,
}

impl FeatureProperties {
    /// Convert to the domain record, rendering the time with `clock`.
    pub fn to_earthquake(&self, clock: &dyn Clock) -> Result<Earthquake> {
        let occurred_at = clock
            .display_millis(self.time)
            .ok_or_else(|| AppError::feed(format!("event time {} out of range", self.time)))?;

        Ok(Earthquake {
            location: self.place.clone(),
            magnitude: self.mag,
            occurred_at,
        })
    }
}

impl FeedResponse {
    /// Parse a raw feed body.
    pub fn parse(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// Map every feature, keeping upstream order.
    pub fn into_earthquakes(self, clock: &dyn Clock) -> Result<Vec<Earthquake>> {
        self.features
            .iter()
            .map(|feature| feature.properties.to_earthquake(clock))
            .collect()
    }
}
