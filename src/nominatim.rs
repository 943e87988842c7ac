//! Nominatim-style HTTP geocoder.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::LookupError;
use crate::model::{Coordinate, GeocodeResult};
use crate::traits::Geocoder;

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    /// Sent on every request; the public instance rejects anonymous clients.
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Minimum spacing between consecutive requests. Zero disables pacing.
    pub min_interval: Duration,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: concat!("visit-itinerary/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 5,
            min_interval: Duration::from_secs(1),
        }
    }
}

type Limiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

pub struct NominatimClient {
    config: NominatimConfig,
    client: reqwest::Client,
    limiter: Option<Limiter>,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        let limiter = Quota::with_period(config.min_interval)
            .map(|quota| Arc::new(RateLimiter::direct(quota)));

        Ok(Self {
            config,
            client,
            limiter,
        })
    }

    async fn pace(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn search(&self, query: &str) -> Result<Option<GeocodeResult>, LookupError> {
        self.pace().await;

        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));
        debug!(query, "geocoding request");

        let places = self
            .client
            .get(url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("limit", "1"),
                ("addressdetails", "1"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<NominatimPlace>>()
            .await?;

        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        match place.coordinate() {
            Some(coordinate) => Ok(Some(GeocodeResult {
                coordinate,
                display_name: place.display_name,
            })),
            None => {
                warn!(query, lat = %place.lat, lon = %place.lon, "geocoder returned unusable coordinates");
                Ok(None)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

impl NominatimPlace {
    fn coordinate(&self) -> Option<Coordinate> {
        let lat = self.lat.trim().parse::<f64>().ok()?;
        let lon = self.lon.trim().parse::<f64>().ok()?;
        Coordinate::new(lat, lon).ok()
    }
}
