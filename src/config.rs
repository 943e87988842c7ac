//! Engine configuration and wiring.
//!
//! Values come from defaults or `ITINERARY_*` environment variables. A
//! missing routing credential or origin is not an error: the engine falls
//! back to great-circle distances and the default origin.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::cache::TtlCache;
use crate::directions::{DirectionsClient, DirectionsConfig};
use crate::distance::DistanceEngine;
use crate::itinerary::{ItineraryAggregator, DEFAULT_ORIGIN};
use crate::metrics::TripConfig;
use crate::model::Coordinate;
use crate::nominatim::{NominatimClient, NominatimConfig};
use crate::resolver::{AddressResolver, DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL, DEFAULT_COUNTRY};
use crate::traits::{ContactDirectory, RoutingProvider};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub geocoder: NominatimConfig,
    /// `None` disables the routing provider.
    pub directions: Option<DirectionsConfig>,
    pub default_country: String,
    pub origin: Coordinate,
    pub trip: TripConfig,
    pub cache_ttl: Duration,
    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            geocoder: NominatimConfig::default(),
            directions: None,
            default_country: DEFAULT_COUNTRY.to_string(),
            origin: DEFAULT_ORIGIN,
            trip: TripConfig::default(),
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key → value source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let number = |key: &str, default: f64| parse_or(key, text(key), default);
        let integer = |key: &str, default: u64| parse_or(key, text(key), default);

        let geocoder = NominatimConfig {
            base_url: text("ITINERARY_GEOCODER_URL").unwrap_or(defaults.geocoder.base_url),
            user_agent: text("ITINERARY_GEOCODER_USER_AGENT")
                .unwrap_or(defaults.geocoder.user_agent),
            timeout_secs: integer("ITINERARY_GEOCODER_TIMEOUT_SECS", defaults.geocoder.timeout_secs),
            min_interval: Duration::from_millis(integer(
                "ITINERARY_GEOCODER_MIN_INTERVAL_MS",
                defaults.geocoder.min_interval.as_millis() as u64,
            )),
        };

        let directions = text("ITINERARY_DIRECTIONS_API_KEY").map(|api_key| {
            let base = DirectionsConfig::new(api_key);
            DirectionsConfig {
                base_url: text("ITINERARY_DIRECTIONS_URL").unwrap_or(base.base_url.clone()),
                timeout_secs: integer("ITINERARY_DIRECTIONS_TIMEOUT_SECS", base.timeout_secs),
                ..base
            }
        });

        let origin = match (
            text("ITINERARY_ORIGIN_LAT").and_then(|v| v.parse::<f64>().ok()),
            text("ITINERARY_ORIGIN_LON").and_then(|v| v.parse::<f64>().ok()),
        ) {
            (Some(lat), Some(lon)) => Coordinate::new(lat, lon).unwrap_or_else(|err| {
                warn!(error = %err, "configured origin rejected, using default");
                defaults.origin
            }),
            (None, None) => defaults.origin,
            _ => {
                warn!("origin needs both ITINERARY_ORIGIN_LAT and ITINERARY_ORIGIN_LON, using default");
                defaults.origin
            }
        };

        let trip = TripConfig {
            speed_kmh: number("ITINERARY_SPEED_KMH", defaults.trip.speed_kmh),
            consumption_km_per_liter: number(
                "ITINERARY_CONSUMPTION_KM_PER_LITER",
                defaults.trip.consumption_km_per_liter,
            ),
            fuel_price_per_liter: number(
                "ITINERARY_FUEL_PRICE_PER_LITER",
                defaults.trip.fuel_price_per_liter,
            ),
        };

        Self {
            geocoder,
            directions,
            default_country: text("ITINERARY_DEFAULT_COUNTRY").unwrap_or(defaults.default_country),
            origin,
            trip,
            cache_ttl: Duration::from_secs(integer(
                "ITINERARY_CACHE_TTL_SECS",
                defaults.cache_ttl.as_secs(),
            )),
            cache_capacity: integer("ITINERARY_CACHE_CAPACITY", defaults.cache_capacity as u64)
                as usize,
        }
    }

    /// Wires HTTP providers, cache, distance engine and aggregator.
    pub fn build_aggregator(
        &self,
        contacts: Option<Arc<dyn ContactDirectory>>,
    ) -> Result<ItineraryAggregator, ConfigError> {
        let geocoder = Arc::new(NominatimClient::new(self.geocoder.clone())?);
        let cache = Arc::new(TtlCache::new(self.cache_ttl, self.cache_capacity));
        let resolver = AddressResolver::new(geocoder, cache, self.default_country.clone());

        let router: Option<Arc<dyn RoutingProvider>> = match &self.directions {
            Some(config) => Some(Arc::new(DirectionsClient::new(config.clone())?)),
            None => None,
        };

        info!(
            geocoder = %self.geocoder.base_url,
            routing = router.is_some(),
            "itinerary engine initialized"
        );

        Ok(ItineraryAggregator::new(
            resolver,
            DistanceEngine::new(router, self.trip),
            contacts,
            self.origin,
        ))
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, value: Option<String>, default: T) -> T {
    match value {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "invalid number, using default");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> EngineConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EngineConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = config(&[]);
        assert!(config.directions.is_none());
        assert_eq!(config.origin, DEFAULT_ORIGIN);
        assert_eq!(config.trip, TripConfig::default());
        assert_eq!(config.default_country, "Brasil");
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.geocoder.min_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("ITINERARY_DIRECTIONS_API_KEY", "secret"),
            ("ITINERARY_DIRECTIONS_TIMEOUT_SECS", "3"),
            ("ITINERARY_ORIGIN_LAT", "-3.89"),
            ("ITINERARY_ORIGIN_LON", "-38.46"),
            ("ITINERARY_FUEL_PRICE_PER_LITER", "5.79"),
            ("ITINERARY_GEOCODER_MIN_INTERVAL_MS", "0"),
        ]);
        let directions = config.directions.unwrap();
        assert_eq!(directions.api_key, "secret");
        assert_eq!(directions.timeout_secs, 3);
        assert_eq!(directions.base_url, "https://maps.googleapis.com/maps/api");
        assert_eq!(config.origin, Coordinate { lat: -3.89, lon: -38.46 });
        assert_eq!(config.trip.fuel_price_per_liter, 5.79);
        assert_eq!(config.geocoder.min_interval, Duration::ZERO);
    }

    #[test]
    fn test_blank_api_key_disables_routing() {
        assert!(config(&[("ITINERARY_DIRECTIONS_API_KEY", "  ")]).directions.is_none());
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = config(&[
            ("ITINERARY_SPEED_KMH", "fast"),
            ("ITINERARY_ORIGIN_LAT", "-3.89"),
        ]);
        assert_eq!(config.trip.speed_kmh, 40.0);
        assert_eq!(config.origin, DEFAULT_ORIGIN);

        let config = self::config(&[("ITINERARY_ORIGIN_LAT", "95"), ("ITINERARY_ORIGIN_LON", "0")]);
        assert_eq!(config.origin, DEFAULT_ORIGIN);
    }

    #[test]
    fn test_build_aggregator_without_credentials() {
        assert!(EngineConfig::default().build_aggregator(None).is_ok());
    }
}
