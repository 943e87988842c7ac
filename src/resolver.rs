//! Address resolution with degrading fallbacks.
//!
//! Tiers are tried one at a time, finest first:
//! 1. address line, city, state, country
//! 2. city, state, country (needs both city and state)
//! 3. state, country (needs state)
//!
//! The first tier with a match wins. A tier that fails on transport is
//! logged and the chain moves on.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::cache::TtlCache;
use crate::error::LookupError;
use crate::model::{non_blank, AddressQuery, GeocodeResult};
use crate::traits::Geocoder;

pub const DEFAULT_COUNTRY: &str = "Brasil";

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Shared cache of tier query → provider answer (`None` = confirmed miss).
pub type GeocodeCache = TtlCache<String, Option<GeocodeResult>>;

pub struct AddressResolver {
    geocoder: Arc<dyn Geocoder>,
    cache: Arc<GeocodeCache>,
    default_country: String,
}

impl AddressResolver {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        cache: Arc<GeocodeCache>,
        default_country: impl Into<String>,
    ) -> Self {
        Self {
            geocoder,
            cache,
            default_country: default_country.into(),
        }
    }

    /// Resolver with a private cache using the default TTL and capacity.
    pub fn with_geocoder(geocoder: Arc<dyn Geocoder>) -> Self {
        Self::new(
            geocoder,
            Arc::new(TtlCache::new(DEFAULT_CACHE_TTL, DEFAULT_CACHE_CAPACITY)),
            DEFAULT_COUNTRY,
        )
    }

    pub async fn resolve(&self, query: &AddressQuery) -> Result<GeocodeResult, LookupError> {
        let tiers = self.tiers(query);
        if tiers.is_empty() {
            return Err(LookupError::NotFound("empty address".to_string()));
        }

        let mut transport_failure = None;
        for (tier, text) in tiers.iter().enumerate() {
            match self.lookup(text).await {
                Ok(Some(result)) => {
                    debug!(tier = tier + 1, query = %text, "address resolved");
                    return Ok(result);
                }
                Ok(None) => debug!(tier = tier + 1, query = %text, "no match, degrading"),
                Err(err) => {
                    warn!(tier = tier + 1, query = %text, error = %err, "geocoding failed, degrading");
                    transport_failure = Some(err);
                }
            }
        }

        match transport_failure {
            Some(err) => Err(err),
            None => Err(LookupError::NotFound(tiers[0].clone())),
        }
    }

    /// Query strings in the order they will be attempted, duplicates dropped.
    pub fn tiers(&self, query: &AddressQuery) -> Vec<String> {
        if !query.is_resolvable() {
            return Vec::new();
        }

        let line = non_blank(&query.address_line);
        let city = non_blank(&query.city);
        let state = non_blank(&query.state);
        let country = non_blank(&query.country).unwrap_or(self.default_country.as_str());

        let mut candidates = vec![join(&[line, city, state, Some(country)])];
        if city.is_some() && state.is_some() {
            candidates.push(join(&[city, state, Some(country)]));
        }
        if state.is_some() {
            candidates.push(join(&[state, Some(country)]));
        }

        let mut tiers: Vec<String> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if !tiers.contains(&candidate) {
                tiers.push(candidate);
            }
        }
        tiers
    }

    async fn lookup(&self, text: &str) -> Result<Option<GeocodeResult>, LookupError> {
        let key = text.to_lowercase();
        if let Some(cached) = self.cache.get(&key) {
            debug!(query = %text, "geocode cache hit");
            return Ok(cached);
        }

        let result = self.geocoder.search(text).await?;
        self.cache.insert(key, result.clone());
        Ok(result)
    }
}

fn join(parts: &[Option<&str>]) -> String {
    parts.iter().flatten().copied().collect::<Vec<_>>().join(", ")
}
