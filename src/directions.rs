//! Directions-API HTTP adapter for driving distances.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::LookupError;
use crate::model::Coordinate;
use crate::traits::RoutingProvider;

#[derive(Debug, Clone)]
pub struct DirectionsConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl DirectionsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: "https://maps.googleapis.com/maps/api".to_string(),
            api_key: api_key.into(),
            timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DirectionsClient {
    config: DirectionsConfig,
    client: reqwest::Client,
}

impl DirectionsClient {
    pub fn new(config: DirectionsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl RoutingProvider for DirectionsClient {
    async fn driving_distance_meters(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<Option<f64>, LookupError> {
        let url = format!(
            "{}/directions/json",
            self.config.base_url.trim_end_matches('/')
        );
        let origin = from.to_query();
        let destination = to.to_query();

        let body = self
            .client
            .get(url)
            .query(&[
                ("origin", origin.as_str()),
                ("destination", destination.as_str()),
                ("mode", "driving"),
                ("key", self.config.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<DirectionsResponse>()
            .await?;

        let meters = body.first_leg_meters();
        if meters.is_none() {
            debug!(status = %body.status, %origin, %destination, "no usable route");
        }
        Ok(meters)
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    #[serde(default)]
    legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
struct Leg {
    distance: Option<LegDistance>,
}

#[derive(Debug, Deserialize)]
struct LegDistance {
    value: f64,
}

impl DirectionsResponse {
    fn first_leg_meters(&self) -> Option<f64> {
        self.routes
            .first()?
            .legs
            .first()?
            .distance
            .as_ref()
            .map(|distance| distance.value)
            .filter(|meters| meters.is_finite() && *meters > 0.0)
    }
}
