//! Route distances with a great-circle fallback.
//!
//! `route_distance_km` never fails: a missing credential, a provider error or
//! an empty route all fall through to `haversine_km`.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::haversine::haversine_km;
use crate::metrics::{round2, TripConfig};
use crate::model::{Coordinate, TripMetrics};
use crate::traits::RoutingProvider;

pub struct DistanceEngine {
    router: Option<Arc<dyn RoutingProvider>>,
    trip: TripConfig,
}

impl Default for DistanceEngine {
    fn default() -> Self {
        Self::haversine_only(TripConfig::default())
    }
}

impl DistanceEngine {
    pub fn new(router: Option<Arc<dyn RoutingProvider>>, trip: TripConfig) -> Self {
        Self { router, trip }
    }

    /// Engine with no routing credential: every distance is great-circle.
    pub fn haversine_only(trip: TripConfig) -> Self {
        Self::new(None, trip)
    }

    pub fn trip_config(&self) -> &TripConfig {
        &self.trip
    }

    /// Driving distance in kilometers, rounded to 2 decimals.
    pub async fn route_distance_km(&self, from: Option<Coordinate>, to: Option<Coordinate>) -> f64 {
        let (Some(a), Some(b)) = (from, to) else {
            return 0.0;
        };
        if !a.is_usable() || !b.is_usable() || a == b {
            return 0.0;
        }

        if let Some(router) = &self.router {
            match router.driving_distance_meters(a, b).await {
                Ok(Some(meters)) if meters > 0.0 => return round2(meters / 1000.0),
                Ok(_) => debug!(from = %a.to_query(), to = %b.to_query(), "no route, using haversine"),
                Err(err) => warn!(
                    from = %a.to_query(),
                    to = %b.to_query(),
                    error = %err,
                    "routing provider failed, using haversine"
                ),
            }
        }

        haversine_km(Some(a), Some(b))
    }

    /// Distance plus derived time, fuel and cost for one leg.
    pub async fn leg(&self, from: Option<Coordinate>, to: Option<Coordinate>) -> TripMetrics {
        let distance_km = self.route_distance_km(from, to).await;
        self.trip.metrics(distance_km)
    }
}
