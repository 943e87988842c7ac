//! Seams between the engine and the outside world.
//!
//! Providers are injected through constructors as trait objects; tests
//! substitute scripted fakes, production code uses the HTTP clients in
//! `nominatim` and `directions`.

use std::time::Instant;

use async_trait::async_trait;

use crate::error::LookupError;
use crate::model::{Contact, Coordinate, GeocodeResult};

/// Free-text geocoding: one outbound lookup per call.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// First candidate for `query`, or `None` when the provider has no match.
    async fn search(&self, query: &str) -> Result<Option<GeocodeResult>, LookupError>;
}

/// Turn-by-turn routing between two points.
#[async_trait]
pub trait RoutingProvider: Send + Sync {
    /// Driving distance of the first leg in meters, `None` when no route.
    async fn driving_distance_meters(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<Option<f64>, LookupError>;
}

/// Read access to the contact records stops may be linked to.
#[async_trait]
pub trait ContactDirectory: Send + Sync {
    async fn contact(&self, id: &str) -> Result<Option<Contact>, LookupError>;

    /// Contacts whose name partially matches `fragment`, in directory order.
    async fn find_by_name(&self, fragment: &str) -> Result<Vec<Contact>, LookupError>;
}

/// Time source for cache expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}
