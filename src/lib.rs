//! visit-itinerary: geolocation and itinerary-distance engine.
//!
//! Resolves free-text addresses to coordinates, measures route distances
//! with a great-circle fallback, and folds a person's scheduled visits into
//! day-by-day round trips with fuel, cost and time metrics.

pub mod cache;
pub mod config;
pub mod contacts;
pub mod directions;
pub mod distance;
pub mod error;
pub mod haversine;
pub mod itinerary;
pub mod metrics;
pub mod model;
pub mod nominatim;
pub mod resolver;
pub mod traits;
