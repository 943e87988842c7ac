//! Great-circle distance (fallback when no routing provider answers).
//!
//! Less accurate than a road route but always available, and a pure
//! function of its inputs.

use crate::metrics::round2;
use crate::model::Coordinate;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers, rounded to 2 decimals.
///
/// Returns 0 when either point is missing or unusable.
pub fn haversine_km(from: Option<Coordinate>, to: Option<Coordinate>) -> f64 {
    match (from, to) {
        (Some(from), Some(to)) if from.is_usable() && to.is_usable() => {
            round2(raw_haversine_km(from, to))
        }
        _ => 0.0,
    }
}

fn raw_haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lon = (to.lon - from.lon).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` just past 1 for antipodal pairs.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
