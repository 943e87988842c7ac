//! Travel metrics derived from a distance.
//!
//! Distance is the only measured quantity; time, fuel and cost are pure
//! functions of it and a `TripConfig`.

use serde::{Deserialize, Serialize};

use crate::model::TripMetrics;

/// Average urban driving speed.
pub const DEFAULT_SPEED_KMH: f64 = 40.0;

pub const DEFAULT_CONSUMPTION_KM_PER_LITER: f64 = 10.0;

pub const DEFAULT_FUEL_PRICE_PER_LITER: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TripConfig {
    pub speed_kmh: f64,
    pub consumption_km_per_liter: f64,
    pub fuel_price_per_liter: f64,
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
            consumption_km_per_liter: DEFAULT_CONSUMPTION_KM_PER_LITER,
            fuel_price_per_liter: DEFAULT_FUEL_PRICE_PER_LITER,
        }
    }
}

impl TripConfig {
    pub fn travel_time_minutes(&self, distance_km: f64) -> i64 {
        if self.speed_kmh <= 0.0 {
            return 0;
        }
        (distance_km / self.speed_kmh * 60.0).round() as i64
    }

    pub fn fuel_liters(&self, distance_km: f64) -> f64 {
        if self.consumption_km_per_liter <= 0.0 {
            return 0.0;
        }
        round2(distance_km / self.consumption_km_per_liter)
    }

    pub fn travel_cost(&self, fuel_liters: f64) -> f64 {
        round2(fuel_liters * self.fuel_price_per_liter)
    }

    pub fn metrics(&self, distance_km: f64) -> TripMetrics {
        let fuel_liters = self.fuel_liters(distance_km);
        TripMetrics {
            distance_km: round2(distance_km),
            travel_time_minutes: self.travel_time_minutes(distance_km),
            fuel_liters,
            travel_cost: self.travel_cost(fuel_liters),
        }
    }
}

/// Round half away from zero to 2 decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
