//! Real Fortaleza-area locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap.

#![allow(dead_code)]

use visit_itinerary::model::Coordinate;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lon: f64) -> Self {
        Self { name, lat, lon }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

// ============================================================================
// Depots / Offices (good for origins)
// ============================================================================

pub const EUSEBIO_OFFICE: Location = Location::new("Escritório Eusébio", -3.89, -38.46);

pub const FORTALEZA_CENTRE: Location = Location::new("Praça do Ferreira", -3.7277, -38.5270);

// ============================================================================
// Customer sites
// ============================================================================

pub const CUSTOMER_SITES: &[Location] = &[
    Location::new("Mercado Central", -3.7247, -38.5252),
    Location::new("Theatro José de Alencar", -3.7259, -38.5316),
    Location::new("Dragão do Mar", -3.7218, -38.5207),
    Location::new("Feirinha da Beira Mar", -3.7242, -38.4958),
    Location::new("Shopping Iguatemi Bosque", -3.7548, -38.4893),
    Location::new("Arena Castelão", -3.8073, -38.5223),
    Location::new("Aeroporto Pinto Martins", -3.7763, -38.5326),
    Location::new("North Shopping Fortaleza", -3.7358, -38.5664),
];

// ============================================================================
// Reference day (rounded coordinates, visited in this order)
// ============================================================================

pub const MORNING_STOP: Location = Location::new("Cliente manhã", -3.80, -38.50);
pub const LATE_STOP: Location = Location::new("Cliente tarde", -3.75, -38.55);
