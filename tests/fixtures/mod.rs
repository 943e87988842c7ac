//! Test fixtures for visit-itinerary.
//!
//! Provides realistic test data including:
//! - Real Fortaleza / Eusébio locations (from OpenStreetMap)
//! - Scripted providers that record every lookup

pub mod fortaleza_locations;
pub mod providers;

pub use fortaleza_locations::*;
pub use providers::*;
