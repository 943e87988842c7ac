//! Error types for lookups and itinerary building.
//!
//! Lookup failures are recoverable: every caller in this crate degrades to a
//! zero contribution when it sees one. `ItineraryError` is reserved for
//! malformed input and is returned before any network call is made.

use thiserror::Error;

/// Failure of a single provider lookup (geocoding, routing, contact store).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    /// The provider answered but had nothing for the query.
    #[error("no match for {0}")]
    NotFound(String),

    /// Timeout, non-2xx status, or a payload that could not be decoded.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl LookupError {
    pub fn is_transport(&self) -> bool {
        matches!(self, LookupError::Transport(_))
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        LookupError::Transport(err.to_string())
    }
}

/// Input that cannot be folded into an itinerary at all.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ItineraryError {
    #[error("coordinate out of range: lat={lat}, lon={lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("stop {0} appears more than once")]
    DuplicateStop(String),
}
