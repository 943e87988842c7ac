//! Scripted providers for driving the engine without a network.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use visit_itinerary::error::LookupError;
use visit_itinerary::model::{Coordinate, GeocodeResult};
use visit_itinerary::traits::{Geocoder, RoutingProvider};

/// Geocoder answering from a table keyed by the exact query string.
#[derive(Default)]
pub struct ScriptedGeocoder {
    answers: HashMap<String, Result<Option<GeocodeResult>, LookupError>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, query: &str, coordinate: Coordinate) -> Self {
        let result = GeocodeResult {
            coordinate,
            display_name: query.to_string(),
        };
        self.answers.insert(query.to_string(), Ok(Some(result)));
        self
    }

    pub fn fail(mut self, query: &str) -> Self {
        self.answers.insert(
            query.to_string(),
            Err(LookupError::Transport("operation timed out".to_string())),
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Geocoder for ScriptedGeocoder {
    async fn search(&self, query: &str) -> Result<Option<GeocodeResult>, LookupError> {
        self.calls.lock().unwrap().push(query.to_string());
        self.answers.get(query).cloned().unwrap_or(Ok(None))
    }
}

/// Router returning a fixed distance for every pair and recording calls.
pub struct FlatRouter {
    meters: f64,
    calls: Mutex<Vec<(Coordinate, Coordinate)>>,
}

impl FlatRouter {
    pub fn new(meters: f64) -> Self {
        Self {
            meters,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(Coordinate, Coordinate)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RoutingProvider for FlatRouter {
    async fn driving_distance_meters(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<Option<f64>, LookupError> {
        self.calls.lock().unwrap().push((from, to));
        Ok(Some(self.meters))
    }
}
