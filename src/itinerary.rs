//! Itinerary aggregation for a planning window.
//!
//! Stops are bucketed by local calendar date and walked in scheduled order:
//! origin → stop₁ → … → stopₙ → origin. Stops are never reordered. Lookups
//! run one at a time; a stop or leg that cannot be resolved contributes zero
//! distance and the walk carries on.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::distance::DistanceEngine;
use crate::error::ItineraryError;
use crate::metrics::round2;
use crate::model::{
    Contact, Coordinate, CoordinateSource, DayItinerary, Origin, PlanAggregate, PlanReport,
    RoutedStop, Stop, TripMetrics,
};
use crate::resolver::AddressResolver;
use crate::traits::ContactDirectory;

/// Fortaleza city centre, used when no origin is configured.
pub const DEFAULT_ORIGIN: Coordinate = Coordinate {
    lat: -3.7319,
    lon: -38.5267,
};

pub struct ItineraryAggregator {
    resolver: AddressResolver,
    distances: DistanceEngine,
    contacts: Option<Arc<dyn ContactDirectory>>,
    default_origin: Coordinate,
}

impl ItineraryAggregator {
    pub fn new(
        resolver: AddressResolver,
        distances: DistanceEngine,
        contacts: Option<Arc<dyn ContactDirectory>>,
        default_origin: Coordinate,
    ) -> Self {
        Self {
            resolver,
            distances,
            contacts,
            default_origin,
        }
    }

    /// Plan totals only.
    pub async fn build_plan_aggregate(
        &self,
        stops: &[Stop],
        origin: Option<&Origin>,
    ) -> Result<PlanAggregate, ItineraryError> {
        Ok(self.build_plan(stops, origin).await?.aggregate)
    }

    /// Plan totals plus the per-day breakdown.
    ///
    /// `origin` falls back to the configured default when absent or when an
    /// address origin cannot be resolved.
    pub async fn build_plan(
        &self,
        stops: &[Stop],
        origin: Option<&Origin>,
    ) -> Result<PlanReport, ItineraryError> {
        validate(stops, origin)?;

        let active: Vec<&Stop> = stops.iter().filter(|stop| stop.status.is_active()).collect();
        if active.is_empty() {
            return Ok(PlanReport::default());
        }

        let origin = self.resolve_origin(origin).await;

        let mut days = Vec::new();
        let mut distance_km = 0.0;
        for (date, day_stops) in bucket_by_day(&active) {
            let day = self.walk_day(date, &day_stops, origin).await;
            if day.stops.iter().all(|stop| stop.coordinate.is_none()) {
                debug!(%date, stops = day_stops.len(), "no resolvable stops, day omitted");
                continue;
            }
            distance_km += day.total_distance_km;
            days.push(day);
        }

        let trip = self.distances.trip_config();
        let planned_distance_km = round2(distance_km);
        let planned_fuel_liters = trip.fuel_liters(planned_distance_km);
        let aggregate = PlanAggregate {
            total_planned_visits: active.len(),
            planned_distance_km,
            planned_fuel_liters,
            planned_cost: trip.travel_cost(planned_fuel_liters),
            planned_travel_minutes: trip.travel_time_minutes(planned_distance_km),
        };

        Ok(PlanReport { aggregate, days })
    }

    /// Metrics for a single trip between two places.
    pub async fn trip_between(&self, from: &Origin, to: &Origin) -> TripMetrics {
        let from = self.locate_origin(from).await;
        let to = self.locate_origin(to).await;
        self.distances.leg(from, to).await
    }

    pub async fn resolve_origin(&self, origin: Option<&Origin>) -> Coordinate {
        let Some(origin) = origin else {
            debug!("no origin supplied, using default");
            return self.default_origin;
        };
        match self.locate_origin(origin).await {
            Some(coordinate) => coordinate,
            None => {
                warn!("origin could not be resolved, using default");
                self.default_origin
            }
        }
    }

    async fn locate_origin(&self, origin: &Origin) -> Option<Coordinate> {
        match origin {
            Origin::Coordinate(coordinate) => Some(*coordinate).filter(Coordinate::is_usable),
            Origin::Address(query) => match self.resolver.resolve(query).await {
                Ok(result) => Some(result.coordinate),
                Err(err) => {
                    warn!(error = %err, "origin address not resolved");
                    None
                }
            },
        }
    }

    async fn walk_day(&self, date: NaiveDate, stops: &[&Stop], origin: Coordinate) -> DayItinerary {
        let mut previous = origin;
        let mut routed = Vec::with_capacity(stops.len());
        let mut legs = Vec::with_capacity(stops.len() + 1);

        for stop in stops {
            let (coordinate, source) = self.locate_stop(stop).await;
            let leg = match coordinate {
                Some(coordinate) => {
                    let leg = self.distances.leg(Some(previous), Some(coordinate)).await;
                    previous = coordinate;
                    leg
                }
                None => {
                    warn!(stop = %stop.id, %date, "stop has no coordinate, leg skipped");
                    TripMetrics::default()
                }
            };
            legs.push(leg);
            routed.push(RoutedStop {
                stop: (*stop).clone(),
                coordinate,
                source,
            });
        }

        legs.push(self.distances.leg(Some(previous), Some(origin)).await);

        let trip = self.distances.trip_config();
        let total_distance_km = round2(legs.iter().map(|leg| leg.distance_km).sum());
        DayItinerary {
            date,
            stops: routed,
            legs,
            total_distance_km,
            total_fuel_liters: trip.fuel_liters(total_distance_km),
            total_travel_minutes: trip.travel_time_minutes(total_distance_km),
        }
    }

    /// Own coordinate, then own address, then linked contact, then a
    /// contact whose name matches the stop's freeform name.
    async fn locate_stop(&self, stop: &Stop) -> (Option<Coordinate>, CoordinateSource) {
        if let Some(coordinate) = stop.coordinate.filter(Coordinate::is_usable) {
            return (Some(coordinate), CoordinateSource::Own);
        }

        if stop.address.is_resolvable() {
            match self.resolver.resolve(&stop.address).await {
                Ok(result) => return (Some(result.coordinate), CoordinateSource::Address),
                Err(err) => debug!(stop = %stop.id, error = %err, "stop address not resolved"),
            }
        }

        let Some(contacts) = &self.contacts else {
            return (None, CoordinateSource::Unresolved);
        };

        if let Some(contact_id) = &stop.related_contact_id {
            match contacts.contact(contact_id).await {
                Ok(Some(contact)) => {
                    if let Some(coordinate) = self.locate_contact(&contact).await {
                        return (Some(coordinate), CoordinateSource::Contact);
                    }
                }
                Ok(None) => debug!(stop = %stop.id, contact = %contact_id, "linked contact missing"),
                Err(err) => warn!(stop = %stop.id, error = %err, "contact lookup failed"),
            }
        }

        if let Some(name) = stop.contact_name.as_deref().filter(|name| !name.trim().is_empty()) {
            match contacts.find_by_name(name).await {
                Ok(matches) => {
                    if let Some(contact) = matches.first() {
                        debug!(stop = %stop.id, name, contact = %contact.id, "matched contact by name");
                        if let Some(coordinate) = self.locate_contact(contact).await {
                            return (Some(coordinate), CoordinateSource::NameMatch);
                        }
                    }
                }
                Err(err) => warn!(stop = %stop.id, error = %err, "contact name search failed"),
            }
        }

        (None, CoordinateSource::Unresolved)
    }

    async fn locate_contact(&self, contact: &Contact) -> Option<Coordinate> {
        if let Some(coordinate) = contact.coordinate.filter(Coordinate::is_usable) {
            return Some(coordinate);
        }
        if !contact.address.is_resolvable() {
            return None;
        }
        match self.resolver.resolve(&contact.address).await {
            Ok(result) => Some(result.coordinate),
            Err(err) => {
                debug!(contact = %contact.id, error = %err, "contact address not resolved");
                None
            }
        }
    }
}

fn validate(stops: &[Stop], origin: Option<&Origin>) -> Result<(), ItineraryError> {
    if let Some(Origin::Coordinate(coordinate)) = origin {
        check_range(coordinate)?;
    }

    let mut seen = HashSet::with_capacity(stops.len());
    for stop in stops {
        if !seen.insert(stop.id.as_str()) {
            return Err(ItineraryError::DuplicateStop(stop.id.clone()));
        }
        if let Some(coordinate) = &stop.coordinate {
            check_range(coordinate)?;
        }
    }
    Ok(())
}

fn check_range(coordinate: &Coordinate) -> Result<(), ItineraryError> {
    Coordinate::new(coordinate.lat, coordinate.lon).map(|_| ())
}

/// Stops per local date, each day stably sorted by scheduled time.
fn bucket_by_day<'a>(stops: &[&'a Stop]) -> BTreeMap<NaiveDate, Vec<&'a Stop>> {
    let mut days: BTreeMap<NaiveDate, Vec<&'a Stop>> = BTreeMap::new();
    for stop in stops {
        days.entry(stop.scheduled_date).or_default().push(*stop);
    }
    for day in days.values_mut() {
        day.sort_by_key(|stop| stop.scheduled_time);
    }
    days
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;

    fn stop(id: &str, day: u32, hour: u32, minute: u32) -> Stop {
        Stop::new(
            id,
            NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            NaiveTime::from_hms_opt(hour, minute, 0).unwrap(),
        )
    }

    #[test]
    fn test_bucket_orders_by_date_then_time() {
        let stops = [
            stop("late", 11, 15, 0),
            stop("first", 10, 9, 0),
            stop("second", 10, 14, 0),
            stop("early", 11, 8, 0),
        ];
        let refs: Vec<&Stop> = stops.iter().collect();
        let days = bucket_by_day(&refs);

        let ids: Vec<Vec<&str>> = days
            .values()
            .map(|day| day.iter().map(|s| s.id.as_str()).collect())
            .collect();
        assert_eq!(ids, vec![vec!["first", "second"], vec!["early", "late"]]);
    }

    #[test]
    fn test_bucket_keeps_insertion_order_on_ties() {
        let stops = [stop("b", 10, 9, 0), stop("a", 10, 9, 0), stop("c", 10, 8, 0)];
        let refs: Vec<&Stop> = stops.iter().collect();
        let days = bucket_by_day(&refs);

        let ids: Vec<&str> = days.values().next().unwrap().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let stops = [stop("v-1", 10, 9, 0), stop("v-1", 11, 9, 0)];
        assert_eq!(
            validate(&stops, None),
            Err(ItineraryError::DuplicateStop("v-1".into()))
        );
    }

    #[test]
    fn test_validate_rejects_out_of_range_coordinates() {
        let stops = [stop("v-1", 10, 9, 0).with_coordinate(-3.8, 200.0)];
        assert!(matches!(
            validate(&stops, None),
            Err(ItineraryError::InvalidCoordinate { .. })
        ));

        let origin = Origin::Coordinate(Coordinate { lat: -100.0, lon: 0.0 });
        assert!(validate(&[], Some(&origin)).is_err());
    }

    #[test]
    fn test_validate_accepts_unset_coordinates() {
        let stops = [stop("v-1", 10, 9, 0).with_coordinate(0.0, 0.0)];
        assert!(validate(&stops, None).is_ok());
    }
}
