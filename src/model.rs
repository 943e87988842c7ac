//! Data types flowing through the itinerary engine.
//!
//! Everything here except `Stop` and `Contact` is derived per request and
//! discarded afterwards.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::ItineraryError;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Builds a coordinate, rejecting values outside the valid range.
    pub fn new(lat: f64, lon: f64) -> Result<Self, ItineraryError> {
        let coordinate = Self { lat, lon };
        if coordinate.in_range() {
            Ok(coordinate)
        } else {
            Err(ItineraryError::InvalidCoordinate { lat, lon })
        }
    }

    pub fn in_range(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// True when the coordinate can take part in a distance calculation.
    ///
    /// (0, 0) is what unset database columns decode to, so it counts as missing.
    pub fn is_usable(&self) -> bool {
        self.in_range() && !(self.lat == 0.0 && self.lon == 0.0)
    }

    /// `lat,lon` with six decimals, the form routing providers expect.
    pub fn to_query(&self) -> String {
        format!("{:.6},{:.6}", self.lat, self.lon)
    }
}

/// A partial postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressQuery {
    pub address_line: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    /// Falls back to the resolver's home country when absent.
    pub country: Option<String>,
}

impl AddressQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn address_line(mut self, line: impl Into<String>) -> Self {
        self.address_line = Some(line.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Resolution is attempted only when one of line/city/state has text.
    pub fn is_resolvable(&self) -> bool {
        [&self.address_line, &self.city, &self.state]
            .into_iter()
            .any(|field| non_blank(field).is_some())
    }
}

pub(crate) fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub coordinate: Coordinate,
    pub display_name: String,
}

/// Where a trip starts and ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Origin {
    Coordinate(Coordinate),
    Address(AddressQuery),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StopStatus {
    #[default]
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    Deleted,
}

impl StopStatus {
    /// Cancelled and deleted stops never enter an itinerary.
    pub fn is_active(&self) -> bool {
        !matches!(self, StopStatus::Cancelled | StopStatus::Deleted)
    }
}

/// A scheduled visit.
///
/// `scheduled_date` is the visit's local calendar date. Build it from the
/// local timestamp (see [`Stop::at_local`]), never from a UTC rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: String,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    pub status: StopStatus,
    pub address: AddressQuery,
    pub coordinate: Option<Coordinate>,
    pub related_contact_id: Option<String>,
    /// Freeform client name typed on the visit, matched against contacts.
    pub contact_name: Option<String>,
}

impl Stop {
    pub fn new(id: impl Into<String>, date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            id: id.into(),
            scheduled_date: date,
            scheduled_time: time,
            status: StopStatus::Scheduled,
            address: AddressQuery::default(),
            coordinate: None,
            related_contact_id: None,
            contact_name: None,
        }
    }

    /// Takes date and time from `when` as seen in its own time zone.
    pub fn at_local<Tz: TimeZone>(id: impl Into<String>, when: &DateTime<Tz>) -> Self {
        Self::new(id, when.date_naive(), when.time())
    }

    pub fn with_status(mut self, status: StopStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_address(mut self, address: AddressQuery) -> Self {
        self.address = address;
        self
    }

    pub fn with_coordinate(mut self, lat: f64, lon: f64) -> Self {
        self.coordinate = Some(Coordinate { lat, lon });
        self
    }

    pub fn with_contact(mut self, contact_id: impl Into<String>) -> Self {
        self.related_contact_id = Some(contact_id.into());
        self
    }

    pub fn with_contact_name(mut self, name: impl Into<String>) -> Self {
        self.contact_name = Some(name.into());
        self
    }
}

/// A customer record that stops may point at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub address: AddressQuery,
    pub coordinate: Option<Coordinate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripMetrics {
    pub distance_km: f64,
    pub travel_time_minutes: i64,
    pub fuel_liters: f64,
    pub travel_cost: f64,
}

/// How a routed stop got its coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordinateSource {
    Own,
    Address,
    Contact,
    NameMatch,
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutedStop {
    pub stop: Stop,
    pub coordinate: Option<Coordinate>,
    pub source: CoordinateSource,
}

/// One calendar day of a plan. `legs` holds one outbound leg per stop plus
/// the return leg to the origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayItinerary {
    pub date: NaiveDate,
    pub stops: Vec<RoutedStop>,
    pub legs: Vec<TripMetrics>,
    pub total_distance_km: f64,
    pub total_fuel_liters: f64,
    pub total_travel_minutes: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanAggregate {
    pub total_planned_visits: usize,
    pub planned_distance_km: f64,
    pub planned_fuel_liters: f64,
    pub planned_cost: f64,
    pub planned_travel_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanReport {
    pub aggregate: PlanAggregate,
    pub days: Vec<DayItinerary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_coordinate_range() {
        assert!(Coordinate::new(-3.89, -38.46).is_ok());
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert_eq!(
            Coordinate::new(91.0, 0.0),
            Err(ItineraryError::InvalidCoordinate { lat: 91.0, lon: 0.0 })
        );
        assert!(Coordinate::new(f64::NAN, 10.0).is_err());
    }

    #[test]
    fn test_null_island_is_not_usable() {
        assert!(!Coordinate { lat: 0.0, lon: 0.0 }.is_usable());
        assert!(Coordinate { lat: 0.0, lon: 10.0 }.is_usable());
    }

    #[test]
    fn test_query_format() {
        let coordinate = Coordinate { lat: -3.8, lon: -38.5 };
        assert_eq!(coordinate.to_query(), "-3.800000,-38.500000");
    }

    #[test]
    fn test_blank_fields_are_not_resolvable() {
        assert!(!AddressQuery::new().is_resolvable());
        assert!(!AddressQuery::new().city("  ").country("Brasil").is_resolvable());
        assert!(AddressQuery::new().state("CE").is_resolvable());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(StopStatus::Scheduled.is_active());
        assert!(StopStatus::Completed.is_active());
        assert!(!StopStatus::Cancelled.is_active());
        assert!(!StopStatus::Deleted.is_active());
    }

    #[test]
    fn test_at_local_keeps_local_date() {
        // 22:30 in Fortaleza is already the next day in UTC.
        let tz = FixedOffset::west_opt(3 * 3600).unwrap();
        let when = tz.with_ymd_and_hms(2024, 5, 10, 22, 30, 0).unwrap();
        let stop = Stop::at_local("v-1", &when);
        assert_eq!(stop.scheduled_date, NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());
        assert_eq!(stop.scheduled_time, NaiveTime::from_hms_opt(22, 30, 0).unwrap());
        assert_eq!(
            when.naive_utc().date(),
            NaiveDate::from_ymd_opt(2024, 5, 11).unwrap()
        );
    }
}
