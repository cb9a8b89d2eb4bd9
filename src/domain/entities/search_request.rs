//! # Search Request Entity
//!
//! The canonical, provider-independent flight search request.
//!
//! Requests are constructed through [`SearchRequestBuilder::try_build`], which
//! validates the whole request and reports every violation. Adapters read the
//! request through [`SearchRequest::legs`] and
//! [`SearchRequest::passenger_counts`] rather than re-deriving itinerary
//! shape themselves.
//!
//! # Examples
//!
//! ```ignore
//! use flight_aggregator::domain::entities::search_request::SearchRequestBuilder;
//! use flight_aggregator::domain::value_objects::CabinClass;
//!
//! let request = SearchRequestBuilder::new("DAC", "DXB", departure, CabinClass::Economy)
//!     .passenger(lead_passenger)
//!     .try_build()?;
//!
//! assert_eq!(request.legs().len(), 1);
//! ```

use crate::domain::entities::passenger::{Passenger, validate_party};
use crate::domain::errors::{ValidationError, ValidationResult};
use crate::domain::value_objects::{AirportCode, CabinClass, PassengerType, TripType};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// One origin/destination pair of an itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItinerarySegment {
    origin: AirportCode,
    destination: AirportCode,
    departure_date: NaiveDate,
}

impl ItinerarySegment {
    /// Creates an itinerary segment.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if a code is malformed or origin equals
    /// destination.
    pub fn new(origin: &str, destination: &str, departure_date: NaiveDate) -> ValidationResult<Self> {
        let mut errors = ValidationError::new();
        let origin = AirportCode::new(origin).map_err(|e| errors.absorb("origin", e)).ok();
        let destination = AirportCode::new(destination)
            .map_err(|e| errors.absorb("destination", e))
            .ok();

        match (origin, destination) {
            (Some(origin), Some(destination)) => {
                if origin == destination {
                    errors.push("origin and destination cannot be the same");
                }
                errors.into_result()?;
                Ok(Self {
                    origin,
                    destination,
                    departure_date,
                })
            }
            _ => Err(errors),
        }
    }

    /// Returns the origin code.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> &AirportCode {
        &self.origin
    }

    /// Returns the destination code.
    #[inline]
    #[must_use]
    pub fn destination(&self) -> &AirportCode {
        &self.destination
    }

    /// Returns the departure date.
    #[inline]
    #[must_use]
    pub fn departure_date(&self) -> NaiveDate {
        self.departure_date
    }
}

impl fmt::Display for ItinerarySegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} {}", self.origin, self.destination, self.departure_date)
    }
}

/// Number of passengers of each type in a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PassengerCounts {
    /// Adult count.
    pub adults: u32,
    /// Child count.
    pub children: u32,
    /// Infant count.
    pub infants: u32,
}

impl PassengerCounts {
    /// Returns the total number of passengers.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.adults + self.children + self.infants
    }
}

/// A validated canonical flight search request.
///
/// # Invariants
///
/// - Origin and destination are valid and different
/// - Return date, when present, is not before the departure date
/// - At least one passenger, exactly one lead passenger
/// - Multi-city segments are each valid and in non-decreasing date order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    origin: AirportCode,
    destination: AirportCode,
    departure_date: NaiveDate,
    return_date: Option<NaiveDate>,
    passengers: Vec<Passenger>,
    cabin_class: CabinClass,
    trip_type: Option<TripType>,
    segments: Vec<ItinerarySegment>,
    preferred_airlines: Vec<String>,
    end_user_ip: Option<String>,
}

impl SearchRequest {
    /// Returns a builder for constructing a search request.
    #[must_use]
    pub fn builder(
        origin: impl Into<String>,
        destination: impl Into<String>,
        departure_date: NaiveDate,
        cabin_class: CabinClass,
    ) -> SearchRequestBuilder {
        SearchRequestBuilder::new(origin, destination, departure_date, cabin_class)
    }

    /// Returns the origin code.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> &AirportCode {
        &self.origin
    }

    /// Returns the destination code.
    #[inline]
    #[must_use]
    pub fn destination(&self) -> &AirportCode {
        &self.destination
    }

    /// Returns the departure date.
    #[inline]
    #[must_use]
    pub fn departure_date(&self) -> NaiveDate {
        self.departure_date
    }

    /// Returns the return date, if any.
    #[inline]
    #[must_use]
    pub fn return_date(&self) -> Option<NaiveDate> {
        self.return_date
    }

    /// Returns the passengers in request order.
    #[inline]
    #[must_use]
    pub fn passengers(&self) -> &[Passenger] {
        &self.passengers
    }

    /// Returns the lead passenger.
    #[must_use]
    pub fn lead_passenger(&self) -> Option<&Passenger> {
        self.passengers.iter().find(|p| p.is_lead())
    }

    /// Returns the requested cabin class.
    #[inline]
    #[must_use]
    pub fn cabin_class(&self) -> CabinClass {
        self.cabin_class
    }

    /// Returns the explicitly requested trip type.
    #[inline]
    #[must_use]
    pub fn trip_type(&self) -> Option<TripType> {
        self.trip_type
    }

    /// Returns the explicit multi-city segments.
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[ItinerarySegment] {
        &self.segments
    }

    /// Returns preferred airline designators.
    #[inline]
    #[must_use]
    pub fn preferred_airlines(&self) -> &[String] {
        &self.preferred_airlines
    }

    /// Returns the end user's IP address, if supplied.
    #[inline]
    #[must_use]
    pub fn end_user_ip(&self) -> Option<&str> {
        self.end_user_ip.as_deref()
    }

    /// Returns the trip type sent upstream.
    ///
    /// An explicit trip type wins; otherwise a return date implies a round
    /// trip and its absence a one-way trip.
    #[must_use]
    pub fn effective_trip_type(&self) -> TripType {
        match (self.trip_type, self.return_date) {
            (Some(trip_type), _) => trip_type,
            (None, Some(_)) => TripType::RoundTrip,
            (None, None) => TripType::OneWay,
        }
    }

    /// Returns the ordered legs to search.
    ///
    /// Multi-city requests with explicit segments use those segments as
    /// given. Everything else searches the outbound leg, plus the inbound
    /// leg when a return date is present.
    #[must_use]
    pub fn legs(&self) -> Vec<ItinerarySegment> {
        if self.effective_trip_type() == TripType::MultiCity && !self.segments.is_empty() {
            return self.segments.clone();
        }

        let mut legs = vec![ItinerarySegment {
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            departure_date: self.departure_date,
        }];
        if let Some(return_date) = self.return_date {
            legs.push(ItinerarySegment {
                origin: self.destination.clone(),
                destination: self.origin.clone(),
                departure_date: return_date,
            });
        }
        legs
    }

    /// Counts passengers by type.
    #[must_use]
    pub fn passenger_counts(&self) -> PassengerCounts {
        self.passengers
            .iter()
            .fold(PassengerCounts::default(), |mut counts, p| {
                match p.pax_type() {
                    PassengerType::Adult => counts.adults += 1,
                    PassengerType::Child => counts.children += 1,
                    PassengerType::Infant => counts.infants += 1,
                }
                counts
            })
    }
}

impl fmt::Display for SearchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Search({}-{} {} {} pax={})",
            self.origin,
            self.destination,
            self.departure_date,
            self.cabin_class,
            self.passengers.len()
        )
    }
}

/// Builder for constructing [`SearchRequest`] instances.
#[derive(Debug, Clone)]
pub struct SearchRequestBuilder {
    origin: String,
    destination: String,
    departure_date: NaiveDate,
    return_date: Option<NaiveDate>,
    passengers: Vec<Passenger>,
    cabin_class: CabinClass,
    trip_type: Option<TripType>,
    segments: Vec<(String, String, NaiveDate)>,
    preferred_airlines: Vec<String>,
    end_user_ip: Option<String>,
}

impl SearchRequestBuilder {
    /// Creates a new builder with required fields.
    #[must_use]
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        departure_date: NaiveDate,
        cabin_class: CabinClass,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            departure_date,
            return_date: None,
            passengers: Vec::new(),
            cabin_class,
            trip_type: None,
            segments: Vec::new(),
            preferred_airlines: Vec::new(),
            end_user_ip: None,
        }
    }

    /// Sets the return date.
    #[must_use]
    pub fn return_date(mut self, date: NaiveDate) -> Self {
        self.return_date = Some(date);
        self
    }

    /// Adds a passenger.
    #[must_use]
    pub fn passenger(mut self, passenger: Passenger) -> Self {
        self.passengers.push(passenger);
        self
    }

    /// Adds several passengers.
    #[must_use]
    pub fn passengers(mut self, passengers: impl IntoIterator<Item = Passenger>) -> Self {
        self.passengers.extend(passengers);
        self
    }

    /// Sets the trip type explicitly.
    #[must_use]
    pub fn trip_type(mut self, trip_type: TripType) -> Self {
        self.trip_type = Some(trip_type);
        self
    }

    /// Appends a multi-city segment.
    #[must_use]
    pub fn segment(
        mut self,
        origin: impl Into<String>,
        destination: impl Into<String>,
        departure_date: NaiveDate,
    ) -> Self {
        self.segments
            .push((origin.into(), destination.into(), departure_date));
        self
    }

    /// Adds a preferred airline designator.
    #[must_use]
    pub fn preferred_airline(mut self, airline: impl Into<String>) -> Self {
        self.preferred_airlines.push(airline.into());
        self
    }

    /// Sets the end user's IP address.
    #[must_use]
    pub fn end_user_ip(mut self, ip: impl Into<String>) -> Self {
        self.end_user_ip = Some(ip.into());
        self
    }

    /// Builds the request with validation.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` listing every violated rule.
    pub fn try_build(self) -> ValidationResult<SearchRequest> {
        let mut errors = ValidationError::new();

        let origin = AirportCode::new(&self.origin)
            .map_err(|e| errors.absorb("origin", e))
            .ok();
        let destination = AirportCode::new(&self.destination)
            .map_err(|e| errors.absorb("destination", e))
            .ok();
        if let (Some(o), Some(d)) = (&origin, &destination) {
            if o == d {
                errors.push("origin and destination cannot be the same");
            }
        }

        if let Some(return_date) = self.return_date {
            if return_date < self.departure_date {
                errors.push("return date cannot be before departure date");
            }
        }

        if let Err(e) = validate_party(&self.passengers) {
            for violation in e.violations() {
                errors.push(violation.clone());
            }
        }

        let mut segments = Vec::with_capacity(self.segments.len());
        let mut previous_date: Option<NaiveDate> = None;
        for (index, (seg_origin, seg_destination, date)) in self.segments.iter().enumerate() {
            match ItinerarySegment::new(seg_origin, seg_destination, *date) {
                Ok(segment) => segments.push(segment),
                Err(e) => errors.absorb(&format!("segment {}", index + 1), e),
            }
            if previous_date.is_some_and(|prev| *date < prev) {
                errors.push(format!(
                    "segment {} departs before the previous segment",
                    index + 1
                ));
            }
            previous_date = Some(*date);
        }

        if self.trip_type == Some(TripType::RoundTrip) && self.return_date.is_none() {
            errors.push("round trip requires a return date");
        }

        match (origin, destination) {
            (Some(origin), Some(destination)) if errors.is_empty() => Ok(SearchRequest {
                origin,
                destination,
                departure_date: self.departure_date,
                return_date: self.return_date,
                passengers: self.passengers,
                cabin_class: self.cabin_class,
                trip_type: self.trip_type,
                segments,
                preferred_airlines: self.preferred_airlines,
                end_user_ip: self.end_user_ip,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::entities::passenger::tests::passenger;

    pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub(crate) fn one_way_request() -> SearchRequest {
        SearchRequest::builder("DAC", "DXB", date(2024, 4, 1), CabinClass::Economy)
            .passenger(passenger(PassengerType::Adult, true))
            .try_build()
            .unwrap()
    }

    mod validation {
        use super::*;

        #[test]
        fn valid_request_builds() {
            let request = one_way_request();
            assert_eq!(request.origin().as_str(), "DAC");
            assert_eq!(request.destination().as_str(), "DXB");
            assert_eq!(request.passengers().len(), 1);
            assert!(request.lead_passenger().is_some());
        }

        #[test]
        fn same_origin_and_destination_rejected() {
            let err = SearchRequest::builder("DAC", "dac", date(2024, 4, 1), CabinClass::Economy)
                .passenger(passenger(PassengerType::Adult, true))
                .try_build()
                .unwrap_err();
            assert!(err.contains("origin and destination cannot be the same"));
        }

        #[test]
        fn invalid_code_and_missing_passengers_both_reported() {
            let err = SearchRequest::builder("INVALID", "DXB", date(2024, 4, 1), CabinClass::Economy)
                .try_build()
                .unwrap_err();
            assert!(err.violations().iter().any(|v| v.starts_with("origin:")));
            assert!(err.contains("at least one passenger is required"));
        }

        #[test]
        fn return_before_departure_rejected() {
            let err = SearchRequest::builder("DAC", "DXB", date(2024, 4, 10), CabinClass::Economy)
                .return_date(date(2024, 4, 1))
                .passenger(passenger(PassengerType::Adult, true))
                .try_build()
                .unwrap_err();
            assert!(err.contains("return date cannot be before departure date"));
        }

        #[test]
        fn multi_city_segments_validated() {
            let err = SearchRequest::builder("DAC", "DXB", date(2024, 4, 1), CabinClass::Economy)
                .trip_type(TripType::MultiCity)
                .segment("DAC", "DXB", date(2024, 4, 5))
                .segment("DXB", "DXB", date(2024, 4, 2))
                .passenger(passenger(PassengerType::Adult, true))
                .try_build()
                .unwrap_err();
            assert!(err.contains("segment 2: origin and destination cannot be the same"));
            assert!(err.contains("segment 2 departs before the previous segment"));
        }
    }

    mod itinerary {
        use super::*;

        #[test]
        fn one_way_has_single_leg() {
            let request = one_way_request();
            assert_eq!(request.effective_trip_type(), TripType::OneWay);
            assert_eq!(request.legs().len(), 1);
        }

        #[test]
        fn return_date_implies_round_trip_with_inbound_leg() {
            let request = SearchRequest::builder("DAC", "DXB", date(2024, 4, 1), CabinClass::Economy)
                .return_date(date(2024, 4, 8))
                .passenger(passenger(PassengerType::Adult, true))
                .try_build()
                .unwrap();

            assert_eq!(request.effective_trip_type(), TripType::RoundTrip);
            let legs = request.legs();
            assert_eq!(legs.len(), 2);
            assert_eq!(legs[1].origin().as_str(), "DXB");
            assert_eq!(legs[1].destination().as_str(), "DAC");
            assert_eq!(legs[1].departure_date(), date(2024, 4, 8));
        }

        #[test]
        fn multi_city_uses_explicit_segments_in_order() {
            let request = SearchRequest::builder("DAC", "CGP", date(2024, 4, 1), CabinClass::Business)
                .trip_type(TripType::MultiCity)
                .segment("DAC", "CGP", date(2024, 4, 1))
                .segment("CGP", "CXB", date(2024, 4, 3))
                .segment("CXB", "DAC", date(2024, 4, 6))
                .passenger(passenger(PassengerType::Adult, true))
                .try_build()
                .unwrap();

            let route: Vec<String> = request.legs().iter().map(ToString::to_string).collect();
            assert_eq!(
                route,
                ["DAC-CGP 2024-04-01", "CGP-CXB 2024-04-03", "CXB-DAC 2024-04-06"]
            );
        }

        #[test]
        fn passenger_counts_by_type() {
            let request = SearchRequest::builder("DAC", "DXB", date(2024, 4, 1), CabinClass::Economy)
                .passenger(passenger(PassengerType::Adult, true))
                .passenger(passenger(PassengerType::Child, false))
                .passenger(passenger(PassengerType::Infant, false))
                .passenger(passenger(PassengerType::Adult, false))
                .try_build()
                .unwrap();

            let counts = request.passenger_counts();
            assert_eq!(counts.adults, 2);
            assert_eq!(counts.children, 1);
            assert_eq!(counts.infants, 1);
            assert_eq!(counts.total(), 4);
        }
    }
}
