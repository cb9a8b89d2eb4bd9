//! # FlyHub Adapter
//!
//! Translation for the FlyHub `AirSearch` API.
//!
//! Requests are flat PascalCase objects with numeric string codes for the
//! journey type and cabin. Responses carry a `Results` array where each
//! result has its own `Segments`.

use crate::domain::entities::{FlightSegment, Offer, PriceBreakdown, SearchRequest};
use crate::domain::value_objects::{CabinClass, OfferId, ProviderId, TripType};
use crate::infrastructure::providers::error::ProtocolError;
use crate::infrastructure::providers::normalizer::{
    airport, cabin_or_economy, flight_number, parse_date_time, text_or_not_available, wire_date,
};
use crate::infrastructure::providers::traits::{ProviderAdapter, ProviderKind};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default search endpoint path.
pub const FLYHUB_SEARCH_PATH: &str = "AirSearch";

/// IP reported when the caller did not pass one.
pub const DEFAULT_END_USER_IP: &str = "127.0.0.1";

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct AirSearchRequest {
    adult_quantity: u32,
    child_quantity: u32,
    infant_quantity: u32,
    end_user_ip: String,
    journey_type: &'static str,
    segments: Vec<AirSearchSegment>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct AirSearchSegment {
    origin: String,
    destination: String,
    cabin_class: &'static str,
    departure_date_time: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AirSearchResponse {
    #[serde(default)]
    results: Option<Vec<WireResult>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireResult {
    #[serde(rename = "ResultID")]
    result_id: String,
    #[serde(default)]
    is_refundable: bool,
    total_fare: Decimal,
    currency: String,
    #[serde(default)]
    base_fare: Option<Decimal>,
    #[serde(default)]
    tax: Option<Decimal>,
    #[serde(default)]
    available_seats: Option<u32>,
    #[serde(default)]
    segments: Vec<WireSegment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireSegment {
    origin: WireAirport,
    destination: WireAirport,
    airline: WireAirline,
    flight_number: String,
    departure_date_time: String,
    arrival_date_time: String,
    #[serde(default)]
    duration: Option<String>,
    #[serde(default)]
    baggage: Option<String>,
    #[serde(default)]
    cabin_class: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireAirport {
    airport_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireAirline {
    airline_code: String,
    #[serde(default)]
    airline_name: String,
}

/// Maps a journey type to FlyHub's code.
#[must_use]
pub fn journey_type_code(trip_type: TripType) -> &'static str {
    match trip_type {
        TripType::OneWay => "1",
        TripType::RoundTrip => "2",
        TripType::MultiCity => "3",
    }
}

/// Maps a cabin class to FlyHub's code.
#[must_use]
pub fn cabin_class_code(cabin_class: CabinClass) -> &'static str {
    match cabin_class {
        CabinClass::Economy => "1",
        CabinClass::PremiumEconomy => "2",
        CabinClass::Business => "3",
        CabinClass::First => "4",
    }
}

/// Reads a response cabin, which may be a FlyHub code or a label.
fn response_cabin(value: Option<&str>) -> CabinClass {
    match value.map(str::trim) {
        Some("1") => CabinClass::Economy,
        Some("2") => CabinClass::PremiumEconomy,
        Some("3") => CabinClass::Business,
        Some("4") => CabinClass::First,
        other => cabin_or_economy(other),
    }
}

/// FlyHub wire translation.
#[derive(Debug, Clone)]
pub struct FlyHubAdapter {
    search_path: String,
}

impl Default for FlyHubAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl FlyHubAdapter {
    /// Creates an adapter with the default search path.
    #[must_use]
    pub fn new() -> Self {
        Self::with_search_path(FLYHUB_SEARCH_PATH)
    }

    /// Creates an adapter with a custom search path.
    #[must_use]
    pub fn with_search_path(search_path: impl Into<String>) -> Self {
        Self {
            search_path: search_path.into(),
        }
    }

    fn normalize_result(
        provider_id: &ProviderId,
        index: usize,
        result: WireResult,
    ) -> Result<Offer, ProtocolError> {
        let segments = result
            .segments
            .into_iter()
            .enumerate()
            .map(|(i, seg)| {
                let field = |name: &str| format!("Results[{index}].Segments[{i}].{name}");
                Ok(FlightSegment::builder(
                    airport(&seg.origin.airport_code, &field("Origin"))?,
                    airport(&seg.destination.airport_code, &field("Destination"))?,
                    parse_date_time(&seg.departure_date_time, &field("DepartureDateTime"))?,
                    parse_date_time(&seg.arrival_date_time, &field("ArrivalDateTime"))?,
                )
                .flight_number(flight_number(&seg.airline.airline_code, &seg.flight_number))
                .airline(seg.airline.airline_code, seg.airline.airline_name)
                .duration(text_or_not_available(seg.duration.as_deref()))
                .baggage(text_or_not_available(seg.baggage.as_deref()))
                .cabin_class(response_cabin(seg.cabin_class.as_deref()))
                .build())
            })
            .collect::<Result<Vec<_>, ProtocolError>>()?;

        Ok(Offer::new(
            OfferId::new(result.result_id),
            provider_id.clone(),
            segments,
            PriceBreakdown::from_parts(
                result.base_fare,
                result.tax,
                Some(result.total_fare),
                result.currency,
            )
            .ok_or_else(|| ProtocolError::new(format!("Results[{index}] fare overflows")))?,
            result.is_refundable,
            result.available_seats.unwrap_or(0),
        ))
    }
}

impl ProviderAdapter for FlyHubAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::FlyHub
    }

    fn search_path(&self) -> &str {
        &self.search_path
    }

    fn to_wire_request(&self, request: &SearchRequest) -> Result<serde_json::Value, ProtocolError> {
        let counts = request.passenger_counts();
        let cabin_class = cabin_class_code(request.cabin_class());
        let body = AirSearchRequest {
            adult_quantity: counts.adults,
            child_quantity: counts.children,
            infant_quantity: counts.infants,
            end_user_ip: request
                .end_user_ip()
                .unwrap_or(DEFAULT_END_USER_IP)
                .to_string(),
            journey_type: journey_type_code(request.effective_trip_type()),
            segments: request
                .legs()
                .iter()
                .map(|leg| AirSearchSegment {
                    origin: leg.origin().to_string(),
                    destination: leg.destination().to_string(),
                    cabin_class,
                    departure_date_time: wire_date(leg.departure_date()),
                })
                .collect(),
        };
        Ok(serde_json::to_value(body)?)
    }

    fn from_wire_response(
        &self,
        provider_id: &ProviderId,
        body: serde_json::Value,
    ) -> Result<Vec<Offer>, ProtocolError> {
        let response: AirSearchResponse = serde_json::from_value(body)?;
        response
            .results
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, result)| Self::normalize_result(provider_id, index, result))
            .collect()
    }
}
