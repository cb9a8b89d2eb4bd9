//! # BDFare Adapter
//!
//! Translation for the BDFare `AirShopping` API.
//!
//! Requests nest the itinerary under `request.originDest` and list
//! passengers individually with sequential `PAXn` ids. Responses wrap each
//! offer in `response.offersGroup[].offer`; baggage is given per leg in a
//! separate `baggageAllowanceList` keyed by departure airport.

use crate::domain::entities::{
    FlightSegment, NOT_AVAILABLE, Offer, PassengerCounts, PriceBreakdown, SearchRequest,
};
use crate::domain::value_objects::{CabinClass, OfferId, PassengerType, ProviderId, TripType};
use crate::infrastructure::providers::error::ProtocolError;
use crate::infrastructure::providers::normalizer::{
    airport, cabin_or_economy, flight_number, parse_date_time, text_or_not_available, wire_date,
};
use crate::infrastructure::providers::traits::{ProviderAdapter, ProviderKind};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default search endpoint path.
pub const BDFARE_SEARCH_PATH: &str = "AirShopping";

const POINT_OF_SALE: &str = "BD";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AirShoppingRequest {
    point_of_sale: &'static str,
    request: ShoppingRequest,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShoppingRequest {
    origin_dest: Vec<OriginDest>,
    pax: Vec<WirePax>,
    shopping_criteria: ShoppingCriteria,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OriginDest {
    origin_dep_request: OriginDepRequest,
    dest_arrival_request: DestArrivalRequest,
}

#[derive(Debug, Serialize)]
struct OriginDepRequest {
    #[serde(rename = "iatA_LocationCode")]
    iata_location_code: String,
    date: String,
}

#[derive(Debug, Serialize)]
struct DestArrivalRequest {
    #[serde(rename = "iatA_LocationCode")]
    iata_location_code: String,
}

#[derive(Debug, Serialize)]
struct WirePax {
    #[serde(rename = "paxID")]
    pax_id: String,
    ptc: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShoppingCriteria {
    trip_type: &'static str,
    travel_preferences: TravelPreferences,
    #[serde(rename = "returnUPSellInfo")]
    return_upsell_info: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TravelPreferences {
    vendor_pref: Vec<String>,
    cabin_code: &'static str,
}

#[derive(Debug, Deserialize)]
struct AirShoppingResponse {
    #[serde(default)]
    response: Option<ResponseBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseBody {
    #[serde(default)]
    offers_group: Option<Vec<OfferGroup>>,
}

#[derive(Debug, Deserialize)]
struct OfferGroup {
    offer: WireOffer,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireOffer {
    offer_id: String,
    #[serde(default)]
    refundable: bool,
    price: WirePrice,
    #[serde(default)]
    seats_remaining: Option<u32>,
    #[serde(default)]
    pax_segment_list: Vec<PaxSegmentEntry>,
    #[serde(default)]
    baggage_allowance_list: Vec<BaggageAllowance>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePrice {
    total_payable: TotalPayable,
    #[serde(default)]
    base_amount: Option<Decimal>,
    #[serde(default)]
    tax_amount: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct TotalPayable {
    total: Decimal,
    currency: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaxSegmentEntry {
    pax_segment: PaxSegment,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaxSegment {
    departure: SegmentPoint,
    arrival: SegmentPoint,
    marketing_carrier_info: CarrierInfo,
    flight_number: String,
    #[serde(default)]
    duration: Option<String>,
    #[serde(default)]
    cabin_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SegmentPoint {
    #[serde(rename = "iatA_LocationCode")]
    iata_location_code: String,
    aircraft_scheduled_date_time: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CarrierInfo {
    carrier_desig_code: String,
    #[serde(default)]
    carrier_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BaggageAllowance {
    departure: String,
    #[serde(default)]
    check_in: Vec<CheckIn>,
}

#[derive(Debug, Deserialize)]
struct CheckIn {
    #[serde(default)]
    allowance: Option<String>,
}

/// Assigns BDFare passenger ids: adults, then children, then infants,
/// numbered `PAX1..PAXn` in that order.
#[must_use]
pub fn passenger_ids(counts: PassengerCounts) -> Vec<(String, PassengerType)> {
    [
        (PassengerType::Adult, counts.adults),
        (PassengerType::Child, counts.children),
        (PassengerType::Infant, counts.infants),
    ]
    .into_iter()
    .flat_map(|(pax_type, count)| (0..count).map(move |_| pax_type))
    .enumerate()
    .map(|(i, pax_type)| (format!("PAX{}", i + 1), pax_type))
    .collect()
}

/// Maps a trip type to BDFare's name.
#[must_use]
pub fn trip_type_name(trip_type: TripType) -> &'static str {
    match trip_type {
        TripType::OneWay => "Oneway",
        TripType::RoundTrip => "Return",
        TripType::MultiCity => "Circle",
    }
}

/// Maps a cabin class to BDFare's cabin code.
#[must_use]
pub fn cabin_code(cabin_class: CabinClass) -> &'static str {
    match cabin_class {
        CabinClass::Economy => "Economy",
        CabinClass::PremiumEconomy => "PremiumEconomy",
        CabinClass::Business => "Business",
        CabinClass::First => "First",
    }
}

fn baggage_for(departure: &str, allowances: &[BaggageAllowance]) -> String {
    allowances
        .iter()
        .filter(|ba| ba.departure.trim().eq_ignore_ascii_case(departure.trim()))
        .find_map(|ba| ba.check_in.first().and_then(|c| c.allowance.as_deref()))
        .map_or_else(|| NOT_AVAILABLE.to_string(), |a| text_or_not_available(Some(a)))
}

/// BDFare wire translation.
#[derive(Debug, Clone)]
pub struct BdFareAdapter {
    search_path: String,
}

impl Default for BdFareAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl BdFareAdapter {
    /// Creates an adapter with the default search path.
    #[must_use]
    pub fn new() -> Self {
        Self::with_search_path(BDFARE_SEARCH_PATH)
    }

    /// Creates an adapter with a custom search path.
    #[must_use]
    pub fn with_search_path(search_path: impl Into<String>) -> Self {
        Self {
            search_path: search_path.into(),
        }
    }

    fn normalize_offer(
        provider_id: &ProviderId,
        index: usize,
        offer: WireOffer,
    ) -> Result<Offer, ProtocolError> {
        let allowances = offer.baggage_allowance_list;
        let segments = offer
            .pax_segment_list
            .into_iter()
            .enumerate()
            .map(|(i, entry)| {
                let seg = entry.pax_segment;
                let field = |name: &str| format!("offersGroup[{index}].paxSegmentList[{i}].{name}");
                let baggage = baggage_for(&seg.departure.iata_location_code, &allowances);
                Ok(FlightSegment::builder(
                    airport(&seg.departure.iata_location_code, &field("departure"))?,
                    airport(&seg.arrival.iata_location_code, &field("arrival"))?,
                    parse_date_time(
                        &seg.departure.aircraft_scheduled_date_time,
                        &field("departure.aircraftScheduledDateTime"),
                    )?,
                    parse_date_time(
                        &seg.arrival.aircraft_scheduled_date_time,
                        &field("arrival.aircraftScheduledDateTime"),
                    )?,
                )
                .flight_number(flight_number(
                    &seg.marketing_carrier_info.carrier_desig_code,
                    &seg.flight_number,
                ))
                .airline(
                    seg.marketing_carrier_info.carrier_desig_code,
                    seg.marketing_carrier_info.carrier_name,
                )
                .duration(text_or_not_available(seg.duration.as_deref()))
                .cabin_class(cabin_or_economy(seg.cabin_type.as_deref()))
                .baggage(baggage)
                .build())
            })
            .collect::<Result<Vec<_>, ProtocolError>>()?;

        Ok(Offer::new(
            OfferId::new(offer.offer_id),
            provider_id.clone(),
            segments,
            PriceBreakdown::from_parts(
                offer.price.base_amount,
                offer.price.tax_amount,
                Some(offer.price.total_payable.total),
                offer.price.total_payable.currency,
            )
            .ok_or_else(|| ProtocolError::new(format!("offersGroup[{index}].price overflows")))?,
            offer.refundable,
            offer.seats_remaining.unwrap_or(0),
        ))
    }
}

impl ProviderAdapter for BdFareAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::BdFare
    }

    fn search_path(&self) -> &str {
        &self.search_path
    }

    fn to_wire_request(&self, request: &SearchRequest) -> Result<serde_json::Value, ProtocolError> {
        let body = AirShoppingRequest {
            point_of_sale: POINT_OF_SALE,
            request: ShoppingRequest {
                origin_dest: request
                    .legs()
                    .iter()
                    .map(|leg| OriginDest {
                        origin_dep_request: OriginDepRequest {
                            iata_location_code: leg.origin().to_string(),
                            date: wire_date(leg.departure_date()),
                        },
                        dest_arrival_request: DestArrivalRequest {
                            iata_location_code: leg.destination().to_string(),
                        },
                    })
                    .collect(),
                pax: passenger_ids(request.passenger_counts())
                    .into_iter()
                    .map(|(pax_id, pax_type)| WirePax {
                        pax_id,
                        ptc: pax_type.ptc(),
                    })
                    .collect(),
                shopping_criteria: ShoppingCriteria {
                    trip_type: trip_type_name(request.effective_trip_type()),
                    travel_preferences: TravelPreferences {
                        vendor_pref: request.preferred_airlines().to_vec(),
                        cabin_code: cabin_code(request.cabin_class()),
                    },
                    return_upsell_info: true,
                },
            },
        };
        Ok(serde_json::to_value(body)?)
    }

    fn from_wire_response(
        &self,
        provider_id: &ProviderId,
        body: serde_json::Value,
    ) -> Result<Vec<Offer>, ProtocolError> {
        let response: AirShoppingResponse = serde_json::from_value(body)?;
        response
            .response
            .and_then(|r| r.offers_group)
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, group)| Self::normalize_offer(provider_id, index, group.offer))
            .collect()
    }
}
