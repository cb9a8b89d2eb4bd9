//! # Offer Entity
//!
//! A normalized flight offer returned by one provider.
//!
//! Offers are created by provider adapters from wire responses and are never
//! mutated afterwards. Every field is private and exposed through getters.
//!
//! # Examples
//!
//! ```
//! use flight_aggregator::domain::entities::offer::PriceBreakdown;
//! use rust_decimal::Decimal;
//!
//! let price = PriceBreakdown::from_parts(
//!     Some(Decimal::new(10000, 0)),
//!     Some(Decimal::new(1500, 0)),
//!     None,
//!     "BDT",
//! )
//! .unwrap();
//! assert_eq!(price.total(), Decimal::new(11500, 0));
//! ```

use crate::domain::value_objects::{AirportCode, CabinClass, OfferId, ProviderId};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Placeholder text for a segment field the provider left out.
pub const NOT_AVAILABLE: &str = "N/A";

/// Fare breakdown of an offer.
///
/// # Invariants
///
/// - `total` is authoritative; when the provider sends it, it is kept as is
/// - Without a provider total, `total = base_fare + taxes`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    base_fare: Decimal,
    taxes: Decimal,
    total: Decimal,
    currency: String,
}

impl PriceBreakdown {
    /// Builds a breakdown from whatever parts a provider supplied.
    ///
    /// Missing taxes count as zero. A missing base fare is derived from the
    /// total. A missing total is the sum of base fare and taxes.
    ///
    /// Returns `None` when deriving a missing part overflows `Decimal`.
    #[must_use]
    pub fn from_parts(
        base_fare: Option<Decimal>,
        taxes: Option<Decimal>,
        total: Option<Decimal>,
        currency: impl Into<String>,
    ) -> Option<Self> {
        let taxes = taxes.unwrap_or(Decimal::ZERO);
        let (base_fare, total) = match (base_fare, total) {
            (Some(base), Some(total)) => (base, total),
            (Some(base), None) => (base, base.checked_add(taxes)?),
            (None, Some(total)) => (total.checked_sub(taxes)?, total),
            (None, None) => (Decimal::ZERO, taxes),
        };
        Some(Self {
            base_fare,
            taxes,
            total,
            currency: currency.into().trim().to_ascii_uppercase(),
        })
    }

    /// Breakdown for a provider that only reports the payable total.
    #[must_use]
    pub fn total_only(total: Decimal, currency: impl Into<String>) -> Self {
        Self {
            base_fare: total,
            taxes: Decimal::ZERO,
            total,
            currency: currency.into().trim().to_ascii_uppercase(),
        }
    }

    /// Returns the base fare.
    #[inline]
    #[must_use]
    pub fn base_fare(&self) -> Decimal {
        self.base_fare
    }

    /// Returns the taxes.
    #[inline]
    #[must_use]
    pub fn taxes(&self) -> Decimal {
        self.taxes
    }

    /// Returns the total payable amount.
    #[inline]
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Returns the ISO currency code.
    #[inline]
    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }
}

impl fmt::Display for PriceBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.total, self.currency)
    }
}

/// One flown segment of an offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlightSegment {
    airline_code: String,
    airline_name: String,
    flight_number: String,
    departure_airport: AirportCode,
    arrival_airport: AirportCode,
    departure_time: NaiveDateTime,
    arrival_time: NaiveDateTime,
    duration: String,
    cabin_class: CabinClass,
    baggage: String,
}

impl FlightSegment {
    /// Starts building a segment.
    #[must_use]
    pub fn builder(
        departure_airport: AirportCode,
        arrival_airport: AirportCode,
        departure_time: NaiveDateTime,
        arrival_time: NaiveDateTime,
    ) -> FlightSegmentBuilder {
        FlightSegmentBuilder {
            segment: Self {
                airline_code: String::new(),
                airline_name: String::new(),
                flight_number: String::new(),
                departure_airport,
                arrival_airport,
                departure_time,
                arrival_time,
                duration: NOT_AVAILABLE.to_string(),
                cabin_class: CabinClass::Economy,
                baggage: NOT_AVAILABLE.to_string(),
            },
        }
    }

    /// Returns the marketing carrier code.
    #[inline]
    #[must_use]
    pub fn airline_code(&self) -> &str {
        &self.airline_code
    }

    /// Returns the marketing carrier name.
    #[inline]
    #[must_use]
    pub fn airline_name(&self) -> &str {
        &self.airline_name
    }

    /// Returns the flight number including the carrier code, e.g. `BG147`.
    #[inline]
    #[must_use]
    pub fn flight_number(&self) -> &str {
        &self.flight_number
    }

    /// Returns the departure airport.
    #[inline]
    #[must_use]
    pub fn departure_airport(&self) -> &AirportCode {
        &self.departure_airport
    }

    /// Returns the arrival airport.
    #[inline]
    #[must_use]
    pub fn arrival_airport(&self) -> &AirportCode {
        &self.arrival_airport
    }

    /// Returns the scheduled departure time (airport local).
    #[inline]
    #[must_use]
    pub fn departure_time(&self) -> NaiveDateTime {
        self.departure_time
    }

    /// Returns the scheduled arrival time (airport local).
    #[inline]
    #[must_use]
    pub fn arrival_time(&self) -> NaiveDateTime {
        self.arrival_time
    }

    /// Returns the duration as reported by the provider.
    #[inline]
    #[must_use]
    pub fn duration(&self) -> &str {
        &self.duration
    }

    /// Returns the cabin class.
    #[inline]
    #[must_use]
    pub fn cabin_class(&self) -> CabinClass {
        self.cabin_class
    }

    /// Returns the baggage allowance, `"N/A"` when unknown.
    #[inline]
    #[must_use]
    pub fn baggage(&self) -> &str {
        &self.baggage
    }
}

impl fmt::Display for FlightSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{} {}",
            self.flight_number, self.departure_airport, self.arrival_airport, self.departure_time
        )
    }
}

/// Builder for [`FlightSegment`].
#[derive(Debug, Clone)]
pub struct FlightSegmentBuilder {
    segment: FlightSegment,
}

impl FlightSegmentBuilder {
    /// Sets the marketing carrier.
    #[must_use]
    pub fn airline(mut self, code: impl Into<String>, name: impl Into<String>) -> Self {
        self.segment.airline_code = code.into();
        self.segment.airline_name = name.into();
        self
    }

    /// Sets the flight number.
    #[must_use]
    pub fn flight_number(mut self, flight_number: impl Into<String>) -> Self {
        self.segment.flight_number = flight_number.into();
        self
    }

    /// Sets the duration text.
    #[must_use]
    pub fn duration(mut self, duration: impl Into<String>) -> Self {
        self.segment.duration = duration.into();
        self
    }

    /// Sets the cabin class.
    #[must_use]
    pub fn cabin_class(mut self, cabin_class: CabinClass) -> Self {
        self.segment.cabin_class = cabin_class;
        self
    }

    /// Sets the baggage allowance text.
    #[must_use]
    pub fn baggage(mut self, baggage: impl Into<String>) -> Self {
        self.segment.baggage = baggage.into();
        self
    }

    /// Finishes the segment.
    #[must_use]
    pub fn build(self) -> FlightSegment {
        self.segment
    }
}

/// A normalized flight offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Offer {
    id: OfferId,
    provider_id: ProviderId,
    segments: Vec<FlightSegment>,
    price: PriceBreakdown,
    refundable: bool,
    available_seats: u32,
}

impl Offer {
    /// Creates an offer. Segment order is preserved as given.
    #[must_use]
    pub fn new(
        id: OfferId,
        provider_id: ProviderId,
        segments: Vec<FlightSegment>,
        price: PriceBreakdown,
        refundable: bool,
        available_seats: u32,
    ) -> Self {
        Self {
            id,
            provider_id,
            segments,
            price,
            refundable,
            available_seats,
        }
    }

    /// Returns the provider-assigned offer id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &OfferId {
        &self.id
    }

    /// Returns the provider that supplied the offer.
    #[inline]
    #[must_use]
    pub fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }

    /// Returns the flown segments in provider order.
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[FlightSegment] {
        &self.segments
    }

    /// Returns the fare breakdown.
    #[inline]
    #[must_use]
    pub fn price(&self) -> &PriceBreakdown {
        &self.price
    }

    /// Returns the total fare.
    #[inline]
    #[must_use]
    pub fn total_fare(&self) -> Decimal {
        self.price.total
    }

    /// Returns true if the fare is refundable.
    #[inline]
    #[must_use]
    pub fn is_refundable(&self) -> bool {
        self.refundable
    }

    /// Returns the number of seats left at this fare.
    #[inline]
    #[must_use]
    pub fn available_seats(&self) -> u32 {
        self.available_seats
    }
}

impl fmt::Display for Offer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Offer({} from {} {} segments={})",
            self.id,
            self.provider_id,
            self.price,
            self.segments.len()
        )
    }
}
