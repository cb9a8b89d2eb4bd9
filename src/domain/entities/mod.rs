//! # Domain Entities
//!
//! The canonical flight search model.
//!
//! ## Requests
//!
//! - [`SearchRequest`]: validated search with itinerary and passengers
//! - [`Passenger`]: validated traveller
//! - [`PricingRequest`], [`BookingRequest`], [`CancelBookingRequest`]: post-search steps
//!
//! ## Results
//!
//! - [`Offer`]: normalized offer with [`FlightSegment`]s and a [`PriceBreakdown`]
//! - [`SearchResponse`]: merged, fare-sorted offers plus provider diagnostics

pub mod booking;
pub mod offer;
pub mod passenger;
pub mod search_request;
pub mod search_response;

pub use booking::{BookingRequest, CancelBookingRequest, PricingRequest};
pub use offer::{FlightSegment, FlightSegmentBuilder, NOT_AVAILABLE, Offer, PriceBreakdown};
pub use passenger::{FrequentFlyer, Passenger, PassengerDetails, PassportDetails};
pub use search_request::{ItinerarySegment, PassengerCounts, SearchRequest, SearchRequestBuilder};
pub use search_response::{DiagnosticKind, ProviderDiagnostic, SearchResponse};
