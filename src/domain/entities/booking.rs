//! # Booking Requests
//!
//! Request shapes for the steps after search: price verification, booking
//! creation and cancellation.
//!
//! Only the request shaping and validation live here; the upstream calls are
//! not implemented yet and the REST layer answers these with
//! `501 Not Implemented`.

use crate::domain::entities::passenger::{Passenger, validate_party};
use crate::domain::errors::{ValidationError, ValidationResult};
use crate::domain::value_objects::{OfferId, SearchId};
use serde::Serialize;

/// Request to re-price an offer before booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricingRequest {
    search_id: SearchId,
    offer_id: OfferId,
}

impl PricingRequest {
    /// Creates a pricing request.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the offer id is blank.
    pub fn new(search_id: SearchId, offer_id: impl Into<String>) -> ValidationResult<Self> {
        let offer_id = offer_id.into();
        if offer_id.trim().is_empty() {
            return Err(ValidationError::single("offer id is required"));
        }
        Ok(Self {
            search_id,
            offer_id: OfferId::new(offer_id.trim()),
        })
    }

    /// Returns the search the offer came from.
    #[must_use]
    pub fn search_id(&self) -> SearchId {
        self.search_id
    }

    /// Returns the offer to price.
    #[must_use]
    pub fn offer_id(&self) -> &OfferId {
        &self.offer_id
    }
}

/// Request to book an offer for a party of passengers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingRequest {
    offer_id: OfferId,
    passengers: Vec<Passenger>,
}

impl BookingRequest {
    /// Creates a booking request.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the offer id is blank, the party is empty
    /// or the party does not have exactly one lead passenger.
    pub fn new(offer_id: impl Into<String>, passengers: Vec<Passenger>) -> ValidationResult<Self> {
        let offer_id = offer_id.into();
        let mut errors = ValidationError::new();
        if offer_id.trim().is_empty() {
            errors.push("offer id is required");
        }
        if let Err(e) = validate_party(&passengers) {
            for violation in e.violations() {
                errors.push(violation.clone());
            }
        }
        errors.into_result()?;

        Ok(Self {
            offer_id: OfferId::new(offer_id.trim()),
            passengers,
        })
    }

    /// Returns the offer to book.
    #[must_use]
    pub fn offer_id(&self) -> &OfferId {
        &self.offer_id
    }

    /// Returns the passengers.
    #[must_use]
    pub fn passengers(&self) -> &[Passenger] {
        &self.passengers
    }
}

/// Request to cancel an existing booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CancelBookingRequest {
    booking_id: String,
    reason: Option<String>,
}

impl CancelBookingRequest {
    /// Creates a cancellation request.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the booking id is blank.
    pub fn new(booking_id: impl Into<String>, reason: Option<String>) -> ValidationResult<Self> {
        let booking_id = booking_id.into();
        if booking_id.trim().is_empty() {
            return Err(ValidationError::single("booking id is required"));
        }
        Ok(Self {
            booking_id: booking_id.trim().to_string(),
            reason,
        })
    }

    /// Returns the booking id.
    #[must_use]
    pub fn booking_id(&self) -> &str {
        &self.booking_id
    }

    /// Returns the cancellation reason.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::passenger::tests::passenger;
    use crate::domain::value_objects::PassengerType;

    #[test]
    fn booking_requires_offer_and_lead() {
        let err = BookingRequest::new(" ", vec![passenger(PassengerType::Adult, false)]).unwrap_err();
        assert!(err.contains("offer id is required"));
        assert!(err.contains("exactly one lead passenger is required"));
    }

    #[test]
    fn booking_accepts_valid_party() {
        let request = BookingRequest::new(
            "OF-1",
            vec![
                passenger(PassengerType::Adult, true),
                passenger(PassengerType::Child, false),
            ],
        )
        .unwrap();
        assert_eq!(request.offer_id().as_str(), "OF-1");
        assert_eq!(request.passengers().len(), 2);
    }

    #[test]
    fn pricing_rejects_blank_offer() {
        assert!(PricingRequest::new(SearchId::new_v4(), "").is_err());
    }

    #[test]
    fn cancel_trims_booking_id() {
        let request = CancelBookingRequest::new(" BK-9 ", None).unwrap();
        assert_eq!(request.booking_id(), "BK-9");
    }
}
