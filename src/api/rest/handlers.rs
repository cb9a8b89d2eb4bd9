//! # REST Handlers
//!
//! Request bodies, response bodies and handler functions for the flight
//! endpoints.
//!
//! Handlers translate JSON into canonical domain types, which validates
//! them, and hand searches to the [`AggregationEngine`]. Errors leave as
//! [`ErrorResponse`] bodies with a status chosen by [`ApiError`].

use crate::application::error::ApplicationError;
use crate::application::services::AggregationEngine;
use crate::domain::entities::{
    BookingRequest, CancelBookingRequest, Passenger, PassengerDetails, PricingRequest,
    SearchRequest, SearchResponse,
};
use crate::domain::errors::ValidationError;
use crate::domain::value_objects::{CabinClass, ProviderId, SearchId, TripType};
use crate::infrastructure::providers::traits::ProviderKind;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Shared state for all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Aggregation engine used for searches.
    pub engine: Arc<AggregationEngine>,
}

impl AppState {
    /// Creates handler state.
    #[must_use]
    pub fn new(engine: Arc<AggregationEngine>) -> Self {
        Self { engine }
    }
}

// ============================================================================
// Request bodies
// ============================================================================

/// One multi-city leg.
#[derive(Debug, Clone, Deserialize)]
pub struct SegmentBody {
    /// Origin airport code.
    pub origin: String,
    /// Destination airport code.
    pub destination: String,
    /// Departure date.
    pub departure_date: NaiveDate,
}

/// Parses with the enum's `FromStr`, falling back to its default.
fn parse_or_default<T>(raw: &str) -> T
where
    T: FromStr + Default,
    T::Err: fmt::Display,
{
    raw.parse().unwrap_or_else(|err: T::Err| {
        tracing::debug!(value = raw, error = %err, "unrecognised value, using default");
        T::default()
    })
}

fn lenient_enum<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
    T::Err: fmt::Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map_or_else(T::default, |raw| parse_or_default(&raw)))
}

fn lenient_optional_enum<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
    T::Err: fmt::Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map(|raw| parse_or_default(&raw)))
}

/// Body of `POST /api/v1/flights/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequestBody {
    /// Origin airport code.
    pub origin: String,
    /// Destination airport code.
    pub destination: String,
    /// Outbound date.
    pub departure_date: NaiveDate,
    /// Inbound date for round trips.
    #[serde(default)]
    pub return_date: Option<NaiveDate>,
    /// Cabin class, economy when omitted or unrecognised.
    #[serde(default, deserialize_with = "lenient_enum")]
    pub cabin_class: CabinClass,
    /// Explicit trip type, one-way when unrecognised.
    #[serde(default, deserialize_with = "lenient_optional_enum")]
    pub trip_type: Option<TripType>,
    /// Travelling party.
    pub passengers: Vec<PassengerDetails>,
    /// Multi-city legs.
    #[serde(default)]
    pub segments: Vec<SegmentBody>,
    /// Preferred airline designators.
    #[serde(default)]
    pub preferred_airlines: Vec<String>,
    /// End user's IP address.
    #[serde(default)]
    pub end_user_ip: Option<String>,
    /// Providers to search; all when empty.
    #[serde(default)]
    pub providers: Vec<String>,
}

impl SearchRequestBody {
    /// Validates the body into a canonical request and provider selection.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` with every passenger and request violation.
    pub fn into_domain(self) -> Result<(SearchRequest, Vec<ProviderId>), ValidationError> {
        let (passengers, mut errors) = validate_passengers(self.passengers);

        let mut builder = SearchRequest::builder(
            self.origin,
            self.destination,
            self.departure_date,
            self.cabin_class,
        )
        .passengers(passengers);
        if let Some(date) = self.return_date {
            builder = builder.return_date(date);
        }
        if let Some(trip_type) = self.trip_type {
            builder = builder.trip_type(trip_type);
        }
        for segment in self.segments {
            builder = builder.segment(segment.origin, segment.destination, segment.departure_date);
        }
        for airline in self.preferred_airlines {
            builder = builder.preferred_airline(airline);
        }
        if let Some(ip) = self.end_user_ip {
            builder = builder.end_user_ip(ip);
        }

        let providers = self.providers.into_iter().map(ProviderId::new).collect();

        match builder.try_build() {
            Ok(request) if errors.is_empty() => Ok((request, providers)),
            Ok(_) => Err(errors),
            Err(e) => {
                for violation in e.violations() {
                    errors.push(violation.clone());
                }
                Err(errors)
            }
        }
    }
}

/// Body of `POST /api/v1/flights/verify-price`.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyPriceBody {
    /// Search the offer came from.
    pub search_id: SearchId,
    /// Offer to re-price.
    pub offer_id: String,
}

/// Body of `POST /api/v1/flights/create-booking`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingBody {
    /// Offer to book.
    pub offer_id: String,
    /// Travelling party.
    pub passengers: Vec<PassengerDetails>,
}

impl CreateBookingBody {
    /// Validates the body into a booking request.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` with every passenger and party violation.
    pub fn into_domain(self) -> Result<BookingRequest, ValidationError> {
        let (passengers, mut errors) = validate_passengers(self.passengers);
        match BookingRequest::new(self.offer_id, passengers) {
            Ok(request) if errors.is_empty() => Ok(request),
            Ok(_) => Err(errors),
            Err(e) => {
                for violation in e.violations() {
                    errors.push(violation.clone());
                }
                Err(errors)
            }
        }
    }
}

/// Query string of `DELETE /api/v1/flights/{booking_id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CancelBookingParams {
    /// Optional cancellation reason.
    #[serde(default)]
    pub reason: Option<String>,
}

fn validate_passengers(details: Vec<PassengerDetails>) -> (Vec<Passenger>, ValidationError) {
    let mut errors = ValidationError::new();
    let mut passengers = Vec::with_capacity(details.len());
    for (index, detail) in details.into_iter().enumerate() {
        match Passenger::new(detail) {
            Ok(passenger) => passengers.push(passenger),
            Err(e) => errors.absorb(&format!("passenger {}", index + 1), e),
        }
    }
    (passengers, errors)
}

// ============================================================================
// Response bodies
// ============================================================================

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Summary of what went wrong.
    pub error: String,
    /// Individual violations or provider failures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl ErrorResponse {
    /// Creates an error body without details.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Vec::new(),
        }
    }

    /// Attaches details.
    #[must_use]
    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }
}

/// A configured provider, as reported by the health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider id.
    pub id: ProviderId,
    /// Wire dialect.
    pub kind: ProviderKind,
}

/// Body of `GET /api/v1/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the server answers.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Configured providers in registration order.
    pub providers: Vec<ProviderInfo>,
}

// ============================================================================
// Errors
// ============================================================================

/// Error returned by handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Body could not be parsed.
    MalformedBody(String),
    /// Domain validation failed.
    Validation(ValidationError),
    /// Search failed.
    Application(ApplicationError),
    /// Endpoint shape is accepted but not implemented.
    NotImplemented(ErrorResponse),
}

impl From<ApplicationError> for ApiError {
    fn from(error: ApplicationError) -> Self {
        match error {
            ApplicationError::Validation(e) => Self::Validation(e),
            other => Self::Application(other),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        Self::Validation(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedBody(rejection.body_text())
    }
}

impl ApiError {
    /// Returns the HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedBody(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            Self::Application(e) => match e {
                ApplicationError::Validation(_) => StatusCode::BAD_REQUEST,
                ApplicationError::AllProvidersFailed(_) => StatusCode::BAD_GATEWAY,
                ApplicationError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                ApplicationError::NoProviders => StatusCode::SERVICE_UNAVAILABLE,
                ApplicationError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn into_body(self) -> ErrorResponse {
        match self {
            Self::MalformedBody(message) => {
                ErrorResponse::new("malformed request body").with_details(vec![message])
            }
            Self::Validation(e) => {
                ErrorResponse::new("validation failed").with_details(e.violations().to_vec())
            }
            Self::NotImplemented(body) => body,
            Self::Application(e) => {
                let details = e
                    .provider_errors()
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                ErrorResponse::new(e.to_string()).with_details(details)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED {
            tracing::error!(status = status.as_u16(), error = ?self, "request failed");
        }
        (status, Json(self.into_body())).into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// `POST /api/v1/flights/search`
///
/// # Errors
///
/// 400 on a malformed or invalid body, 502 when every provider failed,
/// 504 on the aggregate deadline and 503 when no provider is configured.
pub async fn search_flights(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SearchRequestBody>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(body) = body?;
    let (request, providers) = body.into_domain()?;
    let response = state.engine.search(&request, &providers).await?;
    Ok(Json(response))
}

/// `POST /api/v1/flights/verify-price`
///
/// # Errors
///
/// 400 on an invalid body, otherwise 501.
pub async fn verify_price(
    body: Result<Json<VerifyPriceBody>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(body) = body?;
    let request = PricingRequest::new(body.search_id, body.offer_id)?;
    Err(ApiError::NotImplemented(
        ErrorResponse::new("price verification is not implemented")
            .with_details(vec![format!("offer_id: {}", request.offer_id())]),
    ))
}

/// `POST /api/v1/flights/create-booking`
///
/// # Errors
///
/// 400 on an invalid body, otherwise 501.
pub async fn create_booking(
    body: Result<Json<CreateBookingBody>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(body) = body?;
    let request = body.into_domain()?;
    Err(ApiError::NotImplemented(
        ErrorResponse::new("booking creation is not implemented").with_details(vec![
            format!("offer_id: {}", request.offer_id()),
            format!("passengers: {}", request.passengers().len()),
        ]),
    ))
}

/// `GET /api/v1/flights/{booking_id}`
///
/// # Errors
///
/// Always 501.
pub async fn get_booking(Path(booking_id): Path<String>) -> Result<StatusCode, ApiError> {
    Err(ApiError::NotImplemented(
        ErrorResponse::new("booking retrieval is not implemented")
            .with_details(vec![format!("booking_id: {}", booking_id.trim())]),
    ))
}

/// `DELETE /api/v1/flights/{booking_id}`
///
/// # Errors
///
/// 400 on a blank booking id, otherwise 501.
pub async fn cancel_booking(
    Path(booking_id): Path<String>,
    Query(params): Query<CancelBookingParams>,
) -> Result<StatusCode, ApiError> {
    let request = CancelBookingRequest::new(booking_id, params.reason)?;
    Err(ApiError::NotImplemented(
        ErrorResponse::new("booking cancellation is not implemented")
            .with_details(vec![format!("booking_id: {}", request.booking_id())]),
    ))
}

/// `GET /api/v1/health`
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let providers = state
        .engine
        .registry()
        .providers()
        .iter()
        .map(|p| ProviderInfo {
            id: p.provider_id().clone(),
            kind: p.kind(),
        })
        .collect();

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        providers,
    })
}
