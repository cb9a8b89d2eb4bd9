//! # REST API
//!
//! REST endpoints using axum.
//!
//! # Endpoints
//!
//! ## Flights
//! - `POST /api/v1/flights/search` - Aggregated search across providers
//! - `POST /api/v1/flights/verify-price` - Validated, answers 501
//! - `POST /api/v1/flights/create-booking` - Validated, answers 501
//! - `GET /api/v1/flights/{booking_id}` - Answers 501
//! - `DELETE /api/v1/flights/{booking_id}` - Validated, answers 501
//!
//! ## Health
//! - `GET /api/v1/health` - Liveness and configured providers
//!
//! # Usage
//!
//! ```ignore
//! use flight_aggregator::api::rest::{create_router, AppState};
//! use std::sync::Arc;
//!
//! let state = Arc::new(AppState::new(Arc::new(engine)));
//! let router = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    ApiError, AppState, CancelBookingParams, CreateBookingBody, ErrorResponse, HealthResponse,
    ProviderInfo, SearchRequestBody, SegmentBody, VerifyPriceBody,
};
pub use routes::create_router;
