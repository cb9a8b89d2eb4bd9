//! # Flight Aggregator
//!
//! Aggregates flight offers from several third-party travel providers into a
//! single fare-sorted result list.
//!
//! The crate is layered the same way top to bottom:
//!
//! - [`domain`]: canonical search requests, passengers, offers and their
//!   validation rules
//! - [`application`]: the [`AggregationEngine`](application::services::AggregationEngine)
//!   that fans a search out to every provider and merges the results
//! - [`infrastructure`]: provider adapters, the HTTP transport, OAuth2 token
//!   caching, retry with backoff and configuration loading
//! - [`api`]: the axum REST surface
//!
//! # Example
//!
//! ```ignore
//! use flight_aggregator::application::services::{AggregationConfig, AggregationEngine};
//! use flight_aggregator::infrastructure::providers::ProviderRegistry;
//!
//! let engine = AggregationEngine::new(registry, AggregationConfig::default());
//! let response = engine.search(&request, &[]).await?;
//! for offer in response.offers() {
//!     println!("{} {}", offer.provider_id(), offer.price().total());
//! }
//! ```

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
