//! # Domain Layer
//!
//! Canonical, provider-independent flight search model.
//!
//! - [`value_objects`]: identifiers, airport codes, enumerations, timestamps
//! - [`entities`]: passengers, search requests, offers, booking requests
//! - [`errors`]: validation errors raised while constructing entities

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use errors::{ValidationError, ValidationResult};
