//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`ProviderId`], [`OfferId`]: string-based identifiers
//! - [`SearchId`]: UUID-based identifier
//!
//! ## Locations and Time
//!
//! - [`AirportCode`]: validated three-letter IATA code
//! - [`Timestamp`]: UTC instant
//!
//! ## Domain Enums
//!
//! - [`CabinClass`], [`TripType`], [`PassengerType`], [`Gender`]

pub mod airport_code;
pub mod enums;
pub mod ids;
pub mod timestamp;

pub use airport_code::AirportCode;
pub use enums::{CabinClass, Gender, ParseEnumError, PassengerType, TripType};
pub use ids::{OfferId, ProviderId, SearchId};
pub use timestamp::Timestamp;
