//! # Domain Enums
//!
//! Enumeration types for the canonical flight model.
//!
//! - [`CabinClass`] - Economy, premium economy, business or first
//! - [`TripType`] - One-way, round trip or multi-city
//! - [`PassengerType`] - Adult, child or infant
//! - [`Gender`] - Passenger gender as required by airline APIs
//!
//! All enums implement `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`,
//! `Display`, `FromStr`, and Serde traits. Serde uses `snake_case` names,
//! matching the public REST API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cabin class requested for a search or reported on a segment.
///
/// # Examples
///
/// ```
/// use flight_aggregator::domain::value_objects::enums::CabinClass;
///
/// assert_eq!("premium_economy".parse::<CabinClass>().unwrap(), CabinClass::PremiumEconomy);
/// assert_eq!(CabinClass::Business.to_string(), "BUSINESS");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CabinClass {
    /// Economy cabin, the baseline every provider supports.
    #[default]
    Economy,
    /// Premium economy cabin.
    PremiumEconomy,
    /// Business cabin.
    Business,
    /// First class cabin.
    First,
}

impl fmt::Display for CabinClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Economy => write!(f, "ECONOMY"),
            Self::PremiumEconomy => write!(f, "PREMIUM_ECONOMY"),
            Self::Business => write!(f, "BUSINESS"),
            Self::First => write!(f, "FIRST"),
        }
    }
}

impl FromStr for CabinClass {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace(['-', ' '], "_").as_str() {
            "ECONOMY" | "Y" => Ok(Self::Economy),
            "PREMIUM_ECONOMY" | "PREMIUMECONOMY" | "W" => Ok(Self::PremiumEconomy),
            "BUSINESS" | "C" => Ok(Self::Business),
            "FIRST" | "F" => Ok(Self::First),
            _ => Err(ParseEnumError::InvalidValue("CabinClass", s.to_string())),
        }
    }
}

/// Itinerary shape of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripType {
    /// Single outbound journey.
    #[default]
    OneWay,
    /// Outbound and return journey.
    RoundTrip,
    /// Several ordered legs.
    MultiCity,
}

impl fmt::Display for TripType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OneWay => write!(f, "ONE_WAY"),
            Self::RoundTrip => write!(f, "ROUND_TRIP"),
            Self::MultiCity => write!(f, "MULTI_CITY"),
        }
    }
}

impl FromStr for TripType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace(['-', ' '], "_").as_str() {
            "ONE_WAY" | "ONEWAY" => Ok(Self::OneWay),
            "ROUND_TRIP" | "ROUNDTRIP" | "RETURN" => Ok(Self::RoundTrip),
            "MULTI_CITY" | "MULTICITY" => Ok(Self::MultiCity),
            _ => Err(ParseEnumError::InvalidValue("TripType", s.to_string())),
        }
    }
}

/// Passenger type code.
///
/// # Examples
///
/// ```
/// use flight_aggregator::domain::value_objects::enums::PassengerType;
///
/// assert_eq!(PassengerType::Child.ptc(), "CHD");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassengerType {
    /// Adult passenger.
    #[serde(alias = "ADT")]
    Adult,
    /// Child passenger.
    #[serde(alias = "CHD")]
    Child,
    /// Infant passenger, travelling on an adult's lap.
    #[serde(alias = "INF")]
    Infant,
}

impl PassengerType {
    /// Returns the IATA passenger type code (`ADT`, `CHD`, `INF`).
    #[inline]
    #[must_use]
    pub const fn ptc(self) -> &'static str {
        match self {
            Self::Adult => "ADT",
            Self::Child => "CHD",
            Self::Infant => "INF",
        }
    }
}

impl fmt::Display for PassengerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ptc())
    }
}

impl FromStr for PassengerType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ADT" | "ADULT" => Ok(Self::Adult),
            "CHD" | "CHILD" => Ok(Self::Child),
            "INF" | "INFANT" => Ok(Self::Infant),
            _ => Err(ParseEnumError::InvalidValue("PassengerType", s.to_string())),
        }
    }
}

/// Passenger gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Male.
    #[serde(alias = "M")]
    Male,
    /// Female.
    #[serde(alias = "F")]
    Female,
}

impl Gender {
    /// Returns the single-letter code used by airline systems.
    #[inline]
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Gender {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "M" | "MALE" => Ok(Self::Male),
            "F" | "FEMALE" => Ok(Self::Female),
            _ => Err(ParseEnumError::InvalidValue("Gender", s.to_string())),
        }
    }
}

/// Error type for parsing enum values from strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEnumError {
    /// The provided string value is not valid for the enum.
    InvalidValue(&'static str, String),
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue(enum_name, value) => {
                write!(f, "invalid {} value: '{}'", enum_name, value)
            }
        }
    }
}

impl std::error::Error for ParseEnumError {}
