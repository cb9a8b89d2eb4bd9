//! # Airport Code
//!
//! Three-letter IATA location code.
//!
//! # Examples
//!
//! ```
//! use flight_aggregator::domain::value_objects::AirportCode;
//!
//! let dac = AirportCode::new("dac").unwrap();
//! assert_eq!(dac.as_str(), "DAC");
//! assert!(AirportCode::new("DHAKA").is_err());
//! ```

use crate::domain::errors::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validated IATA airport or city code.
///
/// # Invariants
///
/// - Exactly three ASCII letters
/// - Stored upper case
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AirportCode(String);

impl AirportCode {
    /// Creates an airport code, normalizing to upper case.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the code is not three ASCII letters.
    pub fn new(code: impl AsRef<str>) -> ValidationResult<Self> {
        let code = code.as_ref().trim();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(code.to_ascii_uppercase()))
        } else {
            Err(ValidationError::single(format!(
                "airport code '{code}' must be exactly 3 letters"
            )))
        }
    }

    /// Returns the code as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AirportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AirportCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AirportCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AirportCode> for String {
    fn from(code: AirportCode) -> Self {
        code.0
    }
}
