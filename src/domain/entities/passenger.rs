//! # Passenger Entity
//!
//! A traveller on a search or booking request.
//!
//! Passengers are built from plain [`PassengerDetails`] through
//! [`Passenger::new`], which checks every field and reports all violations at
//! once. A `Passenger` value is therefore always valid.
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use flight_aggregator::domain::entities::passenger::{Passenger, PassengerDetails};
//! use flight_aggregator::domain::value_objects::{Gender, PassengerType};
//!
//! let details = PassengerDetails {
//!     title: "Mr".to_string(),
//!     first_name: "John".to_string(),
//!     last_name: "Doe".to_string(),
//!     pax_type: PassengerType::Adult,
//!     date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
//!     gender: Gender::Male,
//!     address1: "123 Street".to_string(),
//!     address2: None,
//!     country_code: "BD".to_string(),
//!     nationality: "BD".to_string(),
//!     contact_number: "+8801712345678".to_string(),
//!     email: "john@example.com".to_string(),
//!     is_lead_passenger: true,
//!     passport: None,
//!     frequent_flyer: None,
//! };
//!
//! let passenger = Passenger::new(details).unwrap();
//! assert!(passenger.is_lead());
//! ```

use crate::domain::errors::{ValidationError, ValidationResult};
use crate::domain::value_objects::{Gender, PassengerType};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum length of first and last names.
pub const MIN_NAME_LENGTH: usize = 2;

/// Passport data attached to a passenger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassportDetails {
    /// Passport number.
    pub number: String,
    /// Expiry date.
    pub expiry_date: NaiveDate,
    /// Issuing nationality.
    pub nationality: String,
}

/// Frequent flyer membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequentFlyer {
    /// Two-character airline designator of the programme.
    pub airline: String,
    /// Membership number.
    pub number: String,
}

/// Unvalidated passenger input, as received at the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerDetails {
    /// Title (Mr, Mrs, Ms, Mstr, Miss).
    pub title: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Passenger type.
    pub pax_type: PassengerType,
    /// Date of birth.
    pub date_of_birth: NaiveDate,
    /// Gender.
    pub gender: Gender,
    /// First address line.
    pub address1: String,
    /// Second address line.
    #[serde(default)]
    pub address2: Option<String>,
    /// ISO 3166 alpha-2 country code.
    pub country_code: String,
    /// Nationality.
    pub nationality: String,
    /// Contact phone number.
    pub contact_number: String,
    /// Email address.
    pub email: String,
    /// Whether this passenger is the lead passenger.
    #[serde(default)]
    pub is_lead_passenger: bool,
    /// Optional passport data.
    #[serde(default)]
    pub passport: Option<PassportDetails>,
    /// Optional frequent flyer membership.
    #[serde(default)]
    pub frequent_flyer: Option<FrequentFlyer>,
}

/// A validated passenger.
///
/// # Invariants
///
/// - First and last name have at least [`MIN_NAME_LENGTH`] characters
/// - Email has a valid `local@domain.tld` shape
/// - Country code is two letters, stored upper case
/// - Date of birth is not in the future
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Passenger {
    title: String,
    first_name: String,
    last_name: String,
    pax_type: PassengerType,
    date_of_birth: NaiveDate,
    gender: Gender,
    address1: String,
    address2: Option<String>,
    country_code: String,
    nationality: String,
    contact_number: String,
    email: String,
    is_lead: bool,
    passport: Option<PassportDetails>,
    frequent_flyer: Option<FrequentFlyer>,
}

impl Passenger {
    /// Validates passenger details and creates a passenger.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` listing every field rule that failed.
    pub fn new(details: PassengerDetails) -> ValidationResult<Self> {
        let mut errors = ValidationError::new();

        if details.title.trim().is_empty() {
            errors.push("title is required");
        }
        if details.first_name.trim().chars().count() < MIN_NAME_LENGTH {
            errors.push(format!(
                "first name must be at least {MIN_NAME_LENGTH} characters"
            ));
        }
        if details.last_name.trim().chars().count() < MIN_NAME_LENGTH {
            errors.push(format!(
                "last name must be at least {MIN_NAME_LENGTH} characters"
            ));
        }
        if details.date_of_birth > Utc::now().date_naive() {
            errors.push("date of birth cannot be in the future");
        }
        if details.address1.trim().is_empty() {
            errors.push("address is required");
        }
        let country_code = details.country_code.trim();
        if country_code.len() != 2 || !country_code.chars().all(|c| c.is_ascii_alphabetic()) {
            errors.push("country code must be 2 letters");
        }
        if details.nationality.trim().is_empty() {
            errors.push("nationality is required");
        }
        if !is_valid_phone(details.contact_number.trim()) {
            errors.push("contact number is invalid");
        }
        if !is_valid_email(details.email.trim()) {
            errors.push("email is invalid");
        }
        if let Some(passport) = &details.passport {
            if passport.number.trim().is_empty() {
                errors.push("passport number is required when passport is given");
            }
            if passport.expiry_date <= details.date_of_birth {
                errors.push("passport expiry must be after date of birth");
            }
        }
        if let Some(ff) = &details.frequent_flyer {
            if ff.airline.trim().len() != 2 || ff.number.trim().is_empty() {
                errors.push("frequent flyer needs a 2-character airline and a number");
            }
        }

        errors.into_result()?;

        Ok(Self {
            title: details.title.trim().to_string(),
            first_name: details.first_name.trim().to_string(),
            last_name: details.last_name.trim().to_string(),
            pax_type: details.pax_type,
            date_of_birth: details.date_of_birth,
            gender: details.gender,
            address1: details.address1.trim().to_string(),
            address2: details.address2,
            country_code: country_code.to_ascii_uppercase(),
            nationality: details.nationality.trim().to_string(),
            contact_number: details.contact_number.trim().to_string(),
            email: details.email.trim().to_string(),
            is_lead: details.is_lead_passenger,
            passport: details.passport,
            frequent_flyer: details.frequent_flyer,
        })
    }

    /// Returns the title.
    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the given name.
    #[inline]
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Returns the family name.
    #[inline]
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Returns the passenger type.
    #[inline]
    #[must_use]
    pub fn pax_type(&self) -> PassengerType {
        self.pax_type
    }

    /// Returns the date of birth.
    #[inline]
    #[must_use]
    pub fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }

    /// Returns the gender.
    #[inline]
    #[must_use]
    pub fn gender(&self) -> Gender {
        self.gender
    }

    /// Returns the first address line.
    #[inline]
    #[must_use]
    pub fn address1(&self) -> &str {
        &self.address1
    }

    /// Returns the second address line.
    #[inline]
    #[must_use]
    pub fn address2(&self) -> Option<&str> {
        self.address2.as_deref()
    }

    /// Returns the upper-case country code.
    #[inline]
    #[must_use]
    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    /// Returns the nationality.
    #[inline]
    #[must_use]
    pub fn nationality(&self) -> &str {
        &self.nationality
    }

    /// Returns the contact number.
    #[inline]
    #[must_use]
    pub fn contact_number(&self) -> &str {
        &self.contact_number
    }

    /// Returns the email address.
    #[inline]
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns true for the lead passenger.
    #[inline]
    #[must_use]
    pub fn is_lead(&self) -> bool {
        self.is_lead
    }

    /// Returns passport data, if any.
    #[inline]
    #[must_use]
    pub fn passport(&self) -> Option<&PassportDetails> {
        self.passport.as_ref()
    }

    /// Returns frequent flyer data, if any.
    #[inline]
    #[must_use]
    pub fn frequent_flyer(&self) -> Option<&FrequentFlyer> {
        self.frequent_flyer.as_ref()
    }
}

impl fmt::Display for Passenger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({})",
            self.title, self.first_name, self.last_name, self.pax_type
        )
    }
}

/// Checks that a passenger list has at least one entry and exactly one lead.
///
/// # Errors
///
/// Returns `ValidationError` describing the lead-passenger rule violated.
pub fn validate_party(passengers: &[Passenger]) -> ValidationResult<()> {
    if passengers.is_empty() {
        return Err(ValidationError::single("at least one passenger is required"));
    }
    match passengers.iter().filter(|p| p.is_lead()).count() {
        1 => Ok(()),
        0 => Err(ValidationError::single("exactly one lead passenger is required")),
        _ => Err(ValidationError::single("only one lead passenger is allowed")),
    }
}

fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

fn is_valid_phone(number: &str) -> bool {
    let digits = number.strip_prefix('+').unwrap_or(number);
    (6..=20).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn details(pax_type: PassengerType, is_lead: bool) -> PassengerDetails {
        PassengerDetails {
            title: "Mr".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            pax_type,
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            gender: Gender::Male,
            address1: "123 Street".to_string(),
            address2: None,
            country_code: "bd".to_string(),
            nationality: "BD".to_string(),
            contact_number: "1234567890".to_string(),
            email: "john@example.com".to_string(),
            is_lead_passenger: is_lead,
            passport: None,
            frequent_flyer: None,
        }
    }

    pub(crate) fn passenger(pax_type: PassengerType, is_lead: bool) -> Passenger {
        Passenger::new(details(pax_type, is_lead)).unwrap()
    }

    #[test]
    fn valid_details_build_passenger() {
        let p = passenger(PassengerType::Adult, true);
        assert_eq!(p.country_code(), "BD");
        assert!(p.is_lead());
        assert_eq!(p.to_string(), "Mr John Doe (ADT)");
    }

    #[test]
    fn short_name_and_bad_email_are_both_reported() {
        let mut d = details(PassengerType::Adult, true);
        d.first_name = "J".to_string();
        d.email = "invalid-email".to_string();

        let err = Passenger::new(d).unwrap_err();
        assert!(err.contains("first name must be at least 2 characters"));
        assert!(err.contains("email is invalid"));
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a.b@mail.example.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@@example.com"));
        assert!(!is_valid_email("a b@example.com"));
        assert!(!is_valid_email("a@example..com"));
    }

    #[test]
    fn phone_shapes() {
        assert!(is_valid_phone("+8801712345678"));
        assert!(!is_valid_phone("12-34"));
        assert!(!is_valid_phone("+"));
    }

    #[test]
    fn passport_expiry_checked() {
        let mut d = details(PassengerType::Adult, true);
        d.passport = Some(PassportDetails {
            number: "A1234567".to_string(),
            expiry_date: NaiveDate::from_ymd_opt(1980, 1, 1).unwrap(),
            nationality: "BD".to_string(),
        });
        let err = Passenger::new(d).unwrap_err();
        assert!(err.contains("passport expiry must be after date of birth"));
    }

    #[test]
    fn party_requires_exactly_one_lead() {
        let none = vec![passenger(PassengerType::Adult, false)];
        assert!(validate_party(&none).is_err());

        let two = vec![
            passenger(PassengerType::Adult, true),
            passenger(PassengerType::Adult, true),
        ];
        assert!(
            validate_party(&two)
                .unwrap_err()
                .contains("only one lead passenger is allowed")
        );

        assert!(validate_party(&[]).is_err());
        assert!(validate_party(&[passenger(PassengerType::Adult, true)]).is_ok());
    }
}
