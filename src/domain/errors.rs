//! # Domain Errors
//!
//! Validation failures for canonical entities.
//!
//! Entities are validated as a whole: every rule is checked and every
//! violation is reported, so a caller can fix a request in one round trip.
//!
//! # Examples
//!
//! ```
//! use flight_aggregator::domain::errors::ValidationError;
//!
//! let mut error = ValidationError::new();
//! error.push("origin and destination cannot be the same");
//! assert!(error.contains("origin and destination cannot be the same"));
//! ```

use serde::Serialize;
use thiserror::Error;

/// A canonical request failed validation.
///
/// Carries every rule violation found, in the order the rules were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error, Serialize)]
#[error("validation failed: {}", .violations.join("; "))]
pub struct ValidationError {
    violations: Vec<String>,
}

impl ValidationError {
    /// Creates an empty error to collect violations into.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an error with a single violation.
    #[must_use]
    pub fn single(violation: impl Into<String>) -> Self {
        Self {
            violations: vec![violation.into()],
        }
    }

    /// Records a violation.
    pub fn push(&mut self, violation: impl Into<String>) {
        self.violations.push(violation.into());
    }

    /// Records every violation of another error, prefixing each with `context`.
    pub fn absorb(&mut self, context: &str, other: ValidationError) {
        self.violations.extend(
            other
                .violations
                .into_iter()
                .map(|v| format!("{context}: {v}")),
        );
    }

    /// Returns the recorded violations.
    #[must_use]
    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    /// Returns true if a violation with exactly this text was recorded.
    #[must_use]
    pub fn contains(&self, violation: &str) -> bool {
        self.violations.iter().any(|v| v == violation)
    }

    /// Returns true if no violation has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Converts the collected violations into a result.
    ///
    /// # Errors
    ///
    /// Returns `self` if at least one violation was recorded.
    pub fn into_result(self) -> ValidationResult<()> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Result type for validated construction.
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_error_converts_to_ok() {
        assert!(ValidationError::new().into_result().is_ok());
    }

    #[test]
    fn collected_violations_convert_to_err() {
        let mut error = ValidationError::new();
        error.push("first");
        error.push("second");

        let err = error.into_result().unwrap_err();
        assert_eq!(err.violations(), ["first", "second"]);
        assert_eq!(err.to_string(), "validation failed: first; second");
    }

    #[test]
    fn absorb_prefixes_context() {
        let mut error = ValidationError::new();
        error.absorb("passenger 1", ValidationError::single("email is invalid"));
        assert!(error.contains("passenger 1: email is invalid"));
    }
}
