//! # Application Errors
//!
//! Error types for the application layer.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Validation(ValidationError)          - Request rejected before dispatch
//! ├── AllProvidersFailed(Vec<ProviderError>) - No provider produced a result
//! ├── NoProviders                          - Nothing registered to search
//! ├── Timeout { timeout_ms }               - Aggregate deadline exceeded
//! └── Configuration(String)                - Engine misconfigured
//! ```
//!
//! # Examples
//!
//! ```
//! use flight_aggregator::application::error::ApplicationError;
//!
//! let err = ApplicationError::validation("origin and destination cannot be the same");
//! assert!(err.is_validation());
//! assert!(!err.is_retryable());
//! ```

use crate::domain::errors::ValidationError;
use crate::infrastructure::providers::error::ProviderError;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Request validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Every requested provider failed.
    #[error("all providers failed: {}", summarize(.0))]
    AllProvidersFailed(Vec<ProviderError>),

    /// No provider is registered.
    #[error("no providers available")]
    NoProviders,

    /// The aggregate search deadline was exceeded.
    #[error("search timed out after {timeout_ms}ms")]
    Timeout {
        /// Configured deadline in milliseconds.
        timeout_ms: u64,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Creates a validation error with a single violation.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(ValidationError::single(message))
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(timeout_ms: u64) -> Self {
        Self::Timeout { timeout_ms }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Returns true if repeating the same search may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::AllProvidersFailed(_) | Self::Timeout { .. })
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns the provider failures, if every provider failed.
    #[must_use]
    pub fn provider_errors(&self) -> &[ProviderError] {
        match self {
            Self::AllProvidersFailed(errors) => errors,
            _ => &[],
        }
    }
}

fn summarize(errors: &[ProviderError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
