//! # Provider Errors
//!
//! Error types for provider calls.
//!
//! - [`TransportError`]: one failed HTTP exchange (timeout, connection,
//!   status, body)
//! - [`ProtocolError`]: a body that does not match the provider's wire format
//! - [`ProviderFailure`] / [`ProviderError`]: the terminal failure of one
//!   provider within a search
//!
//! # Examples
//!
//! ```
//! use flight_aggregator::infrastructure::providers::error::TransportError;
//!
//! let error = TransportError::timeout("request timed out after 5000ms");
//! assert!(error.is_retryable());
//!
//! let error = TransportError::http_status(401, "bad token");
//! assert!(error.is_unauthorized());
//! assert!(!error.is_retryable());
//! ```

use crate::domain::value_objects::ProviderId;
use crate::infrastructure::auth::AuthenticationError;
use crate::infrastructure::retry::RetryExhaustedError;
use thiserror::Error;

/// Error type for a single HTTP exchange with a provider.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Request timed out.
    #[error("provider timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
    },

    /// Network or connection error.
    #[error("provider connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("provider rate limit exceeded: {message}")]
    RateLimited {
        /// Error message.
        message: String,
        /// Retry after duration in milliseconds.
        retry_after_ms: Option<u64>,
    },

    /// Non-success HTTP status.
    #[error("provider returned HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// Response body could not be decoded.
    #[error("provider protocol error: {message}")]
    Protocol {
        /// Error message.
        message: String,
    },

    /// Local failure before anything was sent.
    #[error("provider internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl TransportError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a rate limited error.
    #[must_use]
    pub fn rate_limited(message: impl Into<String>, retry_after_ms: Option<u64>) -> Self {
        Self::RateLimited {
            message: message.into(),
            retry_after_ms,
        }
    }

    /// Creates an HTTP status error.
    #[must_use]
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Creates a protocol error.
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns the HTTP status carried by this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    /// Returns true if the provider rejected the credentials (401 or 403).
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// Returns true if this error is transient.
    ///
    /// The retry executor retries every failure; this classification is
    /// reported in logs and diagnostics.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Connection { .. } | Self::RateLimited { .. } => true,
            Self::HttpStatus { status, .. } => *status >= 500,
            Self::Protocol { .. } | Self::Internal { .. } => false,
        }
    }

    /// Returns the retry delay in milliseconds, if the provider sent one.
    #[must_use]
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after_ms, .. } => *retry_after_ms,
            _ => None,
        }
    }
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// A provider body that does not match its wire format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProtocolError {
    message: String,
}

impl ProtocolError {
    /// Creates a protocol error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<serde_json::Error> for ProtocolError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(format!("malformed provider payload: {error}"))
    }
}

/// Why a provider contributed no offers.
#[derive(Debug, Error)]
pub enum ProviderFailure {
    /// Token could not be obtained.
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),

    /// Every search attempt failed.
    #[error(transparent)]
    RetryExhausted(#[from] RetryExhaustedError<TransportError>),

    /// Search succeeded but the body could not be normalized.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Provider id is not registered.
    #[error("provider is not configured")]
    NotConfigured,

    /// Provider task ended without a result.
    #[error("provider task aborted: {0}")]
    Aborted(String),
}

impl ProviderFailure {
    /// Returns a short machine-readable code for the failure.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Authentication(_) => "AUTHENTICATION",
            Self::RetryExhausted(_) => "RETRY_EXHAUSTED",
            Self::Protocol(_) => "PROTOCOL",
            Self::NotConfigured => "NOT_CONFIGURED",
            Self::Aborted(_) => "ABORTED",
        }
    }
}

/// The terminal failure of one provider within a search.
#[derive(Debug, Error)]
#[error("provider {provider_id} failed: {cause}")]
pub struct ProviderError {
    provider_id: ProviderId,
    #[source]
    cause: ProviderFailure,
}

impl ProviderError {
    /// Creates a provider error.
    #[must_use]
    pub fn new(provider_id: ProviderId, cause: impl Into<ProviderFailure>) -> Self {
        Self {
            provider_id,
            cause: cause.into(),
        }
    }

    /// Creates an error for a provider id that is not registered.
    #[must_use]
    pub fn not_configured(provider_id: ProviderId) -> Self {
        Self::new(provider_id, ProviderFailure::NotConfigured)
    }

    /// Returns the failing provider.
    #[inline]
    #[must_use]
    pub fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }

    /// Returns the failure cause.
    #[inline]
    #[must_use]
    pub fn cause(&self) -> &ProviderFailure {
        &self.cause
    }
}

/// Result type for provider searches.
pub type ProviderResult<T> = Result<T, ProviderError>;
