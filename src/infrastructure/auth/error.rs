//! # Authentication Errors

use crate::domain::value_objects::ProviderId;
use thiserror::Error;

/// A provider token could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("authentication with {provider_id} failed: {message}")]
pub struct AuthenticationError {
    provider_id: ProviderId,
    status: Option<u16>,
    message: String,
}

impl AuthenticationError {
    /// Creates an authentication error.
    #[must_use]
    pub fn new(provider_id: ProviderId, status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            provider_id,
            status,
            message: message.into(),
        }
    }

    /// Creates an error for a provider without registered credentials.
    #[must_use]
    pub fn unknown_provider(provider_id: ProviderId) -> Self {
        Self::new(provider_id, None, "no credentials registered")
    }

    /// Returns the provider.
    #[inline]
    #[must_use]
    pub fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }

    /// Returns the token endpoint status, if a response was received.
    #[inline]
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Returns the error message.
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
