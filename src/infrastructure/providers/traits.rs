//! # Provider Traits
//!
//! Port definitions for provider integrations.
//!
//! - [`ProviderAdapter`]: pure translation between the canonical model and
//!   one provider's wire format. No I/O.
//! - [`FlightProvider`]: a callable provider that searches offers end to
//!   end. The aggregation engine only sees this trait.
//!
//! # Examples
//!
//! ```ignore
//! use flight_aggregator::infrastructure::providers::traits::ProviderKind;
//!
//! let adapter = ProviderKind::FlyHub.adapter(None);
//! let wire = adapter.to_wire_request(&request)?;
//! ```

use crate::domain::entities::{Offer, SearchRequest};
use crate::domain::value_objects::ProviderId;
use crate::infrastructure::providers::bdfare::BdFareAdapter;
use crate::infrastructure::providers::error::{ProtocolError, ProviderResult};
use crate::infrastructure::providers::flyhub::FlyHubAdapter;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Wire dialect spoken by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// FlyHub `AirSearch` API.
    FlyHub,
    /// BDFare `AirShopping` API.
    BdFare,
}

impl ProviderKind {
    /// Returns the adapter for this kind.
    ///
    /// `search_path` overrides the adapter's default search path.
    #[must_use]
    pub fn adapter(self, search_path: Option<&str>) -> Arc<dyn ProviderAdapter> {
        match self {
            Self::FlyHub => Arc::new(match search_path {
                Some(path) => FlyHubAdapter::with_search_path(path),
                None => FlyHubAdapter::new(),
            }),
            Self::BdFare => Arc::new(match search_path {
                Some(path) => BdFareAdapter::with_search_path(path),
                None => BdFareAdapter::new(),
            }),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FlyHub => write!(f, "flyhub"),
            Self::BdFare => write!(f, "bdfare"),
        }
    }
}

/// Translation between canonical requests/offers and one provider's JSON.
///
/// Implementations are stateless apart from their configuration and are
/// shared between concurrent searches.
pub trait ProviderAdapter: Send + Sync + fmt::Debug {
    /// Returns the dialect this adapter speaks.
    fn kind(&self) -> ProviderKind;

    /// Returns the search endpoint path, relative to the provider base URL.
    fn search_path(&self) -> &str;

    /// Builds the provider search body.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the body cannot be serialized.
    fn to_wire_request(&self, request: &SearchRequest) -> Result<serde_json::Value, ProtocolError>;

    /// Normalizes a provider search response into canonical offers.
    ///
    /// A response without a result list yields no offers.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the body does not match the wire format.
    fn from_wire_response(
        &self,
        provider_id: &ProviderId,
        body: serde_json::Value,
    ) -> Result<Vec<Offer>, ProtocolError>;
}

/// A provider that can be searched.
#[async_trait]
pub trait FlightProvider: Send + Sync + fmt::Debug {
    /// Returns the provider id.
    fn provider_id(&self) -> &ProviderId;

    /// Returns the provider's wire dialect.
    fn kind(&self) -> ProviderKind;

    /// Searches offers for the request.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` when no offers could be obtained: token
    /// failure, every attempt failing, or an unparseable body.
    async fn search_offers(&self, request: &SearchRequest) -> ProviderResult<Vec<Offer>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_serde_names() {
        assert_eq!(ProviderKind::FlyHub.to_string(), "flyhub");
        let kind: ProviderKind = serde_json::from_str("\"bdfare\"").unwrap_or(ProviderKind::FlyHub);
        assert_eq!(kind, ProviderKind::BdFare);
    }

    #[test]
    fn adapter_honors_search_path_override() {
        assert_eq!(ProviderKind::FlyHub.adapter(None).search_path(), "AirSearch");
        assert_eq!(ProviderKind::BdFare.adapter(None).search_path(), "AirShopping");
        assert_eq!(
            ProviderKind::BdFare.adapter(Some("v2/AirShopping")).search_path(),
            "v2/AirShopping"
        );
        assert_eq!(ProviderKind::FlyHub.adapter(None).kind(), ProviderKind::FlyHub);
    }
}
