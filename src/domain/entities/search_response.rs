//! # Search Response
//!
//! The merged result of one aggregated search.
//!
//! Besides the fare-sorted offers, the response carries per-provider
//! diagnostics so callers can see which providers were left out of a partial
//! result and why.

use crate::domain::entities::offer::Offer;
use crate::domain::value_objects::{ProviderId, SearchId, Timestamp};
use serde::Serialize;
use std::fmt;

/// Why a provider's contribution is missing or incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The provider call failed and contributed no offers.
    Failed,
    /// Some offers were dropped because they were priced in another currency.
    CurrencyMismatch,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed => write!(f, "FAILED"),
            Self::CurrencyMismatch => write!(f, "CURRENCY_MISMATCH"),
        }
    }
}

/// A diagnostic entry for one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderDiagnostic {
    /// The provider concerned.
    pub provider_id: ProviderId,
    /// What happened.
    pub kind: DiagnosticKind,
    /// Human readable detail.
    pub message: String,
}

impl ProviderDiagnostic {
    /// Creates a diagnostic for a failed provider.
    #[must_use]
    pub fn failed(provider_id: ProviderId, message: impl Into<String>) -> Self {
        Self {
            provider_id,
            kind: DiagnosticKind::Failed,
            message: message.into(),
        }
    }

    /// Creates a diagnostic for offers dropped on currency.
    #[must_use]
    pub fn currency_mismatch(provider_id: ProviderId, message: impl Into<String>) -> Self {
        Self {
            provider_id,
            kind: DiagnosticKind::CurrencyMismatch,
            message: message.into(),
        }
    }
}

/// Aggregated search response.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    search_id: SearchId,
    offers: Vec<Offer>,
    currency: String,
    diagnostics: Vec<ProviderDiagnostic>,
    providers_queried: usize,
    providers_responded: usize,
    completed_at: Timestamp,
}

impl SearchResponse {
    /// Creates a response with a fresh search id.
    #[must_use]
    pub fn new(
        offers: Vec<Offer>,
        currency: impl Into<String>,
        diagnostics: Vec<ProviderDiagnostic>,
        providers_queried: usize,
        providers_responded: usize,
    ) -> Self {
        Self {
            search_id: SearchId::new_v4(),
            offers,
            currency: currency.into(),
            diagnostics,
            providers_queried,
            providers_responded,
            completed_at: Timestamp::now(),
        }
    }

    /// Returns the search id.
    #[inline]
    #[must_use]
    pub fn search_id(&self) -> SearchId {
        self.search_id
    }

    /// Returns the offers, cheapest first.
    #[inline]
    #[must_use]
    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    /// Consumes the response and returns the offers.
    #[must_use]
    pub fn into_offers(self) -> Vec<Offer> {
        self.offers
    }

    /// Returns the currency every offer is priced in.
    #[inline]
    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Returns per-provider diagnostics.
    #[inline]
    #[must_use]
    pub fn diagnostics(&self) -> &[ProviderDiagnostic] {
        &self.diagnostics
    }

    /// Returns the number of providers the search was sent to.
    #[inline]
    #[must_use]
    pub fn providers_queried(&self) -> usize {
        self.providers_queried
    }

    /// Returns the number of providers that answered successfully.
    #[inline]
    #[must_use]
    pub fn providers_responded(&self) -> usize {
        self.providers_responded
    }

    /// Returns true if at least one provider failed.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.providers_responded < self.providers_queried
    }

    /// Returns the cheapest offer, if any.
    #[must_use]
    pub fn cheapest(&self) -> Option<&Offer> {
        self.offers.first()
    }

    /// Returns when aggregation finished.
    #[inline]
    #[must_use]
    pub fn completed_at(&self) -> Timestamp {
        self.completed_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::offer::tests::test_offer;

    #[test]
    fn partial_when_a_provider_failed() {
        let response = SearchResponse::new(
            vec![test_offer("flyhub", "R1", 100)],
            "BDT",
            vec![ProviderDiagnostic::failed(ProviderId::new("bdfare"), "timeout")],
            2,
            1,
        );
        assert!(response.is_partial());
        assert_eq!(response.cheapest().map(|o| o.id().as_str()), Some("R1"));
        assert_eq!(response.diagnostics()[0].kind, DiagnosticKind::Failed);
    }

    #[test]
    fn serializes_diagnostic_kind_snake_case() {
        let diag = ProviderDiagnostic::currency_mismatch(ProviderId::new("bdfare"), "USD");
        let json = serde_json::to_value(&diag).unwrap_or_default();
        assert_eq!(json["kind"], "currency_mismatch");
    }
}
