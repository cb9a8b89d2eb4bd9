//! # Provider Client
//!
//! Runs one provider search end to end: token, wire request, HTTP call
//! under retry, normalization.
//!
//! A 401 or 403 from the search endpoint drops the cached token so the next
//! search starts with a fresh one.

use crate::domain::entities::{Offer, SearchRequest};
use crate::domain::value_objects::ProviderId;
use crate::infrastructure::auth::TokenCache;
use crate::infrastructure::providers::error::{ProviderError, ProviderResult, TransportError};
use crate::infrastructure::providers::http_client::HttpClient;
use crate::infrastructure::providers::traits::{FlightProvider, ProviderAdapter, ProviderKind};
use crate::infrastructure::retry::RetryExecutor;
use async_trait::async_trait;
use std::sync::Arc;

/// A searchable provider backed by HTTP.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    provider_id: ProviderId,
    base_url: String,
    adapter: Arc<dyn ProviderAdapter>,
    http: HttpClient,
    tokens: Arc<TokenCache>,
    retry: RetryExecutor,
}

impl ProviderClient {
    /// Creates a client.
    ///
    /// The token cache must already hold credentials for `provider_id`.
    #[must_use]
    pub fn new(
        provider_id: ProviderId,
        base_url: impl Into<String>,
        adapter: Arc<dyn ProviderAdapter>,
        http: HttpClient,
        tokens: Arc<TokenCache>,
        retry: RetryExecutor,
    ) -> Self {
        Self {
            provider_id,
            base_url: base_url.into(),
            adapter,
            http,
            tokens,
            retry,
        }
    }

    /// Returns the full search endpoint URL.
    #[must_use]
    pub fn search_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.adapter.search_path().trim_start_matches('/')
        )
    }

    async fn post_search(
        &self,
        url: &str,
        body: &serde_json::Value,
        token: &str,
    ) -> Result<serde_json::Value, TransportError> {
        let result = self.http.post_json(url, body, Some(token)).await;
        if let Err(e) = &result {
            if e.is_unauthorized() {
                self.tokens.invalidate(&self.provider_id);
            }
        }
        result
    }
}

#[async_trait]
impl FlightProvider for ProviderClient {
    fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }

    fn kind(&self) -> ProviderKind {
        self.adapter.kind()
    }

    async fn search_offers(&self, request: &SearchRequest) -> ProviderResult<Vec<Offer>> {
        let id = &self.provider_id;

        let token = self
            .tokens
            .get_token(id)
            .await
            .map_err(|e| ProviderError::new(id.clone(), e))?;
        let body = self
            .adapter
            .to_wire_request(request)
            .map_err(|e| ProviderError::new(id.clone(), e))?;
        let url = self.search_url();

        let (url, body, access_token) = (url.as_str(), &body, token.access_token());
        let response = self
            .retry
            .execute(|| async move { self.post_search(url, body, access_token).await })
            .await
            .map_err(|e| ProviderError::new(id.clone(), e))?;

        let offers = self
            .adapter
            .from_wire_response(id, response)
            .map_err(|e| ProviderError::new(id.clone(), e))?;

        tracing::debug!(provider_id = %id, offers = offers.len(), "provider search completed");
        Ok(offers)
    }
}
