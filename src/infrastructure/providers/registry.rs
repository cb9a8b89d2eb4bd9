//! # Provider Registry
//!
//! The set of searchable providers, in registration order.
//!
//! Built once at startup from configuration and shared read-only by the
//! aggregation engine.

use crate::domain::value_objects::ProviderId;
use crate::infrastructure::auth::{OAuth2TokenSource, TokenCache};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::providers::client::ProviderClient;
use crate::infrastructure::providers::error::TransportResult;
use crate::infrastructure::providers::http_client::HttpClient;
use crate::infrastructure::providers::traits::FlightProvider;
use crate::infrastructure::retry::RetryExecutor;
use std::sync::Arc;

/// Registered providers keyed by id.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn FlightProvider>>,
}

impl ProviderRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds one HTTP-backed client per configured provider.
    ///
    /// All clients share one HTTP connection pool and one token cache.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> TransportResult<Self> {
        let http = HttpClient::new(config.http.timeout_ms)?;
        let tokens = Arc::new(TokenCache::new(Arc::new(OAuth2TokenSource::new(
            http.clone(),
        ))));
        let retry = RetryExecutor::new(config.retry.policy());

        let mut registry = Self::new();
        for provider in &config.providers {
            let id = provider.provider_id();
            tokens.register(id.clone(), provider.credentials());
            let client = ProviderClient::new(
                id.clone(),
                provider.base_url.clone(),
                provider.kind.adapter(provider.search_path.as_deref()),
                http.clone(),
                Arc::clone(&tokens),
                retry.clone(),
            );
            tracing::info!(
                provider_id = %id,
                kind = %provider.kind,
                search_url = %client.search_url(),
                "provider registered"
            );
            registry.register(Arc::new(client));
        }
        Ok(registry)
    }

    /// Registers a provider, replacing one with the same id.
    pub fn register(&mut self, provider: Arc<dyn FlightProvider>) {
        match self
            .providers
            .iter_mut()
            .find(|p| p.provider_id() == provider.provider_id())
        {
            Some(existing) => *existing = provider,
            None => self.providers.push(provider),
        }
    }

    /// Registers a provider, builder style.
    #[must_use]
    pub fn with(mut self, provider: Arc<dyn FlightProvider>) -> Self {
        self.register(provider);
        self
    }

    /// Returns the provider with the given id.
    #[must_use]
    pub fn get(&self, id: &ProviderId) -> Option<Arc<dyn FlightProvider>> {
        self.providers
            .iter()
            .find(|p| p.provider_id() == id)
            .map(Arc::clone)
    }

    /// Returns all provider ids in registration order.
    #[must_use]
    pub fn ids(&self) -> Vec<ProviderId> {
        self.providers
            .iter()
            .map(|p| p.provider_id().clone())
            .collect()
    }

    /// Returns all providers in registration order.
    #[must_use]
    pub fn providers(&self) -> &[Arc<dyn FlightProvider>] {
        &self.providers
    }

    /// Returns the number of providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true if no provider is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
