//! # Token Cache
//!
//! Caches one access token per provider and refreshes it on expiry.
//!
//! Each provider has a slot holding the current token, a refresh lock and a
//! refresh generation counter. A caller that finds no usable token records
//! the generation, then takes the refresh lock. If the generation moved while
//! it waited, another caller has just refreshed and that token is returned
//! without a second fetch. Concurrent callers therefore share one refresh,
//! even for tokens that expire immediately.
//!
//! Token reads never wait on a refresh in progress for another provider.

use crate::domain::value_objects::{ProviderId, Timestamp};
use crate::infrastructure::auth::error::AuthenticationError;
use crate::infrastructure::auth::oauth2::TokenResponse;
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Credentials for a provider's token endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderCredentials {
    /// Absolute URL of the token endpoint.
    pub token_url: String,
    /// OAuth2 client id.
    pub client_id: String,
    /// OAuth2 client secret.
    pub client_secret: String,
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

/// A cached access token.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken {
    provider_id: ProviderId,
    access_token: String,
    token_type: String,
    expires_at: Timestamp,
}

impl AuthToken {
    /// Creates a token.
    #[must_use]
    pub fn new(
        provider_id: ProviderId,
        access_token: impl Into<String>,
        token_type: impl Into<String>,
        expires_at: Timestamp,
    ) -> Self {
        Self {
            provider_id,
            access_token: access_token.into(),
            token_type: token_type.into(),
            expires_at,
        }
    }

    /// Returns the provider the token belongs to.
    #[inline]
    #[must_use]
    pub fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }

    /// Returns the access token value.
    #[inline]
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Returns the token type, usually `Bearer`.
    #[inline]
    #[must_use]
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Returns the absolute expiry.
    #[inline]
    #[must_use]
    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    /// Returns true if the token is expired at `now`.
    ///
    /// A token whose expiry equals `now` counts as expired.
    #[must_use]
    pub fn is_expired_at(&self, now: &Timestamp) -> bool {
        self.expires_at.has_passed_at(now)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("provider_id", &self.provider_id)
            .field("access_token", &"***")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Source of fresh tokens.
#[async_trait]
pub trait TokenSource: Send + Sync + fmt::Debug {
    /// Requests a new token for `provider_id`.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationError` if the token endpoint rejects the
    /// credentials or cannot be reached.
    async fn fetch_token(
        &self,
        provider_id: &ProviderId,
        credentials: &ProviderCredentials,
    ) -> Result<TokenResponse, AuthenticationError>;
}

#[derive(Debug)]
struct TokenSlot {
    credentials: ProviderCredentials,
    token: RwLock<Option<AuthToken>>,
    refresh: tokio::sync::Mutex<()>,
    generation: AtomicU64,
}

impl TokenSlot {
    fn new(credentials: ProviderCredentials) -> Self {
        Self {
            credentials,
            token: RwLock::new(None),
            refresh: tokio::sync::Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    /// Refresh generation paired with the cached token if still valid.
    ///
    /// The generation is read first: a refresh that lands after it makes the
    /// later comparison under the refresh lock see a newer generation.
    fn snapshot(&self, now: &Timestamp) -> (u64, Option<AuthToken>) {
        let generation = self.generation.load(Ordering::Acquire);
        (generation, self.valid_token(now))
    }

    fn valid_token(&self, now: &Timestamp) -> Option<AuthToken> {
        self.token
            .read()
            .as_ref()
            .filter(|t| !t.is_expired_at(now))
            .cloned()
    }
}

/// Per-provider access token cache.
#[derive(Debug)]
pub struct TokenCache {
    source: Arc<dyn TokenSource>,
    slots: DashMap<ProviderId, Arc<TokenSlot>>,
}

impl TokenCache {
    /// Creates an empty cache backed by `source`.
    #[must_use]
    pub fn new(source: Arc<dyn TokenSource>) -> Self {
        Self {
            source,
            slots: DashMap::new(),
        }
    }

    /// Registers credentials for a provider, dropping any cached token.
    pub fn register(&self, provider_id: ProviderId, credentials: ProviderCredentials) {
        self.slots
            .insert(provider_id, Arc::new(TokenSlot::new(credentials)));
    }

    /// Returns true if credentials are registered for the provider.
    #[must_use]
    pub fn is_registered(&self, provider_id: &ProviderId) -> bool {
        self.slots.contains_key(provider_id)
    }

    /// Returns a valid token for the provider, refreshing it if needed.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationError` if the provider has no credentials or
    /// the token source fails.
    pub async fn get_token(&self, provider_id: &ProviderId) -> Result<AuthToken, AuthenticationError> {
        let slot = self.slot(provider_id)?;

        let (observed, cached) = slot.snapshot(&Timestamp::now());
        if let Some(token) = cached {
            return Ok(token);
        }
        self.refresh(provider_id, &slot, observed).await
    }

    /// Refreshes the slot unless another caller already did so since
    /// generation `observed`.
    async fn refresh(
        &self,
        provider_id: &ProviderId,
        slot: &TokenSlot,
        observed: u64,
    ) -> Result<AuthToken, AuthenticationError> {
        let _guard = slot.refresh.lock().await;

        if slot.generation.load(Ordering::Acquire) != observed {
            if let Some(token) = slot.token.read().clone() {
                tracing::debug!(provider_id = %provider_id, "reusing concurrently refreshed token");
                return Ok(token);
            }
        }
        if let Some(token) = slot.valid_token(&Timestamp::now()) {
            return Ok(token);
        }

        tracing::debug!(provider_id = %provider_id, "refreshing access token");
        let response = self.source.fetch_token(provider_id, &slot.credentials).await?;
        let token = AuthToken::new(
            provider_id.clone(),
            response.access_token,
            response.token_type.unwrap_or_else(|| "Bearer".to_string()),
            Timestamp::now().add_secs(i64::try_from(response.expires_in).unwrap_or(i64::MAX)),
        );

        *slot.token.write() = Some(token.clone());
        slot.generation.fetch_add(1, Ordering::Release);
        tracing::debug!(
            provider_id = %provider_id,
            expires_in = response.expires_in,
            "access token refreshed"
        );
        Ok(token)
    }

    /// Drops the cached token so the next call refreshes.
    pub fn invalidate(&self, provider_id: &ProviderId) {
        if let Some(slot) = self.slots.get(provider_id) {
            *slot.token.write() = None;
            tracing::debug!(provider_id = %provider_id, "access token invalidated");
        }
    }

    /// Returns the cached token without refreshing, expired or not.
    #[must_use]
    pub fn cached(&self, provider_id: &ProviderId) -> Option<AuthToken> {
        self.slots
            .get(provider_id)
            .and_then(|slot| slot.token.read().clone())
    }

    fn slot(&self, provider_id: &ProviderId) -> Result<Arc<TokenSlot>, AuthenticationError> {
        self.slots
            .get(provider_id)
            .map(|slot| Arc::clone(slot.value()))
            .ok_or_else(|| AuthenticationError::unknown_provider(provider_id.clone()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;
    use std::time::Duration;

    #[derive(Debug)]
    struct CountingSource {
        calls: AtomicU32,
        expires_in: u64,
        delay: Duration,
    }

    impl CountingSource {
        fn new(expires_in: u64) -> Self {
            Self {
                calls: AtomicU32::new(0),
                expires_in,
                delay: Duration::ZERO,
            }
        }

        fn slow(expires_in: u64, delay: Duration) -> Self {
            Self {
                delay,
                ..Self::new(expires_in)
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TokenSource for CountingSource {
        async fn fetch_token(
            &self,
            _provider_id: &ProviderId,
            _credentials: &ProviderCredentials,
        ) -> Result<TokenResponse, AuthenticationError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            Ok(TokenResponse {
                access_token: format!("token-{n}"),
                expires_in: self.expires_in,
                token_type: None,
            })
        }
    }

    #[derive(Debug)]
    struct RejectingSource;

    #[async_trait]
    impl TokenSource for RejectingSource {
        async fn fetch_token(
            &self,
            provider_id: &ProviderId,
            _credentials: &ProviderCredentials,
        ) -> Result<TokenResponse, AuthenticationError> {
            Err(AuthenticationError::new(provider_id.clone(), Some(401), "invalid_client"))
        }
    }

    fn credentials() -> ProviderCredentials {
        ProviderCredentials {
            token_url: "http://localhost/token".to_string(),
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
        }
    }

    fn cache_with(source: Arc<CountingSource>) -> TokenCache {
        let cache = TokenCache::new(source);
        cache.register(ProviderId::new("flyhub"), credentials());
        cache
    }

    #[tokio::test]
    async fn valid_token_is_reused() {
        let source = Arc::new(CountingSource::new(3600));
        let cache = cache_with(Arc::clone(&source));
        let id = ProviderId::new("flyhub");

        let first = cache.get_token(&id).await.unwrap();
        let second = cache.get_token(&id).await.unwrap();

        assert_eq!(first.access_token(), "token-1");
        assert_eq!(second.access_token(), "token-1");
        assert_eq!(first.token_type(), "Bearer");
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn zero_lifetime_token_refreshes_on_next_call() {
        let source = Arc::new(CountingSource::new(0));
        let cache = cache_with(Arc::clone(&source));
        let id = ProviderId::new("flyhub");

        cache.get_token(&id).await.unwrap();
        let second = cache.get_token(&id).await.unwrap();

        assert_eq!(second.access_token(), "token-2");
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_refresh() {
        let source = Arc::new(CountingSource::slow(0, Duration::from_millis(20)));
        let cache = Arc::new(cache_with(Arc::clone(&source)));
        let id = ProviderId::new("flyhub");

        let calls = (0..8).map(|_| {
            let cache = Arc::clone(&cache);
            let id = id.clone();
            async move { cache.get_token(&id).await }
        });
        let tokens = futures::future::join_all(calls).await;

        assert_eq!(source.calls(), 1);
        for token in tokens {
            assert_eq!(token.unwrap().access_token(), "token-1");
        }
    }

    #[tokio::test]
    async fn refresh_after_stale_snapshot_reuses_newer_token() {
        let source = Arc::new(CountingSource::new(0));
        let cache = cache_with(Arc::clone(&source));
        let id = ProviderId::new("flyhub");
        let slot = cache.slot(&id).unwrap();

        let (observed, cached) = slot.snapshot(&Timestamp::now());
        assert_eq!(observed, 0);
        assert!(cached.is_none());

        // Another caller refreshes between the snapshot and the lock.
        cache.get_token(&id).await.unwrap();

        let token = cache.refresh(&id, &slot, observed).await.unwrap();
        assert_eq!(token.access_token(), "token-1");
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_refresh() {
        let source = Arc::new(CountingSource::new(3600));
        let cache = cache_with(Arc::clone(&source));
        let id = ProviderId::new("flyhub");

        cache.get_token(&id).await.unwrap();
        cache.invalidate(&id);
        assert!(cache.cached(&id).is_none());

        let token = cache.get_token(&id).await.unwrap();
        assert_eq!(token.access_token(), "token-2");
    }

    #[tokio::test]
    async fn unknown_provider_is_rejected_without_status() {
        let cache = TokenCache::new(Arc::new(CountingSource::new(3600)));
        let err = cache.get_token(&ProviderId::new("sabre")).await.unwrap_err();
        assert_eq!(err.status(), None);
        assert_eq!(err.provider_id().as_str(), "sabre");
    }

    #[tokio::test]
    async fn source_failure_is_propagated_and_not_cached() {
        let cache = TokenCache::new(Arc::new(RejectingSource));
        let id = ProviderId::new("bdfare");
        cache.register(id.clone(), credentials());

        let err = cache.get_token(&id).await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert!(cache.cached(&id).is_none());
    }

    #[test]
    fn debug_redacts_secrets() {
        let token = AuthToken::new(ProviderId::new("flyhub"), "s3cr3t", "Bearer", Timestamp::now());
        assert!(!format!("{token:?}").contains("s3cr3t"));
        assert!(!format!("{:?}", credentials()).contains("secret\""));
    }
}
