//! # OAuth2 Token Source
//!
//! Client-credentials grant against a provider token endpoint.
//!
//! The request is a form post with `grant_type=client_credentials`,
//! `client_id` and `client_secret`. The endpoint answers with JSON holding
//! `access_token`, `expires_in` (seconds) and optionally `token_type`.

use crate::domain::value_objects::ProviderId;
use crate::infrastructure::auth::error::AuthenticationError;
use crate::infrastructure::auth::token_cache::{ProviderCredentials, TokenSource};
use crate::infrastructure::providers::http_client::HttpClient;
use async_trait::async_trait;
use serde::Deserialize;

/// Token endpoint response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    /// The access token.
    pub access_token: String,
    /// Lifetime in seconds.
    pub expires_in: u64,
    /// Token type, `Bearer` when absent.
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Fetches tokens with the OAuth2 client-credentials grant.
#[derive(Debug, Clone)]
pub struct OAuth2TokenSource {
    http: HttpClient,
}

impl OAuth2TokenSource {
    /// Creates a token source using `http` for requests.
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl TokenSource for OAuth2TokenSource {
    async fn fetch_token(
        &self,
        provider_id: &ProviderId,
        credentials: &ProviderCredentials,
    ) -> Result<TokenResponse, AuthenticationError> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
        ];

        let response: TokenResponse = self
            .http
            .post_form(&credentials.token_url, &form)
            .await
            .map_err(|e| {
                tracing::warn!(provider_id = %provider_id, error = %e, "token request failed");
                AuthenticationError::new(provider_id.clone(), e.status(), e.to_string())
            })?;

        if response.access_token.trim().is_empty() {
            return Err(AuthenticationError::new(
                provider_id.clone(),
                None,
                "token endpoint returned an empty access token",
            ));
        }
        Ok(response)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::auth::token_cache::TokenCache;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{body_string, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials(server: &MockServer) -> ProviderCredentials {
        ProviderCredentials {
            token_url: format!("{}/oauth/token", server.uri()),
            client_id: "client".to_string(),
            client_secret: "s3cret".to_string(),
        }
    }

    fn source() -> OAuth2TokenSource {
        OAuth2TokenSource::new(HttpClient::new(2000).unwrap())
    }

    #[tokio::test]
    async fn posts_client_credentials_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(body_string(
                "grant_type=client_credentials&client_id=client&client_secret=s3cret",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "test_access_token",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let token = source()
            .fetch_token(&ProviderId::new("flyhub"), &credentials(&server))
            .await
            .unwrap();
        assert_eq!(token.access_token, "test_access_token");
        assert_eq!(token.expires_in, 3600);
        assert_eq!(token.token_type, None);
    }

    #[tokio::test]
    async fn rejected_credentials_carry_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
            .mount(&server)
            .await;

        let err = source()
            .fetch_token(&ProviderId::new("flyhub"), &credentials(&server))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert!(err.message().contains("invalid_client"));
    }

    #[tokio::test]
    async fn expired_token_is_refreshed_through_cache() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "initial_token",
                "expires_in": 0
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "refreshed_token",
                "expires_in": 3600
            })))
            .mount(&server)
            .await;

        let cache = TokenCache::new(Arc::new(source()));
        let id = ProviderId::new("flyhub");
        cache.register(id.clone(), credentials(&server));

        assert_eq!(cache.get_token(&id).await.unwrap().access_token(), "initial_token");
        assert_eq!(cache.get_token(&id).await.unwrap().access_token(), "refreshed_token");
        assert_eq!(cache.get_token(&id).await.unwrap().access_token(), "refreshed_token");
    }
}
