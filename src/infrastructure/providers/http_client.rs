//! # HTTP Client Utilities
//!
//! Shared HTTP client for provider adapters and the token source.
//!
//! This module provides a reusable HTTP client wrapper with:
//! - Configurable timeouts
//! - JSON and form request bodies
//! - Bearer authentication
//! - Mapping of reqwest failures and HTTP statuses to [`TransportError`]
//!
//! Retrying is not done here; callers wrap requests in a
//! [`RetryExecutor`](crate::infrastructure::retry::RetryExecutor).
//!
//! # Examples
//!
//! ```ignore
//! use flight_aggregator::infrastructure::providers::http_client::HttpClient;
//!
//! let client = HttpClient::new(5000)?;
//! let body: serde_json::Value = client.post_json(url, &request, Some(token)).await?;
//! ```

use crate::infrastructure::providers::error::{TransportError, TransportResult};
use reqwest::{Client, Response, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client wrapper for provider calls.
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// Inner reqwest client.
    client: Client,
    /// Request timeout in milliseconds.
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a new HTTP client with the specified timeout.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Internal` if the client cannot be created.
    pub fn new(timeout_ms: u64) -> TransportResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| TransportError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout_ms })
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Makes a POST request with a JSON body and deserializes the JSON response.
    ///
    /// When `bearer` is given it is sent as `Authorization: Bearer <token>`.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Timeout` or `TransportError::Connection` if
    /// the request fails, `TransportError::HttpStatus` or
    /// `TransportError::RateLimited` for non-success statuses, and
    /// `TransportError::Protocol` if the response cannot be parsed.
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        bearer: Option<&str>,
    ) -> TransportResult<T> {
        let mut request = self
            .client
            .post(url)
            .header(header::ACCEPT, "application/json")
            .json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(map_reqwest_error)?;
        handle_response(response).await
    }

    /// Makes a POST request with a URL-encoded form body and deserializes the
    /// JSON response.
    ///
    /// # Errors
    ///
    /// Same as [`HttpClient::post_json`].
    pub async fn post_form<T: DeserializeOwned, F: Serialize + ?Sized>(
        &self,
        url: &str,
        form: &F,
    ) -> TransportResult<T> {
        let response = self
            .client
            .post(url)
            .header(header::ACCEPT, "application/json")
            .form(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        handle_response(response).await
    }
}

/// Handles the HTTP response, checking status and deserializing JSON.
async fn handle_response<T: DeserializeOwned>(response: Response) -> TransportResult<T> {
    let status = response.status();

    if status.is_success() {
        response
            .json::<T>()
            .await
            .map_err(|e| TransportError::protocol(format!("Failed to parse response: {}", e)))
    } else {
        let retry_after_ms = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(|secs| secs.saturating_mul(1000));
        let error_body = response.text().await.unwrap_or_default();
        Err(map_status_error(status, error_body, retry_after_ms))
    }
}

/// Maps a reqwest error to a TransportError.
fn map_reqwest_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::timeout("Request timed out")
    } else if error.is_connect() {
        TransportError::connection(format!("Connection failed: {}", error))
    } else {
        TransportError::connection(format!("HTTP request failed: {}", error))
    }
}

/// Maps an HTTP status code to a TransportError.
fn map_status_error(status: StatusCode, body: String, retry_after_ms: Option<u64>) -> TransportError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => TransportError::rate_limited(
            if body.is_empty() {
                "Rate limit exceeded".to_string()
            } else {
                body
            },
            retry_after_ms,
        ),
        _ => TransportError::http_status(status.as_u16(), body),
    }
}
