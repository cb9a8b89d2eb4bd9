//! # Application Configuration
//!
//! Layered configuration for the service.
//!
//! Sources, later ones winning:
//!
//! 1. `config/default.toml` (or the file passed with `--config`), optional
//! 2. Environment variables prefixed `FLIGHTS`, nested with `__`, e.g.
//!    `FLIGHTS__SERVER__PORT=8080`
//! 3. Per-provider credentials from `FLIGHTS_<ID>_CLIENT_ID` and
//!    `FLIGHTS_<ID>_CLIENT_SECRET`, so secrets stay out of files
//!
//! A `.env` file is loaded into the environment by the binary before this
//! runs.

use crate::application::services::AggregationConfig;
use crate::domain::value_objects::ProviderId;
use crate::infrastructure::auth::ProviderCredentials;
use crate::infrastructure::providers::ProviderKind;
use crate::infrastructure::retry::RetryPolicy;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "FLIGHTS";

/// Configuration loading or validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// The configuration was read but is not usable.
    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Outbound HTTP settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_ms: 30_000 }
    }
}

/// Retry settings for provider searches.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Base backoff delay in milliseconds.
    pub base_delay_ms: u64,
    /// Upper bound of the random jitter in milliseconds.
    pub max_jitter_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1_000,
            max_jitter_ms: 1_000,
        }
    }
}

impl RetryConfig {
    /// Converts to a retry policy.
    #[must_use]
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries,
            Duration::from_millis(self.base_delay_ms),
            Duration::from_millis(self.max_jitter_ms),
        )
    }
}

/// Aggregation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AggregationSettings {
    /// Overall search timeout in milliseconds.
    pub timeout_ms: u64,
    /// Currency every returned offer must be priced in.
    pub base_currency: String,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 60_000,
            base_currency: "BDT".to_string(),
        }
    }
}

impl AggregationSettings {
    /// Converts to the engine configuration.
    #[must_use]
    pub fn engine_config(&self) -> AggregationConfig {
        AggregationConfig::with_timeout(self.timeout_ms).with_base_currency(self.base_currency.trim())
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// One configured provider.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderConfig {
    /// Provider id used in requests and responses.
    pub id: String,
    /// Wire dialect.
    pub kind: ProviderKind,
    /// Base URL the search path is appended to.
    pub base_url: String,
    /// OAuth2 token endpoint.
    pub token_url: String,
    /// OAuth2 client id.
    #[serde(default)]
    pub client_id: String,
    /// OAuth2 client secret.
    #[serde(default)]
    pub client_secret: String,
    /// Search path override.
    #[serde(default)]
    pub search_path: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("base_url", &self.base_url)
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("search_path", &self.search_path)
            .finish()
    }
}

impl ProviderConfig {
    /// Returns the provider id.
    #[must_use]
    pub fn provider_id(&self) -> ProviderId {
        ProviderId::new(self.id.clone())
    }

    /// Returns the token endpoint credentials.
    #[must_use]
    pub fn credentials(&self) -> ProviderCredentials {
        ProviderCredentials {
            token_url: self.token_url.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
        }
    }

    fn env_key(&self, suffix: &str) -> String {
        format!(
            "{ENV_PREFIX}_{}_{suffix}",
            self.id.to_ascii_uppercase().replace('-', "_")
        )
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener.
    pub server: ServerConfig,
    /// Outbound HTTP.
    pub http: HttpConfig,
    /// Retry policy.
    pub retry: RetryConfig,
    /// Aggregation.
    pub aggregation: AggregationSettings,
    /// Logging.
    pub logging: LoggingConfig,
    /// Providers, in dispatch order.
    pub providers: Vec<ProviderConfig>,
}

impl AppConfig {
    /// Loads configuration from the file and the environment.
    ///
    /// A missing file is not an error; defaults and environment apply.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` if a source is malformed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = path.map_or_else(
            || config::File::with_name(DEFAULT_CONFIG_PATH).required(false),
            |p| config::File::from(p).required(true),
        );

        let mut loaded: Self = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        loaded.apply_credential_overrides(|key| std::env::var(key).ok());
        Ok(loaded)
    }

    /// Replaces provider credentials with values from `lookup`, keyed
    /// `FLIGHTS_<ID>_CLIENT_ID` and `FLIGHTS_<ID>_CLIENT_SECRET`.
    pub fn apply_credential_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for provider in &mut self.providers {
            if let Some(client_id) = lookup(&provider.env_key("CLIENT_ID")) {
                provider.client_id = client_id;
            }
            if let Some(client_secret) = lookup(&provider.env_key("CLIENT_SECRET")) {
                provider.client_secret = client_secret;
            }
        }
    }

    /// Checks the configuration for problems that would only surface at
    /// request time.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` listing every problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if self.http.timeout_ms == 0 {
            problems.push("http.timeout_ms must be positive".to_string());
        }
        if self.aggregation.timeout_ms == 0 {
            problems.push("aggregation.timeout_ms must be positive".to_string());
        }
        let currency = self.aggregation.base_currency.trim();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            problems.push(format!(
                "aggregation.base_currency '{currency}' must be a 3-letter code"
            ));
        }

        let mut seen = HashSet::new();
        for provider in &self.providers {
            let id = provider.id.trim();
            if id.is_empty() {
                problems.push("provider id must not be empty".to_string());
            } else if !seen.insert(id) {
                problems.push(format!("provider id '{id}' is duplicated"));
            }
            if let Err(e) = validate_url(&provider.base_url) {
                problems.push(format!("provider '{id}' base_url {e}"));
            }
            if let Err(e) = validate_url(&provider.token_url) {
                problems.push(format!("provider '{id}' token_url {e}"));
            }
            if provider.client_id.trim().is_empty() || provider.client_secret.trim().is_empty() {
                problems.push(format!("provider '{id}' is missing client credentials"));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }
}

/// Checks that `url` is an absolute http(s) URL with a host.
///
/// # Errors
///
/// Returns a description of the problem.
pub fn validate_url(url: &str) -> Result<(), String> {
    let parsed = reqwest::Url::parse(url).map_err(|e| format!("'{url}' is not a valid URL: {e}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(format!("'{url}' must use http or https"));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(format!("'{url}' has no host"));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn provider(id: &str) -> ProviderConfig {
        ProviderConfig {
            id: id.to_string(),
            kind: ProviderKind::FlyHub,
            base_url: "http://api.sandbox.flyhub.com/api/v1/".to_string(),
            token_url: "http://api.sandbox.flyhub.com/api/v1/Authenticate".to_string(),
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            search_path: None,
        }
    }

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.retry.policy(), RetryPolicy::default());
        assert_eq!(config.aggregation.base_currency, "BDT");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn reports_every_problem() {
        let mut bad = provider("flyhub");
        bad.base_url = "ftp://example.com".to_string();
        bad.client_secret = String::new();
        let config = AppConfig {
            providers: vec![bad, provider("flyhub")],
            ..AppConfig::default()
        };

        match config.validate() {
            Err(ConfigError::Invalid(problems)) => {
                assert_eq!(problems.len(), 3);
                assert!(problems.iter().any(|p| p.contains("duplicated")));
                assert!(problems.iter().any(|p| p.contains("http or https")));
                assert!(problems.iter().any(|p| p.contains("missing client credentials")));
            }
            other => assert!(other.is_err(), "expected invalid config"),
        }
    }

    #[test]
    fn url_validation() {
        assert!(validate_url("https://bdf.centralindia.cloudapp.azure.com/api/enterprise/").is_ok());
        assert!(validate_url("not a url").is_err());
        assert!(validate_url("mailto:ops@example.com").is_err());
    }

    #[test]
    fn credential_overrides_use_provider_id() {
        let mut config = AppConfig {
            providers: vec![provider("bd-fare")],
            ..AppConfig::default()
        };
        let env: HashMap<&str, &str> = [("FLIGHTS_BD_FARE_CLIENT_SECRET", "from-env")].into();

        config.apply_credential_overrides(|key| env.get(key).map(|v| (*v).to_string()));
        assert_eq!(config.providers[0].client_secret, "from-env");
        assert_eq!(config.providers[0].client_id, "id");
    }

    #[test]
    fn deserializes_provider_table() {
        let toml = r#"
            [aggregation]
            base_currency = "USD"

            [[providers]]
            id = "bdfare"
            kind = "bdfare"
            base_url = "https://bdf.example.com/api/enterprise/"
            token_url = "https://bdf.example.com/oauth/token"
        "#;
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.aggregation.base_currency, "USD");
        assert_eq!(config.aggregation.timeout_ms, 60_000);
        assert_eq!(config.providers[0].kind, ProviderKind::BdFare);
        assert!(config.providers[0].client_id.is_empty());
    }
}
