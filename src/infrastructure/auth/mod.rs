//! # Provider Authentication
//!
//! OAuth2 access tokens for provider APIs.
//!
//! - [`TokenCache`]: per-provider token cache with coalesced refresh
//! - [`TokenSource`]: where fresh tokens come from
//! - [`OAuth2TokenSource`]: client-credentials grant over HTTP

pub mod error;
pub mod oauth2;
pub mod token_cache;

pub use error::AuthenticationError;
pub use oauth2::{OAuth2TokenSource, TokenResponse};
pub use token_cache::{AuthToken, ProviderCredentials, TokenCache, TokenSource};
