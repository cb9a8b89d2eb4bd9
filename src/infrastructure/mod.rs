//! # Infrastructure Layer
//!
//! Adapters to the outside world.
//!
//! - [`auth`]: OAuth2 token cache
//! - [`retry`]: backoff-with-jitter retry executor
//! - [`providers`]: provider adapters, HTTP client and registry
//! - [`config`]: layered application configuration
//! - [`logging`]: tracing subscriber setup

pub mod auth;
pub mod config;
pub mod logging;
pub mod providers;
pub mod retry;
