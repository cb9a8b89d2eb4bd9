//! # Provider Integrations
//!
//! Adapters and clients for third-party flight providers.
//!
//! ## Supported Providers
//!
//! - **FlyHub**: [`FlyHubAdapter`], `AirSearch`
//! - **BDFare**: [`BdFareAdapter`], `AirShopping`
//!
//! ## Layers
//!
//! - [`ProviderAdapter`]: canonical model to wire JSON and back
//! - [`ProviderClient`]: token, HTTP and retry around an adapter
//! - [`ProviderRegistry`]: what the aggregation engine dispatches to

pub mod bdfare;
pub mod client;
pub mod error;
pub mod flyhub;
pub mod http_client;
pub mod normalizer;
pub mod registry;
pub mod traits;

pub use bdfare::BdFareAdapter;
pub use client::ProviderClient;
pub use error::{
    ProtocolError, ProviderError, ProviderFailure, ProviderResult, TransportError, TransportResult,
};
pub use flyhub::FlyHubAdapter;
pub use http_client::HttpClient;
pub use registry::ProviderRegistry;
pub use traits::{FlightProvider, ProviderAdapter, ProviderKind};
