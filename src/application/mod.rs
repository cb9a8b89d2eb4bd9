//! # Application Layer
//!
//! Use-case orchestration on top of the domain and infrastructure layers.
//!
//! - [`services::AggregationEngine`]: concurrent provider search and merge
//! - [`error::ApplicationError`]: failures surfaced to the API layer

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
