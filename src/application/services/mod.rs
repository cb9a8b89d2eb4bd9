//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! This module provides application-level services including:
//! - [`AggregationEngine`]: Concurrent offer collection and merging
//! - [`RankingStrategy`]: Strategies for ordering merged offers

pub mod aggregation;
pub mod ranking;

pub use aggregation::{AggregationConfig, AggregationEngine};
pub use ranking::{merge_batches, LowestFareStrategy, RankingStrategy};
