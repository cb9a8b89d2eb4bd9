//! # Offer Ranking
//!
//! Orders merged offers for presentation.
//!
//! Provider batches are concatenated in provider request order first, then
//! ranked with a stable sort, so offers that compare equal keep the order
//! in which their providers were requested.

use crate::domain::entities::Offer;
use std::fmt;

/// Trait for offer ranking strategies.
pub trait RankingStrategy: Send + Sync + fmt::Debug {
    /// Ranks offers best first.
    ///
    /// Implementations must be stable: offers that compare equal keep their
    /// input order.
    fn rank(&self, offers: Vec<Offer>) -> Vec<Offer>;

    /// Returns the name of this ranking strategy.
    fn name(&self) -> &'static str;
}

/// Lowest total fare first.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowestFareStrategy;

impl LowestFareStrategy {
    /// Creates a new lowest fare strategy.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl RankingStrategy for LowestFareStrategy {
    fn rank(&self, mut offers: Vec<Offer>) -> Vec<Offer> {
        offers.sort_by_key(Offer::total_fare);
        offers
    }

    fn name(&self) -> &'static str {
        "LowestFare"
    }
}

/// Concatenates per-provider batches in the order given.
#[must_use]
pub fn merge_batches(batches: Vec<Vec<Offer>>) -> Vec<Offer> {
    let total = batches.iter().map(Vec::len).sum();
    batches
        .into_iter()
        .fold(Vec::with_capacity(total), |mut merged, batch| {
            merged.extend(batch);
            merged
        })
}
