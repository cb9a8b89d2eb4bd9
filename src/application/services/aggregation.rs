//! # Aggregation Engine
//!
//! Fans one search out to every requested provider and merges the results.
//!
//! Each provider runs in its own task on a [`JoinSet`]. A failing or
//! panicking provider is recorded as a [`ProviderError`] and never affects
//! its siblings. The search only fails outright when every requested
//! provider failed or the overall deadline passed.
//!
//! Offers are concatenated in provider request order and then ranked with a
//! stable sort, so equal fares keep provider order. Offers priced in a
//! currency other than the engine's base currency are dropped and reported
//! as diagnostics.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::ranking::{merge_batches, LowestFareStrategy, RankingStrategy};
use crate::domain::entities::{Offer, ProviderDiagnostic, SearchRequest, SearchResponse};
use crate::domain::value_objects::ProviderId;
use crate::infrastructure::providers::error::{ProviderError, ProviderFailure, ProviderResult};
use crate::infrastructure::providers::registry::ProviderRegistry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::timeout;

/// Configuration for offer aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationConfig {
    /// Overall deadline for one search in milliseconds.
    pub timeout_ms: u64,
    /// Currency every returned offer must be priced in.
    pub base_currency: String,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 60_000,
            base_currency: "BDT".to_string(),
        }
    }
}

impl AggregationConfig {
    /// Creates a new configuration with the specified overall timeout.
    #[must_use]
    pub fn with_timeout(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            ..Default::default()
        }
    }

    /// Sets the base currency.
    #[must_use]
    pub fn with_base_currency(mut self, currency: impl Into<String>) -> Self {
        self.base_currency = currency.into().to_ascii_uppercase();
        self
    }
}

/// Engine for collecting and ranking offers from multiple providers.
#[derive(Debug)]
pub struct AggregationEngine {
    registry: ProviderRegistry,
    ranking_strategy: Arc<dyn RankingStrategy>,
    config: AggregationConfig,
}

impl AggregationEngine {
    /// Creates an engine ranking by lowest fare.
    #[must_use]
    pub fn new(registry: ProviderRegistry, config: AggregationConfig) -> Self {
        Self {
            registry,
            ranking_strategy: Arc::new(LowestFareStrategy::new()),
            config,
        }
    }

    /// Replaces the ranking strategy.
    #[must_use]
    pub fn with_ranking_strategy(mut self, strategy: Arc<dyn RankingStrategy>) -> Self {
        self.ranking_strategy = strategy;
        self
    }

    /// Searches the requested providers and merges their offers.
    ///
    /// An empty `provider_ids` slice searches every registered provider.
    /// Duplicate ids are searched once. Ids with no registered provider are
    /// reported as `NotConfigured` failures.
    ///
    /// # Errors
    ///
    /// - `NoProviders` if nothing is registered
    /// - `AllProvidersFailed` if no requested provider returned offers
    /// - `Timeout` if the overall deadline passed; in-flight calls are
    ///   aborted
    pub async fn search(
        &self,
        request: &SearchRequest,
        provider_ids: &[ProviderId],
    ) -> ApplicationResult<SearchResponse> {
        if self.registry.is_empty() {
            return Err(ApplicationError::NoProviders);
        }

        let requested = self.resolve(provider_ids);
        let providers_queried = requested.len();

        let deadline = Duration::from_millis(self.config.timeout_ms);
        let outcomes = timeout(deadline, self.dispatch(request, &requested))
            .await
            .map_err(|_| {
                tracing::warn!(
                    timeout_ms = self.config.timeout_ms,
                    providers = providers_queried,
                    "search timed out"
                );
                ApplicationError::timeout(self.config.timeout_ms)
            })?;

        let mut batches = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        let mut diagnostics = Vec::new();

        for outcome in outcomes {
            match outcome {
                Ok(offers) => {
                    let (kept, dropped) = self.split_by_currency(offers);
                    if let Some(diagnostic) = dropped {
                        diagnostics.push(diagnostic);
                    }
                    batches.push(kept);
                }
                Err(error) => {
                    tracing::warn!(
                        provider_id = %error.provider_id(),
                        code = error.cause().code(),
                        error = %error,
                        "provider failed"
                    );
                    diagnostics.push(ProviderDiagnostic::failed(
                        error.provider_id().clone(),
                        error.cause().to_string(),
                    ));
                    failures.push(error);
                }
            }
        }

        if batches.is_empty() {
            return Err(ApplicationError::AllProvidersFailed(failures));
        }

        let providers_responded = batches.len();
        let offers = self.ranking_strategy.rank(merge_batches(batches));

        tracing::info!(
            route = %request,
            providers_queried,
            providers_responded,
            offers = offers.len(),
            "search completed"
        );

        Ok(SearchResponse::new(
            offers,
            self.config.base_currency.clone(),
            diagnostics,
            providers_queried,
            providers_responded,
        ))
    }

    /// Returns the requested ids, deduplicated, or every registered id.
    fn resolve(&self, provider_ids: &[ProviderId]) -> Vec<ProviderId> {
        if provider_ids.is_empty() {
            return self.registry.ids();
        }
        let mut requested: Vec<ProviderId> = Vec::with_capacity(provider_ids.len());
        for id in provider_ids {
            if !requested.contains(id) {
                requested.push(id.clone());
            }
        }
        requested
    }

    /// Runs one task per provider and returns outcomes in request order.
    async fn dispatch(
        &self,
        request: &SearchRequest,
        requested: &[ProviderId],
    ) -> Vec<ProviderResult<Vec<Offer>>> {
        let request = Arc::new(request.clone());
        let mut outcomes: Vec<Option<ProviderResult<Vec<Offer>>>> =
            requested.iter().map(|_| None).collect();
        let mut tasks = JoinSet::new();
        let mut task_index = HashMap::with_capacity(requested.len());

        for (index, id) in requested.iter().enumerate() {
            match self.registry.get(id) {
                Some(provider) => {
                    let request = Arc::clone(&request);
                    let handle =
                        tasks.spawn(async move { provider.search_offers(&request).await });
                    task_index.insert(handle.id(), index);
                }
                None => {
                    if let Some(slot) = outcomes.get_mut(index) {
                        *slot = Some(Err(ProviderError::not_configured(id.clone())));
                    }
                }
            }
        }

        while let Some(joined) = tasks.join_next_with_id().await {
            let (task_id, result) = match joined {
                Ok((task_id, result)) => (task_id, result),
                Err(join_error) => {
                    let task_id = join_error.id();
                    let Some(id) = task_index
                        .get(&task_id)
                        .and_then(|&index| requested.get(index))
                    else {
                        continue;
                    };
                    let reason = if join_error.is_panic() {
                        "provider task panicked"
                    } else {
                        "provider task was cancelled"
                    };
                    (
                        task_id,
                        Err(ProviderError::new(
                            id.clone(),
                            ProviderFailure::Aborted(reason.to_string()),
                        )),
                    )
                }
            };
            if let Some(slot) = task_index
                .get(&task_id)
                .and_then(|&index| outcomes.get_mut(index))
            {
                *slot = Some(result);
            }
        }

        outcomes
            .into_iter()
            .zip(requested)
            .map(|(outcome, id)| {
                outcome.unwrap_or_else(|| {
                    Err(ProviderError::new(
                        id.clone(),
                        ProviderFailure::Aborted("provider task produced no result".to_string()),
                    ))
                })
            })
            .collect()
    }

    /// Keeps offers in the base currency and describes the rest.
    fn split_by_currency(&self, offers: Vec<Offer>) -> (Vec<Offer>, Option<ProviderDiagnostic>) {
        let base = &self.config.base_currency;
        let (kept, dropped): (Vec<Offer>, Vec<Offer>) = offers
            .into_iter()
            .partition(|offer| offer.price().currency().eq_ignore_ascii_case(base));

        let Some(first) = dropped.first() else {
            return (kept, None);
        };

        let mut currencies: Vec<&str> = dropped.iter().map(|o| o.price().currency()).collect();
        currencies.sort_unstable();
        currencies.dedup();

        tracing::warn!(
            provider_id = %first.provider_id(),
            dropped = dropped.len(),
            base_currency = %base,
            "offers dropped on currency"
        );

        let diagnostic = ProviderDiagnostic::currency_mismatch(
            first.provider_id().clone(),
            format!(
                "{} offers priced in {} dropped, expected {}",
                dropped.len(),
                currencies.join(", "),
                base
            ),
        );
        (kept, Some(diagnostic))
    }

    /// Returns the current configuration.
    #[must_use]
    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// Returns the registered providers.
    #[must_use]
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Returns the ranking strategy name.
    #[must_use]
    pub fn ranking_strategy_name(&self) -> &'static str {
        self.ranking_strategy.name()
    }
}
