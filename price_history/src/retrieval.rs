//! Retrieval orchestration: cache fast path, rate-limit retry, stale
//! fallback.
//!
//! [`Retriever`] owns the [`HistoryCache`] and a [`HistoryProvider`] and
//! applies the failure-handling policy in one place:
//!
//! 1. A valid cache entry is served with no network call.
//! 2. On a rate limit, any cached entry (fresh or stale) is served
//!    immediately with a notice and no retry; with nothing cached, the fetch
//!    is retried a bounded number of times with a fixed delay.
//! 3. Any other fetch failure degrades to the cached entry if one exists,
//!    otherwise surfaces an error and an empty series.
//! 4. A successful fetch replaces the cache entry and clears the error.
//!
//! Consumers observe progress through a [`watch`] channel carrying
//! [`RetrievalStatus`]: each step publishes one complete status value, so
//! readers never see a half-updated loading/error/series combination, and
//! they await changes on whatever execution context they choose.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{
    cache::{CacheEntry, CacheKey, HistoryCache},
    errors::Error,
    models::{series::PriceSeries, timeframe::Timeframe},
    providers::{FetchError, HistoryProvider},
};

/// Extra attempts after the first rate-limited fetch.
const MAX_RETRIES: u32 = 3;
/// Fixed delay between rate-limit retries.
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Snapshot of a retrieval in progress, published as one value per step.
///
/// `error_message` doubles as the degraded-data notice: non-empty alongside
/// a non-empty series means a stale fallback is being shown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetrievalStatus {
    pub is_loading: bool,
    pub error_message: String,
    pub series: PriceSeries,
}

/// Orchestrates price-history retrieval over a provider and a cache.
///
/// One in-flight retrieval at a time (`&mut self`); retrievals for different
/// keys are independent, and dropping a pending `retrieve` future writes
/// nothing, so an abandoned fetch can never corrupt another key's entry.
pub struct Retriever<P> {
    provider: P,
    cache: HistoryCache,
    max_retries: u32,
    retry_delay: Duration,
    status_tx: watch::Sender<RetrievalStatus>,
}

impl<P: HistoryProvider> Retriever<P> {
    pub fn new(provider: P) -> Self {
        Self::with_retry_policy(provider, MAX_RETRIES, RETRY_DELAY)
    }

    /// Builds a retriever with an explicit retry bound and delay.
    pub fn with_retry_policy(provider: P, max_retries: u32, retry_delay: Duration) -> Self {
        let (status_tx, _) = watch::channel(RetrievalStatus::default());
        Self {
            provider,
            cache: HistoryCache::new(),
            max_retries,
            retry_delay,
            status_tx,
        }
    }

    /// Subscribes to status updates.
    ///
    /// The receiver observes every published [`RetrievalStatus`] from its
    /// own task, which is how completion notifications reach a consumer's
    /// designated execution context (a UI loop, for instance).
    pub fn subscribe(&self) -> watch::Receiver<RetrievalStatus> {
        self.status_tx.subscribe()
    }

    /// The most recently published status.
    pub fn status(&self) -> RetrievalStatus {
        self.status_tx.borrow().clone()
    }

    pub fn cache(&self) -> &HistoryCache {
        &self.cache
    }

    /// Mutable cache access, for seeding or manual maintenance such as
    /// [`HistoryCache::evict_expired`].
    pub fn cache_mut(&mut self) -> &mut HistoryCache {
        &mut self.cache
    }

    /// Retrieves the price series for `coin_id` over `timeframe`.
    ///
    /// Returns the series being displayed, which is fresh data on success
    /// and the cached entry on a handled failure; in the latter case the
    /// published `error_message` carries the degraded-data notice. Errors
    /// mean nothing could be served: the published series is empty and the
    /// message user-visible.
    pub async fn retrieve(
        &mut self,
        coin_id: &str,
        timeframe: Timeframe,
    ) -> Result<PriceSeries, Error> {
        let key = CacheKey::new(coin_id, timeframe);

        // Fast path: a valid entry is served without touching the network
        // or flipping the loading flag.
        if let Some(entry) = self.cache.get(&key)
            && entry.is_valid(timeframe, Utc::now())
        {
            debug!(coin_id, %timeframe, "cache hit");
            let series = PriceSeries::from_points(entry.points.clone());
            self.publish(false, String::new(), series.clone());
            return Ok(series);
        }

        // Keep showing the previous series while loading.
        let displayed = self.status_tx.borrow().series.clone();
        self.publish(true, String::new(), displayed);

        // Loop-local attempt counter: it starts at zero on every retrieval,
        // and only rate-limited attempts with an empty cache advance it.
        let mut attempt = 0u32;
        loop {
            // Providers must not return an empty Ok, but an entry with no
            // points must never reach the cache, so normalize it here.
            let result = self
                .provider
                .fetch_history(coin_id, timeframe)
                .await
                .and_then(|points| {
                    if points.is_empty() {
                        Err(FetchError::EmptyResult)
                    } else {
                        Ok(points)
                    }
                });

            match result {
                Ok(points) => {
                    let series = PriceSeries::from_points(points.clone());
                    self.cache.put(key, CacheEntry::new(points, Utc::now()));
                    self.publish(false, String::new(), series.clone());
                    return Ok(series);
                }

                Err(FetchError::RateLimited) => {
                    // Any cached entry, valid or expired, beats retrying.
                    if let Some(entry) = self.cache.get(&key) {
                        warn!(coin_id, %timeframe, "rate limited, serving cached data");
                        let series = PriceSeries::from_points(entry.points.clone());
                        self.publish(
                            false,
                            "Using cached data (Rate limit exceeded)".to_string(),
                            series.clone(),
                        );
                        return Ok(series);
                    }

                    if attempt < self.max_retries {
                        attempt += 1;
                        debug!(
                            coin_id,
                            %timeframe,
                            attempt,
                            max_retries = self.max_retries,
                            "rate limited with no cached data, retrying"
                        );
                        tokio::time::sleep(self.retry_delay).await;
                        continue;
                    }

                    let err = Error::RetriesExhausted {
                        attempts: self.max_retries,
                    };
                    warn!(coin_id, %timeframe, "rate limit retries exhausted");
                    self.publish(false, err.user_message(), PriceSeries::empty());
                    return Err(err);
                }

                Err(err) => {
                    if let Some(entry) = self.cache.get(&key) {
                        warn!(coin_id, %timeframe, error = %err, "fetch failed, serving cached data");
                        let series = PriceSeries::from_points(entry.points.clone());
                        self.publish(
                            false,
                            format!("Using cached data (Error: {})", err.user_message()),
                            series.clone(),
                        );
                        return Ok(series);
                    }

                    warn!(coin_id, %timeframe, error = %err, "fetch failed with no cached data");
                    self.publish(false, err.user_message(), PriceSeries::empty());
                    return Err(err.into());
                }
            }
        }
    }

    /// Publishes one complete status value; the three fields always change
    /// together.
    fn publish(&self, is_loading: bool, error_message: String, series: PriceSeries) {
        self.status_tx.send_replace(RetrievalStatus {
            is_loading,
            error_message,
            series,
        });
    }
}
