//! Caching layer for departure monitor responses.
//!
//! Normalized departure batches are cached per (stop, options) for a fixed
//! TTL (30 seconds by default). Track filtering runs on the cached batch
//! and is not part of the key, so every track requested for a stop shares
//! one upstream call.
//!
//! Concurrent misses on the same key are coalesced: one caller runs the
//! fetch while the others wait for its result. Failed fetches are not
//! cached.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::{DepartureOptions, DepartureRecord, filter_by_track};
use crate::efa::{EfaClient, EfaError};

/// A cached, shared departure batch.
pub type DepartureBatch = Arc<Vec<DepartureRecord>>;

/// Cache key for departure batches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DepartureKey {
    pub stop_id: String,
    pub options: DepartureOptions,
}

impl DepartureKey {
    pub fn new(stop_id: impl Into<String>, options: DepartureOptions) -> Self {
        Self {
            stop_id: stop_id.into(),
            options,
        }
    }
}

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30),
            max_capacity: 10_000,
        }
    }
}

impl CacheConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }
}

/// Cache of normalized departure batches.
pub struct DepartureCache {
    batches: MokaCache<DepartureKey, DepartureBatch>,
}

impl DepartureCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let batches = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { batches }
    }

    /// Get a live cached batch.
    pub async fn get(&self, key: &DepartureKey) -> Option<DepartureBatch> {
        self.batches.get(key).await
    }

    /// Return the live batch for `key`, or run `fetch` and cache its result.
    ///
    /// Only one `fetch` runs per key at a time; concurrent callers for the
    /// same key wait for it and share its outcome. Errors are returned to
    /// every waiter and nothing is stored.
    pub async fn get_or_fetch<F, E>(
        &self,
        key: DepartureKey,
        fetch: F,
    ) -> Result<DepartureBatch, Arc<E>>
    where
        F: Future<Output = Result<Vec<DepartureRecord>, E>>,
        E: Send + Sync + 'static,
    {
        self.batches
            .try_get_with(key, async move { fetch.await.map(Arc::new) })
            .await
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.batches.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.batches.invalidate_all();
    }

    /// Apply pending evictions and bookkeeping.
    pub async fn run_pending_tasks(&self) {
        self.batches.run_pending_tasks().await;
    }
}

/// EFA client with departure caching.
///
/// Wraps an `EfaClient` and caches normalized departure batches. Stop
/// searches are not cached.
pub struct CachedEfaClient {
    client: EfaClient,
    cache: DepartureCache,
}

impl CachedEfaClient {
    /// Create a new cached client.
    pub fn new(client: EfaClient, cache_config: &CacheConfig) -> Self {
        Self {
            client,
            cache: DepartureCache::new(cache_config),
        }
    }

    /// Get departures for a stop, using the cache if a live batch exists.
    pub async fn departures(
        &self,
        stop_id: &str,
        options: DepartureOptions,
    ) -> Result<DepartureBatch, Arc<EfaError>> {
        let key = DepartureKey::new(stop_id, options);

        self.cache
            .get_or_fetch(key, async {
                debug!(stop_id, ?options, "departure cache miss");
                self.client.departures(stop_id, options).await
            })
            .await
    }

    /// Get departures for a stop, narrowed to one platform/track.
    ///
    /// The cached batch is shared by all tracks and is never modified.
    pub async fn departures_on_track(
        &self,
        stop_id: &str,
        options: DepartureOptions,
        track: Option<&str>,
    ) -> Result<Vec<DepartureRecord>, Arc<EfaError>> {
        let all = self.departures(stop_id, options).await?;

        Ok(match track {
            Some(track) => filter_by_track(&all, track),
            None => all.as_ref().clone(),
        })
    }

    /// Access the underlying client for operations that bypass cache.
    pub fn client(&self) -> &EfaClient {
        &self.client
    }

    /// Get cache statistics.
    pub fn cache_entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }
}
