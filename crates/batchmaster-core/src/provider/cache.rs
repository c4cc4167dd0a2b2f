//! Time-based caching wrapper with offline fallback.

use std::{future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use log::{debug, warn};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::PlanProvider;
use crate::{
    clock::{Clock, SystemClock},
    error::Result,
    models::{PlanDocument, PlanSummary},
    storage::{keys, KeyValueStore},
};

/// Default time a cached response counts as fresh.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Per-provider caching behaviour.
#[derive(Debug, Clone, Copy)]
pub struct CacheOptions {
    /// Read from and write to the cache at all
    pub use_cache: bool,
    /// Skip fresh cache hits and go to the source first
    pub force_refresh: bool,
    pub ttl: Duration,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            force_refresh: false,
            ttl: DEFAULT_CACHE_TTL,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheEnvelope<T> {
    data: T,
    cached_at: Timestamp,
}

/// Wraps a [`PlanProvider`], answering from the key-value store while an
/// entry is fresh and falling back to any cached entry when the source
/// fails. An error is only returned when the source fails and nothing was
/// ever cached.
pub struct CachedPlanProvider<P> {
    inner: P,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    options: CacheOptions,
}

impl<P: PlanProvider> CachedPlanProvider<P> {
    pub fn new(inner: P, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            inner,
            store,
            clock: Arc::new(SystemClock),
            options: CacheOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CacheOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    async fn cached<T, F, Fut>(&self, key: &str, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send,
    {
        let CacheOptions {
            use_cache,
            force_refresh,
            ttl,
        } = self.options;

        if use_cache && !force_refresh {
            if let Some(envelope) = self.read::<T>(key).await {
                if self.is_fresh(&envelope, ttl) {
                    debug!("Cache hit for {key}");
                    return Ok(envelope.data);
                }
            }
        }

        match fetch().await {
            Ok(data) => {
                if use_cache {
                    self.write(key, &data).await;
                }
                Ok(data)
            }
            Err(e) => {
                if use_cache {
                    if let Some(envelope) = self.read::<T>(key).await {
                        warn!("Serving cached {key} after fetch failure: {e}");
                        return Ok(envelope.data);
                    }
                }
                Err(e)
            }
        }
    }

    fn is_fresh<T>(&self, envelope: &CacheEnvelope<T>, ttl: Duration) -> bool {
        let age = self.clock.now().duration_since(envelope.cached_at);
        match SignedDuration::try_from(ttl) {
            Ok(ttl) => age <= ttl,
            Err(_) => true,
        }
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Option<CacheEnvelope<T>> {
        let raw = match self.store.get(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Cache read error for {key}: {e}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(envelope) => Some(envelope),
            Err(e) => {
                warn!("Discarding unreadable cache entry {key}: {e}");
                None
            }
        }
    }

    async fn write<T: Serialize>(&self, key: &str, data: &T) {
        let envelope = CacheEnvelope {
            data,
            cached_at: self.clock.now(),
        };
        let result = match serde_json::to_string(&envelope) {
            Ok(raw) => self.store.set(key, &raw).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            warn!("Cache write error for {key}: {e}");
        }
    }
}

#[async_trait]
impl<P: PlanProvider> PlanProvider for CachedPlanProvider<P> {
    async fn fetch_plan_by_id(&self, id: &str) -> Result<PlanDocument> {
        self.cached(&keys::cache_plan(id), || self.inner.fetch_plan_by_id(id))
            .await
    }

    async fn fetch_plans_summary(&self) -> Result<Vec<PlanSummary>> {
        self.cached(keys::CACHE_PLANS, || self.inner.fetch_plans_summary())
            .await
    }

    async fn fetch_week_data(&self, week: u32) -> Result<PlanDocument> {
        self.cached(&keys::cache_week(week), || self.inner.fetch_week_data(week))
            .await
    }
}
