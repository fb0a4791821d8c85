// src/keyed.rs

//! One token bucket per key, for callers protecting many resources (clients,
//! endpoints, tenants) with the same rate.

// dependencies
use crate::clock::{Clock, MonotonicClock};
use crate::config::TokenBucketConfig;
use crate::errors::TokenBucketError;
use crate::token_bucket::TokenBucketLimiter;
use dashmap::DashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// A set of independent token buckets keyed by `K`.
/// Every bucket shares the same validated config and a clone of the same clock.
/// We use `Arc<DashMap>` for thread-safe concurrent access to bucket state.
#[derive(Debug)]
pub struct KeyedTokenBucket<K, C = MonotonicClock>
where
    K: Hash + Eq,
    C: Clock + Clone,
{
    config: TokenBucketConfig,
    buckets: Arc<DashMap<K, TokenBucketLimiter<C>>>,
    clock: C,
}

impl<K> KeyedTokenBucket<K>
where
    K: Hash + Eq,
{
    pub fn new(permits_per_second: u64) -> Result<Self, TokenBucketError> {
        Self::with_config(
            TokenBucketConfig::new(permits_per_second),
            MonotonicClock::new(),
        )
    }
}

impl<K, C> KeyedTokenBucket<K, C>
where
    K: Hash + Eq,
    C: Clock + Clone,
{
    pub fn with_config(config: TokenBucketConfig, clock: C) -> Result<Self, TokenBucketError> {
        config.validate()?;
        Ok(Self {
            config,
            buckets: Arc::new(DashMap::new()),
            clock,
        })
    }

    /// Try to take one permit from `key`'s bucket.
    /// Unseen keys start with a full bucket.
    pub fn acquire(&self, key: K) -> bool {
        if let Some(bucket) = self.buckets.get(&key) {
            return bucket.acquire();
        }

        self.buckets
            .entry(key)
            .or_insert_with(|| TokenBucketLimiter::from_validated(&self.config, self.clock.clone()))
            .acquire()
    }

    /// Drop `key`'s bucket. Returns whether one existed.
    pub fn remove(&self, key: &K) -> bool {
        self.buckets.remove(key).is_some()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.buckets.contains_key(key)
    }

    /// Snapshot of `key`'s permit count, if the key has a bucket.
    pub fn available_permits(&self, key: &K) -> Option<u64> {
        self.buckets
            .get(key)
            .map(|bucket| bucket.available_permits())
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn config(&self) -> &TokenBucketConfig {
        &self.config
    }

    /// Evict buckets that are full and have not refilled for at least `max_idle`.
    ///
    /// A full bucket behaves exactly like a freshly created one, so eviction
    /// never changes which future calls are granted. Returns the number evicted.
    pub fn cleanup_idle(&self, max_idle: Duration) -> usize {
        let now = self.clock.now();
        let max_idle_nanos = u64::try_from(max_idle.as_nanos()).unwrap_or(u64::MAX);
        let before = self.buckets.len();

        self.buckets.retain(|_, bucket| {
            let idle_nanos = now.saturating_sub(bucket.last_refill_nanos());
            !(bucket.is_saturated_at(now) && idle_nanos >= max_idle_nanos)
        });

        let evicted = before.saturating_sub(self.buckets.len());
        if evicted > 0 {
            debug!(evicted, remaining = self.buckets.len(), "evicted idle token buckets");
        }
        evicted
    }
}
