// src/token_bucket.rs

// token-bucket-limiter: a lock-free token bucket.

// dependencies
use crate::clock::{Clock, MonotonicClock};
use crate::config::TokenBucketConfig;
use crate::errors::TokenBucketError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, trace};

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// The main token bucket model.
/// C is the clock type, defaulting to MonotonicClock.
///
/// The bucket holds up to `capacity` permits and regenerates one permit per
/// `interval_nanos`. Both mutable fields are atomics; no lock is ever held
/// across a decision. Only `permits` takes part in the accept/deny decision, so
/// the two fields may briefly disagree without over-admitting.
///
/// At most `capacity + permits_per_second` acquisitions succeed within any one
/// second: a full bucket drains instantly and a further second's worth of
/// permits regenerates inside the same window.
#[derive(Debug)]
pub struct TokenBucketLimiter<C = MonotonicClock>
where
    C: Clock,
{
    capacity: u64,
    permits_per_second: u64,
    interval_nanos: u64,
    permits: AtomicU64,
    last_refill_nanos: AtomicU64,
    clock: C,
}

impl TokenBucketLimiter {
    /// Create a full bucket granting `permits_per_second` permits per second,
    /// timed by a fresh `MonotonicClock`.
    pub fn new(permits_per_second: u64) -> Result<Self, TokenBucketError> {
        Self::with_config(
            TokenBucketConfig::new(permits_per_second),
            MonotonicClock::new(),
        )
    }
}

// methods for the TokenBucketLimiter type
impl<C> TokenBucketLimiter<C>
where
    C: Clock,
{
    // method to create a new limiter from a config object
    pub fn with_config(config: TokenBucketConfig, clock: C) -> Result<Self, TokenBucketError> {
        config.validate()?;
        let limiter = Self::from_validated(&config, clock);
        debug!(
            permits_per_second = limiter.permits_per_second,
            capacity = limiter.capacity,
            interval_nanos = limiter.interval_nanos,
            "token bucket created"
        );
        Ok(limiter)
    }

    // callers must have run `config.validate()` first
    pub(crate) fn from_validated(config: &TokenBucketConfig, clock: C) -> Self {
        let capacity = config.burst_capacity();
        let now = clock.now();
        Self {
            capacity,
            permits_per_second: config.permits_per_second(),
            interval_nanos: NANOS_PER_SECOND / config.permits_per_second(),
            permits: AtomicU64::new(capacity),
            last_refill_nanos: AtomicU64::new(now),
            clock,
        }
    }

    /// Try to take one permit.
    ///
    /// Returns `true` when a permit was granted and `false` when the bucket is
    /// empty. Never blocks and never waits for a future permit.
    pub fn acquire(&self) -> bool {
        self.refill();

        let granted = self
            .permits
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |permits| {
                permits.checked_sub(1)
            })
            .is_ok();

        if !granted {
            trace!(capacity = self.capacity, "permit denied");
        }
        granted
    }

    // credit one permit per whole interval elapsed since the last refill
    fn refill(&self) {
        loop {
            let now = self.clock.now();
            let last = self.last_refill_nanos.load(Ordering::Acquire);
            let elapsed = now.saturating_sub(last);
            if elapsed <= self.interval_nanos {
                return;
            }

            let whole_intervals = elapsed / self.interval_nanos;
            let advanced = last + whole_intervals * self.interval_nanos;

            // Whoever moves the timestamp owns these intervals; losers re-read it.
            if self
                .last_refill_nanos
                .compare_exchange(last, advanced, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                continue;
            }

            let previous = match self.permits.fetch_update(
                Ordering::AcqRel,
                Ordering::Acquire,
                |old| Some(self.credit(old, whole_intervals)),
            ) {
                Ok(previous) | Err(previous) => previous,
            };
            let refilled = self.credit(previous, whole_intervals);

            if refilled == self.capacity {
                // saturated: drop the carried remainder
                self.last_refill_nanos.fetch_max(now, Ordering::AcqRel);
            }

            trace!(
                whole_intervals,
                permits = refilled,
                capacity = self.capacity,
                "token bucket refilled"
            );
            return;
        }
    }

    fn credit(&self, permits: u64, whole_intervals: u64) -> u64 {
        permits.saturating_add(whole_intervals).min(self.capacity)
    }

    /// Whether the bucket would be full if refilled at `now`.
    pub(crate) fn is_saturated_at(&self, now: u64) -> bool {
        let elapsed = now.saturating_sub(self.last_refill_nanos());
        let due = if elapsed > self.interval_nanos {
            elapsed / self.interval_nanos
        } else {
            0
        };
        self.credit(self.available_permits(), due) == self.capacity
    }

    // accessor method to return the capacity
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    // accessor method to return the configured rate (permits per second)
    pub fn rate(&self) -> u64 {
        self.permits_per_second
    }

    /// Time needed to regenerate a single permit.
    pub fn interval(&self) -> Duration {
        Duration::from_nanos(self.interval_nanos)
    }

    /// Snapshot of the permit count, without refilling.
    pub fn available_permits(&self) -> u64 {
        self.permits.load(Ordering::Acquire)
    }

    /// Snapshot of the last refill instant, in the clock's nanoseconds.
    pub fn last_refill_nanos(&self) -> u64 {
        self.last_refill_nanos.load(Ordering::Acquire)
    }
}
