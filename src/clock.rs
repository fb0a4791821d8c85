// src/clock.rs

// clock module definition and implementations

// dependencies
use std::time::Instant;

/// Clock trait to abstract time retrieval.
/// Implementors must be thread-safe (Send + Sync).
/// The `now` method returns nanoseconds since an arbitrary, fixed epoch.
/// Readings are expected to never go backward.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// Monotonic clock backed by `Instant`.
/// Readings are nanoseconds elapsed since the clock was created; clones share
/// the same origin, so limiters built from cloned clocks agree on "now".
/// This is the default clock used by the limiters.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> u64 {
        // u64 nanoseconds overflow after ~584 years of uptime
        self.origin.elapsed().as_nanos() as u64
    }
}
