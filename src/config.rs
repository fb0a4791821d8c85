// src/config.rs

//! Configuration types for the token bucket limiters

// dependencies
use crate::errors::TokenBucketError;

/// Highest accepted rate: one permit regenerated every nanosecond.
pub const MAX_PERMITS_PER_SECOND: u64 = 1_000_000_000;

/// Configuration for limiter behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBucketConfig {
    pub(crate) permits_per_second: u64,
    pub(crate) capacity: Option<u64>,
}

impl TokenBucketConfig {
    /// Create a new configuration; capacity defaults to the rate
    pub fn new(permits_per_second: u64) -> Self {
        Self {
            permits_per_second,
            capacity: None,
        }
    }

    /// Builder-style: set permits per second
    pub fn rate(mut self, permits_per_second: u64) -> Self {
        self.permits_per_second = permits_per_second;
        self
    }

    /// Builder-style: override the burst capacity
    pub fn capacity(mut self, capacity: u64) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn permits_per_second(&self) -> u64 {
        self.permits_per_second
    }

    /// Maximum permits held at once.
    pub fn burst_capacity(&self) -> u64 {
        self.capacity.unwrap_or(self.permits_per_second)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), TokenBucketError> {
        if self.permits_per_second == 0 {
            return Err(TokenBucketError::InvalidRate);
        }
        if self.permits_per_second > MAX_PERMITS_PER_SECOND {
            return Err(TokenBucketError::RateTooHigh {
                permits_per_second: self.permits_per_second,
            });
        }
        if self.burst_capacity() == 0 {
            return Err(TokenBucketError::InvalidCapacity);
        }
        Ok(())
    }
}
