// src/errors.rs

// error handling for the token bucket limiter types

// dependencies
use thiserror::Error;

/// Error type for limiter configuration issues.
/// Only construction can fail; acquiring a permit always yields a plain decision.
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenBucketError {
    #[error("Rate must be at least one permit per second")]
    InvalidRate,
    #[error("Rate of {permits_per_second} permits per second exceeds one permit per nanosecond")]
    RateTooHigh { permits_per_second: u64 },
    #[error("Capacity must be at least one permit")]
    InvalidCapacity,
}
