// src/lib.rs

//! # Token Bucket Limiter
//!
//! A lock-free token bucket rate limiter. A bucket holds up to `capacity`
//! permits, regenerates them at a fixed rate, and answers every `acquire` with
//! an immediate yes or no.
//!
//! ## Quick Example
//!
//! ```rust
//! use token_bucket_limiter::TokenBucketLimiter;
//!
//! let limiter = TokenBucketLimiter::new(10).unwrap();
//!
//! if limiter.acquire() {
//!     println!("Request allowed");
//! } else {
//!     println!("Rate limited - retry in {:?}", limiter.interval());
//! }
//! ```
//!
//! ## Per-key limiting
//!
//! ```rust
//! use token_bucket_limiter::KeyedTokenBucket;
//! use std::time::Duration;
//!
//! let limiter = KeyedTokenBucket::new(2).unwrap();
//! assert!(limiter.acquire("user_123"));
//! assert!(limiter.acquire("user_456"));
//!
//! // periodically drop buckets nobody has touched in a while
//! limiter.cleanup_idle(Duration::from_secs(60));
//! ```

// private modules
mod clock;
mod config;
mod errors;
mod keyed;
mod token_bucket;

// public API exports
pub use clock::{Clock, MonotonicClock};
pub use config::{MAX_PERMITS_PER_SECOND, TokenBucketConfig};
pub use errors::TokenBucketError;
pub use keyed::KeyedTokenBucket;
pub use token_bucket::TokenBucketLimiter;
