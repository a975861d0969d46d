//! Randomised delay added to every rate-limit back-off.
//!
//! Jitter spreads retries from concurrent deliveries so they do not hit Front
//! in lock-step once the `Retry-After` window closes.

use std::ops::Range;

use rand::Rng;

/// Jitter bounds in milliseconds (half-open).
pub const JITTER_RANGE_MS: Range<u64> = 50..1_000;

/// Source of per-retry jitter in milliseconds.
///
/// Implemented for any `Fn() -> u64`, so tests can inject a constant.
pub trait JitterSource: Send + Sync {
    /// Returns the jitter for one retry, in milliseconds.
    fn jitter_ms(&self) -> u64;
}

impl<F> JitterSource for F
where
    F: Fn() -> u64 + Send + Sync,
{
    fn jitter_ms(&self) -> u64 {
        self()
    }
}

/// Uniform jitter over [`JITTER_RANGE_MS`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomJitter;

impl JitterSource for RandomJitter {
    fn jitter_ms(&self) -> u64 {
        rand::thread_rng().gen_range(JITTER_RANGE_MS)
    }
}
