//! Front API client adapter.
//!
//! Implements the [`relay::FrontApi`] trait over Front's REST API
//! (`https://api2.frontapp.com`).
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** All HTTP transport, authentication headers, response
//! parsing, and rate-limit back-off live here. The [`relay`] crate sees only
//! [`relay::FrontApi`] and [`relay::ApiError`].
//!
//! ## Rate limiting
//!
//! A `429` is retried up to [`MAX_RETRIES`] times. Each wait is the
//! server-supplied `Retry-After` (default one second) plus jitter drawn from
//! [`JITTER_RANGE_MS`]. The wait is the same on every retry; there is no
//! exponential growth.

pub mod client;
pub mod error;
pub mod jitter;

pub use client::{
    FrontClient, CLIENT_USER_AGENT, DEFAULT_BASE_URL, DEFAULT_RETRY_AFTER, MAX_RETRIES,
};
pub use error::FrontError;
pub use jitter::{JitterSource, RandomJitter, JITTER_RANGE_MS};
