//! Top-level error and retry-policy types for the relay domain.
//!
//! [`RelayError`] covers every condition that aborts handling of one webhook
//! delivery. [`ApiError`] is the port-level failure of a single downstream
//! Front API call; infrastructure adapters convert their transport-specific
//! errors into it so this crate never sees HTTP client types.
//!
//! [`RetryPolicy`] is the decision an outbound client makes for each response
//! it receives. Errors themselves carry no retry classification: a 429 is
//! retried inside the client and only reaches callers once the retry budget
//! is spent, at which point nothing is retryable.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP status Front uses to signal rate limiting.
pub const STATUS_TOO_MANY_REQUESTS: u16 = 429;

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether a response is safe to retry and, if so, after what delay.
///
/// ## Rules
///
/// - `Retryable`: HTTP 429 responses, within the client's retry budget.
/// - `NonRetryable`: every other response, including a 429 once the budget is
///   exhausted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The operation may be retried.
    ///
    /// `after` optionally specifies the minimum delay before retrying (e.g.
    /// derived from the `Retry-After` response header).
    Retryable {
        /// Minimum back-off before the next attempt. `None` means the
        /// caller applies its own default.
        after: Option<Duration>,
    },
    /// The operation must not be retried.
    NonRetryable,
}

// ---------------------------------------------------------------------------
// Downstream (port-level) errors
// ---------------------------------------------------------------------------

/// Failure of one logical call to the Front API.
///
/// Produced by implementations of [`crate::FrontApi`]. A 429 only surfaces as
/// [`ApiError::Http`] after the client's retry budget is exhausted.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum ApiError {
    /// Front answered with a non-success status.
    #[error("HTTP {status} - {status_text}")]
    Http {
        /// Numeric HTTP status code.
        status: u16,
        /// Canonical reason phrase for the status (may be empty).
        status_text: String,
    },

    /// A 2xx response carried a non-empty body that is not valid JSON for
    /// the expected type.
    #[error("Malformed response body: {message}")]
    MalformedResponseBody {
        /// Parser diagnostic.
        message: String,
    },

    /// The request never produced an HTTP response (DNS, TLS, connection reset).
    #[error("Transport error: {message}")]
    Transport {
        /// Transport diagnostic.
        message: String,
    },

    /// The request body could not be serialised to JSON.
    #[error("Request serialisation failed: {message}")]
    Serialization {
        /// Serialiser diagnostic.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Relay-level errors
// ---------------------------------------------------------------------------

/// Errors that abort handling of a webhook delivery.
///
/// The surrounding service turns any of these into a uniform failure response.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The incident identifier was empty after removing one leading `/`.
    #[error("Invalid incident identifier: {id:?}")]
    InvalidIncidentIdentifier {
        /// The identifier as received.
        id: String,
    },

    /// The downstream Front API call failed.
    #[error("Front API call failed: {0}")]
    Downstream(#[from] ApiError),

    /// The process configuration is invalid.
    ///
    /// Produced at load time; the service never starts with an invalid config.
    #[error("Configuration error: {message}")]
    ConfigurationError {
        /// Description of the configuration problem.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_message_carries_status_and_text() {
        let err = ApiError::Http {
            status: 503,
            status_text: "Service Unavailable".into(),
        };
        assert_eq!(err.to_string(), "HTTP 503 - Service Unavailable");
    }
}
