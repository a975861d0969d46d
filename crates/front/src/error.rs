//! Error types for the Front API client.

use relay::ApiError;
use thiserror::Error;

/// Errors that can occur when calling the Front API.
#[derive(Debug, Error)]
pub enum FrontError {
    /// Front answered with a non-success status (including a 429 after the
    /// retry budget is spent).
    #[error("HTTP {status} - {status_text}")]
    Http { status: u16, status_text: String },

    /// A 2xx response body was not valid JSON for the expected type.
    #[error("Malformed response body: {0}")]
    MalformedResponseBody(#[source] serde_json::Error),

    /// The request body could not be serialised.
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// HTTP transport failed before a response was read.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl From<FrontError> for ApiError {
    fn from(err: FrontError) -> Self {
        match err {
            FrontError::Http {
                status,
                status_text,
            } => ApiError::Http {
                status,
                status_text,
            },
            FrontError::MalformedResponseBody(e) => ApiError::MalformedResponseBody {
                message: e.to_string(),
            },
            FrontError::Serialization(e) => ApiError::Serialization {
                message: e.to_string(),
            },
            FrontError::Transport(e) => ApiError::Transport {
                message: e.to_string(),
            },
        }
    }
}
