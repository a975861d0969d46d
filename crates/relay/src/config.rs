//! Process-wide relay configuration.
//!
//! [`RelayConfig`] is built once at startup from validated values and shared
//! read-only (behind an `Arc`) by the event mapper and the Front client. It is
//! never re-read or mutated at call time.

use url::Url;

use crate::{AppUid, RelayError};

/// Front API bearer credential.
///
/// Front API tokens are JWTs: three non-empty, dot-separated base64url
/// segments whose header decodes to a JSON object naming an `alg`. The token
/// value is never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Creates an [`ApiToken`], returning `None` if `value` is not a JWT.
    ///
    /// Only the header is decoded; the signature cannot be verified here.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        if jsonwebtoken::decode_header(&v).is_err() {
            return None;
        }
        let segments: Vec<&str> = v.split('.').collect();
        let well_formed = segments.len() == 3
            && segments.iter().all(|s| {
                !s.is_empty()
                    && s
                        .bytes()
                        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b'=')
            });
        if well_formed {
            Some(Self(v))
        } else {
            None
        }
    }

    /// Returns the raw token for use in an `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiToken(<redacted>)")
    }
}

// ---------------------------------------------------------------------------

/// Base URL of the public status page (e.g. `https://status.example.com`).
///
/// Stored exactly as configured; trailing-slash normalisation happens when
/// incident URLs are built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatuspageUrl(String);

impl StatuspageUrl {
    /// Creates a [`StatuspageUrl`], returning `None` unless `value` parses as
    /// an absolute `http` or `https` URL with a host.
    ///
    /// Whitespace is rejected outright: the parser would silently strip it,
    /// but the raw string is what incident URLs are built from.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        if v.chars().any(char::is_whitespace) {
            return None;
        }
        let parsed = Url::parse(&v).ok()?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return None;
        }
        Some(Self(v))
    }

    /// Returns the URL as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StatuspageUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------

/// Immutable configuration shared by every component of the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Bearer credential for the Front API.
    pub api_token: ApiToken,
    /// Front application receiving app events.
    pub app_uid: AppUid,
    /// Base URL incident links point at.
    pub statuspage_url: StatuspageUrl,
}

impl RelayConfig {
    /// Validates raw configuration strings.
    ///
    /// Returns [`RelayError::ConfigurationError`] naming the first invalid
    /// value. Secret values are never echoed into the message.
    pub fn from_raw(
        api_token: &str,
        app_uid: &str,
        statuspage_url: &str,
    ) -> Result<Self, RelayError> {
        let api_token = ApiToken::new(api_token).ok_or_else(|| RelayError::ConfigurationError {
            message: "FRONT_API_KEY must be a JWT (three dot-separated base64url segments)"
                .to_string(),
        })?;
        let app_uid = AppUid::new(app_uid).ok_or_else(|| RelayError::ConfigurationError {
            message: format!(
                "FRONT_APP_UID must be exactly {} characters, got {:?}",
                crate::identifiers::APP_UID_LEN,
                app_uid
            ),
        })?;
        let statuspage_url =
            StatuspageUrl::new(statuspage_url).ok_or_else(|| RelayError::ConfigurationError {
                message: format!("STATUSPAGE_URL must be an http(s) URL, got {statuspage_url:?}"),
            })?;

        Ok(Self {
            api_token,
            app_uid,
            statuspage_url,
        })
    }
}
