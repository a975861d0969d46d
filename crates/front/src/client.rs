//! Minimal, authenticated wrapper around the Front API.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use relay::{
    Action, ApiError, ApiPath, ApiResponse, AppEvent, CreateIncidentLink, FrontApi, HttpMethod,
    LinkResponse, OutboundRequest, RelayConfig, RetryPolicy, STATUS_TOO_MANY_REQUESTS,
};
use reqwest::header::{HeaderMap, ACCEPT, CONTENT_TYPE, RETRY_AFTER, USER_AGENT};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, instrument, warn};

use crate::error::FrontError;
use crate::jitter::{JitterSource, RandomJitter};

/// Production Front API origin.
pub const DEFAULT_BASE_URL: &str = "https://api2.frontapp.com";

/// Rate-limit retries per logical call (so at most `MAX_RETRIES + 1` attempts).
pub const MAX_RETRIES: u32 = 3;

/// `Retry-After` used when the header is absent or unparseable.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);

/// Fixed `User-Agent` sent on every call.
pub const CLIENT_USER_AGENT: &str = concat!("statuspage-front-relay/", env!("CARGO_PKG_VERSION"));

const APPLICATION_JSON: &str = "application/json";

/// Stateless Front API client.
///
/// Holds only immutable configuration; each call carries its own retry
/// counter, so one client can be shared by any number of concurrent
/// deliveries.
#[derive(Clone)]
pub struct FrontClient {
    http: reqwest::Client,
    base_url: String,
    config: Arc<RelayConfig>,
    jitter: Arc<dyn JitterSource>,
}

impl FrontClient {
    /// Creates a client for the production API with random jitter.
    pub fn new(config: Arc<RelayConfig>) -> Result<Self, FrontError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            config,
            jitter: Arc::new(RandomJitter),
        })
    }

    /// Points the client at another origin (a proxy or a test server).
    ///
    /// A trailing `/` is removed so paths join cleanly.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.strip_suffix('/').unwrap_or(&base_url).to_string();
        self
    }

    /// Replaces the jitter source.
    pub fn with_jitter(mut self, jitter: Arc<dyn JitterSource>) -> Self {
        self.jitter = jitter;
        self
    }

    /// Returns the configured API origin.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &ApiPath) -> Result<ApiResponse<T>, FrontError> {
        self.request(HttpMethod::Get, path, None).await
    }

    pub async fn patch<T, B>(&self, path: &ApiPath, body: &B) -> Result<ApiResponse<T>, FrontError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode(body)?;
        self.request(HttpMethod::Patch, path, Some(&body)).await
    }

    pub async fn post<T, B>(&self, path: &ApiPath, body: &B) -> Result<ApiResponse<T>, FrontError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode(body)?;
        self.request(HttpMethod::Post, path, Some(&body)).await
    }

    /// Executes a request built by the relay domain.
    pub async fn send<T: DeserializeOwned>(
        &self,
        request: &OutboundRequest,
    ) -> Result<ApiResponse<T>, FrontError> {
        self.request(request.method, &request.path, request.body.as_ref())
            .await
    }

    /// Issues one logical call, retrying on 429 up to [`MAX_RETRIES`] times.
    ///
    /// Each retry waits `Retry-After` seconds (default 1) plus fresh jitter.
    /// The wait does not grow between retries. Any other non-2xx status, or a
    /// 429 once the budget is spent, fails with [`FrontError::Http`].
    ///
    /// Every failure is logged here and returned unchanged.
    #[instrument(skip_all, fields(method = %method, path = %path))]
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &ApiPath,
        body: Option<&Value>,
    ) -> Result<ApiResponse<T>, FrontError> {
        let mut attempt: u32 = 0;
        loop {
            let started = Instant::now();
            let response = match self.issue(method, path, body).await {
                Ok(response) => response,
                Err(err) => {
                    error!(attempt, error = %err, "Front request failed");
                    return Err(err);
                }
            };

            let status = response.status();
            debug!(
                attempt,
                status = status.as_u16(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Front responded"
            );

            if status.is_success() {
                return read_ok_response(response).await.inspect_err(|err| {
                    error!(error = %err, "Front response could not be read");
                });
            }

            match retry_policy(status, response.headers(), attempt) {
                RetryPolicy::Retryable { after } => {
                    let delay = backoff_delay(
                        after.unwrap_or(DEFAULT_RETRY_AFTER),
                        self.jitter.jitter_ms(),
                    );
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Rate limit exceeded - retrying after delay"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                RetryPolicy::NonRetryable => {
                    let err = FrontError::Http {
                        status: status.as_u16(),
                        status_text: status.canonical_reason().unwrap_or_default().to_string(),
                    };
                    error!(attempt, error = %err, "Front request failed");
                    return Err(err);
                }
            }
        }
    }

    async fn issue(
        &self,
        method: HttpMethod,
        path: &ApiPath,
        body: Option<&Value>,
    ) -> Result<Response, FrontError> {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self
            .http
            .request(to_reqwest_method(method), url)
            .header(ACCEPT, APPLICATION_JSON)
            .bearer_auth(self.config.api_token.expose())
            .header(USER_AGENT, CLIENT_USER_AGENT);

        if let Some(body) = body {
            if method.is_mutating() {
                builder = builder.header(CONTENT_TYPE, APPLICATION_JSON);
            }
            let bytes = serde_json::to_vec(body).map_err(FrontError::Serialization)?;
            builder = builder.body(bytes);
        }

        Ok(builder.send().await?)
    }

    /// Renders a port call into the request the client sends.
    fn render(&self, action: &Action) -> Result<OutboundRequest, ApiError> {
        let rendered = action.to_request(&self.config.app_uid).inspect_err(|err| {
            error!(error = %err, "Failed to encode Front request body");
        })?;
        rendered.ok_or_else(|| {
            let err = ApiError::Serialization {
                message: "ignored deliveries have no Front request".into(),
            };
            error!(error = %err, "Nothing to send");
            err
        })
    }
}

impl std::fmt::Debug for FrontClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrontClient")
            .field("base_url", &self.base_url)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl FrontApi for FrontClient {
    async fn create_incident_link(
        &self,
        link: &CreateIncidentLink,
    ) -> Result<Option<LinkResponse>, ApiError> {
        let request = self.render(&Action::CreateIncidentLink(link.clone()))?;
        let response: ApiResponse<LinkResponse> = self.send(&request).await?;
        Ok(response.into_content())
    }

    async fn trigger_app_event(&self, event: &AppEvent) -> Result<(), ApiError> {
        let request = self.render(&Action::TriggerAppEvent(event.clone()))?;
        let _: ApiResponse<Value> = self.send(&request).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Response handling
// ---------------------------------------------------------------------------

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Value, FrontError> {
    serde_json::to_value(body).map_err(FrontError::Serialization)
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Post => Method::POST,
    }
}

async fn read_ok_response<T: DeserializeOwned>(
    response: Response,
) -> Result<ApiResponse<T>, FrontError> {
    let text = response.text().await?;
    parse_body(&text)
}

/// Whitespace-only bodies are [`ApiResponse::NoContent`]; anything else must
/// be JSON.
pub(crate) fn parse_body<T: DeserializeOwned>(text: &str) -> Result<ApiResponse<T>, FrontError> {
    if text.trim().is_empty() {
        return Ok(ApiResponse::NoContent);
    }
    serde_json::from_str(text)
        .map(ApiResponse::Content)
        .map_err(FrontError::MalformedResponseBody)
}

/// Classifies a non-success response.
///
/// Only 429 with `attempt < MAX_RETRIES` is retryable.
pub(crate) fn retry_policy(status: StatusCode, headers: &HeaderMap, attempt: u32) -> RetryPolicy {
    if status.as_u16() == STATUS_TOO_MANY_REQUESTS && attempt < MAX_RETRIES {
        RetryPolicy::Retryable {
            after: retry_after(headers),
        }
    } else {
        RetryPolicy::NonRetryable
    }
}

/// Parses `Retry-After` as (possibly fractional) seconds.
///
/// Returns `None` when the header is absent, negative, or not a number
/// (HTTP-date values included).
pub(crate) fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
}

/// `retry_after + jitter_ms`.
pub(crate) fn backoff_delay(retry_after: Duration, jitter_ms: u64) -> Duration {
    retry_after + Duration::from_millis(jitter_ms)
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    fn headers(retry_after: Option<&'static str>) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(value) = retry_after {
            map.insert(RETRY_AFTER, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn rate_limit_is_retryable_until_budget_spent() {
        let h = headers(Some("2"));
        for attempt in 0..MAX_RETRIES {
            assert_eq!(
                retry_policy(StatusCode::TOO_MANY_REQUESTS, &h, attempt),
                RetryPolicy::Retryable {
                    after: Some(Duration::from_secs(2))
                }
            );
        }
        assert_eq!(
            retry_policy(StatusCode::TOO_MANY_REQUESTS, &h, MAX_RETRIES),
            RetryPolicy::NonRetryable
        );
    }

    #[test]
    fn other_failures_are_not_retried() {
        for status in [
            StatusCode::BAD_REQUEST,
            StatusCode::UNAUTHORIZED,
            StatusCode::NOT_FOUND,
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::SERVICE_UNAVAILABLE,
        ] {
            assert_eq!(retry_policy(status, &headers(Some("1")), 0), RetryPolicy::NonRetryable);
        }
    }

    #[test]
    fn retry_after_parsing() {
        assert_eq!(retry_after(&headers(None)), None);
        assert_eq!(retry_after(&headers(Some("3"))), Some(Duration::from_secs(3)));
        assert_eq!(retry_after(&headers(Some("0.5"))), Some(Duration::from_millis(500)));
        assert_eq!(retry_after(&headers(Some("soon"))), None);
        assert_eq!(retry_after(&headers(Some("-1"))), None);
        assert_eq!(
            retry_after(&headers(Some("Wed, 21 Oct 2015 07:28:00 GMT"))),
            None
        );
    }

    #[test]
    fn backoff_is_flat_retry_after_plus_jitter() {
        assert_eq!(
            backoff_delay(Duration::from_secs(2), 50),
            Duration::from_millis(2_050)
        );
        assert_eq!(
            backoff_delay(DEFAULT_RETRY_AFTER, 999),
            Duration::from_millis(1_999)
        );
    }

    #[test]
    fn empty_body_is_no_content() {
        for text in ["", "   ", "\n\t"] {
            let parsed: ApiResponse<Value> = parse_body(text).unwrap();
            assert!(parsed.is_no_content());
        }
    }

    #[test]
    fn non_json_body_is_malformed() {
        let err = parse_body::<Value>("<html>oops</html>").unwrap_err();
        assert!(matches!(err, FrontError::MalformedResponseBody(_)));
    }

    #[test]
    fn json_body_is_parsed() {
        let parsed: ApiResponse<Value> = parse_body(r#"{"id":"top_1"}"#).unwrap();
        assert_eq!(parsed, ApiResponse::Content(serde_json::json!({"id": "top_1"})));
    }
}
