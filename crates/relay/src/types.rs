//! Shared value types for the relay domain.
//!
//! Inbound types mirror the subset of the Statuspage webhook payload the relay
//! reads; unknown fields are ignored on deserialisation. Outbound types mirror
//! the Front API request and response bodies the relay sends and receives.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{AppUid, LinkId, PageId};

// ---------------------------------------------------------------------------
// Inbound: Statuspage webhook
// ---------------------------------------------------------------------------

/// The Statuspage page a webhook was emitted for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Statuspage page identifier.
    pub id: PageId,
}

/// Incident section of a Statuspage webhook.
///
/// Only the fields the relay uses are modelled. `status` is kept as the raw
/// provider string; use [`IncidentUpdate::status_kind`] to classify it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentUpdate {
    /// Statuspage incident identifier (may carry a leading `/`).
    pub id: String,
    /// Human-readable incident title.
    pub name: String,
    /// Raw Statuspage status (`"investigating"`, `"identified"`, `"resolved"`, ...).
    pub status: String,
}

impl IncidentUpdate {
    /// Classifies the raw status string.
    pub fn status_kind(&self) -> IncidentStatus {
        IncidentStatus::from_raw(&self.status)
    }
}

/// A validated Statuspage webhook delivery.
///
/// `incident` is absent for non-incident events (component updates, etc.).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookPayload {
    /// Page that emitted the webhook.
    pub page: Page,
    /// Present only for incident update events.
    #[serde(default)]
    pub incident: Option<IncidentUpdate>,
}

// ---------------------------------------------------------------------------

/// Classification of a Statuspage incident status.
///
/// Any string other than `"investigating"` and `"resolved"` (including the
/// empty string) is an [`IncidentStatus::OtherUpdate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncidentStatus {
    /// A newly opened incident.
    Investigating,
    /// The incident has been closed.
    Resolved,
    /// Any other progress update on an existing incident.
    OtherUpdate,
}

impl IncidentStatus {
    /// Derives the classification from the raw Statuspage string.
    ///
    /// Matching is exact and case-sensitive.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "investigating" => Self::Investigating,
            "resolved" => Self::Resolved,
            _ => Self::OtherUpdate,
        }
    }
}

// ---------------------------------------------------------------------------
// Outbound: Front request bodies
// ---------------------------------------------------------------------------

/// Event types configured as app triggers on the Front application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// The incident received a non-final update.
    StatusUpdated,
    /// The incident was resolved.
    StatusResolved,
}

impl EventType {
    /// Returns the wire name of the event type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StatusUpdated => "status_updated",
            Self::StatusResolved => "status_resolved",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference object attached to an application event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppObject {
    /// Canonical incident URL; Front matches it against existing links.
    pub ext_link: String,
}

/// Body of `POST /applications/{app_uid}/events`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppEvent {
    /// Which app trigger fires.
    pub event_type: EventType,
    /// Object the event refers to.
    pub app_object: AppObject,
}

/// Body of `POST /links`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateIncidentLink {
    /// Display name of the link (the incident title).
    pub name: String,
    /// Canonical incident URL.
    pub external_url: String,
}

/// Link record returned by `POST /links`.
///
/// Front returns more fields than these; the rest are ignored. Every field is
/// optional: any JSON object in a 2xx body parses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkResponse {
    /// Front link identifier (e.g. `"top_3ij8h"`).
    #[serde(default)]
    pub id: Option<LinkId>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Link type (e.g. `"web"`).
    #[serde(rename = "type", default)]
    pub link_type: Option<String>,
    /// Linked URL.
    #[serde(default)]
    pub external_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Outbound: transport-neutral request description
// ---------------------------------------------------------------------------

/// HTTP methods the Front client issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Patch,
    Post,
}

impl HttpMethod {
    /// Returns `true` for methods that carry a JSON body and therefore a
    /// `Content-Type: application/json` header.
    pub fn is_mutating(self) -> bool {
        matches!(self, Self::Patch | Self::Post)
    }

    /// Returns the method name as sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Patch => "PATCH",
            Self::Post => "POST",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Absolute resource path on the Front API (always begins with `/`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiPath(String);

impl ApiPath {
    /// Creates an [`ApiPath`], returning `None` unless `path` starts with `/`.
    pub fn new(path: impl Into<String>) -> Option<Self> {
        let p = path.into();
        if p.starts_with('/') {
            Some(Self(p))
        } else {
            None
        }
    }

    /// `/links`
    pub fn links() -> Self {
        Self("/links".to_string())
    }

    /// `/applications/{app_uid}/events`
    pub fn application_events(app_uid: &AppUid) -> Self {
        Self(format!("/applications/{app_uid}/events"))
    }

    /// Returns the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ApiPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single Front API call, independent of any HTTP client.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Resource path relative to the API origin.
    pub path: ApiPath,
    /// JSON body, if any.
    pub body: Option<Value>,
}

impl OutboundRequest {
    /// `POST /links` with the given link body.
    pub fn create_incident_link(link: &CreateIncidentLink) -> Result<Self, serde_json::Error> {
        Ok(Self {
            method: HttpMethod::Post,
            path: ApiPath::links(),
            body: Some(serde_json::to_value(link)?),
        })
    }

    /// `POST /applications/{app_uid}/events` with the given event body.
    pub fn trigger_app_event(
        app_uid: &AppUid,
        event: &AppEvent,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            method: HttpMethod::Post,
            path: ApiPath::application_events(app_uid),
            body: Some(serde_json::to_value(event)?),
        })
    }
}

// ---------------------------------------------------------------------------

/// Successful outcome of a Front API call.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
    /// The response body parsed as `T`.
    Content(T),
    /// The response body was empty or whitespace-only.
    NoContent,
}

impl<T> ApiResponse<T> {
    /// Returns the parsed body, or `None` for [`ApiResponse::NoContent`].
    pub fn into_content(self) -> Option<T> {
        match self {
            Self::Content(value) => Some(value),
            Self::NoContent => None,
        }
    }

    /// Returns `true` for [`ApiResponse::NoContent`].
    pub fn is_no_content(&self) -> bool {
        matches!(self, Self::NoContent)
    }
}
