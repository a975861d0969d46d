//! Core domain for the Statuspage → Front relay.
//!
//! This crate contains every domain concept, newtype identifier, value type,
//! and error type used by the relay, plus the event mapper that decides which
//! Front API call a Statuspage webhook turns into. Infrastructure crates
//! implement the traits defined here; they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is sent; infrastructure crates define *how* it is sent.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`PageId`, `AppUid`, `DeliveryId`, etc.) |
//! | [`types`] | Webhook payload, Front request/response bodies, `OutboundRequest` |
//! | [`config`] | Validated, immutable process configuration |
//! | [`errors`] | Relay, port, and retry-policy types |
//! | [`incident_url`] | Canonical incident URL construction |
//! | [`mapper`] | Payload → action planning and execution |
//! | [`ports`] | The `FrontApi` trait |

pub mod config;
pub mod errors;
pub mod identifiers;
pub mod incident_url;
pub mod mapper;
pub mod ports;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use config::{ApiToken, RelayConfig, StatuspageUrl};
pub use errors::{ApiError, RelayError, RetryPolicy, STATUS_TOO_MANY_REQUESTS};
pub use identifiers::{AppUid, DeliveryId, LinkId, PageId, APP_UID_LEN};
pub use incident_url::canonical_url;
pub use mapper::{Action, EventMapper, Outcome};
pub use ports::FrontApi;
pub use types::{
    ApiPath, ApiResponse, AppEvent, AppObject, CreateIncidentLink, EventType, HttpMethod,
    IncidentStatus, IncidentUpdate, LinkResponse, OutboundRequest, Page, WebhookPayload,
};
