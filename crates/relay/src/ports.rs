//! Port traits implemented by infrastructure crates.
//!
//! The relay domain sequences calls through these traits only; the `front`
//! crate supplies the HTTP implementation and tests supply in-memory fakes.

use async_trait::async_trait;

use crate::{ApiError, AppEvent, CreateIncidentLink, LinkResponse};

/// The subset of the Front API the relay calls.
///
/// Implementations own authentication, rate-limit retries, and response
/// classification. Each method is one logical call: retries happen inside it
/// and never leak to the caller.
#[async_trait]
pub trait FrontApi: Send + Sync {
    /// `POST /links`. Returns `None` when Front answers with an empty body.
    async fn create_incident_link(
        &self,
        link: &CreateIncidentLink,
    ) -> Result<Option<LinkResponse>, ApiError>;

    /// `POST /applications/{app_uid}/events`.
    async fn trigger_app_event(&self, event: &AppEvent) -> Result<(), ApiError>;
}
