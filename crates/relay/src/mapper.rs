//! Statuspage webhook → Front call mapping.
//!
//! Handling is split in two:
//!
//! 1. [`Action::plan`] is a pure function of the payload and the configured
//!    status page URL. It decides which (if any) Front call to make and builds
//!    its body.
//! 2. [`EventMapper::handle_incident_update`] executes the planned action
//!    through a [`FrontApi`] implementation.
//!
//! | Payload | Action |
//! |---------|--------|
//! | no `incident` | [`Action::Ignore`] |
//! | `status == "investigating"` | `POST /links` |
//! | `status == "resolved"` | `POST /applications/{uid}/events` with `status_resolved` |
//! | any other status (including `""`) | `POST /applications/{uid}/events` with `status_updated` |

use std::sync::Arc;

use tracing::{info, instrument};

use crate::incident_url::incident_url;
use crate::{
    ApiError, AppEvent, AppObject, AppUid, CreateIncidentLink, EventType, FrontApi,
    IncidentStatus, LinkResponse, OutboundRequest, RelayConfig, RelayError, StatuspageUrl,
    WebhookPayload,
};

/// The Front call a webhook delivery maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Not an incident update; nothing to send.
    Ignore,
    /// A new incident: create a link to its status page.
    CreateIncidentLink(CreateIncidentLink),
    /// An existing incident changed: fire an app event.
    TriggerAppEvent(AppEvent),
}

impl Action {
    /// Decides what to send for `payload`.
    ///
    /// Fails only when the incident identifier is empty.
    pub fn plan(payload: &WebhookPayload, statuspage_url: &StatuspageUrl) -> Result<Self, RelayError> {
        let Some(incident) = &payload.incident else {
            return Ok(Self::Ignore);
        };

        let url = incident_url(statuspage_url, &incident.id)?;
        let action = match incident.status_kind() {
            IncidentStatus::Investigating => Self::CreateIncidentLink(CreateIncidentLink {
                name: incident.name.clone(),
                external_url: url,
            }),
            IncidentStatus::Resolved => Self::app_event(EventType::StatusResolved, url),
            IncidentStatus::OtherUpdate => Self::app_event(EventType::StatusUpdated, url),
        };
        Ok(action)
    }

    fn app_event(event_type: EventType, ext_link: String) -> Self {
        Self::TriggerAppEvent(AppEvent {
            event_type,
            app_object: AppObject { ext_link },
        })
    }

    /// Renders the action as a transport-neutral request.
    ///
    /// [`FrontApi`] implementations send exactly this request for the
    /// matching port call. Returns `None` for [`Action::Ignore`].
    pub fn to_request(&self, app_uid: &AppUid) -> Result<Option<OutboundRequest>, ApiError> {
        let request = match self {
            Self::Ignore => return Ok(None),
            Self::CreateIncidentLink(link) => OutboundRequest::create_incident_link(link),
            Self::TriggerAppEvent(event) => OutboundRequest::trigger_app_event(app_uid, event),
        };
        request.map(Some).map_err(|e| ApiError::Serialization {
            message: e.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------

/// What handling a delivery did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The payload carried no incident.
    Ignored,
    /// A link was created; `None` when Front returned no body.
    LinkCreated(Option<LinkResponse>),
    /// An app event of this type was accepted.
    EventTriggered(EventType),
}

/// Maps validated Statuspage payloads onto Front API calls.
///
/// Cheap to clone; holds only shared read-only state.
#[derive(Clone)]
pub struct EventMapper {
    config: Arc<RelayConfig>,
    api: Arc<dyn FrontApi>,
}

impl EventMapper {
    pub fn new(config: Arc<RelayConfig>, api: Arc<dyn FrontApi>) -> Self {
        Self { config, api }
    }

    /// Handles one webhook delivery.
    ///
    /// Makes at most one logical Front call. Errors are returned unchanged;
    /// they have already been logged where they were detected.
    #[instrument(skip_all, fields(page_id = %payload.page.id))]
    pub async fn handle_incident_update(
        &self,
        payload: &WebhookPayload,
    ) -> Result<Outcome, RelayError> {
        match Action::plan(payload, &self.config.statuspage_url)? {
            Action::Ignore => {
                info!("Not an incident update; ignoring");
                Ok(Outcome::Ignored)
            }
            Action::CreateIncidentLink(link) => {
                info!(external_url = %link.external_url, "Creating incident link");
                let created = self.api.create_incident_link(&link).await?;
                Ok(Outcome::LinkCreated(created))
            }
            Action::TriggerAppEvent(event) => {
                info!(
                    event_type = %event.event_type,
                    ext_link = %event.app_object.ext_link,
                    "Triggering app event"
                );
                self.api.trigger_app_event(&event).await?;
                Ok(Outcome::EventTriggered(event.event_type))
            }
        }
    }
}

impl std::fmt::Debug for EventMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventMapper")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
