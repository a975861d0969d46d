//! Statuspage webhook receiver.
//!
//! Binds an HTTP server that accepts Statuspage webhook deliveries on
//! `POST /event` and hands each validated [`relay::WebhookPayload`] to the
//! [`relay::EventMapper`].
//!
//! | Route | Behaviour |
//! |-------|-----------|
//! | `POST /event` | `204` on success (including ignored payloads), `500` if the relay fails, `4xx` if the body is not a valid payload |
//! | `GET /healthz` | `200 ok` |
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Routing, request validation, and response codes live
//! here. The [`relay`] crate never sees HTTP server types.

use std::net::SocketAddr;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use relay::{DeliveryId, EventMapper, WebhookPayload};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, info_span, warn, Instrument};

/// Errors that stop the webhook server.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The listen address could not be bound.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("Webhook server failed: {0}")]
    Serve(#[source] std::io::Error),
}

#[derive(Clone)]
struct ListenerState {
    mapper: EventMapper,
}

/// Builds the webhook router.
pub fn router(mapper: EventMapper) -> Router {
    Router::new()
        .route("/event", post(handle_event))
        .route("/healthz", get(healthz))
        .with_state(ListenerState { mapper })
}

/// Serves [`router`] on `addr` until `shutdown` resolves.
pub async fn serve<F>(addr: SocketAddr, mapper: EventMapper, shutdown: F) -> Result<(), ListenerError>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ListenerError::Bind { addr, source })?;
    let local = listener.local_addr().map_err(ListenerError::Serve)?;
    info!(addr = %local, "Webhook listener ready");

    axum::serve(listener, router(mapper))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ListenerError::Serve)
}

async fn handle_event(
    State(state): State<ListenerState>,
    Json(payload): Json<WebhookPayload>,
) -> Response {
    let delivery_id = DeliveryId::new_random();
    let span = info_span!("webhook_delivery", delivery_id = %delivery_id);

    async move {
        match state.mapper.handle_incident_update(&payload).await {
            Ok(outcome) => {
                info!(?outcome, "Webhook handled");
                StatusCode::NO_CONTENT.into_response()
            }
            Err(err) => {
                warn!(error = %err, "Webhook handling failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
    .instrument(span)
    .await
}

async fn healthz() -> &'static str {
    "ok"
}
