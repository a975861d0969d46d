//! Router tests: Statuspage deliveries in, Front calls (faked) out.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use listener::router;
use relay::{
    ApiError, AppEvent, CreateIncidentLink, EventMapper, EventType, FrontApi, LinkResponse,
    RelayConfig,
};
use serde_json::{json, Value};
use tower::ServiceExt;

const TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJ0ZXN0In0.c2ln";

// =============================================================================
// Fake Front
// =============================================================================

#[derive(Default)]
struct FakeFront {
    links: Mutex<Vec<CreateIncidentLink>>,
    events: Mutex<Vec<AppEvent>>,
    fail: bool,
}

impl FakeFront {
    fn result(&self) -> Result<(), ApiError> {
        if self.fail {
            Err(ApiError::Http {
                status: 429,
                status_text: "Too Many Requests".into(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl FrontApi for FakeFront {
    async fn create_incident_link(
        &self,
        link: &CreateIncidentLink,
    ) -> Result<Option<LinkResponse>, ApiError> {
        self.links.lock().unwrap().push(link.clone());
        self.result().map(|()| None)
    }

    async fn trigger_app_event(&self, event: &AppEvent) -> Result<(), ApiError> {
        self.events.lock().unwrap().push(event.clone());
        self.result()
    }
}

fn app(front: &Arc<FakeFront>) -> Router {
    let config = RelayConfig::from_raw(TOKEN, "abcdef0123456789", "https://status.example.com")
        .unwrap();
    router(EventMapper::new(Arc::new(config), front.clone()))
}

fn delivery(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/event")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn incident(status: &str) -> Value {
    json!({
        "meta": { "unsubscribe": "https://status.example.com/?unsubscribe=x" },
        "page": { "id": "kctbh9vrtdwd", "status_indicator": "major" },
        "incident": {
            "id": "p31zjtct2jer",
            "name": "Database outage",
            "status": status,
            "impact": "major"
        }
    })
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn non_incident_delivery_is_acknowledged_without_calls() {
    let front = Arc::new(FakeFront::default());
    let response = app(&front)
        .oneshot(delivery(json!({ "page": { "id": "kctbh9vrtdwd" } })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(body.is_empty());
    assert!(front.links.lock().unwrap().is_empty());
    assert!(front.events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn investigating_incident_creates_link() {
    let front = Arc::new(FakeFront::default());
    let response = app(&front)
        .oneshot(delivery(incident("investigating")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        *front.links.lock().unwrap(),
        vec![CreateIncidentLink {
            name: "Database outage".into(),
            external_url: "https://status.example.com/incidents/p31zjtct2jer".into(),
        }]
    );
    assert!(front.events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn resolved_incident_fires_resolved_event() {
    let front = Arc::new(FakeFront::default());
    let response = app(&front).oneshot(delivery(incident("resolved"))).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let events = front.events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, EventType::StatusResolved);
    assert_eq!(
        events[0].app_object.ext_link,
        "https://status.example.com/incidents/p31zjtct2jer"
    );
}

#[tokio::test]
async fn downstream_failure_is_internal_server_error() {
    let front = Arc::new(FakeFront {
        fail: true,
        ..Default::default()
    });
    let response = app(&front).oneshot(delivery(incident("monitoring"))).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"Internal Server Error");
    assert_eq!(front.events.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn empty_incident_id_is_internal_server_error() {
    let front = Arc::new(FakeFront::default());
    let mut body = incident("resolved");
    body["incident"]["id"] = json!("/");
    let response = app(&front).oneshot(delivery(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(front.events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn invalid_payload_is_rejected_before_the_relay() {
    let front = Arc::new(FakeFront::default());
    let response = app(&front)
        .oneshot(delivery(json!({ "incident": { "id": "abc" } })))
        .await
        .unwrap();

    assert!(response.status().is_client_error(), "{}", response.status());
    assert!(front.links.lock().unwrap().is_empty());
    assert!(front.events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn healthz_answers_ok() {
    let front = Arc::new(FakeFront::default());
    let response = app(&front)
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"ok");
}
