#![allow(dead_code)]

use std::sync::{Arc, Mutex, OnceLock};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Request, Response};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use maintdesk_core::roles::Role;
use maintdesk_db::models::record::{FacilityRecord, RecordKind};
use maintdesk_db::models::user::User;
use maintdesk_db::{MemoryTicketStore, TicketStore};
use maintdesk_events::{
    DeliveryError, DeliveryKeys, PushMessage, PushSender, PushSubscription, SubscriptionEntry,
};
use tower::ServiceExt;

use maintdesk_api::auth::jwt::{issue, JwtConfig};
use maintdesk_api::auth::password::hash_password;
use maintdesk_api::config::{PushConfig, ServerConfig};
use maintdesk_api::router::build_app_router;
use maintdesk_api::state::AppState;

pub const HQ: &str = "Mumbai HQ";
pub const PASSWORD: &str = "test_password_123!";
pub const PUBLIC_KEY: &str = "BTestApplicationServerKey";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        hq_location: HQ.to_string(),
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            expiry_days: 7,
        },
        push: PushConfig {
            public_key: PUBLIC_KEY.to_string(),
            timeout_secs: 10,
        },
    }
}

// ---------------------------------------------------------------------------
// Push sender double
// ---------------------------------------------------------------------------

/// One recorded delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Delivery {
    pub owner: String,
    pub event_type: String,
    pub ticket_id: Option<i64>,
}

/// Records every attempt; endpoints containing `"gone"` fail.
#[derive(Default)]
pub struct RecordingSender {
    attempts: Mutex<Vec<Delivery>>,
}

#[async_trait]
impl PushSender for RecordingSender {
    async fn send(
        &self,
        entry: &SubscriptionEntry,
        message: &PushMessage,
    ) -> Result<(), DeliveryError> {
        self.attempts.lock().unwrap().push(Delivery {
            owner: entry.owner_subject_id.clone(),
            event_type: message.event_type.clone(),
            ticket_id: message.ticket_id,
        });
        if entry.endpoint.contains("gone") {
            return Err(DeliveryError::HttpStatus(410));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Application under test
// ---------------------------------------------------------------------------

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryTicketStore>,
    sender: Arc<RecordingSender>,
}

impl TestApp {
    /// A fresh router handle; `oneshot` consumes it.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Credential for a seeded (or arbitrary) identity.
    pub fn token(&self, subject: &str, role: Role, location: &str) -> String {
        issue(subject, &subject.to_uppercase(), role, location, &test_config().jwt)
            .expect("token issuance should succeed")
    }

    /// Register one push endpoint for `subject` directly in the registry.
    pub async fn subscribe(&self, subject: &str, endpoint: &str) {
        self.state
            .registry
            .register(
                subject,
                PushSubscription {
                    endpoint: endpoint.to_string(),
                    keys: DeliveryKeys {
                        p256dh: "p256dh-key".into(),
                        auth: "auth-secret".into(),
                    },
                },
            )
            .await;
    }

    /// Delivery attempts so far, sorted, after in-flight deliveries finish.
    pub async fn deliveries(&self) -> Vec<Delivery> {
        self.state.dispatcher.wait_idle().await;
        let mut attempts = self.sender.attempts.lock().unwrap().clone();
        attempts.sort();
        attempts
    }
}

fn password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(PASSWORD).expect("hashing should succeed"))
        .clone()
}

fn seed(store: &MemoryTicketStore) {
    for (subject, name, role, location) in [
        ("u-pune", "Asha", "normal_user", "Pune"),
        ("u2-pune", "Ravi", "normal_user", "Pune"),
        ("t-pune", "Imran", "technician", "Pune"),
        ("p-pune", "Meera", "planner", "Pune"),
        ("a-pune", "Kiran", "admin", "Pune"),
        ("t-chennai", "Lakshmi", "technician", "Chennai"),
        ("p-chennai", "Arjun", "planner", "Chennai"),
        ("a-hq", "Farah", "admin", HQ),
        ("legacy-pune", "Old Account", "Tech", "Pune"),
        ("ghost-pune", "Ghost", "janitor", "Pune"),
    ] {
        store.insert_user(User {
            subject_id: subject.to_string(),
            display_name: name.to_string(),
            role: role.to_string(),
            location: location.to_string(),
            password_hash: password_hash(),
            created_at: Utc::now(),
        });
    }

    for (id, kind, location, summary) in [
        (1, RecordKind::Breakdown, "Pune", "Chiller 2 tripped"),
        (2, RecordKind::Breakdown, "Chennai", "Generator failed to start"),
        (3, RecordKind::Safety, "Pune", "Fire drill completed"),
    ] {
        store.insert_record(
            kind,
            FacilityRecord {
                id,
                location: location.to_string(),
                summary: summary.to_string(),
                details: None,
                recorded_at: Utc::now(),
            },
        );
    }
}

/// Build the full application router over a seeded in-memory store.
pub fn spawn_app() -> TestApp {
    let store = Arc::new(MemoryTicketStore::new());
    seed(&store);

    let sender = Arc::new(RecordingSender::default());
    let config = test_config();
    let state = AppState::new(
        Arc::clone(&store) as Arc<dyn TicketStore>,
        config.clone(),
        Arc::clone(&sender) as Arc<dyn PushSender>,
    );
    let router = build_app_router(state.clone(), &config);

    TestApp {
        router,
        state,
        store,
        sender,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::post(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::post(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// POST without a body (and without a content type).
pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::post(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::put(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read response body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("response body is not valid JSON")
}
