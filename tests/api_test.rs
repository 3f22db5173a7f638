//! Integration tests for API endpoints.
//!
//! The router runs against a migrated in-memory SQLite database and a
//! recording mailer, so no relay or server process is needed.

mod common;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use common::{memory_db, Scratch};
use fielddb::api::{create_router, AppState};
use fielddb::domain::Password;
use fielddb::infra::{Database, UserRepository};
use fielddb::mail::{MailError, Mailer, OutgoingEmail};
use fielddb::services::{Bootstrapper, PASSWORD_RESET_SUBJECT};

// =============================================================================
// Test mailers
// =============================================================================

/// Keeps every message instead of sending it
#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingMailer {
    fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

/// Relay that rejects everything
struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _email: OutgoingEmail) -> Result<(), MailError> {
        Err(MailError::Send("connection refused".to_string()))
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn app(db: &Database, mailer: Arc<dyn Mailer>) -> Router {
    create_router(AppState::new(Arc::new(db.clone()), mailer))
}

async fn bootstrapped(scratch: &Scratch) -> Database {
    let db = memory_db().await;
    Bootstrapper::new(db.connection(), &scratch.config(&[]))
        .run()
        .await
        .unwrap();
    db
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn reset_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/auth/reset-password")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn admin_hash(db: &Database) -> String {
    UserRepository::new(db.connection())
        .find_by_username("admin")
        .await
        .unwrap()
        .unwrap()
        .password_hash
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_reports_missing_bootstrap() {
    let db = memory_db().await;
    let app = app(&db, Arc::new(RecordingMailer::default()));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["services"]["database"]["status"], "healthy");
    assert_eq!(json["services"]["bootstrap"]["status"], "unhealthy");
}

#[tokio::test]
async fn test_health_ok_after_bootstrap() {
    let scratch = Scratch::new("health-ok");
    let db = bootstrapped(&scratch).await;
    let app = app(&db, Arc::new(RecordingMailer::default()));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
}

// =============================================================================
// Password reset
// =============================================================================

#[tokio::test]
async fn test_reset_password_emails_new_password() {
    let scratch = Scratch::new("reset-ok");
    let db = bootstrapped(&scratch).await;
    let mailer = Arc::new(RecordingMailer::default());
    let app = app(&db, mailer.clone());
    let old_hash = admin_hash(&db).await;

    let response = app
        .oneshot(reset_request(r#"{"username":"admin"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, PASSWORD_RESET_SUBJECT);
    assert_eq!(sent[0].to, scratch.config(&[]).admin_email);

    let new_hash = admin_hash(&db).await;
    assert_ne!(old_hash, new_hash);
    assert!(!Password::from_hash(new_hash.clone()).verify("adminA_1"));

    // The mailed password is the one that now verifies
    let stored = Password::from_hash(new_hash);
    let mailed = sent[0]
        .body
        .split_whitespace()
        .find(|word| stored.verify(word));
    assert!(mailed.is_some());
}

#[tokio::test]
async fn test_reset_password_unknown_user() {
    let scratch = Scratch::new("reset-unknown");
    let db = bootstrapped(&scratch).await;
    let mailer = Arc::new(RecordingMailer::default());
    let app = app(&db, mailer.clone());

    let response = app
        .oneshot(reset_request(r#"{"username":"nobody"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"]["message"], "username: not a valid username");
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn test_reset_password_requires_username() {
    let scratch = Scratch::new("reset-empty");
    let db = bootstrapped(&scratch).await;
    let app = app(&db, Arc::new(RecordingMailer::default()));

    let response = app.oneshot(reset_request(r#"{"username":""}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "username: username is required");
}

#[tokio::test]
async fn test_reset_password_keeps_old_password_when_mail_fails() {
    let scratch = Scratch::new("reset-fail");
    let db = bootstrapped(&scratch).await;
    let app = app(&db, Arc::new(FailingMailer));
    let old_hash = admin_hash(&db).await;

    let response = app
        .oneshot(reset_request(r#"{"username":"admin"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "EMAIL_UNAVAILABLE");
    assert_eq!(admin_hash(&db).await, old_hash);
}
