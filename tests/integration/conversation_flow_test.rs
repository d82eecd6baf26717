//! End-to-end conversation flow tests
//!
//! Drives the real conversations router over an in-memory database with
//! the mock relay, covering the operator takeover flow and the
//! recorded-but-not-delivered contract.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use chatdesk_common::{Config, Database};
use chatdesk_conversations::{ConversationService, ConversationsRepositories, ConversationsState};
use chatdesk_relay::MockRelayService;

/// Test harness: the conversations router plus a handle on the mock relay
struct TestApp {
    router: Router,
    relay: MockRelayService,
}

impl TestApp {
    async fn new() -> TestApp {
        let db = Database::in_memory().await.unwrap();
        let repos = ConversationsRepositories::new(db.pool().clone());
        let relay = MockRelayService::new();

        let state = ConversationsState {
            service: ConversationService::new(repos, Arc::new(relay.clone())),
        };

        TestApp {
            router: chatdesk_conversations::routes().with_state(state),
            relay,
        }
    }

    async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        let req = if let Some(b) = body {
            builder = builder.header("content-type", "application/json");
            builder
                .body(Body::from(serde_json::to_string(&b).unwrap()))
                .unwrap()
        } else {
            builder.body(Body::empty()).unwrap()
        };

        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

#[tokio::test]
async fn test_operator_takeover_flow() {
    let app = TestApp::new().await;

    // Unseen contact, relay up: the send is delivered
    let (status, body) = app
        .request(
            Method::POST,
            "/api/messages/send",
            Some(json!({"handle": "+44", "content": "hello"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["outcome"], "delivered");
    assert_eq!(body["message"]["sender"], "human");
    assert_eq!(app.relay.delivery_count(), 1);

    // The listing shows the new conversation, bot-controlled
    let (status, body) = app.request(Method::GET, "/api/conversations", None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["handle"], "+44");
    assert_eq!(rows[0]["last_message"], "hello");
    assert_eq!(rows[0]["intervening"], false);

    // The operator takes over
    let (status, body) = app
        .request(
            Method::POST,
            "/api/conversations/+44/intervene",
            Some(json!({"intervening": true})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["intervening"], true);

    // The agent polls the flag and sees the takeover
    let (_, body) = app
        .request(Method::GET, "/api/conversations/+44/intervention", None)
        .await;
    assert_eq!(body["intervening"], true);

    // A second operator message lands behind the first
    let (status, _) = app
        .request(
            Method::POST,
            "/api/messages/send",
            Some(json!({"handle": "+44", "content": "bye"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = app
        .request(Method::GET, "/api/conversations/+44/messages", None)
        .await;
    let contents: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["hello", "bye"]);
}

#[tokio::test]
async fn test_relay_failure_is_recorded_but_not_delivered() {
    let app = TestApp::new().await;
    app.relay.fail_with("engine offline");

    let (status, body) = app
        .request(
            Method::POST,
            "/api/messages/send",
            Some(json!({"handle": "+1555", "content": "hi"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["outcome"], "recorded_not_delivered");
    assert!(body["reason"].as_str().unwrap().contains("engine offline"));

    // The message survives the relay failure
    let (_, body) = app
        .request(Method::GET, "/api/conversations/+1555/messages", None)
        .await;
    let messages = body.as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["content"], "hi");
    assert_eq!(messages[0]["sender"], "human");
}

#[tokio::test]
async fn test_intervene_on_unknown_handle_is_404() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/conversations/+0000/intervene",
            Some(json!({"intervening": true})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_send_with_empty_content_is_400() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/messages/send",
            Some(json!({"handle": "+44", "content": ""})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(app.relay.delivery_count(), 0);
}

#[tokio::test]
async fn test_inbound_ingestion_updates_listing() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/messages/ingest",
            Some(json!({
                "handle": "+331122",
                "display_name": "Marie",
                "sender": "client",
                "content": "bonjour"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["sender"], "client");
    assert_eq!(body["kind"], "text");

    let (_, body) = app.request(Method::GET, "/api/conversations", None).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["display_name"], "Marie");
    assert_eq!(rows[0]["last_message"], "bonjour");

    // Ingestion never records operator messages
    let (status, _) = app
        .request(
            Method::POST,
            "/api/messages/ingest",
            Some(json!({
                "handle": "+331122",
                "sender": "human",
                "content": "nope"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_history_for_unknown_handle_is_empty() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(Method::GET, "/api/conversations/+0000/messages", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_composition_root_serves_health() {
    let db = Database::in_memory().await.unwrap();
    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        relay_provider: "mock".to_string(),
        relay_url: String::new(),
        relay_timeout_secs: 1,
        log_level: "info".to_string(),
        port: 0,
    };

    let app = chatdesk_app::create_app(config, db.pool().clone())
        .await
        .unwrap();

    let req = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
