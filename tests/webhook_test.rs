//! Webhook router tests
//! Run with: cargo test --test webhook_test

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use cinebot::application::messaging::MessageParser;
use cinebot::infrastructure::webhook::{self, WebhookState};
use common::{harness, Harness, Sent};
use http_body_util::BodyExt;
use tower::util::ServiceExt;

const TOKEN: &str = "123456:test-token";

fn app(h: &Harness) -> Router {
    webhook::router(
        TOKEN,
        WebhookState {
            dispatcher: h.dispatcher.clone(),
            parser: Arc::new(MessageParser::default()),
        },
    )
}

async fn post(app: Router, path: &str, body: impl Into<Body>) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Dispatch runs on a spawned task; poll until it has produced output
async fn wait_for_sent(h: &Harness, count: usize) -> Vec<Sent> {
    for _ in 0..100 {
        let sent = h.bot.sent();
        if sent.len() >= count {
            return sent;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    h.bot.sent()
}

#[tokio::test]
async fn test_valid_update_is_acknowledged_and_dispatched() {
    let h = harness();
    let update = serde_json::json!({
        "update_id": 1001,
        "message": {
            "message_id": 5,
            "text": "/start",
            "chat": {"id": 321},
            "from": {"id": 321, "username": "bob"}
        }
    });

    let (status, body) = post(app(&h), &format!("/{}", TOKEN), update.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({"status": "ok"}));

    let sent = wait_for_sent(&h, 1).await;
    assert!(matches!(&sent[..], [Sent::Keyboard { chat_id: 321, .. }]));
    assert!(h.registry.contains(321).await);
}

#[tokio::test]
async fn test_malformed_body_gets_error_ack() {
    let h = harness();

    let (status, body) = post(app(&h), &format!("/{}", TOKEN), "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, serde_json::json!({"status": "error"}));
    assert!(h.bot.sent().is_empty());
}

#[tokio::test]
async fn test_update_without_text_is_acknowledged_and_ignored() {
    let h = harness();
    let update = serde_json::json!({
        "update_id": 1002,
        "message": {"message_id": 6, "chat": {"id": 321}}
    });

    let (status, _) = post(app(&h), &format!("/{}", TOKEN), update.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(h.bot.sent().is_empty());
}

#[tokio::test]
async fn test_wrong_path_is_not_found() {
    let h = harness();

    let (status, _) = post(app(&h), "/not-the-token", "{}").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health() {
    let h = harness();
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let response = app(&h).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
