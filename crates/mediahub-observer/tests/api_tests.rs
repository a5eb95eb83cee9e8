//! Integration tests for the Observer API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. This validates handler logic and routing
//! without needing a live network connection.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::DateTime;
use mediahub_observer::router::build_router;
use mediahub_observer::state::AppState;
use mediahub_types::{ActivityEvent, EventId, EventKind};
use serde_json::Value;
use tower::ServiceExt;

fn event(collection: &str, key: &str, kind: EventKind, epoch: i64) -> ActivityEvent {
    ActivityEvent {
        id: EventId::scoped(collection, key),
        kind,
        title: format!("{collection} {key}"),
        description: String::from("something happened"),
        occurred_at: DateTime::from_timestamp(epoch, 0).unwrap(),
    }
}

async fn make_test_state() -> Arc<AppState> {
    let state = Arc::new(AppState::new());

    // Publish a small feed snapshot, newest first.
    {
        let mut feed = state.feed.write().await;
        feed.push(event("media", "m1", EventKind::Media, 100));
        feed.push(event("channels", "c1", EventKind::Channel, 80));
        feed.push(event("messages", "n1", EventKind::Message, 60));
    }

    state
}

async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, Value) {
    let router = build_router(state);
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn index_serves_status_page() {
    let state = make_test_state().await;
    let router = build_router(state);

    let response = router
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Media Hub Observer"));
}

#[tokio::test]
async fn feed_endpoint_returns_entries_with_icons() {
    let state = make_test_state().await;
    let (status, json) = get(state, "/api/feed").await;

    assert_eq!(status, StatusCode::OK);
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 3);

    // Entries keep the published order (newest first) and carry icons.
    assert_eq!(entries[0]["id"], "media:m1");
    assert_eq!(entries[0]["icon"], "image");
    assert_eq!(entries[1]["icon"], "broadcast");
    assert_eq!(entries[2]["icon"], "message-bubble");
}

#[tokio::test]
async fn feed_endpoint_is_empty_before_first_publish() {
    let state = Arc::new(AppState::new());
    let (status, json) = get(state, "/api/feed").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn single_entry_lookup_by_scoped_id() {
    let state = make_test_state().await;
    let (status, json) = get(state, "/api/feed/channels:c1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], "channels:c1");
    assert_eq!(json["kind"], "channel");
    assert_eq!(json["icon"], "broadcast");
}

#[tokio::test]
async fn unknown_entry_returns_not_found() {
    let state = make_test_state().await;
    let (status, json) = get(state, "/api/feed/media:ghost").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
}
