//! HTTP API tests using the Router::oneshot pattern.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use std::sync::Arc;
use strictly_arena::{GameAuthority, MatchId, router};
use tower::ServiceExt;

fn test_router() -> (Arc<GameAuthority>, Router) {
    let authority = Arc::new(GameAuthority::default());
    (Arc::clone(&authority), router(authority))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = match body {
        Some(body) => request.body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Request failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Body is not JSON")
    };
    (status, value)
}

/// Sends a raw, possibly malformed, JSON body.
async fn send_raw(app: &Router, uri: &str, body: &'static str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .expect("Failed to build request");
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Request failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let value = serde_json::from_slice(&bytes).expect("Body is not JSON");
    (status, value)
}

async fn start_match(app: &Router) {
    let (status, _) = send(
        app,
        "POST",
        "/matches/42/propose",
        Some(json!({"caller": "host", "stake": 10000})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(
        app,
        "POST",
        "/matches/42/accept",
        Some(json!({"caller": "challenger", "stake": 10000})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_propose_returns_ack() {
    let (_, app) = test_router();
    let (status, body) = send(
        &app,
        "POST",
        "/matches/42/propose",
        Some(json!({"caller": "host", "stake": 10000})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["match_id"], 42);
    assert_eq!(body["events"][0]["event"], "ProposeGame");
    assert_eq!(body["events"][0]["host"], "host");
}

#[tokio::test]
async fn test_status_and_board_routes() {
    let (_, app) = test_router();
    start_match(&app).await;

    let (status, body) = send(&app, "GET", "/matches/42/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "Active", "code": 2}));

    let (status, body) = send(&app, "GET", "/matches/42", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["turn"], "Challenger");
    assert_eq!(body["challenger_army"].as_array().map(Vec::len), Some(4));

    let (status, body) = send(&app, "GET", "/matches", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([42]));
}

#[tokio::test]
async fn test_move_and_error_mapping() {
    let (authority, app) = test_router();
    start_match(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/matches/42/moves",
        Some(json!({"caller": "host", "soldier_id": 0, "x": 3, "y": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "NotYourTurn");

    let (status, body) = send(
        &app,
        "POST",
        "/matches/42/moves",
        Some(json!({"caller": "challenger", "soldier_id": 1, "x": 2, "y": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "InvalidDestination");

    let (status, body) = send(
        &app,
        "POST",
        "/matches/42/moves",
        Some(json!({"caller": "challenger", "soldier_id": 3, "x": 2, "y": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["events"][0]["event"], "MoveSoldier");
    assert_eq!(body["events"][0]["captured"], 3);

    let (status, body) = send(
        &app,
        "POST",
        "/matches/42/claim",
        Some(json!({"caller": "challenger"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "NotConcluded");

    let (status, body) = send(&app, "GET", "/matches/7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchMatch");

    assert_eq!(authority.match_ids().len(), 1);
}

#[tokio::test]
async fn test_schema_route_lists_bodies() {
    let (_, app) = test_router();
    let (status, body) = send(&app, "GET", "/schema", None).await;
    assert_eq!(status, StatusCode::OK);
    for key in ["propose", "accept", "moves", "claim", "status"] {
        assert!(body.get(key).is_some(), "missing schema for {key}");
    }
    assert!(body["moves"]["properties"].get("soldier_id").is_some());
}

#[tokio::test]
async fn test_out_of_range_coordinates_are_invalid_destinations() {
    let (authority, app) = test_router();
    start_match(&app).await;
    let before = authority.get_board(MatchId(42)).expect("Board failed");

    for (x, y) in [(-1, 3), (256, 3), (1, -7), (1, 1_000_000)] {
        let (status, body) = send(
            &app,
            "POST",
            "/matches/42/moves",
            Some(json!({"caller": "challenger", "soldier_id": 0, "x": x, "y": y})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "({x}, {y})");
        assert_eq!(body["error"], "InvalidDestination", "({x}, {y})");
    }

    // Turn order still wins over the destination check.
    let (status, body) = send(
        &app,
        "POST",
        "/matches/42/moves",
        Some(json!({"caller": "host", "soldier_id": 0, "x": -1, "y": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "NotYourTurn");

    assert_eq!(
        authority.get_board(MatchId(42)).expect("Board failed"),
        before
    );
}

#[tokio::test]
async fn test_malformed_requests_get_error_bodies() {
    let (_, app) = test_router();

    let (status, body) = send_raw(&app, "/matches/42/propose", "{\"caller\": ").await;
    assert!(status.is_client_error());
    assert_eq!(body["error"], "InvalidBody");
    assert!(body["message"].is_string());

    let (status, body) = send_raw(&app, "/matches/42/propose", "{\"caller\": \"host\"}").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "InvalidBody");

    let (status, body) = send(&app, "GET", "/matches/not-a-number", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidPath");

    let (status, body) = send_raw(
        &app,
        "/matches/-3/accept",
        "{\"caller\": \"challenger\", \"stake\": 1}",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidPath");
}
