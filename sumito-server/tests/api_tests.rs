//! Integration tests for the sumito-server relay API

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use sumito_server::{create_router, ServerState};
use tower::ServiceExt;

fn test_app() -> Router {
    let state = Arc::new(ServerState::new());
    create_router(state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(value) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&value).unwrap()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_status_endpoint() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/api/status", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["engine"], "rust");
    assert_eq!(body["rooms"], 0);
}

#[tokio::test]
async fn test_create_join_and_view_room() {
    let app = test_app();

    let (status, created) = send(
        &app,
        "POST",
        "/api/rooms",
        Some(json!({ "mode": "human_vs_human" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["color"], "Black");
    let code = created["room_code"].as_str().unwrap().to_string();
    assert_eq!(code.len(), 6);

    let (status, joined) = send(&app, "POST", &format!("/api/rooms/{code}/join"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(joined["color"], "White");

    // A second guest finds the room full
    let (status, _) = send(&app, "POST", &format!("/api/rooms/{code}/join"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, view) = send(&app, "GET", &format!("/api/rooms/{code}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["to_move"], "Black");
    assert_eq!(view["guest_joined"], true);
    assert_eq!(view["snapshot"]["marbles"].as_array().unwrap().len(), 28);
}

#[tokio::test]
async fn test_unknown_room_is_404() {
    let app = test_app();
    let (status, _) = send(&app, "GET", "/api/rooms/NOPE42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "POST", "/api/rooms/NOPE42/join", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pvp_move_relay() {
    let app = test_app();

    let (_, created) = send(
        &app,
        "POST",
        "/api/rooms",
        Some(json!({ "mode": "human_vs_human" })),
    )
    .await;
    let code = created["room_code"].as_str().unwrap().to_string();
    let host_id = created["player_id"].as_str().unwrap().to_string();

    let (_, joined) = send(&app, "POST", &format!("/api/rooms/{code}/join"), None).await;
    let guest_id = joined["player_id"].as_str().unwrap().to_string();

    // Guest (White) cannot move first
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/rooms/{code}/move"),
        Some(json!({
            "player_id": guest_id,
            "marbles": [{ "q": 2, "r": 0 }],
            "target": { "q": 3, "r": -1 },
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("player to move"));

    // Unknown ids are rejected outright
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/rooms/{code}/move"),
        Some(json!({
            "player_id": "stranger",
            "marbles": [{ "q": -2, "r": 0 }],
            "target": { "q": -3, "r": 1 },
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Host (Black) opens
    let (status, moved) = send(
        &app,
        "POST",
        &format!("/api/rooms/{code}/move"),
        Some(json!({
            "player_id": host_id,
            "marbles": [{ "q": -2, "r": 0 }],
            "target": { "q": -3, "r": 1 },
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["applied"]["player"], "Black");
    assert_eq!(moved["ai_reply"], Value::Null);
    assert_eq!(moved["room"]["to_move"], "White");

    // An illegal target bounces without mutating the board
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/rooms/{code}/move"),
        Some(json!({
            "player_id": guest_id,
            "marbles": [{ "q": 2, "r": 0 }],
            "target": { "q": 0, "r": 0 },
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, view) = send(&app, "GET", &format!("/api/rooms/{code}"), None).await;
    assert_eq!(view["to_move"], "White");
}

#[tokio::test]
async fn test_pvai_room_replies_with_ai_move() {
    let app = test_app();

    let (status, created) = send(
        &app,
        "POST",
        "/api/rooms",
        Some(json!({
            "mode": "human_vs_ai",
            "ai_player": "White",
            "difficulty": "easy",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["color"], "Black");
    let code = created["room_code"].as_str().unwrap().to_string();
    let host_id = created["player_id"].as_str().unwrap().to_string();

    let (status, moved) = send(
        &app,
        "POST",
        &format!("/api/rooms/{code}/move"),
        Some(json!({
            "player_id": host_id,
            "marbles": [{ "q": -2, "r": 0 }],
            "target": { "q": -3, "r": 1 },
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["ai_reply"]["player"], "White");
    // The AI replied, so it is the host's turn again
    assert_eq!(moved["room"]["to_move"], "Black");
}

#[tokio::test]
async fn test_pvai_black_ai_opens() {
    let app = test_app();

    let (status, created) = send(
        &app,
        "POST",
        "/api/rooms",
        Some(json!({
            "mode": "human_vs_ai",
            "ai_player": "Black",
            "difficulty": "easy",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["color"], "White");
    let code = created["room_code"].as_str().unwrap();

    // The AI played the opening move during room creation
    let (_, view) = send(&app, "GET", &format!("/api/rooms/{code}"), None).await;
    assert_eq!(view["to_move"], "White");
}

#[tokio::test]
async fn test_close_room() {
    let app = test_app();
    let (_, created) = send(&app, "POST", "/api/rooms", None).await;
    let code = created["room_code"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "DELETE", &format!("/api/rooms/{code}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["closed"], true);

    let (status, _) = send(&app, "GET", &format!("/api/rooms/{code}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
