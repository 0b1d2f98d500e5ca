//! Integration tests for hexchess-server API

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use hexchess_core::{Color, GameStore, MemoryStore};
use hexchess_server::{create_router, lock_game, ServerConfig, ServerState};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> (axum::Router, Arc<ServerState>) {
    let config = ServerConfig::default();
    let state = Arc::new(ServerState::default());
    (create_router(&config, state.clone()), state)
}

async fn send(app: axum::Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_status_endpoint() {
    let (app, state) = test_app();
    state.create_game();

    let (status, json) = send(app, "GET", "/api/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["engine"], "rust");
    assert_eq!(json["activeGames"], 1);
}

#[tokio::test]
async fn test_board_endpoint() {
    let (app, _) = test_app();

    let (status, json) = send(app, "GET", "/api/board").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["tileCount"], 91);
    assert_eq!(json["directionNames"][0], "TOP");

    let tiles = json["tiles"].as_array().unwrap();
    assert_eq!(tiles.len(), 91);
    let king = tiles.iter().find(|t| t["name"] == "g1").unwrap();
    assert_eq!(king["piece"], "king");
    assert_eq!(king["color"], "white");
    assert_eq!(king["isInitialPosition"], true);
}

#[tokio::test]
async fn test_new_game_post_and_get() {
    let (app, state) = test_app();

    let (status, json) = send(app.clone(), "POST", "/api/game/new").await;
    assert_eq!(status, StatusCode::OK);
    let id = json["id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 36, "uuid v4 string");

    let (status, json) = send(app, "GET", "/api/game/new").await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(json["id"].as_str().unwrap(), id);

    assert_eq!(state.active_games(), 2);
    assert!(state.store().load(&id).unwrap().is_some());
}

#[tokio::test]
async fn test_game_state_endpoint() {
    let (app, state) = test_app();
    let game = state.create_game_with_id("state-check");
    lock_game(&game)
        .do_move(Color::White, "e4", "e6", None)
        .unwrap();

    let (status, json) = send(app, "GET", "/api/game/state-check").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], "state-check");
    assert_eq!(json["currentToMove"], "black");
    assert_eq!(json["awaitingPlayer"], true);
    assert_eq!(json["finished"], false);
    assert_eq!(json["outcome"], "");
    assert_eq!(json["moves"][0]["notation"], "e6");
    assert_eq!(json["board"].as_array().unwrap().len(), 91);
}

#[tokio::test]
async fn test_unknown_game_is_404() {
    let (app, _) = test_app();

    let (status, json) = send(app, "GET", "/api/game/does-not-exist").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "game not found: does-not-exist");
}

#[tokio::test]
async fn test_stored_game_is_reloaded() {
    let store = Arc::new(MemoryStore::new());

    let first = ServerState::new(store.clone());
    let game = first.create_game_with_id("survivor");
    lock_game(&game)
        .do_move(Color::White, "f5", "f6", None)
        .unwrap();

    // A fresh server over the same store
    let state = Arc::new(ServerState::new(store));
    let app = create_router(&ServerConfig::default(), state.clone());
    assert_eq!(state.active_games(), 0);

    let (status, json) = send(app, "GET", "/api/game/survivor").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["currentToMove"], "black");
    assert_eq!(json["moves"].as_array().unwrap().len(), 1);
    assert_eq!(state.active_games(), 1);
}
