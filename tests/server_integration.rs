//! HTTP-level tests driving the router directly.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use proxx::server::{create_router, AppState};
use proxx::{BoardConfig, CellState, Game, GameRegistry, GameState, Minefield, Position};
use std::sync::Arc;
use tower::ServiceExt; // For `oneshot` method

/// Helper to create a router over a fresh registry
fn create_test_server() -> (Router, Arc<GameRegistry>) {
    let registry = Arc::new(GameRegistry::new(BoardConfig::default()));
    let app = create_router(AppState::new(registry.clone()));
    (app, registry)
}

/// 4x3 board with a single mine in the top-right corner:
///
/// ```text
/// 0 0 1 M
/// 0 0 1 1
/// 0 0 0 0
/// ```
fn seed_game(registry: &GameRegistry, player: &str) {
    let field = Minefield::from_mines(4, 3, [Position::new(3, 0)]);
    registry.insert(Game::from_minefield(field, player));
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Option<String>, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, location, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let (app, _) = create_test_server();
    let (status, _, body) = send(&app, "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_start_game_redirects_to_status_page() {
    let (app, registry) = create_test_server();
    let (status, location, _) = send(&app, "GET", "/").await;

    assert_eq!(status, StatusCode::FOUND);
    let location = location.expect("redirect without location");
    let player = location.strip_prefix("/game/").unwrap();
    assert!(registry.contains(player));

    let (status, _, body) = send(&app, "GET", &location).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("PROXX"));
    assert!(body.contains(player));
}

#[tokio::test]
async fn test_unknown_game_is_not_found() {
    let (app, _) = create_test_server();

    let (status, _, _) = send(&app, "GET", "/game/nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, body) = send(&app, "POST", "/game/nobody/open/1/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "game not found");

    // The game lookup happens before the coordinates are parsed.
    let (status, _, _) = send(&app, "POST", "/game/nobody/flag/x/y").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_coordinates() {
    let (app, registry) = create_test_server();
    seed_game(&registry, "p");

    let (status, _, body) = send(&app, "POST", "/game/p/open/one/1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "wrong coords format");

    let (status, _, _) = send(&app, "POST", "/game/p/unflag/1/1.5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_out_of_range_coordinates() {
    let (app, registry) = create_test_server();
    seed_game(&registry, "p");

    let (status, _, body) = send(&app, "POST", "/game/p/open/15/15").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "coords should be positive and less than board size");

    let (status, _, _) = send(&app, "POST", "/game/p/flag/-1/0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let opened = registry.with_game("p", |game| game.opened_count()).unwrap();
    assert_eq!(opened, 0);
}

#[tokio::test]
async fn test_open_flag_unflag_flow() {
    let (app, registry) = create_test_server();
    seed_game(&registry, "p");

    let (status, location, _) = send(&app, "POST", "/game/p/flag/3/0").await;
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(location.as_deref(), Some("/game/p"));

    let (status, _, _) = send(&app, "POST", "/game/p/unflag/3/0").await;
    assert_eq!(status, StatusCode::FOUND);
    let cell = registry
        .with_game("p", |game| game.cell_state(Position::new(3, 0)))
        .unwrap();
    assert_eq!(cell, Some(CellState::Covered));

    let (status, _, _) = send(&app, "POST", "/game/p/open/0/2").await;
    assert_eq!(status, StatusCode::FOUND);

    let (status, _, body) = send(&app, "GET", "/game/p/state").await;
    assert_eq!(status, StatusCode::OK);
    let view: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(view["state"], "Won");
    assert_eq!(view["width"], 4);
    assert_eq!(view["rows"][0][2], serde_json::json!({ "opened": 1 }));
    assert_eq!(view["rows"][0][3], "mine");
}

#[tokio::test]
async fn test_moves_after_loss_are_rejected() {
    let (app, registry) = create_test_server();
    seed_game(&registry, "p");

    let (status, _, _) = send(&app, "POST", "/game/p/open/3/0").await;
    assert_eq!(status, StatusCode::FOUND);
    let state = registry.with_game("p", |game| game.state()).unwrap();
    assert_eq!(state, GameState::Lost);

    let (status, _, body) = send(&app, "POST", "/game/p/open/0/0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "coords should be positive and less than board size");

    let (status, _, body) = send(&app, "GET", "/game/p").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Game over"));
}

#[tokio::test]
async fn test_invalid_defaults_reject_new_games() {
    let registry = Arc::new(GameRegistry::new(BoardConfig {
        width: 3,
        height: 3,
        mines: 9,
    }));
    let app = create_router(AppState::new(registry.clone()));

    let (status, _, body) = send(&app, "GET", "/").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "count of mines should be positive and less than board size");
    assert!(registry.is_empty());
}
