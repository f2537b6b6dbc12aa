//! HTTP interface.
//!
//! ```text
//! GET  /                              - Start a new game, redirect to its page
//! GET  /health                        - Health check
//! GET  /game/{player}                 - HTML status page
//! GET  /game/{player}/state           - JSON snapshot
//! POST /game/{player}/open/{x}/{y}    - Open a cell
//! POST /game/{player}/flag/{x}/{y}    - Flag a cell
//! POST /game/{player}/unflag/{x}/{y}  - Remove a flag
//! ```
//!
//! Cell routes redirect back to the status page on success.

use crate::render::{status_page, GameView};
use crate::{Action, GameError, GameRegistry, Position, RegistryError};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<GameRegistry>,
}

impl AppState {
    pub fn new(registry: Arc<GameRegistry>) -> Self {
        Self { registry }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(start_game))
        .route("/health", get(health_check))
        .route("/game/{player}", get(status))
        .route("/game/{player}/state", get(game_state))
        .route("/game/{player}/open/{x}/{y}", post(open_cell))
        .route("/game/{player}/flag/{x}/{y}", post(flag_cell))
        .route("/game/{player}/unflag/{x}/{y}", post(unflag_cell))
        .with_state(state)
}

/// Errors a request can end with.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("game not found")]
    GameNotFound,
    #[error("wrong coords format")]
    WrongCoordsFormat,
    #[error(transparent)]
    Game(#[from] GameError),
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::GameNotFound(_) => ApiError::GameNotFound,
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::GameNotFound => StatusCode::NOT_FOUND,
            ApiError::WrongCoordsFormat | ApiError::Game(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}

async fn health_check() -> &'static str {
    "OK"
}

async fn start_game(State(state): State<AppState>) -> Result<Response, ApiError> {
    let player = state.registry.start_game().map_err(|err| {
        warn!(error = %err, "failed to start game");
        ApiError::from(err)
    })?;
    Ok(redirect_to_game(&player))
}

async fn status(
    State(state): State<AppState>,
    Path(player): Path<String>,
) -> Result<Html<String>, ApiError> {
    let page = state
        .registry
        .with_game(&player, |game| status_page(game))
        .inspect_err(|err| warn!(player = %player, error = %err, "status request failed"))?;
    Ok(Html(page))
}

async fn game_state(
    State(state): State<AppState>,
    Path(player): Path<String>,
) -> Result<Json<GameView>, ApiError> {
    let view = state
        .registry
        .with_game(&player, |game| GameView::new(game))
        .inspect_err(|err| warn!(player = %player, error = %err, "state request failed"))?;
    Ok(Json(view))
}

async fn open_cell(
    State(state): State<AppState>,
    Path((player, x, y)): Path<(String, String, String)>,
) -> Result<Response, ApiError> {
    apply_action(&state, &player, &x, &y, Action::Open)
}

async fn flag_cell(
    State(state): State<AppState>,
    Path((player, x, y)): Path<(String, String, String)>,
) -> Result<Response, ApiError> {
    apply_action(&state, &player, &x, &y, Action::Flag)
}

async fn unflag_cell(
    State(state): State<AppState>,
    Path((player, x, y)): Path<(String, String, String)>,
) -> Result<Response, ApiError> {
    apply_action(&state, &player, &x, &y, Action::Unflag)
}

/// Looks the game up first, then parses the coordinates, then plays the move.
fn apply_action(
    state: &AppState,
    player: &str,
    x: &str,
    y: &str,
    action: Action,
) -> Result<Response, ApiError> {
    let outcome = state
        .registry
        .with_game(player, |game| -> Result<_, ApiError> {
            let pos = parse_coords(x, y)?;
            game.perform_action(pos, action)?;
            Ok(game.state())
        })
        .map_err(ApiError::from)
        .and_then(|result| result);

    match outcome {
        Ok(game_state) => {
            info!(player, ?action, x, y, state = ?game_state, "move played");
            Ok(redirect_to_game(player))
        }
        Err(err) => {
            warn!(player, ?action, x, y, error = %err, "move rejected");
            Err(err)
        }
    }
}

fn parse_coords(x: &str, y: &str) -> Result<Position, ApiError> {
    let x = x.parse().map_err(|_| ApiError::WrongCoordsFormat)?;
    let y = y.parse().map_err(|_| ApiError::WrongCoordsFormat)?;
    Ok(Position::new(x, y))
}

fn redirect_to_game(player: &str) -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, format!("/game/{player}"))],
    )
        .into_response()
}
