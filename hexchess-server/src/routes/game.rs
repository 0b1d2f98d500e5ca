//! Game API routes: creation and state lookup

use crate::state::{lock_game, ServerState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hexchess_core::{GameError, GameState};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// Player-facing rejection rendered as `{error}` with its status code
pub struct ApiError(pub GameError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        Self(err)
    }
}

#[derive(Serialize)]
pub struct NewGameResponse {
    pub id: String,
}

/// Create a game and return its id
pub async fn new_game(State(state): State<Arc<ServerState>>) -> Json<NewGameResponse> {
    let game = state.create_game();
    let id = lock_game(&game).id().to_string();
    Json(NewGameResponse { id })
}

/// Current state of a game, active or stored
pub async fn get_game(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<GameState>, ApiError> {
    let game = state.get_or_load(&id)?;
    let snapshot = lock_game(&game).state();
    Ok(Json(snapshot))
}
