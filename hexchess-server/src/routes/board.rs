//! Board geometry endpoint

use axum::Json;
use hexchess_core::{Board, Direction, SerializedTile, TILE_COUNT};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardInfo {
    pub tile_count: usize,
    pub direction_names: Vec<&'static str>,
    /// Starting position, one record per tile
    pub tiles: Vec<SerializedTile>,
}

/// Get board geometry and the starting setup
pub async fn get_board() -> Json<BoardInfo> {
    Json(BoardInfo {
        tile_count: TILE_COUNT,
        direction_names: Direction::ALL.iter().map(|d| d.as_str()).collect(),
        tiles: Board::new().serialize(),
    })
}
