//! HEXCHESS Core - Glinsky hexagonal chess engine and game sessions
//!
//! This crate provides:
//! - Board geometry (91-tile hex graph with named tiles)
//! - Piece types, movement patterns and move generation
//! - Check, checkmate and stalemate detection
//! - Move execution with en passant, double advance and promotion
//! - Algebraic notation for played moves
//! - Two-player game sessions with persistence

pub mod board;
pub mod error;
pub mod game;
pub mod graph;
pub mod movegen;
pub mod moves;
pub mod pieces;
pub mod projection;
pub mod store;

// Re-exports for convenient access
pub use board::{Board, SerializedTile, Square, TileDirections};
pub use error::{GameError, Result, StoreError};
pub use game::{Connection, Game, GameState, Outcome, Player, Seat, ServerEvent};
pub use graph::{Direction, TileGraph, TileId, TILE_COUNT};
pub use moves::{Move, MoveRequest};
pub use pieces::{Color, Occupant, Piece};
pub use projection::ProjectedBoard;
pub use store::{GameRecord, GameStore, JsonFileStore, MemoryStore};
