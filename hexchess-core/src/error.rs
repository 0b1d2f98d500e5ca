//! Error types for the rules engine and game sessions

use thiserror::Error;

/// Player-facing rejection of a request against a board or game.
///
/// Every variant is raised before any state is touched, so a caller that
/// receives one can report it and carry on with the game unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("tile not found: {0}")]
    TileNotFound(String),

    #[error("move from {from} to {to} is not allowed")]
    IllegalMove { from: String, to: String },

    #[error("invalid promotion piece: {0:?}")]
    InvalidPromotion(Option<String>),

    #[error("both seats in the game are taken")]
    SeatsFull,

    #[error("unauthorized")]
    Unauthorized,

    #[error("game not found: {0}")]
    GameNotFound(String),

    #[error("it is not your turn")]
    NotYourTurn,

    #[error("tile {0} does not hold one of your pieces")]
    NotYourPiece(String),

    #[error("game is already finished")]
    GameFinished,
}

impl GameError {
    /// HTTP-like status code used on the wire for `error` events
    pub fn status(&self) -> u16 {
        match self {
            GameError::Unauthorized => 401,
            GameError::GameNotFound(_) => 404,
            GameError::SeatsFull => 409,
            _ => 400,
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;

/// Failure reading or writing a persisted game record.
///
/// Never shown to players; sessions log it and keep playing.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid game id: {0:?}")]
    InvalidId(String),
}
