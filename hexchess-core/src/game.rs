//! Game sessions: seats, turn order, history, end detection and persistence
//!
//! A [`Game`] owns its [`Board`] and the two player seats. Every state
//! change is pushed to the seated players through their [`Connection`] and
//! written to the attached [`GameStore`]. Storage failures are logged and
//! otherwise ignored.

use std::sync::Arc;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::board::{Board, SerializedTile};
use crate::error::{GameError, Result};
use crate::moves::{Move, MoveRequest};
use crate::pieces::Color;
use crate::store::{GameRecord, GameStore};

/// Random bytes per player token (hex-encoded on the wire)
const TOKEN_BYTES: usize = 48;

// ============================================================================
// CORE TYPES
// ============================================================================

/// How a game ended
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Still running
    #[default]
    #[serde(rename = "")]
    None,
    Checkmate,
    Stalemate,
    Forfeit,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::None => "",
            Outcome::Checkmate => "checkmate",
            Outcome::Stalemate => "stalemate",
            Outcome::Forfeit => "forfeit",
        }
    }
}

/// Outbound transport handle of a seated player
pub trait Connection: Send + Sync {
    fn send(&self, event: &ServerEvent);

    /// Hang up; no further events will be sent
    fn close(&self);
}

/// Messages pushed to clients
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    Joined { color: Color, token: String },
    GameUpdate(GameState),
    AllowedMoves { from: String, allowed: Vec<String> },
    Error { status: u16, error: String },
}

impl From<&GameError> for ServerEvent {
    fn from(err: &GameError) -> Self {
        ServerEvent::Error {
            status: err.status(),
            error: err.to_string(),
        }
    }
}

/// Snapshot pushed on every state change
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub id: String,
    pub current_to_move: Color,
    pub board: Vec<SerializedTile>,
    pub awaiting_player: bool,
    pub moves: Vec<Move>,
    pub finished: bool,
    pub outcome: Outcome,
    pub winner: Option<Color>,
}

/// A seat and the credentials needed to reclaim it
pub struct Player {
    pub color: Color,
    pub token: String,
    connection: Option<Box<dyn Connection>>,
}

impl Player {
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("color", &self.color)
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}

/// Credentials handed to a newly seated player
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Seat {
    pub color: Color,
    pub token: String,
}

// ============================================================================
// GAME
// ============================================================================

pub struct Game {
    id: String,
    board: Board,
    current_turn: Color,
    white: Option<Player>,
    black: Option<Player>,
    finished: bool,
    winner: Option<Color>,
    outcome: Outcome,
    moves: Vec<Move>,
    store: Option<Arc<dyn GameStore>>,
    rng: ChaCha20Rng,
}

impl Game {
    /// Fresh game from the starting position with a random id
    pub fn new() -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self::with_board(id, Board::new())
    }

    /// Start from an arbitrary position, White to move
    pub fn with_board(id: impl Into<String>, board: Board) -> Self {
        Self {
            id: id.into(),
            board,
            current_turn: Color::White,
            white: None,
            black: None,
            finished: false,
            winner: None,
            outcome: Outcome::None,
            moves: Vec::new(),
            store: None,
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    /// Persist every change into `store`
    pub fn with_store(mut self, store: Arc<dyn GameStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_turn(&self) -> Color {
        self.current_turn
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn player(&self, color: Color) -> Option<&Player> {
        match color {
            Color::White => self.white.as_ref(),
            Color::Black => self.black.as_ref(),
        }
    }

    fn seat_mut(&mut self, color: Color) -> &mut Option<Player> {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    pub fn both_players_joined(&self) -> bool {
        self.white.is_some() && self.black.is_some()
    }

    // ========================================================================
    // SEATS
    // ========================================================================

    /// Seat a new player (White first, then Black) and hand out a token
    pub fn register_player(&mut self, connection: Box<dyn Connection>) -> Result<Seat> {
        if self.finished {
            return Err(GameError::GameFinished);
        }

        let color = if self.white.is_none() {
            Color::White
        } else if self.black.is_none() {
            Color::Black
        } else {
            warn!(game = %self.id, "join rejected, seats full");
            return Err(GameError::SeatsFull);
        };

        let token = self.generate_token();
        *self.seat_mut(color) = Some(Player {
            color,
            token: token.clone(),
            connection: Some(connection),
        });

        info!(game = %self.id, color = color.as_str(), "player registered");
        self.welcome(color, &token);
        self.save();

        Ok(Seat { color, token })
    }

    /// Re-attach a connection to a previously registered seat
    pub fn login(&mut self, color: Color, token: &str, connection: Box<dyn Connection>) -> Result<()> {
        if self.finished {
            return Err(GameError::GameFinished);
        }
        if !self.player(color).is_some_and(|p| p.token == token) {
            warn!(game = %self.id, color = color.as_str(), "login rejected");
            return Err(GameError::Unauthorized);
        }

        if let Some(player) = self.seat_mut(color) {
            player.connection = Some(connection);
        }

        info!(game = %self.id, color = color.as_str(), "player reconnected");
        self.welcome(color, token);
        Ok(())
    }

    fn welcome(&self, color: Color, token: &str) {
        if let Some(conn) = self.player(color).and_then(|p| p.connection.as_ref()) {
            conn.send(&ServerEvent::Joined {
                color,
                token: token.to_string(),
            });
        }
        self.broadcast();
    }

    fn generate_token(&mut self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        self.rng.fill_bytes(&mut bytes);
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    // ========================================================================
    // PLAY
    // ========================================================================

    /// Self-check-safe destinations for `color`'s piece on `tile`, served
    /// only on that color's turn
    pub fn allowed_moves(&self, color: Color, tile: &str) -> Result<Vec<String>> {
        self.ensure_can_act(color, tile)?;
        self.board.allowed_moves(tile)
    }

    /// Play a move for `color`, then broadcast and persist
    pub fn do_move(
        &mut self,
        color: Color,
        from: &str,
        to: &str,
        promotion: Option<&str>,
    ) -> Result<Move> {
        self.ensure_can_act(color, from)?;
        let mv = self.apply_move(from, to, promotion)?;

        debug!(game = %self.id, notation = %mv.notation, "ply recorded");
        self.broadcast();
        self.save();
        if self.finished {
            info!(
                game = %self.id,
                outcome = self.outcome.as_str(),
                winner = ?self.winner,
                "game finished"
            );
            self.teardown();
        }

        Ok(mv)
    }

    /// End the game in favour of the other color
    pub fn forfeit(&mut self, color: Color) -> Result<()> {
        if self.finished {
            return Err(GameError::GameFinished);
        }

        self.finished = true;
        self.outcome = Outcome::Forfeit;
        self.winner = Some(color.opponent());

        info!(game = %self.id, color = color.as_str(), "player forfeited");
        self.broadcast();
        self.save();
        self.teardown();
        Ok(())
    }

    fn ensure_can_act(&self, color: Color, tile: &str) -> Result<()> {
        if self.finished {
            return Err(GameError::GameFinished);
        }
        if color != self.current_turn {
            return Err(GameError::NotYourTurn);
        }
        if self.board.tile(tile)?.color() != Some(color) {
            return Err(GameError::NotYourPiece(tile.to_string()));
        }
        Ok(())
    }

    /// Validate against the self-check filter, execute, switch turns and
    /// settle the game if the new side to move is out of moves
    fn apply_move(&mut self, from: &str, to: &str, promotion: Option<&str>) -> Result<Move> {
        if !self.board.allowed_moves(from)?.iter().any(|t| t == to) {
            self.board.resolve(to)?;
            return Err(GameError::IllegalMove {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        let mut mv = self.board.do_move(from, to, promotion)?;

        self.current_turn = self.current_turn.opponent();
        let status = self.board.check_or_stalemate(self.current_turn);
        mv.mated = status == Outcome::Checkmate;
        mv.stale = status == Outcome::Stalemate;
        if status != Outcome::None {
            self.finished = true;
            self.outcome = status;
            self.winner = Some(self.current_turn.opponent());
        }

        mv.annotate();
        self.moves.push(mv.clone());
        Ok(mv)
    }

    // ========================================================================
    // OUTPUT
    // ========================================================================

    pub fn state(&self) -> GameState {
        GameState {
            id: self.id.clone(),
            current_to_move: self.current_turn,
            board: self.board.serialize(),
            awaiting_player: !self.both_players_joined(),
            moves: self.moves.clone(),
            finished: self.finished,
            outcome: self.outcome,
            winner: self.winner,
        }
    }

    fn broadcast(&self) {
        let event = ServerEvent::GameUpdate(self.state());
        for player in [&self.white, &self.black].into_iter().flatten() {
            if let Some(conn) = &player.connection {
                conn.send(&event);
            }
        }
    }

    /// Hang up on both seats; tokens are kept for the record
    fn teardown(&mut self) {
        for player in [&mut self.white, &mut self.black].into_iter().flatten() {
            if let Some(conn) = player.connection.take() {
                conn.close();
            }
        }
    }

    // ========================================================================
    // PERSISTENCE
    // ========================================================================

    pub fn record(&self) -> GameRecord {
        GameRecord {
            id: self.id.clone(),
            finished: self.finished,
            winner: self.winner,
            outcome: self.outcome,
            moves: self.moves.iter().map(Move::request).collect(),
            white_token: self.white.as_ref().map(|p| p.token.clone()),
            black_token: self.black.as_ref().map(|p| p.token.clone()),
        }
    }

    /// Write the current record to the attached store, if any
    pub fn save(&self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(err) = store.save(&self.record()) {
            warn!(game = %self.id, error = %err, "failed to persist game");
        }
    }

    /// Rebuild a game by replaying its recorded plies from the starting
    /// position. Seats come back disconnected with their saved tokens.
    pub fn restore(record: &GameRecord) -> Result<Self> {
        let mut game = Self::with_id(record.id.clone());

        for MoveRequest { from, to, promotion_piece } in &record.moves {
            game.ensure_can_act(game.current_turn, from)?;
            game.apply_move(from, to, promotion_piece.as_deref())?;
        }

        game.white = record.white_token.clone().map(|token| Player {
            color: Color::White,
            token,
            connection: None,
        });
        game.black = record.black_token.clone().map(|token| Player {
            color: Color::Black,
            token,
            connection: None,
        });

        // Forfeits leave no trace in the ply list
        if record.finished {
            game.finished = true;
            game.outcome = record.outcome;
            game.winner = record.winner;
        }

        debug!(game = %game.id, plies = game.moves.len(), "game restored");
        Ok(game)
    }

    /// Look a game up in `store` and restore it, keeping the store attached
    pub fn load(id: &str, store: Arc<dyn GameStore>) -> Result<Self> {
        let record = match store.load(id) {
            Ok(Some(record)) => record,
            Ok(None) => return Err(GameError::GameNotFound(id.to_string())),
            Err(err) => {
                warn!(game = %id, error = %err, "failed to load game");
                return Err(GameError::GameNotFound(id.to_string()));
            }
        };

        Ok(Self::restore(&record)?.with_store(store))
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("id", &self.id)
            .field("current_turn", &self.current_turn)
            .field("white", &self.white)
            .field("black", &self.black)
            .field("outcome", &self.outcome)
            .field("plies", &self.moves.len())
            .finish_non_exhaustive()
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
