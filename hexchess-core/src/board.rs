//! Live board: occupancy over the shared tile graph, move execution and
//! end-of-game detection

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GameError, Result};
use crate::game::Outcome;
use crate::graph::{Direction, TileGraph, TileId, TILE_COUNT};
use crate::movegen;
use crate::moves::Move;
use crate::pieces::{Color, Occupant, Piece, STARTING_POSITION};
use crate::projection::ProjectedBoard;

// ============================================================================
// SQUARES
// ============================================================================

/// Mutable per-tile state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Square {
    pub occupant: Option<Occupant>,
    /// The occupant has never moved
    pub initial: bool,
    /// The occupant is a pawn that double-advanced on the previous ply
    pub double_moved: bool,
}

impl Square {
    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    pub fn color(&self) -> Option<Color> {
        self.occupant.map(|occ| occ.color)
    }

    pub fn piece(&self) -> Option<Piece> {
        self.occupant.map(|occ| occ.piece)
    }
}

// ============================================================================
// BOARD
// ============================================================================

#[derive(Clone, Debug)]
pub struct Board {
    graph: Arc<TileGraph>,
    squares: Vec<Square>,
}

impl Board {
    /// Glinsky starting position
    pub fn new() -> Self {
        let mut board = Self::empty();
        for (name, piece, color) in STARTING_POSITION {
            if let Some(id) = board.graph.tile_id(name) {
                board.squares[id] = Square {
                    occupant: Some(Occupant::new(piece, color)),
                    initial: true,
                    double_moved: false,
                };
            }
        }
        board
    }

    pub fn empty() -> Self {
        Self {
            graph: Arc::new(TileGraph::new()),
            squares: vec![Square::default(); TILE_COUNT],
        }
    }

    /// Put a piece on a tile. Placed pieces do not count as unmoved.
    pub fn place(&mut self, name: &str, piece: Piece, color: Color) -> Result<()> {
        let id = self.resolve(name)?;
        self.squares[id] = Square {
            occupant: Some(Occupant::new(piece, color)),
            ..Square::default()
        };
        Ok(())
    }

    pub fn graph(&self) -> &TileGraph {
        &self.graph
    }

    pub(crate) fn shared_graph(&self) -> Arc<TileGraph> {
        Arc::clone(&self.graph)
    }

    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    pub fn tile(&self, name: &str) -> Result<&Square> {
        Ok(&self.squares[self.resolve(name)?])
    }

    pub fn resolve(&self, name: &str) -> Result<TileId> {
        self.graph
            .tile_id(name)
            .ok_or_else(|| GameError::TileNotFound(name.to_string()))
    }

    // ========================================================================
    // LEGALITY
    // ========================================================================

    /// Piece-legality only: `to` is reachable by the occupant of `from`
    pub fn is_move_allowed(&self, from: &str, to: &str) -> Result<bool> {
        let from = self.resolve(from)?;
        let to = self.resolve(to)?;
        Ok(movegen::available_tiles(&self.graph, &self.squares, from).contains(&to))
    }

    /// Destinations of the piece on `from` that do not leave its own king in
    /// check. An empty tile has none.
    pub fn allowed_moves(&self, from: &str) -> Result<Vec<String>> {
        let from = self.resolve(from)?;
        Ok(self
            .allowed_targets(from)
            .into_iter()
            .map(|id| self.graph.name(id).to_string())
            .collect())
    }

    pub(crate) fn allowed_targets(&self, from: TileId) -> Vec<TileId> {
        let Some(occ) = self.squares[from].occupant else {
            return Vec::new();
        };
        let candidates = movegen::available_tiles(&self.graph, &self.squares, from);
        if candidates.is_empty() {
            return candidates;
        }

        let mut projection = ProjectedBoard::new(self);
        candidates
            .into_iter()
            .filter(|&to| !projection.project_move_and_check_check(from, to, occ.color))
            .collect()
    }

    /// Other tiles holding the same piece and color as `from` that could also
    /// reach `to`
    pub fn possible_froms(&self, from: TileId, to: TileId) -> Vec<TileId> {
        let Some(mover) = self.squares[from].occupant else {
            return Vec::new();
        };

        self.graph
            .ids()
            .filter(|&id| id != from && self.squares[id].occupant == Some(mover))
            .filter(|&id| movegen::available_tiles(&self.graph, &self.squares, id).contains(&to))
            .collect()
    }

    pub fn is_king_checked(&self, color: Color) -> bool {
        movegen::is_king_checked(&self.graph, &self.squares, color)
    }

    /// Number of self-check-safe moves available to `color`
    pub fn legal_move_count(&self, color: Color) -> usize {
        self.graph
            .ids()
            .filter(|&id| self.squares[id].color() == Some(color))
            .map(|id| self.allowed_targets(id).len())
            .sum()
    }

    /// [`Outcome::Checkmate`] or [`Outcome::Stalemate`] when `color` has no
    /// legal move, [`Outcome::None`] otherwise
    pub fn check_or_stalemate(&self, color: Color) -> Outcome {
        if self.legal_move_count(color) > 0 {
            Outcome::None
        } else if self.is_king_checked(color) {
            Outcome::Checkmate
        } else {
            Outcome::Stalemate
        }
    }

    // ========================================================================
    // EXECUTION
    // ========================================================================

    /// Execute a piece-legal move, applying en passant, double-advance and
    /// promotion side effects.
    ///
    /// Self-check safety is not enforced here; callers that need it consult
    /// [`Board::allowed_moves`] first. Every rejection happens before the
    /// board is touched.
    pub fn do_move(&mut self, from: &str, to: &str, promotion: Option<&str>) -> Result<Move> {
        let from_id = self.resolve(from)?;
        let to_id = self.resolve(to)?;
        let illegal = || GameError::IllegalMove {
            from: from.to_string(),
            to: to.to_string(),
        };

        let mover = self.squares[from_id].occupant.ok_or_else(illegal)?;
        let possible_froms = self.possible_froms(from_id, to_id);

        if !movegen::available_tiles(&self.graph, &self.squares, from_id).contains(&to_id) {
            return Err(illegal());
        }

        let en_passant = if mover.piece == Piece::Pawn && self.squares[to_id].is_empty() {
            movegen::en_passant_victim(&self.graph, &self.squares, to_id, mover.color)
        } else {
            None
        };

        let promotes = mover.piece == Piece::Pawn
            && mover.color.promotion_tiles().contains(&self.graph.name(to_id));
        let promoted = if promotes {
            let piece = promotion
                .and_then(Piece::from_promotion)
                .ok_or_else(|| GameError::InvalidPromotion(promotion.map(str::to_string)))?;
            Some(piece)
        } else {
            None
        };

        let captured = match en_passant {
            Some(victim) => self.squares[victim].occupant,
            None => self.squares[to_id].occupant,
        };

        // Mutation starts here
        if let Some(victim) = en_passant {
            self.squares[victim] = Square::default();
        }
        for square in &mut self.squares {
            square.double_moved = false;
        }

        let forward = mover.color.forward();
        let double_move =
            mover.piece == Piece::Pawn && self.graph.walk(from_id, &[forward, forward]) == Some(to_id);

        self.squares[to_id] = Square {
            occupant: Some(Occupant::new(promoted.unwrap_or(mover.piece), mover.color)),
            initial: false,
            double_moved: double_move,
        };
        self.squares[from_id] = Square::default();

        let checked = self.is_king_checked(mover.color.opponent());

        debug!(from, to, piece = mover.piece.as_str(), checked, "move applied");

        Ok(Move {
            from: from.to_string(),
            to: to.to_string(),
            color: mover.color,
            piece: mover.piece,
            promotion: promoted,
            capture: captured.is_some(),
            captured_piece: captured.map(|occ| occ.piece),
            captured_color: captured.map(|occ| occ.color),
            en_passant: en_passant.is_some(),
            en_passant_capture_tile: en_passant.map(|id| self.graph.name(id).to_string()),
            possible_froms: possible_froms
                .into_iter()
                .map(|id| self.graph.name(id).to_string())
                .collect(),
            checked,
            mated: false,
            stale: false,
            notation: String::new(),
        })
    }

    // ========================================================================
    // SERIALIZATION
    // ========================================================================

    /// Flat tile list in graph order, neighbors resolved to names
    pub fn serialize(&self) -> Vec<SerializedTile> {
        self.graph
            .ids()
            .map(|id| {
                let square = &self.squares[id];
                let neighbor = |dir| self.graph.neighbor(id, dir).map(|n| self.graph.name(n).to_string());
                SerializedTile {
                    name: self.graph.name(id).to_string(),
                    piece: square.piece(),
                    color: square.color(),
                    gradient: self.graph.gradient(id),
                    is_initial_position: square.initial,
                    previously_double_moved: square.double_moved,
                    directions: TileDirections {
                        top: neighbor(Direction::Top),
                        top_right: neighbor(Direction::TopRight),
                        bottom_right: neighbor(Direction::BottomRight),
                        bottom: neighbor(Direction::Bottom),
                        bottom_left: neighbor(Direction::BottomLeft),
                        top_left: neighbor(Direction::TopLeft),
                    },
                }
            })
            .collect()
    }

    /// Rebuild occupancy and flags from [`Board::serialize`] output.
    ///
    /// Geometry is fixed, so `gradient` and `directions` are ignored. Tiles
    /// absent from the list stay empty.
    pub fn from_serialized(tiles: &[SerializedTile]) -> Result<Self> {
        let mut board = Self::empty();
        for tile in tiles {
            let id = board.resolve(&tile.name)?;
            let occupant = match (tile.piece, tile.color) {
                (Some(piece), Some(color)) => Some(Occupant::new(piece, color)),
                _ => None,
            };
            board.squares[id] = Square {
                occupant,
                initial: tile.is_initial_position,
                double_moved: tile.previously_double_moved,
            };
        }
        Ok(board)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Wire form of one tile
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedTile {
    pub name: String,
    pub piece: Option<Piece>,
    pub color: Option<Color>,
    pub gradient: u8,
    pub is_initial_position: bool,
    pub previously_double_moved: bool,
    pub directions: TileDirections,
}

/// Neighbor names keyed by direction; `null` at the board edge
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileDirections {
    #[serde(rename = "TOP")]
    pub top: Option<String>,
    #[serde(rename = "TOPRIGHT")]
    pub top_right: Option<String>,
    #[serde(rename = "BOTTOMRIGHT")]
    pub bottom_right: Option<String>,
    #[serde(rename = "BOTTOM")]
    pub bottom: Option<String>,
    #[serde(rename = "BOTTOMLEFT")]
    pub bottom_left: Option<String>,
    #[serde(rename = "TOPLEFT")]
    pub top_left: Option<String>,
}
