//! Throwaway occupancy copy for self-check tests

use std::sync::Arc;

use crate::board::{Board, Square};
use crate::graph::{TileGraph, TileId};
use crate::movegen;
use crate::pieces::Color;

/// Copy of a board's occupancy that hypothetical moves are played on.
///
/// The tile graph is shared with the source board; only the squares are
/// cloned, so building one costs a single 91-element copy.
pub struct ProjectedBoard {
    graph: Arc<TileGraph>,
    squares: Vec<Square>,
}

impl ProjectedBoard {
    pub fn new(board: &Board) -> Self {
        Self {
            graph: board.shared_graph(),
            squares: board.squares().to_vec(),
        }
    }

    /// Relocate the piece on `from` to `to` (no special-move handling),
    /// report whether `color`'s king is then in check, and put both tiles
    /// back as they were.
    pub fn project_move_and_check_check(&mut self, from: TileId, to: TileId, color: Color) -> bool {
        let saved_from = self.squares[from];
        let saved_to = self.squares[to];

        self.squares[to].occupant = saved_from.occupant;
        self.squares[from].occupant = None;

        let checked = movegen::is_king_checked(&self.graph, &self.squares, color);

        self.squares[from] = saved_from;
        self.squares[to] = saved_to;

        checked
    }

    pub fn squares(&self) -> &[Square] {
        &self.squares
    }
}
