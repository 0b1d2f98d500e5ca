//! Piece and color definitions, movement patterns

use serde::{Deserialize, Serialize};

use crate::graph::Direction::{self, Bottom, BottomLeft, BottomRight, Top, TopLeft, TopRight};

/// Side to move / piece owner
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Direction pawns of this color advance in
    pub fn forward(self) -> Direction {
        match self {
            Color::White => Top,
            Color::Black => Bottom,
        }
    }

    /// The two directions pawns of this color capture in
    pub fn pawn_captures(self) -> [Direction; 2] {
        match self {
            Color::White => [TopLeft, TopRight],
            Color::Black => [BottomLeft, BottomRight],
        }
    }

    /// Tiles on which a pawn of this color promotes
    pub fn promotion_tiles(self) -> &'static [&'static str; 11] {
        match self {
            Color::White => &WHITE_PROMOTION_TILES,
            Color::Black => &BLACK_PROMOTION_TILES,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }
}

impl std::str::FromStr for Color {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "white" => Ok(Color::White),
            "black" => Ok(Color::Black),
            _ => Err(()),
        }
    }
}

/// Piece kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Piece {
    King,
    Queen,
    Bishop,
    Knight,
    Rook,
    Pawn,
}

impl Piece {
    /// Pieces whose attack on a king is found by running their own
    /// generator from the king's tile
    pub const SYMMETRIC_ATTACKERS: [Piece; 5] =
        [Piece::Queen, Piece::Bishop, Piece::Knight, Piece::Rook, Piece::King];

    /// Letter used in move notation (pawns have none)
    pub fn notation(self) -> &'static str {
        match self {
            Piece::King => "K",
            Piece::Queen => "Q",
            Piece::Bishop => "B",
            Piece::Knight => "N",
            Piece::Rook => "R",
            Piece::Pawn => "",
        }
    }

    /// Parse the promotion argument of a move request.
    ///
    /// Clients historically send `"bischop"`; the correct spelling is
    /// accepted as well.
    pub fn from_promotion(keyword: &str) -> Option<Self> {
        match keyword {
            "rook" => Some(Piece::Rook),
            "knight" => Some(Piece::Knight),
            "bischop" | "bishop" => Some(Piece::Bishop),
            "queen" => Some(Piece::Queen),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Piece::King => "king",
            Piece::Queen => "queen",
            Piece::Bishop => "bishop",
            Piece::Knight => "knight",
            Piece::Rook => "rook",
            Piece::Pawn => "pawn",
        }
    }
}

/// A piece standing on a tile
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupant {
    pub piece: Piece,
    pub color: Color,
}

impl Occupant {
    pub const fn new(piece: Piece, color: Color) -> Self {
        Self { piece, color }
    }
}

// ============================================================================
// MOVEMENT PATTERNS
// ============================================================================

/// Rook lines: the six primary directions
pub const ROOK_PATHS: [&[Direction]; 6] = [
    &[Top],
    &[TopLeft],
    &[TopRight],
    &[Bottom],
    &[BottomLeft],
    &[BottomRight],
];

/// Bishop lines: two-direction compounds, each one hex step along a diagonal
pub const BISHOP_PATHS: [&[Direction]; 6] = [
    &[Top, TopRight],
    &[Top, TopLeft],
    &[BottomLeft, TopLeft],
    &[BottomLeft, Bottom],
    &[BottomRight, TopRight],
    &[BottomRight, Bottom],
];

/// Knight jumps: two steps in one direction then one step to the side
pub const KNIGHT_PATHS: [&[Direction]; 12] = [
    &[Top, Top, TopRight],
    &[Top, Top, TopLeft],
    &[TopLeft, TopLeft, Top],
    &[TopLeft, TopLeft, BottomLeft],
    &[TopRight, TopRight, Top],
    &[TopRight, TopRight, BottomRight],
    &[Bottom, Bottom, BottomLeft],
    &[Bottom, Bottom, BottomRight],
    &[BottomLeft, BottomLeft, TopLeft],
    &[BottomLeft, BottomLeft, Bottom],
    &[BottomRight, BottomRight, TopRight],
    &[BottomRight, BottomRight, Bottom],
];

/// Glinsky starting position: (tile, piece, color)
pub const STARTING_POSITION: [(&str, Piece, Color); 36] = [
    ("f11", Piece::Bishop, Color::Black),
    ("f10", Piece::Bishop, Color::Black),
    ("f9", Piece::Bishop, Color::Black),
    ("e10", Piece::Queen, Color::Black),
    ("g10", Piece::King, Color::Black),
    ("d9", Piece::Knight, Color::Black),
    ("h9", Piece::Knight, Color::Black),
    ("c8", Piece::Rook, Color::Black),
    ("i8", Piece::Rook, Color::Black),
    ("b7", Piece::Pawn, Color::Black),
    ("c7", Piece::Pawn, Color::Black),
    ("d7", Piece::Pawn, Color::Black),
    ("e7", Piece::Pawn, Color::Black),
    ("f7", Piece::Pawn, Color::Black),
    ("g7", Piece::Pawn, Color::Black),
    ("h7", Piece::Pawn, Color::Black),
    ("i7", Piece::Pawn, Color::Black),
    ("k7", Piece::Pawn, Color::Black),
    ("f1", Piece::Bishop, Color::White),
    ("f2", Piece::Bishop, Color::White),
    ("f3", Piece::Bishop, Color::White),
    ("e1", Piece::Queen, Color::White),
    ("g1", Piece::King, Color::White),
    ("d1", Piece::Knight, Color::White),
    ("h1", Piece::Knight, Color::White),
    ("c1", Piece::Rook, Color::White),
    ("i1", Piece::Rook, Color::White),
    ("b1", Piece::Pawn, Color::White),
    ("c2", Piece::Pawn, Color::White),
    ("d3", Piece::Pawn, Color::White),
    ("e4", Piece::Pawn, Color::White),
    ("f5", Piece::Pawn, Color::White),
    ("g4", Piece::Pawn, Color::White),
    ("h3", Piece::Pawn, Color::White),
    ("i2", Piece::Pawn, Color::White),
    ("k1", Piece::Pawn, Color::White),
];

const WHITE_PROMOTION_TILES: [&str; 11] =
    ["a6", "b7", "c8", "d9", "e10", "f11", "g10", "h9", "i8", "k7", "l6"];

const BLACK_PROMOTION_TILES: [&str; 11] =
    ["a1", "b1", "c1", "d1", "e1", "f1", "g1", "h1", "i1", "k1", "l1"];
