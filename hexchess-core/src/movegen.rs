//! Per-piece move generation and attack detection
//!
//! Everything here is a pure function of the tile graph and an occupancy
//! slice, so the live [`Board`](crate::board::Board) and a
//! [`ProjectedBoard`](crate::projection::ProjectedBoard) share one
//! implementation.

use crate::board::Square;
use crate::graph::{Direction, TileGraph, TileId};
use crate::pieces::{Color, Occupant, Piece, BISHOP_PATHS, KNIGHT_PATHS, ROOK_PATHS};

// ============================================================================
// GENERATORS
// ============================================================================

/// Raw destinations for whatever stands on `from` (empty tile: none).
///
/// No self-check filtering is applied here.
pub fn available_tiles(graph: &TileGraph, squares: &[Square], from: TileId) -> Vec<TileId> {
    match squares[from].occupant {
        Some(occ) => piece_targets(graph, squares, from, occ.piece, occ.color),
        None => Vec::new(),
    }
}

/// Destinations of `piece` of `color` if it stood on `from`
pub fn piece_targets(
    graph: &TileGraph,
    squares: &[Square],
    from: TileId,
    piece: Piece,
    color: Color,
) -> Vec<TileId> {
    match piece {
        Piece::Rook => slide(graph, squares, from, color, &ROOK_PATHS),
        Piece::Bishop => slide(graph, squares, from, color, &BISHOP_PATHS),
        Piece::Queen => {
            let mut targets = slide(graph, squares, from, color, &ROOK_PATHS);
            targets.extend(slide(graph, squares, from, color, &BISHOP_PATHS));
            targets
        }
        Piece::Knight => jump(graph, squares, from, color, &KNIGHT_PATHS),
        Piece::King => {
            let mut targets = jump(graph, squares, from, color, &ROOK_PATHS);
            targets.extend(jump(graph, squares, from, color, &BISHOP_PATHS));
            targets
        }
        Piece::Pawn => pawn_targets(graph, squares, from, color),
    }
}

fn slide(
    graph: &TileGraph,
    squares: &[Square],
    from: TileId,
    color: Color,
    paths: &[&[Direction]],
) -> Vec<TileId> {
    let mut targets = Vec::new();

    for path in paths {
        let mut current = from;
        while let Some(next) = graph.walk(current, path) {
            match squares[next].occupant {
                Some(occ) if occ.color == color => break,
                Some(_) => {
                    targets.push(next); // capture
                    break;
                }
                None => {
                    targets.push(next);
                    current = next;
                }
            }
        }
    }

    targets
}

fn jump(
    graph: &TileGraph,
    squares: &[Square],
    from: TileId,
    color: Color,
    paths: &[&[Direction]],
) -> Vec<TileId> {
    paths
        .iter()
        .filter_map(|path| graph.walk(from, path))
        .filter(|&dest| squares[dest].color() != Some(color))
        .collect()
}

fn pawn_targets(graph: &TileGraph, squares: &[Square], from: TileId, color: Color) -> Vec<TileId> {
    let forward = color.forward();
    let mut targets = Vec::new();

    if let Some(next) = graph.neighbor(from, forward) {
        if squares[next].is_empty() {
            targets.push(next);

            if squares[from].initial {
                if let Some(double) = graph.neighbor(next, forward) {
                    if squares[double].is_empty() {
                        targets.push(double);
                    }
                }
            }
        }
    }

    for dir in color.pawn_captures() {
        let Some(target) = graph.neighbor(from, dir) else {
            continue;
        };
        match squares[target].occupant {
            Some(occ) if occ.color != color => targets.push(target),
            None if en_passant_victim(graph, squares, target, color).is_some() => {
                targets.push(target)
            }
            _ => {}
        }
    }

    targets
}

/// Tile of the pawn a `color` pawn would capture en passant by landing on
/// `landing`: one step behind the landing tile, holding an opposing pawn that
/// double-moved on the previous ply.
pub fn en_passant_victim(
    graph: &TileGraph,
    squares: &[Square],
    landing: TileId,
    color: Color,
) -> Option<TileId> {
    let behind = graph.neighbor(landing, color.forward().opposite())?;
    let square = &squares[behind];

    match square.occupant {
        Some(Occupant { piece: Piece::Pawn, color: owner })
            if owner != color && square.double_moved =>
        {
            Some(behind)
        }
        _ => None,
    }
}

// ============================================================================
// ATTACKS
// ============================================================================

/// First tile (in graph order) holding the king of `color`
pub fn find_king(squares: &[Square], color: Color) -> Option<TileId> {
    squares
        .iter()
        .position(|sq| sq.occupant == Some(Occupant::new(Piece::King, color)))
}

/// Whether the king of `color` is attacked. A missing king is never checked.
///
/// Non-pawn attackers are found by running each piece's generator from the
/// king's tile: if a rook standing on the king's tile could reach an enemy
/// rook, that rook attacks the king.
pub fn is_king_checked(graph: &TileGraph, squares: &[Square], color: Color) -> bool {
    let Some(king) = find_king(squares, color) else {
        return false;
    };
    let enemy = color.opponent();

    for piece in Piece::SYMMETRIC_ATTACKERS {
        let attacked = piece_targets(graph, squares, king, piece, color)
            .into_iter()
            .any(|tile| squares[tile].occupant == Some(Occupant::new(piece, enemy)));
        if attacked {
            return true;
        }
    }

    color.pawn_captures().iter().any(|&dir| {
        graph
            .neighbor(king, dir)
            .is_some_and(|tile| squares[tile].occupant == Some(Occupant::new(Piece::Pawn, enemy)))
    })
}
