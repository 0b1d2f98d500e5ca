//! Hex board geometry: 91 named tiles and their six-way adjacency
//!
//! Tiles live in an arena indexed by [`TileId`]. Each tile carries a fixed
//! table of six optional neighbor indices, so cloning a position never has to
//! touch the graph itself.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Number of tiles on a Glinsky board
pub const TILE_COUNT: usize = 91;

/// Number of construction rows
pub const ROW_COUNT: usize = 11;

/// File letters, left to right (there is no `j` file)
pub const FILES: [char; 11] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'k', 'l'];

/// Index of a tile inside a [`TileGraph`]
pub type TileId = usize;

/// The six adjacency slots of a tile
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "TOP")]
    Top = 0,
    #[serde(rename = "TOPRIGHT")]
    TopRight = 1,
    #[serde(rename = "BOTTOMRIGHT")]
    BottomRight = 2,
    #[serde(rename = "BOTTOM")]
    Bottom = 3,
    #[serde(rename = "BOTTOMLEFT")]
    BottomLeft = 4,
    #[serde(rename = "TOPLEFT")]
    TopLeft = 5,
}

impl Direction {
    /// All directions, clockwise from TOP
    pub const ALL: [Direction; 6] = [
        Direction::Top,
        Direction::TopRight,
        Direction::BottomRight,
        Direction::Bottom,
        Direction::BottomLeft,
        Direction::TopLeft,
    ];

    pub fn opposite(self) -> Self {
        Self::ALL[(self as usize + 3) % 6]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Top => "TOP",
            Direction::TopRight => "TOPRIGHT",
            Direction::BottomRight => "BOTTOMRIGHT",
            Direction::Bottom => "BOTTOM",
            Direction::BottomLeft => "BOTTOMLEFT",
            Direction::TopLeft => "TOPLEFT",
        }
    }
}

#[derive(Clone, Debug)]
struct TileNode {
    name: String,
    gradient: u8,
    neighbors: [Option<TileId>; 6],
}

/// Immutable tile arena with name lookup
#[derive(Clone, Debug)]
pub struct TileGraph {
    tiles: Vec<TileNode>,
    index: FxHashMap<String, TileId>,
}

impl TileGraph {
    /// Build the 91-tile board and link every tile to its neighbors
    pub fn new() -> Self {
        let mut graph = Self {
            tiles: Vec::with_capacity(TILE_COUNT),
            index: FxHashMap::default(),
        };

        let mut rows: Vec<Vec<TileId>> = Vec::with_capacity(ROW_COUNT);
        for y in 0..ROW_COUNT {
            let len = row_len(y);
            let mut row = Vec::with_capacity(len);
            for x in 0..len {
                let id = graph.tiles.len();
                let name = tile_name(len, x, y);
                graph.index.insert(name.clone(), id);
                graph.tiles.push(TileNode {
                    name,
                    gradient: tile_gradient(len, x, y),
                    neighbors: [None; 6],
                });
                row.push(id);
            }
            rows.push(row);
        }

        graph.link(&rows);
        graph
    }

    // ========================================================================
    // LINKING
    // ========================================================================

    fn link(&mut self, rows: &[Vec<TileId>]) {
        let at = |x: Option<usize>, y: Option<usize>| -> Option<TileId> {
            rows.get(y?).and_then(|row| row.get(x?)).copied()
        };

        for (y, row) in rows.iter().enumerate() {
            let center = (row.len() + 1) / 2 - 1;
            let upper = y <= 5;

            for (x, &id) in row.iter().enumerate() {
                let above = y.checked_sub(1);

                // TOP / BOTTOM
                let top = if upper { at(x.checked_sub(1), above) } else { at(Some(x), above) };
                if let Some(other) = top {
                    self.set_link(id, Direction::Top, other);
                }

                // TOPLEFT / BOTTOMRIGHT
                let top_left = if x <= center {
                    at(x.checked_sub(1), Some(y))
                } else if upper {
                    at(x.checked_sub(2), above)
                } else {
                    at(x.checked_sub(1), above)
                };
                if let Some(other) = top_left {
                    self.set_link(id, Direction::TopLeft, other);
                }

                // BOTTOMLEFT / TOPRIGHT
                let bottom_left = if x > center {
                    at(x.checked_sub(1), Some(y))
                } else if y <= 4 {
                    at(Some(x), Some(y + 1))
                } else {
                    at(x.checked_sub(1), Some(y + 1))
                };
                if let Some(other) = bottom_left {
                    self.set_link(id, Direction::BottomLeft, other);
                }
            }
        }
    }

    fn set_link(&mut self, from: TileId, dir: Direction, to: TileId) {
        self.tiles[from].neighbors[dir as usize] = Some(to);
        self.tiles[to].neighbors[dir.opposite() as usize] = Some(from);
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// Look up a tile by name (e.g. `"f6"`)
    pub fn tile_id(&self, name: &str) -> Option<TileId> {
        self.index.get(name).copied()
    }

    pub fn name(&self, id: TileId) -> &str {
        &self.tiles[id].name
    }

    /// Cosmetic shade class (0, 1 or 2); neighbors never share a shade
    pub fn gradient(&self, id: TileId) -> u8 {
        self.tiles[id].gradient
    }

    pub fn neighbor(&self, id: TileId, dir: Direction) -> Option<TileId> {
        self.tiles[id].neighbors[dir as usize]
    }

    /// Follow a compound path of directions; `None` once it leaves the board
    pub fn walk(&self, id: TileId, path: &[Direction]) -> Option<TileId> {
        path.iter().try_fold(id, |current, &dir| self.neighbor(current, dir))
    }

    /// Neighbor slots indexed by `Direction as usize`
    pub fn neighbors(&self, id: TileId) -> &[Option<TileId>; 6] {
        &self.tiles[id].neighbors
    }

    pub fn neighbor_count(&self, id: TileId) -> usize {
        self.neighbors(id).iter().filter(|n| n.is_some()).count()
    }

    /// All tile ids in construction order (top row first)
    pub fn ids(&self) -> impl Iterator<Item = TileId> {
        0..self.tiles.len()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl Default for TileGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Row `y` holds `min(1 + 2y, 11)` tiles
fn row_len(y: usize) -> usize {
    (1 + 2 * y).min(ROW_COUNT)
}

fn tile_name(len: usize, x: usize, y: usize) -> String {
    let offset = (ROW_COUNT - len) / 2;
    format!("{}{}", FILES[offset + x], ROW_COUNT - y)
}

fn tile_gradient(len: usize, x: usize, y: usize) -> u8 {
    let column = x + (ROW_COUNT - len) / 2;
    let extra = if column >= 6 { (column - 5) * 2 } else { 0 };
    ((y + column * 2 + extra) % 3) as u8
}
