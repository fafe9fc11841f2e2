use std::fmt;

use serde::{Deserialize, Serialize};

use super::ops;

/// Side length of the (fixed) square board.
pub const BOARD_SIZE: usize = 4;

/// Raw 4x4 value grid, row-major. `0` is an empty cell.
pub type Grid = [[u32; BOARD_SIZE]; BOARD_SIZE];

pub type TileId = u64;
pub type Score = u64;

/// A direction to slide/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

/// Cell coordinate on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }
}

/// A live tile: identity plus value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub value: u32,
}

/// Movement record for one tile that exists after a move.
///
/// `old_position` is where the tile (or, for a merge, the absorbing tile)
/// sat before the move; `merged_from` is where the absorbed tile sat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMovement {
    pub id: TileId,
    pub value: u32,
    pub old_position: Position,
    pub new_position: Position,
    pub is_new: bool,
    pub is_merged: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_from: Option<Position>,
}

/// Everything a caller needs to render one `apply_move` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    pub tiles: Vec<TileMovement>,
    /// Cumulative score after the move.
    pub score: Score,
    pub score_delta: Score,
    pub changed: bool,
}

/// Point-in-time view of a tile, e.g. for the initial render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSnapshot {
    pub id: TileId,
    pub value: u32,
    pub row: usize,
    pub col: usize,
}

/// 4x4 board of tracked tiles.
///
/// Unlike a plain value grid, each occupied cell carries the tile's id so a
/// renderer can follow the same tile across moves. Equality compares ids as
/// well as values; use [`Board::values`] to compare layouts only.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cells: [[Option<Tile>; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// A constant empty board.
    pub const EMPTY: Board = Board {
        cells: [[None; BOARD_SIZE]; BOARD_SIZE],
    };

    /// Build a board from raw values, handing out ids row-major from `next_id`.
    ///
    /// ```
    /// use neo2048_core::engine::Board;
    /// let mut next_id = 0;
    /// let b = Board::from_values(&[[2, 0, 0, 2], [0; 4], [0; 4], [0, 0, 0, 4]], &mut next_id);
    /// assert_eq!(b.count_empty(), 13);
    /// assert_eq!(next_id, 3);
    /// ```
    pub fn from_values(grid: &Grid, next_id: &mut TileId) -> Self {
        let mut board = Board::EMPTY;
        for (row, values) in grid.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                if value == 0 {
                    continue;
                }
                debug_assert!(value.is_power_of_two(), "tile value {value} is not a power of two");
                let id = *next_id;
                *next_id += 1;
                board.cells[row][col] = Some(Tile { id, value });
            }
        }
        board
    }

    #[inline]
    pub fn get(&self, pos: Position) -> Option<Tile> {
        self.cells[pos.row][pos.col]
    }

    #[inline]
    pub(crate) fn set(&mut self, pos: Position, tile: Option<Tile>) {
        self.cells[pos.row][pos.col] = tile;
    }

    /// Copy out the value grid (0 for empty).
    pub fn values(&self) -> Grid {
        let mut grid = [[0; BOARD_SIZE]; BOARD_SIZE];
        for (pos, tile) in self.tiles() {
            grid[pos.row][pos.col] = tile.value;
        }
        grid
    }

    /// Iterate over occupied cells in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = (Position, Tile)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter_map(move |(col, cell)| cell.map(|tile| (Position::new(row, col), tile)))
        })
    }

    /// Empty cells in row-major order.
    pub fn empty_positions(&self) -> Vec<Position> {
        (0..BOARD_SIZE)
            .flat_map(|row| (0..BOARD_SIZE).map(move |col| Position::new(row, col)))
            .filter(|&pos| self.get(pos).is_none())
            .collect()
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().flatten().filter(|cell| cell.is_none()).count()
    }

    /// Highest tile value on the board, 0 if empty.
    pub fn highest_tile(&self) -> u32 {
        self.tiles().map(|(_, tile)| tile.value).max().unwrap_or(0)
    }

    pub fn snapshot(&self) -> Vec<TileSnapshot> {
        self.tiles()
            .map(|(pos, tile)| TileSnapshot {
                id: tile.id,
                value: tile.value,
                row: pos.row,
                col: pos.col,
            })
            .collect()
    }

    /// Return true if the board is full and no two neighbours match.
    ///
    /// ```
    /// use neo2048_core::engine::Board;
    /// let mut next_id = 0;
    /// let stuck = [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]];
    /// assert!(Board::from_values(&stuck, &mut next_id).is_game_over());
    /// assert!(!Board::EMPTY.is_game_over());
    /// ```
    #[inline]
    pub fn is_game_over(&self) -> bool {
        ops::is_game_over(self)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:?})", self.values())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = "-".repeat(BOARD_SIZE * 8 - 1);
        for (row, values) in self.values().iter().enumerate() {
            if row > 0 {
                writeln!(f, "{separator}")?;
            }
            let cells: Vec<String> = values.iter().map(|&v| ops::format_val(v)).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}
