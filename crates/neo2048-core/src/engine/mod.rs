//! Engine module: tracked 4x4 board, slide/merge ops with per-tile movement
//! records, random spawning, and the stateful `Engine` callers drive.
//!
//! - `Board` holds tiles with identity so moves can be animated.
//! - `slide` is the pure, RNG-free half of a move.
//! - `Engine` adds score, id bookkeeping and spawning on top.

mod game;
mod ops;
mod spawn;
pub mod state;

pub use game::Engine;
pub use ops::{Slide, can_move, is_game_over, line_positions, slide};
pub use spawn::{STARTER_TILES, spawn_value};
pub use state::{
    BOARD_SIZE, Board, Direction, Grid, MoveResult, Position, Score, Tile, TileId, TileMovement,
    TileSnapshot,
};
