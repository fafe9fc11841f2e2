//! Board engine for a 4x4 sliding-tile (2048-style) puzzle.
//!
//! The engine owns the grid and score, applies moves, and reports per-tile
//! movement so a UI can animate slides, merges and spawns. It performs no
//! I/O; randomness comes from an injected [`rand::Rng`].

pub mod config;
pub mod engine;

pub use config::EngineConfig;
pub use engine::{Direction, Engine, MoveResult, TileMovement, TileSnapshot};
