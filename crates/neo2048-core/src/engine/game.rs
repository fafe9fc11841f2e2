use log::debug;
use rand::{Rng, SeedableRng, rngs::StdRng};

use super::ops;
use super::spawn::{STARTER_TILES, spawn_tile};
use super::state::{Board, Direction, Grid, MoveResult, Score, TileId, TileSnapshot};
use crate::config::EngineConfig;

/// Stateful board engine: grid, score, tile id counter and spawn RNG.
///
/// Every call runs to completion and returns its full result; animation
/// staging is left to the caller.
///
/// ```
/// use neo2048_core::engine::{Direction, Engine};
/// let mut engine = Engine::seeded(42);
/// assert_eq!(engine.current_tiles().len(), 2);
/// let result = engine.apply_move(Direction::Left);
/// if result.changed {
///     assert!(result.tiles.last().unwrap().is_new);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Engine<R = StdRng> {
    board: Board,
    score: Score,
    next_id: TileId,
    config: EngineConfig,
    rng: R,
}

impl Engine<StdRng> {
    /// Default-configured engine over `StdRng::seed_from_u64(seed)`.
    pub fn seeded(seed: u64) -> Self {
        Engine::new(EngineConfig::default(), StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Engine<R> {
    /// Create an engine and deal the starter tiles.
    pub fn new(config: EngineConfig, rng: R) -> Self {
        let mut engine = Engine {
            board: Board::EMPTY,
            score: 0,
            next_id: 0,
            config,
            rng,
        };
        engine.reset();
        engine
    }

    /// Start from an explicit layout with score 0. No starter tiles are dealt.
    pub fn from_grid(grid: &Grid, config: EngineConfig, rng: R) -> Self {
        let mut next_id = 0;
        let board = Board::from_values(grid, &mut next_id);
        Engine {
            board,
            score: 0,
            next_id,
            config,
            rng,
        }
    }

    /// Clear the board, zero the score, restart ids and deal two starter tiles.
    pub fn reset(&mut self) {
        self.board = Board::EMPTY;
        self.score = 0;
        self.next_id = 0;
        let four_probability = self.config.four_probability_or_default();
        for _ in 0..STARTER_TILES {
            spawn_tile(&mut self.board, &mut self.rng, four_probability, &mut self.next_id);
        }
        debug!("reset board: {:?}", self.board);
    }

    /// Slide/merge in `direction`, then spawn one tile if anything changed.
    ///
    /// A move that leaves the layout untouched returns an empty tile list,
    /// `changed == false`, and draws nothing from the RNG.
    pub fn apply_move(&mut self, direction: Direction) -> MoveResult {
        let slide = ops::slide(&self.board, direction, &mut self.next_id);
        if !slide.changed {
            debug!("{direction}: no-op");
            return MoveResult {
                tiles: Vec::new(),
                score: self.score,
                score_delta: 0,
                changed: false,
            };
        }

        let mut board = slide.board;
        let mut tiles = slide.movements;
        let four_probability = self.config.four_probability_or_default();
        if let Some(spawned) =
            spawn_tile(&mut board, &mut self.rng, four_probability, &mut self.next_id)
        {
            tiles.push(spawned);
        }

        self.board = board;
        self.score += slide.score_delta;
        debug!(
            "{direction}: +{} (score {}), {} empty",
            slide.score_delta,
            self.score,
            self.board.count_empty()
        );

        MoveResult {
            tiles,
            score: self.score,
            score_delta: slide.score_delta,
            changed: true,
        }
    }
}

impl<R> Engine<R> {
    /// True when the board is full and no neighbours can merge.
    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.board.is_game_over()
    }

    /// True if `apply_move(direction)` would change the board.
    #[inline]
    pub fn can_move(&self, direction: Direction) -> bool {
        ops::can_move(&self.board, direction)
    }

    /// Row-major snapshot of the tiles currently on the board.
    pub fn current_tiles(&self) -> Vec<TileSnapshot> {
        self.board.snapshot()
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Copy of the value grid.
    #[inline]
    pub fn grid(&self) -> Grid {
        self.board.values()
    }

    #[inline]
    pub fn score(&self) -> Score {
        self.score
    }

    #[inline]
    pub fn highest_tile(&self) -> u32 {
        self.board.highest_tile()
    }

    #[inline]
    pub fn count_empty(&self) -> usize {
        self.board.count_empty()
    }
}
