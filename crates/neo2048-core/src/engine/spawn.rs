use log::debug;
use rand::Rng;

use super::state::{Board, Position, Tile, TileId, TileMovement};

/// Number of tiles placed on a freshly reset board.
pub const STARTER_TILES: usize = 2;

/// Map a uniform draw in `[0, 1)` to a spawn value.
///
/// A 4 is chosen iff `draw >= 1 - four_probability`, a 2 otherwise.
#[inline]
pub fn spawn_value(draw: f64, four_probability: f64) -> u32 {
    if draw >= 1.0 - four_probability { 4 } else { 2 }
}

/// Place one random tile (2 or 4) in a uniformly chosen empty cell.
///
/// Returns `None` without touching `rng` when the board is full.
pub(crate) fn spawn_tile<R: Rng + ?Sized>(
    board: &mut Board,
    rng: &mut R,
    four_probability: f64,
    next_id: &mut TileId,
) -> Option<TileMovement> {
    let empty = board.empty_positions();
    if empty.is_empty() {
        return None;
    }
    let position: Position = empty[rng.gen_range(0..empty.len())];
    let value = spawn_value(rng.gen_range(0.0..1.0), four_probability);
    debug_assert!(board.get(position).is_none(), "spawn onto occupied cell");

    let tile = Tile {
        id: *next_id,
        value,
    };
    *next_id += 1;
    board.set(position, Some(tile));
    debug!(
        "spawned {} at ({}, {}) as tile {}",
        value, position.row, position.col, tile.id
    );

    Some(TileMovement {
        id: tile.id,
        value,
        old_position: position,
        new_position: position,
        is_new: true,
        is_merged: false,
        merged_from: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn spawn_value_threshold() {
        assert_eq!(spawn_value(0.0, 0.1), 2);
        assert_eq!(spawn_value(0.5, 0.1), 2);
        assert_eq!(spawn_value(0.899_999, 0.1), 2);
        assert_eq!(spawn_value(0.9, 0.1), 4);
        assert_eq!(spawn_value(0.999_999, 0.1), 4);
    }

    #[test]
    fn spawn_value_extreme_probabilities() {
        for draw in [0.0, 0.25, 0.5, 0.75, 0.999_999] {
            assert_eq!(spawn_value(draw, 0.0), 2);
            assert_eq!(spawn_value(draw, 1.0), 4);
        }
    }

    #[test]
    fn spawn_distribution_is_roughly_ninety_ten() {
        let mut rng = StdRng::seed_from_u64(7);
        let trials = 20_000;
        let fours = (0..trials)
            .filter(|_| spawn_value(rng.gen_range(0.0..1.0), 0.1) == 4)
            .count();
        let ratio = fours as f64 / trials as f64;
        assert!((0.08..0.12).contains(&ratio), "ratio {ratio}");
    }

    #[test]
    fn it_fills_the_board_without_overlap() {
        let mut rng = StdRng::seed_from_u64(123);
        let mut board = Board::EMPTY;
        let mut next_id = 0;
        for expected_empty in (0..16).rev() {
            let m = spawn_tile(&mut board, &mut rng, 0.1, &mut next_id).expect("room to spawn");
            assert!(m.is_new);
            assert_eq!(m.old_position, m.new_position);
            assert!(m.value == 2 || m.value == 4);
            assert_eq!(board.count_empty(), expected_empty);
        }
        assert_eq!(next_id, 16);
        assert!(spawn_tile(&mut board, &mut rng, 0.1, &mut next_id).is_none());
        assert_eq!(next_id, 16);
    }
}
