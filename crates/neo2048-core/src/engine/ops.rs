use log::trace;

use super::state::{BOARD_SIZE, Board, Direction, Position, Score, Tile, TileId, TileMovement};

/// Outcome of sliding a board in one direction, before any spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub board: Board,
    /// One record per occupied cell of `board`, in line order then scan order.
    pub movements: Vec<TileMovement>,
    pub score_delta: Score,
    /// False when the value layout is identical to the input board.
    pub changed: bool,
}

/// A resulting slot of one line while it is being compressed.
#[derive(Debug, Clone, Copy)]
struct Slot {
    tile: Tile,
    origin: Position,
    merged_from: Option<Position>,
}

/// Cells of line `line`, ordered from the leading edge of `direction`.
///
/// Lines are rows for Left/Right and columns for Up/Down.
pub fn line_positions(direction: Direction, line: usize) -> [Position; BOARD_SIZE] {
    std::array::from_fn(|step| {
        let far = BOARD_SIZE - 1 - step;
        match direction {
            Direction::Left => Position::new(line, step),
            Direction::Right => Position::new(line, far),
            Direction::Up => Position::new(step, line),
            Direction::Down => Position::new(far, line),
        }
    })
}

/// Slide/merge every line of `board` toward the leading edge of `direction`.
/// No randomness. Merged tiles draw fresh ids from `next_id`.
///
/// ```
/// use neo2048_core::engine::{Board, Direction, slide};
/// let mut next_id = 0;
/// let board = Board::from_values(&[[2, 2, 2, 2], [0; 4], [0; 4], [0; 4]], &mut next_id);
/// let out = slide(&board, Direction::Left, &mut next_id);
/// assert_eq!(out.board.values()[0], [4, 4, 0, 0]);
/// assert_eq!(out.score_delta, 8);
/// assert!(out.changed);
/// ```
pub fn slide(board: &Board, direction: Direction, next_id: &mut TileId) -> Slide {
    let mut next = Board::EMPTY;
    let mut movements = Vec::with_capacity(BOARD_SIZE * BOARD_SIZE);
    let mut score_delta = 0;

    for line in 0..BOARD_SIZE {
        let positions = line_positions(direction, line);
        let (slots, gained) = slide_line(board, &positions, next_id);
        score_delta += gained;
        trace!("{direction} line {line}: {} tile(s), +{gained}", slots.len());

        for (slot, &target) in slots.iter().zip(positions.iter()) {
            next.set(target, Some(slot.tile));
            movements.push(TileMovement {
                id: slot.tile.id,
                value: slot.tile.value,
                old_position: slot.origin,
                new_position: target,
                is_new: false,
                is_merged: slot.merged_from.is_some(),
                merged_from: slot.merged_from,
            });
        }
    }

    let changed = next.values() != board.values();
    Slide {
        board: next,
        movements,
        score_delta,
        changed,
    }
}

/// Compress one line, merging each tile at most once.
///
/// `open` is the index of the last placed slot that may still absorb a tile.
/// A merge closes it, so `[2,2,2,2]` becomes `[4,4]` rather than `[8]`.
fn slide_line(
    board: &Board,
    positions: &[Position; BOARD_SIZE],
    next_id: &mut TileId,
) -> (Vec<Slot>, Score) {
    let mut slots: Vec<Slot> = Vec::with_capacity(BOARD_SIZE);
    let mut open: Option<usize> = None;
    let mut gained: Score = 0;

    for &pos in positions {
        let Some(tile) = board.get(pos) else {
            continue;
        };
        match open {
            Some(idx) if slots[idx].tile.value == tile.value => {
                let slot = &mut slots[idx];
                debug_assert!(slot.merged_from.is_none(), "slot merged twice in one move");
                let value = tile.value * 2;
                slot.tile = Tile {
                    id: *next_id,
                    value,
                };
                *next_id += 1;
                slot.merged_from = Some(pos);
                gained += Score::from(value);
                open = None;
            }
            _ => {
                slots.push(Slot {
                    tile,
                    origin: pos,
                    merged_from: None,
                });
                open = Some(slots.len() - 1);
            }
        }
    }
    (slots, gained)
}

/// True if the board is full and no two orthogonal neighbours hold equal values.
pub fn is_game_over(board: &Board) -> bool {
    if board.count_empty() > 0 {
        return false;
    }
    let grid = board.values();
    for row in 0..BOARD_SIZE {
        for col in 0..BOARD_SIZE {
            let value = grid[row][col];
            if col + 1 < BOARD_SIZE && grid[row][col + 1] == value {
                return false;
            }
            if row + 1 < BOARD_SIZE && grid[row + 1][col] == value {
                return false;
            }
        }
    }
    true
}

/// True if sliding in `direction` would change the layout. Consumes no ids.
pub fn can_move(board: &Board, direction: Direction) -> bool {
    let mut scratch_id = TileId::MAX / 2;
    slide(board, direction, &mut scratch_id).changed
}

pub(crate) fn format_val(val: u32) -> String {
    match val {
        0 => String::from("       "),
        x => format!("{:^7}", x),
    }
}
