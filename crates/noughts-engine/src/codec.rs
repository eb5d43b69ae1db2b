//! Bijective mapping between boards and base-3 state integers.
//!
//! A board is read in row-major order with cell (0, 0) as the most
//! significant digit; digit values are Empty=0, X=1, O=2. This makes the
//! encoding order-compatible with comparing flattened cell sequences: the
//! lexicographically smallest symmetric variant of a board is exactly the
//! one with the smallest encoding, which [`crate::symmetry`] relies on.

use crate::board::{Board, CELL_COUNT, Cell, SIZE};

/// Number of raw states: 3^9.
pub const STATE_COUNT: usize = 3usize.pow(CELL_COUNT as u32);

/// Base-3 positional encoding of a [`Board`], in `[0, 3^9)`.
///
/// Bijective with `Board`; see [`encode`] and [`decode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub struct RawState(u16);

impl RawState {
    /// Creates a raw state from its integer value, rejecting values
    /// outside `[0, 3^9)`.
    #[must_use]
    pub fn new(value: u16) -> Option<Self> {
        (usize::from(value) < STATE_COUNT).then_some(Self(value))
    }

    /// Returns the integer value as a table index.
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    #[must_use]
    pub fn value(self) -> u16 {
        self.0
    }
}

fn cell_digit(cell: Cell) -> u16 {
    match cell {
        Cell::Empty => 0,
        Cell::X => 1,
        Cell::O => 2,
    }
}

fn digit_cell(digit: u16) -> Cell {
    match digit {
        0 => Cell::Empty,
        1 => Cell::X,
        _ => Cell::O,
    }
}

/// Encodes a board as its base-3 state integer.
#[must_use]
pub fn encode(board: &Board) -> RawState {
    let mut state = 0;
    for row in 0..SIZE {
        for col in 0..SIZE {
            state = state * 3 + cell_digit(board.cell(row, col));
        }
    }
    RawState(state)
}

/// Decodes a base-3 state integer back into a board. Exact inverse of
/// [`encode`].
#[must_use]
pub fn decode(state: RawState) -> Board {
    let mut board = Board::EMPTY;
    let mut value = state.0;
    for index in (0..CELL_COUNT).rev() {
        let cell = digit_cell(value % 3);
        value /= 3;
        if cell != Cell::Empty {
            let row = index / SIZE;
            let col = index % SIZE;
            #[expect(clippy::cast_possible_truncation)]
            let mv = crate::Move::new(row as u8, col as u8).expect("index is within the board");
            board
                .place(mv, cell.player().expect("cell is not empty"))
                .expect("decoding never targets a cell twice");
        }
    }
    board
}

/// Enumerates all `3^9` raw states in ascending order.
///
/// Lazy and restartable; used for canonical-table construction and
/// exhaustive tests.
pub fn all_states() -> impl Iterator<Item = RawState> + Clone {
    #[expect(clippy::cast_possible_truncation)]
    (0..STATE_COUNT as u16).map(RawState)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Player;

    #[test]
    fn test_empty_board_encodes_to_zero() {
        assert_eq!(encode(&Board::EMPTY).index(), 0);
        assert_eq!(decode(RawState(0)), Board::EMPTY);
    }

    #[test]
    fn test_first_cell_is_most_significant() {
        let mut board = Board::EMPTY;
        board
            .place(crate::Move::new(0, 0).unwrap(), Player::X)
            .unwrap();
        // X in cell (0, 0) contributes 1 * 3^8.
        assert_eq!(encode(&board).index(), 3usize.pow(8));
    }

    #[test]
    fn test_round_trip_all_states() {
        for state in all_states() {
            assert_eq!(encode(&decode(state)), state, "round trip of {state}");
        }
    }

    #[test]
    fn test_all_states_is_restartable() {
        let states = all_states();
        assert_eq!(states.clone().count(), STATE_COUNT);
        assert_eq!(states.count(), STATE_COUNT);
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(RawState::new(0).is_some());
        #[expect(clippy::cast_possible_truncation)]
        let max = (STATE_COUNT - 1) as u16;
        assert!(RawState::new(max).is_some());
        assert!(RawState::new(max + 1).is_none());
    }
}
