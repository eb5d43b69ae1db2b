use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::{InvalidMoveError, OccupiedCellError};

/// Board side length.
pub const SIZE: usize = 3;
/// Total number of cells.
pub const CELL_COUNT: usize = SIZE * SIZE;

/// The 8 winning lines: 3 rows, 3 columns, 2 diagonals.
pub const WIN_LINES: [[(usize, usize); SIZE]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// One of the two players. `X` always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Returns the other player.
    #[must_use]
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Returns the cell mark this player places.
    #[must_use]
    pub fn mark(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

/// Contents of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    /// Returns the player occupying this cell, if any.
    #[must_use]
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Player::X),
            Cell::O => Some(Player::O),
        }
    }
}

/// A (row, col) coordinate on the board.
///
/// Construction is bounds-checked; a `Move` always names a cell that exists.
/// Serializes as a 2-element `[row, col]` array, the persisted strategy
/// format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "(u8, u8)", into = "(u8, u8)")]
pub struct Move {
    row: u8,
    col: u8,
}

impl Move {
    /// Creates a move, rejecting out-of-board coordinates.
    pub fn new(row: u8, col: u8) -> Result<Self, InvalidMoveError> {
        if usize::from(row) >= SIZE || usize::from(col) >= SIZE {
            return Err(InvalidMoveError { row, col });
        }
        Ok(Self { row, col })
    }

    #[must_use]
    pub fn row(self) -> u8 {
        self.row
    }

    #[must_use]
    pub fn col(self) -> u8 {
        self.col
    }
}

impl From<Move> for (u8, u8) {
    fn from(mv: Move) -> Self {
        (mv.row, mv.col)
    }
}

impl TryFrom<(u8, u8)> for Move {
    type Error = InvalidMoveError;

    fn try_from((row, col): (u8, u8)) -> Result<Self, Self::Error> {
        Move::new(row, col)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A 3×3 tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Board {
    cells: [[Cell; SIZE]; SIZE],
}

impl Board {
    pub const EMPTY: Self = Self {
        cells: [[Cell::Empty; SIZE]; SIZE],
    };

    /// Returns the cell at the given coordinates.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Places `player`'s mark on the targeted cell.
    ///
    /// An occupied target is a defined game outcome (forfeit) at the
    /// simulator level, so this reports it as a typed error rather than
    /// panicking.
    pub fn place(&mut self, mv: Move, player: Player) -> Result<(), OccupiedCellError> {
        let cell = &mut self.cells[usize::from(mv.row())][usize::from(mv.col())];
        if *cell != Cell::Empty {
            return Err(OccupiedCellError {
                row: mv.row(),
                col: mv.col(),
            });
        }
        *cell = player.mark();
        Ok(())
    }

    /// Returns every currently-empty cell, in row-major order.
    #[must_use]
    pub fn legal_moves(&self) -> ArrayVec<Move, CELL_COUNT> {
        let mut moves = ArrayVec::new();
        for row in 0..SIZE {
            for col in 0..SIZE {
                if self.cells[row][col] == Cell::Empty {
                    #[expect(clippy::cast_possible_truncation)]
                    let mv = Move {
                        row: row as u8,
                        col: col as u8,
                    };
                    moves.push(mv);
                }
            }
        }
        moves
    }

    /// Checks whether no empty cell remains.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|&c| c != Cell::Empty))
    }

    /// Returns the player occupying a full line, if any.
    #[must_use]
    pub fn winner(&self) -> Option<Player> {
        for line in &WIN_LINES {
            let (r0, c0) = line[0];
            let Some(player) = self.cells[r0][c0].player() else {
                continue;
            };
            if line[1..]
                .iter()
                .all(|&(r, c)| self.cells[r][c] == player.mark())
            {
                return Some(player);
            }
        }
        None
    }

    /// Creates a `Board` from ASCII art for testing.
    ///
    /// `X`/`O` are marks, `.` is an empty cell; three rows of three cells,
    /// top to bottom. Whitespace-only lines are ignored.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let mut board = Self::EMPTY;
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert_eq!(lines.len(), SIZE, "expected {SIZE} rows");

        for (row, line) in lines.iter().enumerate() {
            let chars: Vec<char> = line
                .chars()
                .filter(|c| matches!(c, 'X' | 'O' | '.'))
                .collect();
            assert_eq!(
                chars.len(),
                SIZE,
                "each row must have exactly {SIZE} cells, got {} at row {row}",
                chars.len(),
            );
            for (col, &ch) in chars.iter().enumerate() {
                board.cells[row][col] = match ch {
                    'X' => Cell::X,
                    'O' => Cell::O,
                    _ => Cell::Empty,
                };
            }
        }
        board
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-------------")?;
        for row in &self.cells {
            for cell in row {
                let ch = match cell {
                    Cell::Empty => ' ',
                    Cell::X => 'X',
                    Cell::O => 'O',
                };
                write!(f, "| {ch} ")?;
            }
            writeln!(f, "|")?;
            writeln!(f, "-------------")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_has_nine_legal_moves() {
        let board = Board::EMPTY;
        assert_eq!(board.legal_moves().len(), CELL_COUNT);
        assert!(!board.is_full());
        assert_eq!(board.winner(), None);
    }

    #[test]
    fn test_place_and_occupied_cell() {
        let mut board = Board::EMPTY;
        let mv = Move::new(1, 1).unwrap();
        board.place(mv, Player::X).unwrap();
        assert_eq!(board.cell(1, 1), Cell::X);
        assert!(board.place(mv, Player::O).is_err());
        assert_eq!(board.legal_moves().len(), CELL_COUNT - 1);
    }

    #[test]
    fn test_move_bounds_checked() {
        assert!(Move::new(0, 2).is_ok());
        assert!(Move::new(3, 0).is_err());
        assert!(Move::new(0, 3).is_err());
    }

    #[test]
    fn test_winner_rows_columns_diagonals() {
        let row_win = Board::from_ascii(
            "OO.
             XXX
             ...",
        );
        assert_eq!(row_win.winner(), Some(Player::X));

        let col_win = Board::from_ascii(
            "OX.
             OX.
             O..",
        );
        assert_eq!(col_win.winner(), Some(Player::O));

        let diag_win = Board::from_ascii(
            "X.O
             .XO
             ..X",
        );
        assert_eq!(diag_win.winner(), Some(Player::X));

        let anti_diag_win = Board::from_ascii(
            "X.O
             XO.
             O.X",
        );
        assert_eq!(anti_diag_win.winner(), Some(Player::O));
    }

    #[test]
    fn test_no_false_win_on_mixed_lines() {
        // Every line is occupied but none uniformly by one mark.
        let board = Board::from_ascii(
            "XOX
             XOO
             OXX",
        );
        assert_eq!(board.winner(), None);
        assert!(board.is_full());
    }

    #[test]
    fn test_completing_move_wins() {
        let mut board = Board::from_ascii(
            "XX.
             OO.
             ...",
        );
        board.place(Move::new(0, 2).unwrap(), Player::X).unwrap();
        assert_eq!(board.winner(), Some(Player::X));
    }

    #[test]
    fn test_move_serializes_as_pair() {
        let mv = Move::new(2, 1).unwrap();
        let json = serde_json::to_string(&mv).unwrap();
        assert_eq!(json, "[2,1]");
        let back: Move = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mv);
        assert!(serde_json::from_str::<Move>("[3,0]").is_err());
    }
}
