//! Deterministic two-player game driver.
//!
//! [`play`] runs one game between two [`MovePolicy`] implementations. The
//! board fills monotonically, so a game always ends within 9 plies. Given
//! fixed random draws for fallback moves the simulation is pure: no side
//! effects beyond the returned [`Outcome`].

use rand::{Rng, seq::IndexedRandom};

use crate::{
    board::{Board, Move, Player},
    symmetry::{CanonicalState, CanonicalTable},
};

/// A source of moves for one player, consulted by canonical state.
///
/// Returning `None` means the policy has no entry for the state; the caller
/// applies a uniformly random legal-move fallback.
pub trait MovePolicy {
    fn choose_move(&self, table: &CanonicalTable, state: CanonicalState) -> Option<Move>;
}

/// Terminal result of one game.
///
/// `Forfeit(p)` means player `p` attempted a move onto an occupied cell,
/// which immediately ends the game as a loss for `p`. It is a defined
/// outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won(Player),
    Draw,
    Forfeit(Player),
}

impl Outcome {
    /// Checks whether this outcome is a loss for the given player. Wins and
    /// draws are non-losses.
    #[must_use]
    pub fn is_loss_for(self, player: Player) -> bool {
        match self {
            Outcome::Won(winner) => winner != player,
            Outcome::Draw => false,
            Outcome::Forfeit(mover) => mover == player,
        }
    }
}

/// Plays one game from the empty board, `first` moving as [`Player::X`].
///
/// Each ply: canonicalize the board, consult the mover's policy, fall back
/// to a uniformly random legal move when the policy has no entry, then
/// apply. A move onto an occupied cell forfeits immediately.
pub fn play<R>(
    first: &dyn MovePolicy,
    second: &dyn MovePolicy,
    table: &CanonicalTable,
    rng: &mut R,
) -> Outcome
where
    R: Rng + ?Sized,
{
    let mut board = Board::EMPTY;
    let mut mover = Player::X;
    loop {
        let state = table.canonicalize_board(&board);
        let policy = match mover {
            Player::X => first,
            Player::O => second,
        };
        let mv = match policy.choose_move(table, state) {
            Some(mv) => mv,
            None => *board
                .legal_moves()
                .choose(rng)
                .expect("an ongoing game always has a legal move"),
        };

        if board.place(mv, mover).is_err() {
            return Outcome::Forfeit(mover);
        }
        if let Some(winner) = board.winner() {
            return Outcome::Won(winner);
        }
        if board.is_full() {
            return Outcome::Draw;
        }
        mover = mover.opponent();
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::VecDeque};

    use rand::{SeedableRng as _, rngs::StdRng};

    use super::*;

    /// Plays a fixed move sequence, ignoring the observed state.
    struct Scripted(RefCell<VecDeque<Move>>);

    impl Scripted {
        fn new(moves: &[(u8, u8)]) -> Self {
            let moves = moves
                .iter()
                .map(|&(row, col)| Move::new(row, col).unwrap())
                .collect();
            Self(RefCell::new(moves))
        }
    }

    impl MovePolicy for Scripted {
        fn choose_move(&self, _table: &CanonicalTable, _state: CanonicalState) -> Option<Move> {
            self.0.borrow_mut().pop_front()
        }
    }

    /// Always defers to the random fallback.
    struct Fallback;

    impl MovePolicy for Fallback {
        fn choose_move(&self, _table: &CanonicalTable, _state: CanonicalState) -> Option<Move> {
            None
        }
    }

    #[test]
    fn test_scripted_first_player_win() {
        // X completes the top row while O fills the middle row:
        // the position before X's third move is XX. / OO. / ...
        let table = CanonicalTable::build();
        let mut rng = StdRng::seed_from_u64(0);
        let first = Scripted::new(&[(0, 0), (0, 1), (0, 2)]);
        let second = Scripted::new(&[(1, 0), (1, 1)]);
        let outcome = play(&first, &second, &table, &mut rng);
        assert_eq!(outcome, Outcome::Won(Player::X));
        assert!(outcome.is_loss_for(Player::O));
        assert!(!outcome.is_loss_for(Player::X));
    }

    #[test]
    fn test_occupied_target_forfeits_the_mover() {
        let table = CanonicalTable::build();
        let mut rng = StdRng::seed_from_u64(0);
        let first = Scripted::new(&[(0, 0)]);
        let second = Scripted::new(&[(0, 0)]);
        let outcome = play(&first, &second, &table, &mut rng);
        assert_eq!(outcome, Outcome::Forfeit(Player::O));
        assert!(outcome.is_loss_for(Player::O));
    }

    #[test]
    fn test_random_games_always_terminate() {
        // Both players run on the fallback path; the board fills
        // monotonically so every game must reach a terminal outcome.
        let table = CanonicalTable::build();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let outcome = play(&Fallback, &Fallback, &table, &mut rng);
            assert!(matches!(
                outcome,
                Outcome::Won(_) | Outcome::Draw
            ));
        }
    }

    #[test]
    fn test_draw_is_a_loss_for_neither() {
        assert!(!Outcome::Draw.is_loss_for(Player::X));
        assert!(!Outcome::Draw.is_loss_for(Player::O));
    }
}
