//! Rules engine for 3×3 tic-tac-toe.
//!
//! This crate owns everything below the learning layer: the board model and
//! win rules ([`board`]), the bijective base-3 state codec ([`codec`]), the
//! symmetry reduction and the precomputed canonical-state table
//! ([`symmetry`]), and the deterministic game simulator ([`game`]).
//!
//! The [`CanonicalTable`] is the one piece of shared state in the system.
//! It is built exactly once by [`CanonicalTable::build`] and then passed by
//! shared reference into every component that canonicalizes boards; nothing
//! in this crate holds it globally.

pub use self::{board::*, codec::*, game::*, symmetry::*};

pub mod board;
pub mod codec;
pub mod game;
pub mod symmetry;

/// A move targeted a cell that is already occupied.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("cell ({row}, {col}) is already occupied")]
pub struct OccupiedCellError {
    pub row: u8,
    pub col: u8,
}

/// A (row, col) pair fell outside the 3×3 board.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("({row}, {col}) is outside the 3x3 board")]
pub struct InvalidMoveError {
    pub row: u8,
    pub col: u8,
}
