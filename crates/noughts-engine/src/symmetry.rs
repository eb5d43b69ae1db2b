//! Symmetry reduction over the 8 symmetries of the square (D4).
//!
//! Two boards that are rotations or mirror images of each other are the same
//! position for strategy purposes. [`CanonicalTable`] collapses the 3^9 raw
//! states into equivalence classes and gives each *playable* class (at least
//! one empty cell) a dense gene-slot index, so a strategy genome can be a
//! flat array instead of a hash map.
//!
//! The table is built once, up front, and shared read-only afterwards.

use crate::{
    board::{Board, SIZE},
    codec::{self, RawState, STATE_COUNT},
};

/// Identifier of a board's equivalence class under the 8 square symmetries.
///
/// The value is itself a valid [`RawState`]: the smallest encoding among the
/// 8 symmetric variants. Decoding it yields the class representative, which
/// is the board used whenever legal moves must be recomputed for a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub struct CanonicalState(u16);

impl CanonicalState {
    /// Returns the integer value as a table index.
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    #[must_use]
    pub fn value(self) -> u16 {
        self.0
    }

    /// Reinterprets the canonical state as the raw state of its class
    /// representative.
    #[must_use]
    pub fn as_raw(self) -> RawState {
        RawState::new(self.0).expect("canonical states are valid raw states")
    }
}

fn rotate(board: &Board) -> Board {
    // 90° clockwise: (row, col) -> (col, SIZE - 1 - row).
    let mut rotated = Board::EMPTY;
    for row in 0..SIZE {
        for col in 0..SIZE {
            set_cell(&mut rotated, col, SIZE - 1 - row, board.cell(row, col));
        }
    }
    rotated
}

fn mirror(board: &Board) -> Board {
    // Horizontal mirror: (row, col) -> (row, SIZE - 1 - col).
    let mut mirrored = Board::EMPTY;
    for row in 0..SIZE {
        for col in 0..SIZE {
            set_cell(&mut mirrored, row, SIZE - 1 - col, board.cell(row, col));
        }
    }
    mirrored
}

fn set_cell(board: &mut Board, row: usize, col: usize, cell: crate::board::Cell) {
    if let Some(player) = cell.player() {
        #[expect(clippy::cast_possible_truncation)]
        let mv = crate::Move::new(row as u8, col as u8).expect("coordinates are within the board");
        board
            .place(mv, player)
            .expect("symmetry targets each cell once");
    }
}

/// Returns the 8 symmetric variants of a board: the identity, 3 successive
/// 90° rotations, and the horizontal mirror of each of those 4.
#[must_use]
pub fn symmetries(board: &Board) -> [Board; 8] {
    let r0 = *board;
    let r1 = rotate(&r0);
    let r2 = rotate(&r1);
    let r3 = rotate(&r2);
    [
        r0,
        mirror(&r0),
        r1,
        mirror(&r1),
        r2,
        mirror(&r2),
        r3,
        mirror(&r3),
    ]
}

/// Returns the canonical representative of a board: the symmetric variant
/// with the smallest encoding (equivalently, the lexicographically smallest
/// flattened cell sequence).
#[must_use]
pub fn canonical_board(board: &Board) -> Board {
    symmetries(board)
        .into_iter()
        .min_by_key(codec::encode)
        .expect("a board always has 8 symmetric variants")
}

fn canonical_state(board: &Board) -> CanonicalState {
    let raw = symmetries(board)
        .iter()
        .map(codec::encode)
        .min()
        .expect("a board always has 8 symmetric variants");
    CanonicalState(raw.value())
}

/// Precomputed mapping from every raw state to its canonical state, plus the
/// dense gene-slot numbering of playable canonical classes.
///
/// Built exactly once at startup with [`CanonicalTable::build`]; immutable
/// thereafter and safe to share across threads without locking.
#[derive(Debug)]
pub struct CanonicalTable {
    /// Indexed by raw state.
    canonical: Vec<CanonicalState>,
    /// Indexed by raw state; `Some` only at canonical indices of playable
    /// classes (boards with at least one empty cell).
    slots: Vec<Option<u16>>,
    /// Indexed by gene slot.
    slot_states: Vec<CanonicalState>,
}

impl CanonicalTable {
    /// Builds the table by canonicalizing all 3^9 raw states (O(3^9 × 8)).
    #[must_use]
    pub fn build() -> Self {
        let canonical: Vec<CanonicalState> = codec::all_states()
            .map(|raw| canonical_state(&codec::decode(raw)))
            .collect();

        let mut slots = vec![None; STATE_COUNT];
        let mut slot_states = Vec::new();
        for raw in codec::all_states() {
            let state = canonical[raw.index()];
            if state.index() != raw.index() {
                continue;
            }
            if codec::decode(raw).is_full() {
                // Full boards have no legal move and carry no gene.
                continue;
            }
            #[expect(clippy::cast_possible_truncation)]
            let slot = slot_states.len() as u16;
            slots[raw.index()] = Some(slot);
            slot_states.push(state);
        }

        Self {
            canonical,
            slots,
            slot_states,
        }
    }

    /// Returns the canonical state of a raw state.
    #[must_use]
    pub fn canonicalize(&self, raw: RawState) -> CanonicalState {
        self.canonical[raw.index()]
    }

    /// Returns the canonical state of a board.
    #[must_use]
    pub fn canonicalize_board(&self, board: &Board) -> CanonicalState {
        self.canonicalize(codec::encode(board))
    }

    /// Returns the gene slot of a playable canonical class, or `None` for
    /// full-board classes.
    #[must_use]
    pub fn slot_of(&self, state: CanonicalState) -> Option<usize> {
        self.slots[state.index()].map(usize::from)
    }

    /// Number of playable canonical classes (the genome length).
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slot_states.len()
    }

    /// Returns the canonical state assigned to a gene slot.
    #[must_use]
    pub fn state_of_slot(&self, slot: usize) -> CanonicalState {
        self.slot_states[slot]
    }

    /// Decodes the representative board of a gene slot's class.
    ///
    /// Legal moves for a class are always derived from this board.
    #[must_use]
    pub fn representative(&self, slot: usize) -> Board {
        codec::decode(self.slot_states[slot].as_raw())
    }
}
