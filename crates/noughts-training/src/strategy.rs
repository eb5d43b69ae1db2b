//! The strategy genome: one move per playable canonical class.
//!
//! A [`StrategyTable`] is a fixed-size array indexed by the gene slots the
//! [`CanonicalTable`] assigns, with `None` as the sentinel no-move entry.
//! Freshly generated genomes fill every slot; genomes rebuilt from a
//! persisted file may have absent entries, which lookups surface as `None`
//! so callers can apply their random-legal-move fallback.
//!
//! Genetic operators never mutate a parent in place: [`StrategyTable::mutate`]
//! and [`StrategyTable::crossover`] return new owned tables, so a table that
//! serves as parent across generations stays valid.

use rand::{Rng, seq::IndexedRandom};

use noughts_engine::{CanonicalState, CanonicalTable, Move, MovePolicy};

/// A playing policy: mapping from canonical state to a chosen move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyTable {
    genes: Vec<Option<Move>>,
}

impl StrategyTable {
    /// Creates a table with every slot empty.
    ///
    /// Used when rebuilding a strategy from persisted entries.
    #[must_use]
    pub fn empty(table: &CanonicalTable) -> Self {
        Self {
            genes: vec![None; table.slot_count()],
        }
    }

    /// Creates a table with a uniformly random legal move in every slot.
    ///
    /// Legal moves are derived from each class's canonical representative.
    #[must_use]
    pub fn random<R>(table: &CanonicalTable, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let genes = (0..table.slot_count())
            .map(|slot| Some(random_legal_move(table, slot, rng)))
            .collect();
        Self { genes }
    }

    /// Number of gene slots (present or not).
    #[must_use]
    pub fn gene_count(&self) -> usize {
        self.genes.len()
    }

    /// Returns the move stored in a gene slot.
    #[must_use]
    pub fn gene(&self, slot: usize) -> Option<Move> {
        self.genes[slot]
    }

    /// Stores a move in a gene slot.
    pub fn set_gene(&mut self, slot: usize, mv: Move) {
        self.genes[slot] = Some(mv);
    }

    /// Looks up the move for a canonical state.
    ///
    /// Returns `None` for absent entries and for full-board classes; callers
    /// apply their own uniformly random legal-move fallback.
    #[must_use]
    pub fn lookup(&self, table: &CanonicalTable, state: CanonicalState) -> Option<Move> {
        self.genes[table.slot_of(state)?]
    }

    /// Iterates over the present (canonical state, move) entries.
    pub fn entries<'a>(
        &'a self,
        table: &'a CanonicalTable,
    ) -> impl Iterator<Item = (CanonicalState, Move)> + 'a {
        self.genes
            .iter()
            .enumerate()
            .filter_map(|(slot, gene)| gene.map(|mv| (table.state_of_slot(slot), mv)))
    }

    /// Returns a copy of this table, point-mutated with probability `rate`.
    ///
    /// A mutation picks one present gene uniformly at random, recomputes the
    /// legal moves of that class's representative board, and replaces the
    /// gene with a uniformly random one of them.
    #[must_use]
    pub fn mutate<R>(&self, table: &CanonicalTable, rate: f64, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut child = self.clone();
        if !rng.random_bool(rate) {
            return child;
        }
        let present: Vec<usize> = (0..child.genes.len())
            .filter(|&slot| child.genes[slot].is_some())
            .collect();
        if let Some(&slot) = present.choose(rng) {
            child.genes[slot] = Some(random_legal_move(table, slot, rng));
        }
        child
    }

    /// Uniform crossover: for every gene slot independently, with
    /// probability `rate` the two children swap that gene; otherwise each
    /// keeps its parent's assignment.
    #[must_use]
    pub fn crossover<R>(first: &Self, second: &Self, rate: f64, rng: &mut R) -> (Self, Self)
    where
        R: Rng + ?Sized,
    {
        assert_eq!(
            first.genes.len(),
            second.genes.len(),
            "crossover requires genomes over the same canonical table",
        );
        let mut child1 = first.clone();
        let mut child2 = second.clone();
        for slot in 0..child1.genes.len() {
            if rng.random_bool(rate) {
                std::mem::swap(&mut child1.genes[slot], &mut child2.genes[slot]);
            }
        }
        (child1, child2)
    }
}

impl MovePolicy for StrategyTable {
    fn choose_move(&self, table: &CanonicalTable, state: CanonicalState) -> Option<Move> {
        self.lookup(table, state)
    }
}

fn random_legal_move<R>(table: &CanonicalTable, slot: usize, rng: &mut R) -> Move
where
    R: Rng + ?Sized,
{
    *table
        .representative(slot)
        .legal_moves()
        .choose(rng)
        .expect("playable classes have at least one legal move")
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng as _, rngs::StdRng};

    use super::*;

    fn is_legal_for_class(table: &CanonicalTable, slot: usize, mv: Move) -> bool {
        table.representative(slot).legal_moves().contains(&mv)
    }

    #[test]
    fn test_random_table_fills_every_slot_with_legal_moves() {
        let table = CanonicalTable::build();
        let mut rng = StdRng::seed_from_u64(1);
        let strategy = StrategyTable::random(&table, &mut rng);
        assert_eq!(strategy.gene_count(), table.slot_count());
        for slot in 0..strategy.gene_count() {
            let mv = strategy.gene(slot).expect("random tables are complete");
            assert!(is_legal_for_class(&table, slot, mv));
        }
    }

    #[test]
    fn test_mutate_rate_zero_never_changes_the_table() {
        let table = CanonicalTable::build();
        let mut rng = StdRng::seed_from_u64(2);
        let strategy = StrategyTable::random(&table, &mut rng);
        for _ in 0..20 {
            assert_eq!(strategy.mutate(&table, 0.0, &mut rng), strategy);
        }
    }

    #[test]
    fn test_mutate_rate_one_rechooses_exactly_one_gene() {
        let table = CanonicalTable::build();
        let mut rng = StdRng::seed_from_u64(3);
        let strategy = StrategyTable::random(&table, &mut rng);
        for _ in 0..20 {
            let mutated = strategy.mutate(&table, 1.0, &mut rng);
            let changed: Vec<usize> = (0..strategy.gene_count())
                .filter(|&slot| mutated.gene(slot) != strategy.gene(slot))
                .collect();
            // The re-chosen move may coincide with the old one, so at most
            // one gene differs, and any replacement is legal for its class.
            assert!(changed.len() <= 1);
            for &slot in &changed {
                assert!(is_legal_for_class(&table, slot, mutated.gene(slot).unwrap()));
            }
        }
    }

    #[test]
    fn test_mutate_does_not_touch_the_parent() {
        let table = CanonicalTable::build();
        let mut rng = StdRng::seed_from_u64(4);
        let parent = StrategyTable::random(&table, &mut rng);
        let snapshot = parent.clone();
        let _children: Vec<StrategyTable> =
            (0..10).map(|_| parent.mutate(&table, 1.0, &mut rng)).collect();
        assert_eq!(parent, snapshot);
    }

    #[test]
    fn test_crossover_rate_extremes() {
        let table = CanonicalTable::build();
        let mut rng = StdRng::seed_from_u64(5);
        let p1 = StrategyTable::random(&table, &mut rng);
        let p2 = StrategyTable::random(&table, &mut rng);

        let (c1, c2) = StrategyTable::crossover(&p1, &p2, 0.0, &mut rng);
        assert_eq!(c1, p1);
        assert_eq!(c2, p2);

        let (c1, c2) = StrategyTable::crossover(&p1, &p2, 1.0, &mut rng);
        assert_eq!(c1, p2);
        assert_eq!(c2, p1);
    }

    #[test]
    fn test_lookup_on_empty_table_and_full_board_class() {
        let table = CanonicalTable::build();
        let empty = StrategyTable::empty(&table);
        let state = table.canonicalize_board(&noughts_engine::Board::EMPTY);
        assert_eq!(empty.lookup(&table, state), None);

        let full = noughts_engine::Board::from_ascii(
            "XOX
             XOO
             OXX",
        );
        let mut rng = StdRng::seed_from_u64(6);
        let random = StrategyTable::random(&table, &mut rng);
        let full_state = table.canonicalize_board(&full);
        assert_eq!(random.lookup(&table, full_state), None);
    }
}
