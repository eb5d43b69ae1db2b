//! Evolutionary training of tic-tac-toe strategies.
//!
//! This crate evolves populations of [`strategy::StrategyTable`] genomes
//! toward near-optimal play. It sits on top of `noughts-engine`, which
//! supplies the rules, the canonical-state table, and the game simulator.
//!
//! # How training works
//!
//! 1. **Population** — create `population_size` random genomes, one move per
//!    playable canonical class
//! 2. **Evaluation** — each genome plays one game as first mover against
//!    every member of an immutable snapshot of the population ([`fitness`])
//! 3. **Selection** — fitness-proportionate sampling with replacement
//! 4. **Reproduction** — replication, uniform per-gene crossover, and point
//!    mutation produce the next generation ([`genetic`])
//! 5. **Repeat** — until the generation cap, or until some genome loses no
//!    game against the population (fitness 1.0)
//!
//! Fitness is the fraction of non-losing games as first mover, so one
//! generation costs O(population²) simulated games. Games are independent
//! and read-only over the canonical table, so evaluation fans out across
//! scoped threads and joins at the generation boundary.
//!
//! [`genetic::train`] is the top-level entry point consumed by callers that
//! load and persist strategies.

pub mod fitness;
pub mod genetic;
pub mod strategy;
