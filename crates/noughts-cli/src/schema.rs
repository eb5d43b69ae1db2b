//! The persisted strategy format.
//!
//! A strategy is stored as a JSON object keyed by the decimal textual form
//! of a canonical state; each value is a 2-element `[row, col]` array.
//! Fitness is never persisted.

use std::collections::BTreeMap;

use anyhow::{Context as _, bail};

use noughts_engine::{CanonicalTable, Move, RawState};
use noughts_training::strategy::StrategyTable;

pub(crate) type StrategyModel = BTreeMap<String, Move>;

/// Converts a genome into its persisted keyed form.
pub(crate) fn to_model(strategy: &StrategyTable, table: &CanonicalTable) -> StrategyModel {
    strategy
        .entries(table)
        .map(|(state, mv)| (state.to_string(), mv))
        .collect()
}

/// Rebuilds a genome from its persisted keyed form.
///
/// Every key must parse as a state integer, be in range, and name a
/// playable canonical class; slots the file does not mention stay empty and
/// fall back to random legal moves at play time.
pub(crate) fn from_model(
    model: &StrategyModel,
    table: &CanonicalTable,
) -> anyhow::Result<StrategyTable> {
    let mut strategy = StrategyTable::empty(table);
    for (key, &mv) in model {
        let value: u16 = key
            .parse()
            .with_context(|| format!("strategy key {key:?} is not a state integer"))?;
        let raw = RawState::new(value)
            .with_context(|| format!("strategy key {key} is outside the state space"))?;
        let state = table.canonicalize(raw);
        if state.value() != value {
            bail!("strategy key {key} is not a canonical state");
        }
        let slot = table
            .slot_of(state)
            .with_context(|| format!("strategy key {key} names a full board"))?;
        strategy.set_gene(slot, mv);
    }
    Ok(strategy)
}
