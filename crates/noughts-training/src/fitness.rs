//! Fitness scoring by round-robin self-play.
//!
//! A strategy's fitness against an opponent pool is the fraction of games it
//! does not lose when playing first: one simulated game per pool member,
//! `(total − lost) / total`. Wins and draws both count as non-losses, so the
//! score always lies in `[0, 1]`.

use rand::Rng;

use noughts_engine::{CanonicalTable, Player, game};

use crate::strategy::StrategyTable;

/// Fatal precondition violation during fitness evaluation.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum FitnessError {
    /// The opponent pool was empty; a score would be meaningless.
    #[display("fitness evaluation requires a non-empty opponent pool")]
    EmptyPool,
}

/// Scores `strategy` by playing it as first mover against every member of
/// `opponents` exactly once. Cost is linear in the pool size.
pub fn fitness<R>(
    strategy: &StrategyTable,
    opponents: &[StrategyTable],
    table: &CanonicalTable,
    rng: &mut R,
) -> Result<f64, FitnessError>
where
    R: Rng + ?Sized,
{
    if opponents.is_empty() {
        return Err(FitnessError::EmptyPool);
    }
    let total = opponents.len();
    let lost = opponents
        .iter()
        .filter(|opponent| {
            game::play(strategy, *opponent, table, rng).is_loss_for(Player::X)
        })
        .count();
    #[expect(clippy::cast_precision_loss)]
    Ok((total - lost) as f64 / total as f64)
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng as _, rngs::StdRng};

    use super::*;

    #[test]
    fn test_fitness_is_always_in_unit_interval() {
        let table = CanonicalTable::build();
        let mut rng = StdRng::seed_from_u64(7);
        let pool: Vec<StrategyTable> = (0..8)
            .map(|_| StrategyTable::random(&table, &mut rng))
            .collect();
        for strategy in &pool {
            let score = fitness(strategy, &pool, &table, &mut rng).unwrap();
            assert!((0.0..=1.0).contains(&score), "fitness {score} out of range");
        }
    }

    #[test]
    fn test_empty_pool_is_rejected() {
        let table = CanonicalTable::build();
        let mut rng = StdRng::seed_from_u64(8);
        let strategy = StrategyTable::random(&table, &mut rng);
        assert!(matches!(
            fitness(&strategy, &[], &table, &mut rng),
            Err(FitnessError::EmptyPool)
        ));
    }

    #[test]
    fn test_self_play_pool_of_one() {
        // A single opponent gives a score of exactly 0.0 or 1.0.
        let table = CanonicalTable::build();
        let mut rng = StdRng::seed_from_u64(9);
        let strategy = StrategyTable::random(&table, &mut rng);
        let opponent = StrategyTable::random(&table, &mut rng);
        let score = fitness(&strategy, std::slice::from_ref(&opponent), &table, &mut rng).unwrap();
        assert!(score == 0.0 || score == 1.0);
    }
}
