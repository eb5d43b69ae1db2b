//! Generational evolution of strategy populations.
//!
//! One generation: evaluate every genome against an immutable snapshot of
//! the current population, sample parents fitness-proportionately with
//! replacement, then assemble the next population from replicated parents
//! and crossed-over, mutated children. Evolution stops at the generation cap
//! or as soon as some genome loses no game against the population.
//!
//! # Self-relative fitness
//!
//! Fitness is measured against the population itself, not a fixed reference
//! opponent. [`Population::evaluate_fitness`] snapshots the population
//! before spawning any evaluation task, which keeps scores independent of
//! evaluation order and makes the fan-out safe: each game reads only two
//! strategy tables and the shared canonical table.
//!
//! # Fatal preconditions
//!
//! An empty population and a population whose total fitness is zero are
//! configuration or data errors upstream; both abort the run as
//! [`TrainError`] values rather than producing a meaningless result.

use std::thread;

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution as _, weighted::WeightedIndex},
    rngs::StdRng,
    seq::{IndexedRandom as _, index},
};

use noughts_engine::CanonicalTable;

use crate::{fitness, strategy::StrategyTable};

/// Fatal precondition violation during evolution.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum TrainError {
    #[display("population is empty")]
    EmptyPopulation,
    #[display("total population fitness is zero; selection weights are undefined")]
    ZeroTotalFitness,
}

/// A single genome plus its most recent fitness score.
///
/// Fitness is ephemeral: it is recomputed from scratch every generation and
/// never persisted.
#[derive(Debug, Clone)]
pub struct Individual {
    strategy: StrategyTable,
    fitness: f64,
}

impl Individual {
    fn unevaluated(strategy: StrategyTable) -> Self {
        Self {
            strategy,
            fitness: 0.0,
        }
    }

    #[must_use]
    pub fn strategy(&self) -> &StrategyTable {
        &self.strategy
    }

    /// Fraction of non-losing games in the latest evaluation, in `[0, 1]`.
    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }
}

/// Best and average fitness of a generation, reported for observability.
#[derive(Debug, Clone, Copy)]
pub struct FitnessSummary {
    pub best: f64,
    pub average: f64,
}

/// A fixed-size population of strategy genomes.
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Creates a population of `count` random genomes.
    #[must_use]
    pub fn random<R>(table: &CanonicalTable, count: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let individuals = (0..count)
            .map(|_| Individual::unevaluated(StrategyTable::random(table, rng)))
            .collect();
        Self { individuals }
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Scores every individual against a snapshot of the whole population,
    /// one scoped thread per individual.
    ///
    /// Per-task RNGs are seeded from `rng` before the scope begins, and the
    /// scope join is the generation barrier: all scores are complete before
    /// selection may proceed.
    pub fn evaluate_fitness<R>(
        &mut self,
        table: &CanonicalTable,
        rng: &mut R,
    ) -> Result<(), TrainError>
    where
        R: Rng,
    {
        if self.individuals.is_empty() {
            return Err(TrainError::EmptyPopulation);
        }
        let pool: Vec<StrategyTable> = self
            .individuals
            .iter()
            .map(|ind| ind.strategy.clone())
            .collect();

        thread::scope(|s| {
            for ind in &mut self.individuals {
                let mut task_rng = StdRng::from_rng(rng);
                let pool = &pool;
                s.spawn(move || {
                    ind.fitness = fitness::fitness(&ind.strategy, pool, table, &mut task_rng)
                        .expect("opponent pool is non-empty");
                });
            }
        });
        Ok(())
    }

    /// Returns the individual with the highest fitness.
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.individuals
            .iter()
            .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
    }

    /// Best and average fitness of the current scores.
    ///
    /// # Panics
    ///
    /// Panics if the population is empty.
    #[must_use]
    pub fn fitness_summary(&self) -> FitnessSummary {
        let best = self.best().expect("population is non-empty").fitness;
        let total: f64 = self.individuals.iter().map(|ind| ind.fitness).sum();
        #[expect(clippy::cast_precision_loss)]
        let average = total / self.individuals.len() as f64;
        FitnessSummary { best, average }
    }
}

/// Controls how one population derives the next.
#[derive(Debug, Clone, Copy)]
pub struct PopulationEvolver {
    /// Per-gene probability of swapping the two children's values.
    pub crossover_rate: f64,
    /// Per-child probability of one point mutation.
    pub mutation_rate: f64,
    /// Probability of copying one parent verbatim instead of breeding.
    pub replication_rate: f64,
}

impl PopulationEvolver {
    /// Derives the next generation from an evaluated population.
    ///
    /// Draws exactly `population_size` parents fitness-proportionately with
    /// replacement, then repeats until the next population is full: with
    /// probability `replication_rate` copy one random parent verbatim,
    /// otherwise cross over two distinct parents and mutate both children.
    /// Pairwise production may overshoot by one; the result is truncated to
    /// the population size.
    pub fn evolve<R>(
        &self,
        population: &Population,
        table: &CanonicalTable,
        rng: &mut R,
    ) -> Result<Population, TrainError>
    where
        R: Rng + ?Sized,
    {
        let individuals = &population.individuals;
        if individuals.is_empty() {
            return Err(TrainError::EmptyPopulation);
        }
        let weights: Vec<f64> = individuals.iter().map(|ind| ind.fitness).collect();
        let parent_indices = select_parent_indices(&weights, individuals.len(), rng)?;
        let parents: Vec<&StrategyTable> = parent_indices
            .iter()
            .map(|&i| &individuals[i].strategy)
            .collect();

        let mut next = Vec::with_capacity(individuals.len() + 1);
        while next.len() < individuals.len() {
            // A lone parent can only replicate.
            if parents.len() < 2 || rng.random_bool(self.replication_rate) {
                let parent = *parents.choose(rng).expect("parent pool is non-empty");
                next.push(Individual::unevaluated(parent.clone()));
            } else {
                let pair = index::sample(rng, parents.len(), 2);
                let (child1, child2) = StrategyTable::crossover(
                    parents[pair.index(0)],
                    parents[pair.index(1)],
                    self.crossover_rate,
                    rng,
                );
                next.push(Individual::unevaluated(child1.mutate(
                    table,
                    self.mutation_rate,
                    rng,
                )));
                next.push(Individual::unevaluated(child2.mutate(
                    table,
                    self.mutation_rate,
                    rng,
                )));
            }
        }
        next.truncate(individuals.len());

        Ok(Population { individuals: next })
    }
}

/// Fitness-proportionate sampling with replacement: each index is drawn with
/// probability `weight / total`, `count` times.
fn select_parent_indices<R>(
    weights: &[f64],
    count: usize,
    rng: &mut R,
) -> Result<Vec<usize>, TrainError>
where
    R: Rng + ?Sized,
{
    // Weights are fitness scores in [0, 1]; the only way construction can
    // fail for a non-empty population is a zero total.
    let dist =
        WeightedIndex::new(weights.iter().copied()).map_err(|_| TrainError::ZeroTotalFitness)?;
    Ok((0..count).map(|_| dist.sample(rng)).collect())
}

/// Training parameters; defaults match the recognized configuration surface.
#[derive(Debug, Clone, Copy)]
pub struct TrainConfig {
    pub population_size: usize,
    pub generation_cap: usize,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub replication_rate: f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            population_size: 500,
            generation_cap: 1000,
            crossover_rate: 0.15,
            mutation_rate: 0.01,
            replication_rate: 0.10,
        }
    }
}

/// Runs the full evolutionary loop and returns the winning strategy.
///
/// Terminates when the generation counter reaches `generation_cap` or the
/// best fitness in a generation reaches 1.0. The returned strategy is the
/// individual with the highest fitness when re-evaluated against the final
/// population.
pub fn train<R>(
    config: &TrainConfig,
    table: &CanonicalTable,
    rng: &mut R,
) -> Result<StrategyTable, TrainError>
where
    R: Rng,
{
    let evolver = PopulationEvolver {
        crossover_rate: config.crossover_rate,
        mutation_rate: config.mutation_rate,
        replication_rate: config.replication_rate,
    };

    let mut population = Population::random(table, config.population_size, rng);
    for generation in 0..config.generation_cap {
        population.evaluate_fitness(table, rng)?;
        let summary = population.fitness_summary();
        eprintln!(
            "Generation #{generation}: best fitness {:.3}, average fitness {:.3}",
            summary.best, summary.average,
        );
        if summary.best >= 1.0 {
            eprintln!("Optimal against the population; stopping at generation #{generation}");
            break;
        }
        if generation + 1 < config.generation_cap {
            population = evolver.evolve(&population, table, rng)?;
        }
    }

    // Final selection is itself a fresh round-robin against the final
    // population.
    population.evaluate_fitness(table, rng)?;
    let best = population.best().ok_or(TrainError::EmptyPopulation)?;
    Ok(best.strategy.clone())
}
