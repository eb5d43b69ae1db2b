use std::path::PathBuf;

use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg64Mcg;

use noughts_engine::CanonicalTable;
use noughts_training::{
    genetic::{self, TrainConfig},
    strategy::StrategyTable,
};

use crate::{schema, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Number of strategies per generation
    #[arg(long, default_value_t = 500)]
    population_size: usize,
    /// Maximum number of generations
    #[arg(long, default_value_t = 1000)]
    generation_cap: usize,
    /// Per-gene probability of swapping values between children
    #[arg(long, default_value_t = 0.15)]
    crossover_rate: f64,
    /// Per-child probability of one point mutation
    #[arg(long, default_value_t = 0.01)]
    mutation_rate: f64,
    /// Probability of copying a parent verbatim instead of breeding
    #[arg(long, default_value_t = 0.10)]
    replication_rate: f64,
    /// Seed for a deterministic training run
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let config = TrainConfig {
        population_size: arg.population_size,
        generation_cap: arg.generation_cap,
        crossover_rate: arg.crossover_rate,
        mutation_rate: arg.mutation_rate,
        replication_rate: arg.replication_rate,
    };

    let table = CanonicalTable::build();
    let strategy = match arg.seed {
        Some(seed) => train_with_rng(&config, &table, Pcg64Mcg::seed_from_u64(seed))?,
        None => train_with_rng(&config, &table, rand::rng())?,
    };

    let model = schema::to_model(&strategy, &table);
    Output::save_json(&model, arg.output.clone())?;

    eprintln!();
    eprintln!("Strategy saved successfully");
    if let Some(path) = &arg.output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  States: {}", model.len());
    Ok(())
}

fn train_with_rng<R>(
    config: &TrainConfig,
    table: &CanonicalTable,
    mut rng: R,
) -> anyhow::Result<StrategyTable>
where
    R: Rng,
{
    Ok(genetic::train(config, table, &mut rng)?)
}
