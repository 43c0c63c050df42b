use anyhow::Result;
use clap::Parser;
use gatewing_core::brain::DEFAULT_HIDDEN;
use gatewing_core::config::Mode;
use gatewing_lib::runner::{fresh_seed, load_config, NetworkPopulation, Runner};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Game mode, overriding the config file
    #[arg(short, long, value_enum)]
    mode: Option<CliMode>,

    /// Agents per generation
    #[arg(short, long, default_value_t = 50)]
    population: usize,

    /// Number of generations to run
    #[arg(short, long, default_value_t = 10)]
    generations: u32,

    /// Hidden units of the reference network
    #[arg(long, default_value_t = DEFAULT_HIDDEN)]
    hidden: usize,

    /// Seed for obstacle gaps and network weights
    #[arg(short, long)]
    seed: Option<u64>,

    /// Stop a generation after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Stop a generation once this many obstacles are passed
    #[arg(long)]
    score_cap: Option<u32>,

    /// Evaluate decision functions in parallel
    #[arg(long)]
    parallel: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum CliMode {
    Single,
    Cohort,
}

impl From<CliMode> for Mode {
    fn from(mode: CliMode) -> Self {
        match mode {
            CliMode::Single => Mode::Single,
            CliMode::Cohort => Mode::Cohort,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let mut config = load_config(&args.config, args.mode.map(Mode::from))?;

    let seed = args.seed.or(config.world.seed).unwrap_or_else(fresh_seed);
    config.world.seed = Some(seed);
    if args.parallel {
        config.world.parallel_decisions = true;
    }
    if args.max_ticks.is_some() {
        config.episode.max_ticks = args.max_ticks;
    }
    if args.score_cap.is_some() {
        config.episode.score_cap = args.score_cap;
    }
    if config.mode == Mode::Single && args.population != 1 {
        tracing::warn!(
            population = args.population,
            "Single mode is normally flown by one agent"
        );
    }

    tracing::info!(
        seed,
        mode = ?config.mode,
        population = args.population,
        generations = args.generations,
        fingerprint = %config.fingerprint(),
        "Starting run"
    );

    let runner = Runner::new(config)?;
    let mut source = NetworkPopulation::new(args.population, args.hidden, Some(seed));
    runner.run_each(&mut source, args.generations, |outcome| {
        println!("{}", outcome.to_json()?);
        if let Some((index, fitness)) = outcome.best() {
            tracing::info!(
                generation = outcome.generation,
                score = outcome.score,
                best_agent = index,
                best_fitness = fitness,
                "Generation summary"
            );
        }
        Ok(())
    })?;

    let metrics = runner.metrics();
    tracing::info!(
        ticks = metrics.tick_count(),
        passes = metrics.passes(),
        boundary_deaths = metrics.boundary_deaths(),
        collision_deaths = metrics.collision_deaths(),
        elapsed_ms = metrics.elapsed().as_millis() as u64,
        "Run finished"
    );
    Ok(())
}
