//! Runs generations back to back, asking a [`PopulationSource`] for fresh
//! decision functions each time and handing it every outcome.

use anyhow::{Context, Result};
use gatewing_core::brain::Network;
use gatewing_core::config::{AppConfig, Mode};
use gatewing_core::decision::{boxed, DecisionFunction};
use gatewing_core::{Metrics, Simulation};
use gatewing_data::GenerationOutcome;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::Path;

/// Supplies one decision function per agent for each generation.
pub trait PopulationSource {
    fn population(&mut self, generation: u32) -> Result<Vec<Box<dyn DecisionFunction>>>;

    /// Sees every finished generation, e.g. to rank its members.
    fn observe(&mut self, _outcome: &GenerationOutcome) {}
}

impl<F> PopulationSource for F
where
    F: FnMut(u32) -> Result<Vec<Box<dyn DecisionFunction>>>,
{
    fn population(&mut self, generation: u32) -> Result<Vec<Box<dyn DecisionFunction>>> {
        self(generation)
    }
}

/// Randomly initialised reference networks, fresh every generation.
///
/// Keeps the best network seen so far; it never trains or mutates one.
pub struct NetworkPopulation {
    rng: ChaCha8Rng,
    size: usize,
    hidden: usize,
    current: Vec<Network>,
    champion: Option<(Network, f64)>,
}

impl NetworkPopulation {
    #[must_use]
    pub fn new(size: usize, hidden: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            rng,
            size,
            hidden,
            current: Vec::new(),
            champion: None,
        }
    }

    #[must_use]
    pub fn champion(&self) -> Option<&(Network, f64)> {
        self.champion.as_ref()
    }
}

impl PopulationSource for NetworkPopulation {
    fn population(&mut self, _generation: u32) -> Result<Vec<Box<dyn DecisionFunction>>> {
        self.current = (0..self.size)
            .map(|_| Network::new_random_with_rng(&mut self.rng, self.hidden))
            .collect();
        Ok(self.current.iter().cloned().map(boxed).collect())
    }

    fn observe(&mut self, outcome: &GenerationOutcome) {
        let Some((index, fitness)) = outcome.best() else {
            return;
        };
        let improved = self
            .champion
            .as_ref()
            .is_none_or(|(_, best)| fitness > *best);
        if improved {
            if let Some(network) = self.current.get(index) {
                tracing::info!(
                    generation = outcome.generation,
                    fitness,
                    "New champion network"
                );
                self.champion = Some((network.clone(), fitness));
            }
        }
    }
}

pub struct Runner {
    config: AppConfig,
    metrics: Metrics,
}

impl Runner {
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            metrics: Metrics::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Configuration for one generation. A fixed seed is offset by the
    /// generation number so every generation flies a different course.
    fn generation_config(&self, generation: u32) -> AppConfig {
        let mut config = self.config.clone();
        config.world.seed = self
            .config
            .world
            .seed
            .map(|seed| seed.wrapping_add(u64::from(generation)));
        config
    }

    pub fn run_generation<S: PopulationSource + ?Sized>(
        &self,
        source: &mut S,
        generation: u32,
    ) -> Result<GenerationOutcome> {
        let deciders = source
            .population(generation)
            .with_context(|| format!("Failed to build population for generation {generation}"))?;
        let mut sim = Simulation::new(self.generation_config(generation), deciders, generation)?;
        let outcome = sim.run_with(&self.metrics)?;
        source.observe(&outcome);
        Ok(outcome)
    }

    /// Runs generations `1..=generations`, calling `on_outcome` after each.
    pub fn run_each<S, F>(&self, source: &mut S, generations: u32, mut on_outcome: F) -> Result<()>
    where
        S: PopulationSource + ?Sized,
        F: FnMut(&GenerationOutcome) -> Result<()>,
    {
        for generation in 1..=generations {
            let outcome = self.run_generation(source, generation)?;
            on_outcome(&outcome)?;
        }
        Ok(())
    }

    pub fn run<S: PopulationSource + ?Sized>(
        &self,
        source: &mut S,
        generations: u32,
    ) -> Result<Vec<GenerationOutcome>> {
        let mut outcomes = Vec::with_capacity(generations as usize);
        self.run_each(source, generations, |outcome| {
            outcomes.push(outcome.clone());
            Ok(())
        })?;
        Ok(outcomes)
    }
}

/// Loads `path`, falling back to the presets when the file does not exist.
pub fn load_config(path: &Path, mode: Option<Mode>) -> Result<AppConfig> {
    let content = if path.exists() {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    } else {
        tracing::info!(path = %path.display(), "No config file, using presets");
        String::new()
    };
    AppConfig::from_toml_with_mode(&content, mode)
        .with_context(|| format!("Invalid configuration in {}", path.display()))
}

/// Draws a seed for runs that did not ask for one, so they can be replayed.
#[must_use]
pub fn fresh_seed() -> u64 {
    rand::thread_rng().gen()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatewing_core::decision::policies;
    use gatewing_data::EndReason;

    fn capped(seed: u64) -> AppConfig {
        let mut config = AppConfig::default();
        config.world.seed = Some(seed);
        config.episode.max_ticks = Some(300);
        config
    }

    #[test]
    fn test_closure_source() {
        let runner = Runner::new(AppConfig::for_mode(Mode::Single)).unwrap();
        let mut source = |_generation: u32| -> Result<Vec<Box<dyn DecisionFunction>>> {
            Ok(vec![boxed(policies::glide)])
        };
        let outcomes = runner.run(&mut source, 2).unwrap();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[1].generation, 2);
        assert!(outcomes.iter().all(|o| o.end == EndReason::Extinct));
        assert_eq!(runner.metrics().counter("generations"), 2);
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let run = || {
            let runner = Runner::new(capped(11)).unwrap();
            let mut source = NetworkPopulation::new(8, 4, Some(3));
            runner.run(&mut source, 2).unwrap()
        };
        let (a, b) = (run(), run());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.fitness, y.fitness);
            assert_eq!(x.score, y.score);
            assert_eq!(x.ticks, y.ticks);
        }
    }

    #[test]
    fn test_champion_tracks_best() {
        let runner = Runner::new(capped(5)).unwrap();
        let mut source = NetworkPopulation::new(6, 4, Some(9));
        let outcomes = runner.run(&mut source, 3).unwrap();
        let best = outcomes
            .iter()
            .filter_map(GenerationOutcome::best)
            .map(|(_, f)| f)
            .fold(f64::NEG_INFINITY, f64::max);
        let (_, champion) = source.champion().unwrap();
        assert_eq!(*champion, best);
    }

    #[test]
    fn test_population_error_has_context() {
        let runner = Runner::new(AppConfig::default()).unwrap();
        let mut source = |_: u32| -> Result<Vec<Box<dyn DecisionFunction>>> {
            anyhow::bail!("no networks")
        };
        let err = runner.run_generation(&mut source, 1).unwrap_err();
        assert!(err.to_string().contains("generation 1"));
        assert_eq!(err.root_cause().to_string(), "no networks");
    }

    #[test]
    fn test_missing_config_file_uses_presets() {
        let config = load_config(Path::new("does/not/exist.toml"), Some(Mode::Single)).unwrap();
        assert_eq!(config.mode, Mode::Single);
        assert_eq!(config.clock.spawn_interval_ms, 2000);
    }
}
