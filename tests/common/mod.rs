pub mod macros;

use gatewing_core::config::{AppConfig, Mode};
use gatewing_core::decision::{boxed, policies, DecisionFunction};
use gatewing_core::{ScriptedGaps, Simulation};
use gatewing_data::Observation;

#[allow(dead_code)]
pub struct SimBuilder {
    config: AppConfig,
    deciders: Vec<Box<dyn DecisionFunction>>,
    gaps: Option<Vec<i32>>,
    generation: u32,
}

#[allow(dead_code)]
impl SimBuilder {
    pub fn new(mode: Mode) -> Self {
        Self {
            config: AppConfig::for_mode(mode),
            deciders: Vec::new(),
            gaps: None,
            generation: 1,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_decider<D: DecisionFunction + 'static>(mut self, decider: D) -> Self {
        self.deciders.push(boxed(decider));
        self
    }

    pub fn with_gliders(mut self, n: usize) -> Self {
        for _ in 0..n {
            self.deciders.push(boxed(policies::glide));
        }
        self
    }

    /// Jumps whenever the agent sinks below `level`.
    pub fn with_holder(self, level: f64) -> Self {
        self.with_decider(move |obs: &Observation| if obs.height > level { 1.0 } else { 0.0 })
    }

    pub fn with_gaps(mut self, gaps: Vec<i32>) -> Self {
        self.gaps = Some(gaps);
        self
    }

    pub fn with_generation(mut self, generation: u32) -> Self {
        self.generation = generation;
        self
    }

    pub fn build(self) -> Simulation {
        match self.gaps {
            Some(gaps) => {
                let source = ScriptedGaps::new(gaps, &self.config.obstacle)
                    .expect("Scripted gaps out of range");
                Simulation::with_gap_source(
                    self.config,
                    self.deciders,
                    self.generation,
                    Box::new(source),
                )
                .expect("Failed to build simulation")
            }
            None => Simulation::new(self.config, self.deciders, self.generation)
                .expect("Failed to build simulation"),
        }
    }
}
