//! One generation: a population evaluated against an obstacle stream, tick
//! by tick, until it is extinct or an episode cap is hit.

use crate::clock::SimulationClock;
use crate::collision::SegmentMasks;
use crate::config::AppConfig;
use crate::decision::DecisionFunction;
use crate::error::SimError;
use crate::mask::CoverageMask;
use crate::metrics::Metrics;
use crate::population::Population;
use crate::stream::{GapSource, ObstacleStream, SeededGaps};
use gatewing_data::{EndReason, FrameSnapshot, GenerationOutcome, GenerationRecord, TickReport};
use std::sync::Arc;
use std::time::Instant;

pub struct Simulation {
    config: AppConfig,
    generation: u32,
    population: Population,
    stream: ObstacleStream,
    segments: SegmentMasks,
    clock: SimulationClock,
    score: u32,
    finished: Option<EndReason>,
    fingerprint: String,
}

impl Simulation {
    /// Validates `config` and sets up a generation with seeded gaps.
    pub fn new(
        config: AppConfig,
        deciders: Vec<Box<dyn DecisionFunction>>,
        generation: u32,
    ) -> Result<Self, SimError> {
        let gaps = Box::new(SeededGaps::from_config(&config));
        Self::with_gap_source(config, deciders, generation, gaps)
    }

    /// Like [`Simulation::new`], drawing gap centers from `gaps`.
    ///
    /// Fails if `gaps` can produce a center outside the configured range.
    pub fn with_gap_source(
        config: AppConfig,
        deciders: Vec<Box<dyn DecisionFunction>>,
        generation: u32,
        gaps: Box<dyn GapSource>,
    ) -> Result<Self, SimError> {
        config.validate()?;
        gaps.check_range(&config.obstacle)?;
        let shape = Arc::new(CoverageMask::ellipse(
            config.agent.width,
            config.agent.height,
        ));
        let population = Population::new(deciders, &config.agent, shape);
        let segments = SegmentMasks::solid(config.obstacle.width, config.obstacle.segment_height);
        let stream = ObstacleStream::new(&config, gaps);
        let clock = SimulationClock::new(&config.clock);
        let fingerprint = config.fingerprint();

        let finished = population.is_empty().then_some(EndReason::Empty);
        tracing::info!(
            generation,
            agents = population.len(),
            mode = ?config.mode,
            "Generation started"
        );
        if finished.is_some() {
            tracing::info!(generation, "Empty population, nothing to simulate");
        }

        Ok(Self {
            config,
            generation,
            population,
            stream,
            segments,
            clock,
            score: 0,
            finished,
            fingerprint,
        })
    }

    /// Advances exactly one tick.
    ///
    /// A failing decision function aborts the tick before any state changes
    /// and its error is returned unmodified. Stepping a finished generation
    /// fails with [`SimError::Finished`].
    pub fn step(&mut self) -> anyhow::Result<TickReport> {
        if self.finished.is_some() {
            return Err(SimError::Finished {
                generation: self.generation,
            }
            .into());
        }

        let lead_x = self.population.lead_x();
        let active = self.stream.active_index(lead_x);
        let observations = self.population.observe(self.stream.get(active));
        let outputs = self
            .population
            .decide(&observations, self.config.world.parallel_decisions)?;

        let tick = self.clock.advance();
        self.population.apply_jumps(
            &outputs,
            self.config.scoring.jump_threshold,
            self.config.agent.jump_strength,
        );

        let mut marks = vec![None; self.population.len()];
        self.population.integrate(&self.config, &mut marks);

        let spawned = self.clock.spawn_due();
        if spawned {
            self.stream.spawn();
        }
        let reference_x = self.population.first_survivor_x(&marks);
        let passed = self.stream.advance(reference_x);

        self.population.collide(
            self.stream.obstacles(),
            &self.segments,
            self.config.scoring.collision_penalty,
            &mut marks,
        );

        for _ in 0..passed {
            self.population
                .award(self.config.scoring.pass_bonus, &marks);
            self.score += 1;
        }

        let deaths = self.population.remove_marked(&marks);
        self.stream.prune();

        let end = self.check_end(tick);
        if let Some(reason) = end {
            self.finish(reason);
        }

        Ok(TickReport {
            tick,
            deaths,
            passed,
            spawned,
            score: self.score,
            alive_count: self.population.len(),
            end,
        })
    }

    fn check_end(&self, tick: u64) -> Option<EndReason> {
        let episode = &self.config.episode;
        if self.population.is_empty() {
            Some(EndReason::Extinct)
        } else if episode.max_ticks.is_some_and(|max| tick >= max) {
            Some(EndReason::TickCap)
        } else if episode.score_cap.is_some_and(|cap| self.score >= cap) {
            Some(EndReason::ScoreCap)
        } else {
            None
        }
    }

    fn finish(&mut self, reason: EndReason) {
        self.finished = Some(reason);
        match reason {
            EndReason::TickCap | EndReason::ScoreCap => tracing::warn!(
                generation = self.generation,
                ticks = self.clock.ticks(),
                score = self.score,
                alive = self.population.len(),
                reason = ?reason,
                "Generation stopped by episode cap"
            ),
            EndReason::Empty | EndReason::Extinct => tracing::info!(
                generation = self.generation,
                ticks = self.clock.ticks(),
                score = self.score,
                reason = ?reason,
                "Generation finished"
            ),
        }
    }

    /// Steps until the generation ends.
    ///
    /// Without an episode cap this only returns once every agent is dead.
    pub fn run(&mut self) -> anyhow::Result<GenerationOutcome> {
        self.run_with(&Metrics::new())
    }

    pub fn run_with(&mut self, metrics: &Metrics) -> anyhow::Result<GenerationOutcome> {
        while self.finished.is_none() {
            let started = Instant::now();
            let report = self.step()?;
            metrics.record_tick(&report, started.elapsed());
        }
        metrics.increment_counter("generations");
        self.outcome().ok_or_else(|| {
            anyhow::anyhow!("Generation {} has no outcome", self.generation)
        })
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished.is_some()
    }

    #[must_use]
    pub fn record(&self) -> GenerationRecord {
        GenerationRecord {
            generation: self.generation,
            score: self.score,
            alive_count: self.population.len(),
            ticks: self.clock.ticks(),
            finished: self.finished,
        }
    }

    /// Final fitness per submitted agent, available once the generation ended.
    #[must_use]
    pub fn outcome(&self) -> Option<GenerationOutcome> {
        self.finished.map(|end| GenerationOutcome {
            generation: self.generation,
            score: self.score,
            ticks: self.clock.ticks(),
            end,
            fitness: self.population.final_fitness(),
            config_fingerprint: self.fingerprint.clone(),
        })
    }

    #[must_use]
    pub fn snapshot(&self) -> FrameSnapshot {
        crate::snapshot::frame_snapshot(self)
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.clock.ticks()
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    #[must_use]
    pub fn stream(&self) -> &ObstacleStream {
        &self.stream
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Mode;
    use crate::decision::{boxed, policies};
    use crate::stream::ScriptedGaps;
    use gatewing_data::{DeathCause, Observation};

    fn scripted(config: &AppConfig, gaps: Vec<i32>) -> Box<dyn GapSource> {
        Box::new(ScriptedGaps::new(gaps, &config.obstacle).unwrap())
    }

    #[test]
    fn test_empty_population_is_noop() {
        let mut sim = Simulation::new(AppConfig::default(), Vec::new(), 1).unwrap();
        assert!(sim.is_finished());
        let outcome = sim.run().unwrap();
        assert_eq!(outcome.end, EndReason::Empty);
        assert_eq!(outcome.ticks, 0);
        assert_eq!(outcome.score, 0);
        assert!(outcome.fitness.is_empty());
    }

    #[test]
    fn test_invalid_config_rejected_before_any_tick() {
        let mut config = AppConfig::default();
        config.obstacle.gap_max = config.obstacle.gap_min;
        let result = Simulation::new(config, vec![boxed(policies::glide)], 1);
        assert!(matches!(result, Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_gap_source_checked_against_simulation_range() {
        let wide = AppConfig::default();
        let gaps = scripted(&wide, vec![120, 400]);
        let mut narrow = AppConfig::default();
        narrow.obstacle.gap_max = 300;
        let result =
            Simulation::with_gap_source(narrow, vec![boxed(policies::glide)], 1, gaps);
        assert!(matches!(
            result,
            Err(SimError::GapOutOfRange { value: 400, max: 300, .. })
        ));
    }

    #[test]
    fn test_step_after_finish_fails() {
        let config = AppConfig::for_mode(Mode::Single);
        let gaps = scripted(&config, vec![200]);
        let mut sim =
            Simulation::with_gap_source(config, vec![boxed(policies::glide)], 4, gaps).unwrap();
        sim.run().unwrap();
        let err = sim.step().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SimError>(),
            Some(SimError::Finished { generation: 4 })
        ));
    }

    #[test]
    fn test_free_fall_dies_on_floor() {
        let config = AppConfig::for_mode(Mode::Single);
        let gaps = scripted(&config, vec![200]);
        let mut sim =
            Simulation::with_gap_source(config, vec![boxed(policies::glide)], 1, gaps).unwrap();
        let mut last_y = 350.0;
        loop {
            let report = sim.step().unwrap();
            if let Some(death) = report.deaths.first() {
                assert_eq!(report.tick, 23);
                assert_eq!(death.cause, DeathCause::Boundary);
                break;
            }
            let y = sim.population().agents()[0].y;
            assert!(y > last_y);
            last_y = y;
        }
        assert_eq!(last_y, 668.0);
        let outcome = sim.outcome().unwrap();
        assert_eq!(outcome.end, EndReason::Extinct);
        assert!((outcome.fitness[0] - (22.0 * 0.1 - 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_decision_error_leaves_state_untouched() {
        let config = AppConfig::default();
        let gaps = scripted(&config, vec![200]);
        struct Failing;
        impl DecisionFunction for Failing {
            fn activate(&mut self, _: &Observation) -> anyhow::Result<f64> {
                anyhow::bail!("boom")
            }
        }
        let mut sim = Simulation::with_gap_source(
            config,
            vec![boxed(policies::glide), boxed(Failing)],
            1,
            gaps,
        )
        .unwrap();
        let err = sim.step().unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(sim.ticks(), 0);
        assert_eq!(sim.population().agents()[0].y, 350.0);
    }

    #[test]
    fn test_tick_cap() {
        let mut config = AppConfig::default();
        config.episode.max_ticks = Some(5);
        let gaps = scripted(&config, vec![200]);
        let mut sim =
            Simulation::with_gap_source(config, vec![boxed(policies::glide)], 1, gaps).unwrap();
        let outcome = sim.run().unwrap();
        assert_eq!(outcome.end, EndReason::TickCap);
        assert_eq!(outcome.ticks, 5);
        assert_eq!(sim.record().alive_count, 1);
    }
}
