//! Index-aligned bookkeeping for a cohort of agents.
//!
//! Agents, their decision functions, their fitness and their original
//! submission index live in parallel vectors of equal length. Nothing
//! removes from one without removing the same index from all of them.

use crate::agent::Agent;
use crate::collision::{collides, SegmentMasks};
use crate::config::{AgentConfig, AppConfig};
use crate::decision::DecisionFunction;
use crate::error::SimError;
use crate::mask::CoverageMask;
use crate::obstacle::Obstacle;
use gatewing_data::{AgentView, Death, DeathCause, Observation};
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Per-tick death marks, one slot per current agent.
pub type DeathMarks = Vec<Option<DeathCause>>;

pub struct Population {
    agents: Vec<Agent>,
    deciders: Vec<Box<dyn DecisionFunction>>,
    fitness: Vec<f64>,
    origins: Vec<usize>,
    /// Fitness of every submitted agent, filled in as agents are retired.
    final_fitness: Vec<f64>,
}

impl Population {
    #[must_use]
    pub fn new(
        deciders: Vec<Box<dyn DecisionFunction>>,
        cfg: &AgentConfig,
        shape: Arc<CoverageMask>,
    ) -> Self {
        let n = deciders.len();
        Self {
            agents: (0..n)
                .map(|_| Agent::new(cfg.start_x, cfg.start_y, Arc::clone(&shape)))
                .collect(),
            deciders,
            fitness: vec![0.0; n],
            origins: (0..n).collect(),
            final_fitness: vec![0.0; n],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    #[must_use]
    pub fn fitness(&self) -> &[f64] {
        &self.fitness
    }

    #[must_use]
    pub fn origins(&self) -> &[usize] {
        &self.origins
    }

    /// x of the first agent in the cohort.
    #[must_use]
    pub fn lead_x(&self) -> Option<f64> {
        self.agents.first().map(|a| a.x)
    }

    /// Builds every observation from the state at the start of the tick.
    #[must_use]
    pub fn observe(&self, obstacle: Option<&Obstacle>) -> Vec<Observation> {
        self.agents
            .iter()
            .map(|agent| match obstacle {
                Some(o) => Observation {
                    height: agent.y,
                    gap_center_distance: (agent.y - f64::from(o.gap_center())).abs(),
                    bottom_edge_distance: (agent.y - o.bottom_edge()).abs(),
                },
                None => Observation {
                    height: agent.y,
                    ..Default::default()
                },
            })
            .collect()
    }

    /// Runs every decision function on its own observation.
    ///
    /// Outputs come back in index order. Every decision function is called
    /// exactly once per tick in both modes, even when an earlier one fails,
    /// so stateful deciders end a failed tick in the same state either way.
    /// The first failing decision function in index order determines the
    /// error, which is returned as is.
    pub fn decide(
        &mut self,
        observations: &[Observation],
        parallel: bool,
    ) -> anyhow::Result<Vec<f64>> {
        let results = self.evaluate(observations, parallel);
        let mut outputs = Vec::with_capacity(results.len());
        for (i, result) in results.into_iter().enumerate() {
            let value = result?;
            if !value.is_finite() {
                return Err(SimError::NonFiniteDecision {
                    agent: self.origins[i],
                    value,
                }
                .into());
            }
            outputs.push(value);
        }
        Ok(outputs)
    }

    #[cfg(feature = "parallel")]
    fn evaluate(
        &mut self,
        observations: &[Observation],
        parallel: bool,
    ) -> Vec<anyhow::Result<f64>> {
        if parallel {
            self.deciders
                .par_iter_mut()
                .zip(observations.par_iter())
                .map(|(decider, obs)| decider.activate(obs))
                .collect()
        } else {
            self.evaluate_sequential(observations)
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate(
        &mut self,
        observations: &[Observation],
        _parallel: bool,
    ) -> Vec<anyhow::Result<f64>> {
        self.evaluate_sequential(observations)
    }

    fn evaluate_sequential(&mut self, observations: &[Observation]) -> Vec<anyhow::Result<f64>> {
        self.deciders
            .iter_mut()
            .zip(observations)
            .map(|(decider, obs)| decider.activate(obs))
            .collect()
    }

    /// Jumps every agent whose output exceeds `threshold`.
    pub fn apply_jumps(&mut self, outputs: &[f64], threshold: f64, jump_strength: f64) {
        for (agent, &output) in self.agents.iter_mut().zip(outputs) {
            if output > threshold {
                agent.jump(jump_strength);
            }
        }
    }

    /// Retires agents outside the vertical bounds and moves the rest.
    pub fn integrate(&mut self, config: &AppConfig, marks: &mut DeathMarks) {
        let bounds = &config.bounds;
        let scoring = &config.scoring;
        for (i, agent) in self.agents.iter_mut().enumerate() {
            if agent.out_of_bounds(bounds.ceiling, bounds.floor) {
                agent.alive = false;
                marks[i] = Some(DeathCause::Boundary);
                self.fitness[i] -= scoring.boundary_penalty;
            } else {
                agent.advance(&config.agent);
                self.fitness[i] += scoring.survival_reward;
            }
        }
    }

    /// x of the first agent that survived the boundary check.
    #[must_use]
    pub fn first_survivor_x(&self, marks: &DeathMarks) -> Option<f64> {
        self.agents
            .iter()
            .zip(marks)
            .find(|(_, mark)| mark.is_none())
            .map(|(agent, _)| agent.x)
    }

    /// Retires surviving agents that overlap any obstacle. An agent is
    /// penalized at most once however many obstacles it touches.
    pub fn collide(
        &mut self,
        obstacles: &[Obstacle],
        segments: &SegmentMasks,
        penalty: f64,
        marks: &mut DeathMarks,
    ) {
        for (i, agent) in self.agents.iter_mut().enumerate() {
            if marks[i].is_some() {
                continue;
            }
            if obstacles.iter().any(|o| collides(agent, o, segments)) {
                agent.alive = false;
                marks[i] = Some(DeathCause::Collision);
                self.fitness[i] -= penalty;
            }
        }
    }

    /// Adds `bonus` to every agent not marked this tick.
    pub fn award(&mut self, bonus: f64, marks: &DeathMarks) {
        for (fitness, mark) in self.fitness.iter_mut().zip(marks) {
            if mark.is_none() {
                *fitness += bonus;
            }
        }
    }

    /// Removes every marked index from all collections, highest index first.
    ///
    /// Returned deaths are ordered by their index before removal.
    pub fn remove_marked(&mut self, marks: &DeathMarks) -> Vec<Death> {
        let mut deaths = Vec::new();
        for i in (0..marks.len()).rev() {
            let Some(cause) = marks[i] else { continue };
            self.agents.remove(i);
            self.deciders.remove(i);
            let fitness = self.fitness.remove(i);
            let origin = self.origins.remove(i);
            self.final_fitness[origin] = fitness;
            tracing::debug!(origin, ?cause, fitness, "Agent retired");
            deaths.push(Death {
                origin,
                cause,
                fitness,
            });
        }
        deaths.reverse();
        deaths
    }

    /// Fitness per submission index; survivors report their running total.
    #[must_use]
    pub fn final_fitness(&self) -> Vec<f64> {
        let mut out = self.final_fitness.clone();
        for (&origin, &fitness) in self.origins.iter().zip(&self.fitness) {
            out[origin] = fitness;
        }
        out
    }

    #[must_use]
    pub fn views(&self) -> Vec<AgentView> {
        self.agents
            .iter()
            .zip(&self.origins)
            .map(|(a, &origin)| AgentView {
                origin,
                x: a.x,
                y: a.y,
                velocity: a.velocity,
                tilt: a.tilt,
            })
            .collect()
    }
}
