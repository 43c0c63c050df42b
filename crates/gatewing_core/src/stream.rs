//! The stream of active obstacles and the scrolling ground beneath them.

use crate::config::{AppConfig, GroundConfig, ObstacleConfig};
use crate::error::SimError;
use crate::obstacle::Obstacle;
use gatewing_data::GroundView;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Supplies the gap center of each new obstacle.
pub trait GapSource: Send {
    fn next_gap(&mut self) -> i32;

    /// Fails if this source can produce a gap outside `cfg`'s range.
    fn check_range(&self, _cfg: &ObstacleConfig) -> Result<(), SimError> {
        Ok(())
    }
}

fn gap_in_range(value: i32, cfg: &ObstacleConfig) -> Result<(), SimError> {
    if value < cfg.gap_min || value >= cfg.gap_max {
        return Err(SimError::GapOutOfRange {
            value,
            min: cfg.gap_min,
            max: cfg.gap_max,
        });
    }
    Ok(())
}

/// Uniform gap centers in `[min, max)` from a seeded ChaCha8 stream.
#[derive(Debug, Clone)]
pub struct SeededGaps {
    rng: ChaCha8Rng,
    min: i32,
    max: i32,
}

impl SeededGaps {
    #[must_use]
    pub fn new(seed: u64, min: i32, max: i32) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            min,
            max,
        }
    }

    #[must_use]
    pub fn from_entropy(min: i32, max: i32) -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
            min,
            max,
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let (min, max) = (config.obstacle.gap_min, config.obstacle.gap_max);
        match config.world.seed {
            Some(seed) => Self::new(seed, min, max),
            None => Self::from_entropy(min, max),
        }
    }
}

impl GapSource for SeededGaps {
    fn next_gap(&mut self) -> i32 {
        self.rng.gen_range(self.min..self.max)
    }

    fn check_range(&self, cfg: &ObstacleConfig) -> Result<(), SimError> {
        if self.min >= self.max {
            return Err(SimError::invalid_config(format!(
                "Seeded gap range [{}, {}) is empty",
                self.min, self.max
            )));
        }
        gap_in_range(self.min, cfg)?;
        gap_in_range(self.max - 1, cfg)
    }
}

/// A fixed sequence of gap centers, repeated once exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedGaps {
    gaps: Vec<i32>,
    cursor: usize,
}

impl ScriptedGaps {
    /// Fails if the sequence is empty or leaves the configured range.
    pub fn new(gaps: Vec<i32>, cfg: &ObstacleConfig) -> Result<Self, SimError> {
        if gaps.is_empty() {
            return Err(SimError::invalid_config("Scripted gap sequence is empty"));
        }
        let scripted = Self { gaps, cursor: 0 };
        scripted.check_range(cfg)?;
        Ok(scripted)
    }
}

impl GapSource for ScriptedGaps {
    fn next_gap(&mut self) -> i32 {
        let gap = self.gaps[self.cursor % self.gaps.len()];
        self.cursor += 1;
        gap
    }

    fn check_range(&self, cfg: &ObstacleConfig) -> Result<(), SimError> {
        self.gaps.iter().try_for_each(|&g| gap_in_range(g, cfg))
    }
}

/// Two ground tiles scrolling left, each wrapping behind the other.
#[derive(Debug, Clone, PartialEq)]
pub struct Ground {
    pub y: f64,
    pub x1: f64,
    pub x2: f64,
    width: f64,
    velocity: f64,
}

impl Ground {
    #[must_use]
    pub fn new(cfg: &GroundConfig) -> Self {
        Self {
            y: cfg.y,
            x1: 0.0,
            x2: cfg.width,
            width: cfg.width,
            velocity: cfg.velocity,
        }
    }

    pub fn advance(&mut self) {
        self.x1 -= self.velocity;
        self.x2 -= self.velocity;
        if self.x1 + self.width < 0.0 {
            self.x1 = self.x2 + self.width;
        }
        if self.x2 + self.width < 0.0 {
            self.x2 = self.x1 + self.width;
        }
    }

    #[must_use]
    pub fn view(&self) -> GroundView {
        GroundView {
            y: self.y,
            x1: self.x1,
            x2: self.x2,
        }
    }
}

/// Owns the active obstacles in spawn order, leftmost first.
pub struct ObstacleStream {
    obstacles: Vec<Obstacle>,
    gaps: Box<dyn GapSource>,
    cfg: ObstacleConfig,
    ground: Ground,
}

impl ObstacleStream {
    #[must_use]
    pub fn new(config: &AppConfig, gaps: Box<dyn GapSource>) -> Self {
        let mut stream = Self {
            obstacles: Vec::new(),
            gaps,
            cfg: config.obstacle.clone(),
            ground: Ground::new(&config.ground),
        };
        if config.obstacle.spawn_initial {
            stream.spawn_at(config.obstacle.initial_x);
        }
        stream
    }

    #[must_use]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    #[must_use]
    pub fn ground(&self) -> &Ground {
        &self.ground
    }

    /// Appends an obstacle at the configured spawn x and returns its gap center.
    pub fn spawn(&mut self) -> i32 {
        self.spawn_at(self.cfg.spawn_x)
    }

    pub fn spawn_at(&mut self, x: f64) -> i32 {
        let gap = self.gaps.next_gap();
        self.obstacles.push(Obstacle::new(x, gap, &self.cfg));
        tracing::debug!(x, gap, "Obstacle spawned");
        gap
    }

    /// Index of the obstacle the lead agent is approaching.
    ///
    /// Once the lead agent is past the first obstacle by the pass threshold
    /// the second one becomes relevant.
    #[must_use]
    pub fn active_index(&self, lead_x: Option<f64>) -> usize {
        match (lead_x, self.obstacles.first()) {
            (Some(x), Some(first))
                if self.obstacles.len() > 1 && x > first.x + self.cfg.pass_threshold =>
            {
                1
            }
            _ => 0,
        }
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Obstacle> {
        self.obstacles.get(index)
    }

    /// Moves every obstacle and the ground one tick. Returns how many
    /// obstacles became passed.
    pub fn advance(&mut self, reference_x: Option<f64>) -> u32 {
        self.ground.advance();
        let mut passed = 0;
        for obstacle in &mut self.obstacles {
            if obstacle.advance(reference_x, &self.cfg) {
                tracing::debug!(gap = obstacle.gap_center(), "Obstacle passed");
                passed += 1;
            }
        }
        passed
    }

    /// Drops obstacles whose trailing edge has left the screen.
    pub fn prune(&mut self) -> usize {
        let before = self.obstacles.len();
        self.obstacles.retain(|o| !o.is_off_screen());
        let pruned = before - self.obstacles.len();
        if pruned > 0 {
            tracing::debug!(pruned, "Obstacles pruned");
        }
        pruned
    }
}
