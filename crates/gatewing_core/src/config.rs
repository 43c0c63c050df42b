//! Configuration management for simulation parameters.
//!
//! This module provides strongly-typed configuration structures that map to
//! the `config.toml` file. Every physical constant the simulation uses lives
//! here so rulesets can be injected rather than baked in.
//!
//! ## Configuration Hierarchy
//!
//! 1. Mode presets (`AppConfig::for_mode`)
//! 2. `config.toml` file (overrides presets)
//! 3. Command-line overrides applied by the binary
//!
//! ## Example `config.toml`
//!
//! ```toml
//! mode = "Cohort"
//!
//! [world]
//! seed = 42
//!
//! [agent]
//! gravity = 2.0
//! jump_strength = 8.0
//!
//! [episode]
//! score_cap = 50
//! ```

use crate::error::SimError;
use serde::{Deserialize, Serialize};

/// Which flavour of the game is simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Mode {
    /// One agent, slower obstacle cadence, no obstacle on screen at start.
    Single,
    /// A cohort of agents evaluated in lockstep.
    #[default]
    Cohort,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed for obstacle gap generation. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Evaluate decision functions with rayon.
    pub parallel_decisions: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: None,
            parallel_decisions: false,
        }
    }
}

/// Agent kinematics and sprite geometry.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AgentConfig {
    pub start_x: f64,
    pub start_y: f64,
    pub gravity: f64,
    pub jump_strength: f64,
    /// Largest downward displacement applied in one tick.
    pub terminal_displacement: f64,
    /// Extra upward displacement applied while rising.
    pub rise_boost: f64,
    pub max_tilt: f64,
    pub min_tilt: f64,
    pub rotation_step: f64,
    /// Distance below the launch height before the nose starts to drop.
    pub tilt_threshold: f64,
    pub width: u32,
    pub height: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            start_x: 230.0,
            start_y: 350.0,
            gravity: 2.0,
            jump_strength: 8.0,
            terminal_displacement: 16.0,
            rise_boost: 2.0,
            max_tilt: 25.0,
            min_tilt: -90.0,
            rotation_step: 20.0,
            tilt_threshold: 50.0,
            width: 68,
            height: 48,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ObstacleConfig {
    pub velocity: f64,
    pub vertical_gap: f64,
    /// How far the reference agent must be past an obstacle's x to pass it.
    pub pass_threshold: f64,
    /// Inclusive lower bound of the gap center.
    pub gap_min: i32,
    /// Exclusive upper bound of the gap center.
    pub gap_max: i32,
    pub width: u32,
    /// Height of each of the two segments.
    pub segment_height: u32,
    pub spawn_x: f64,
    /// Place an obstacle at `initial_x` before the first tick.
    pub spawn_initial: bool,
    pub initial_x: f64,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            velocity: 5.0,
            vertical_gap: 200.0,
            pass_threshold: 55.0,
            gap_min: 50,
            gap_max: 450,
            width: 70,
            segment_height: 500,
            spawn_x: 700.0,
            spawn_initial: true,
            initial_x: 600.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct GroundConfig {
    pub y: f64,
    pub width: f64,
    pub velocity: f64,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            y: 730.0,
            width: 672.0,
            velocity: 5.0,
        }
    }
}

/// Vertical death limits, both inclusive.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct BoundsConfig {
    pub ceiling: f64,
    pub floor: f64,
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            ceiling: 10.0,
            floor: 665.0,
        }
    }
}

/// Fitness shaping. Penalties are stored as positive magnitudes.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ScoringConfig {
    pub survival_reward: f64,
    pub boundary_penalty: f64,
    pub collision_penalty: f64,
    pub pass_bonus: f64,
    /// Decision outputs strictly above this trigger a jump.
    pub jump_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            survival_reward: 0.1,
            boundary_penalty: 1.0,
            collision_penalty: 1.0,
            pass_bonus: 5.0,
            jump_threshold: 0.5,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ClockConfig {
    pub frame_rate: u32,
    pub spawn_interval_ms: u64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            frame_rate: 35,
            spawn_interval_ms: 1500,
        }
    }
}

/// External caps that finalize a generation before extinction.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct EpisodeConfig {
    pub max_ticks: Option<u64>,
    pub score_cap: Option<u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub mode: Mode,
    pub world: WorldConfig,
    pub agent: AgentConfig,
    pub obstacle: ObstacleConfig,
    pub ground: GroundConfig,
    pub bounds: BoundsConfig,
    pub scoring: ScoringConfig,
    pub clock: ClockConfig,
    pub episode: EpisodeConfig,
}

impl AppConfig {
    /// Preset for the given mode.
    ///
    /// The cohort preset is the `Default`. The single-agent preset spawns
    /// every 2000 ms at x = 600 and starts with an empty screen.
    #[must_use]
    pub fn for_mode(mode: Mode) -> Self {
        let mut config = Self {
            mode,
            ..Self::default()
        };
        if mode == Mode::Single {
            config.clock.spawn_interval_ms = 2000;
            config.obstacle.spawn_x = 600.0;
            config.obstacle.spawn_initial = false;
        }
        config
    }

    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    pub fn validate(&self) -> Result<(), SimError> {
        let agent = &self.agent;
        ensure(agent.gravity.is_finite(), "Gravity must be finite")?;
        ensure(
            agent.jump_strength.is_finite(),
            "Jump strength must be finite",
        )?;
        ensure(
            agent.start_x.is_finite() && agent.start_y.is_finite(),
            "Agent start position must be finite",
        )?;
        ensure(
            agent.terminal_displacement > 0.0,
            "Terminal displacement must be positive",
        )?;
        ensure(agent.rise_boost >= 0.0, "Rise boost must be non-negative")?;
        ensure(
            agent.min_tilt < agent.max_tilt,
            "Minimum tilt must be below maximum tilt",
        )?;
        ensure(agent.rotation_step > 0.0, "Rotation step must be positive")?;
        ensure(
            agent.width > 0 && agent.height > 0,
            "Agent sprite dimensions must be positive",
        )?;

        let obstacle = &self.obstacle;
        ensure(
            obstacle.gap_min < obstacle.gap_max,
            "Gap center range must be non-empty",
        )?;
        ensure(
            obstacle.vertical_gap > 0.0,
            "Vertical gap must be positive",
        )?;
        ensure(
            obstacle.velocity >= 0.0,
            "Obstacle velocity must be non-negative",
        )?;
        ensure(
            obstacle.pass_threshold >= 0.0,
            "Pass threshold must be non-negative",
        )?;
        ensure(
            obstacle.width > 0 && obstacle.segment_height > 0,
            "Obstacle dimensions must be positive",
        )?;
        ensure(
            obstacle.spawn_x.is_finite() && obstacle.initial_x.is_finite(),
            "Obstacle spawn positions must be finite",
        )?;

        ensure(
            self.ground.width > 0.0 && self.ground.velocity >= 0.0,
            "Ground must have positive width and non-negative velocity",
        )?;
        ensure(
            self.bounds.ceiling < self.bounds.floor,
            "Ceiling must be above the floor",
        )?;
        ensure(
            (0.0..=1.0).contains(&self.scoring.jump_threshold),
            "Jump threshold must be in [0.0, 1.0]",
        )?;
        ensure(self.clock.frame_rate > 0, "Frame rate must be positive")?;
        ensure(
            self.clock.frame_rate <= 1_000_000,
            "Frame rate too high (max 1000000)",
        )?;
        ensure(
            self.clock.spawn_interval_ms > 0,
            "Spawn interval must be positive",
        )?;

        Ok(())
    }

    /// Parses and validates a TOML document.
    ///
    /// Keys missing from the document fall back to the preset of the mode it
    /// names, or the cohort preset when it names none.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Self::from_toml_with_mode(content, None)
    }

    /// Like [`AppConfig::from_toml`], but `mode` replaces whatever mode the
    /// document names before the preset is chosen.
    pub fn from_toml_with_mode(content: &str, mode: Option<Mode>) -> anyhow::Result<Self> {
        let mut overrides: toml::Table = toml::from_str(content)?;
        if let Some(mode) = mode {
            overrides.insert("mode".to_string(), toml::Value::try_from(mode)?);
        }
        let mode = match overrides.get("mode") {
            Some(value) => value.clone().try_into::<Mode>()?,
            None => Mode::default(),
        };
        let mut merged = match toml::Value::try_from(Self::for_mode(mode))? {
            toml::Value::Table(table) => table,
            _ => anyhow::bail!("Preset did not serialize to a table"),
        };
        merge_tables(&mut merged, overrides);
        let config: Self = toml::Value::Table(merged).try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Hash of every section that changes simulated behaviour.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.mode).as_bytes());
        hasher.update(format!("{:?}", self.agent).as_bytes());
        hasher.update(format!("{:?}", self.obstacle).as_bytes());
        hasher.update(format!("{:?}", self.bounds).as_bytes());
        hasher.update(format!("{:?}", self.scoring).as_bytes());
        hasher.update(format!("{:?}", self.clock).as_bytes());
        hex::encode(hasher.finalize())
    }
}

fn merge_tables(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(inner)), toml::Value::Table(patch)) => {
                merge_tables(inner, patch);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

fn ensure(condition: bool, message: &str) -> Result<(), SimError> {
    if condition {
        Ok(())
    } else {
        Err(SimError::invalid_config(message))
    }
}
