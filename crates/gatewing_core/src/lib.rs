//! # Gatewing Core
//!
//! Deterministic tick engine for a side-scrolling obstacle course flown by a
//! cohort of agents.
//!
//! This crate contains:
//! - Agent kinematics with a phase-driven tilt rule
//! - Obstacles with one-shot pass detection and a timed obstacle stream
//! - Exact-shape collision on coverage masks
//! - Index-aligned population bookkeeping and fitness scoring
//! - A reference feed-forward network usable as a decision function
//! - Metrics collection and structured logging
//!
//! Given the same gap sequence and the same decision functions, a generation
//! produces the same fitness on every run.
//!
//! ## Example
//!
//! ```
//! use gatewing_core::config::{AppConfig, Mode};
//! use gatewing_core::decision::{boxed, policies};
//! use gatewing_core::Simulation;
//!
//! let mut config = AppConfig::for_mode(Mode::Single);
//! config.world.seed = Some(42);
//!
//! let mut sim = Simulation::new(config, vec![boxed(policies::glide)], 1).unwrap();
//! let outcome = sim.run().unwrap();
//! assert_eq!(outcome.fitness.len(), 1);
//! assert_eq!(outcome.score, 0);
//! ```

/// Agent state and kinematics
pub mod agent;
/// Reference feed-forward network
pub mod brain;
/// Fixed-step simulation clock and spawn timer
pub mod clock;
/// Exact-shape agent/obstacle overlap
pub mod collision;
/// Configuration management for simulation parameters
pub mod config;
/// Decision-function capability and stock policies
pub mod decision;
/// Error types
pub mod error;
/// Bit-packed coverage masks
pub mod mask;
/// Performance metrics collection and logging
pub mod metrics;
/// Gated obstacles
pub mod obstacle;
/// Parallel agent / decision / fitness collections
pub mod population;
/// Generation lifecycle and the per-tick pipeline
pub mod simulation;
/// Render-facing frame snapshots
pub mod snapshot;
/// Obstacle stream, gap sources and scrolling ground
pub mod stream;

pub use brain::Network;
pub use decision::DecisionFunction;
pub use error::SimError;
pub use metrics::{init_logging, Metrics};
pub use simulation::Simulation;
pub use stream::{GapSource, ScriptedGaps, SeededGaps};
