//! # Gatewing Data
//!
//! Plain data exchanged between the simulation core and its collaborators:
//! the observation handed to decision functions, the read-only frame surface
//! consumed by renderers, and the per-tick / per-generation records consumed
//! by optimizers.

pub mod data;

pub use data::observation::{Observation, OBSERVATION_SIZE};
pub use data::record::{
    Death, DeathCause, EndReason, GenerationOutcome, GenerationRecord, TickReport,
};
pub use data::view::{AgentView, FrameSnapshot, GroundView, ObstacleView};
