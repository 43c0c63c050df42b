//! Error types for the simulation core.
//!
//! Per-agent failures (leaving the play area, hitting an obstacle) are not
//! errors; they retire the agent. These variants cover the conditions that
//! stop a caller from running a tick at all.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    /// Configuration rejected before any tick ran.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A decision function produced NaN or an infinity.
    #[error("Decision function for agent {agent} returned non-finite output {value}")]
    NonFiniteDecision { agent: usize, value: f64 },

    /// A scripted gap lies outside the configured range.
    #[error("Gap center {value} outside [{min}, {max})")]
    GapOutOfRange { value: i32, min: i32, max: i32 },

    /// `step` was called after the generation was finalized.
    #[error("Generation {generation} already finished")]
    Finished { generation: u32 },
}

impl SimError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
