//! Read-only frame surface handed to renderers.
//!
//! Views are copies; nothing here can be used to mutate simulation state.

use serde::{Deserialize, Serialize};

/// One living agent as it should be drawn this frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentView {
    /// Index of the agent in the population as originally submitted.
    pub origin: usize,
    pub x: f64,
    pub y: f64,
    pub velocity: f64,
    /// Degrees, positive is nose-up.
    pub tilt: f64,
}

/// One active obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub x: f64,
    pub width: f64,
    pub gap_center: i32,
    /// Top of the upper segment; the segment ends at `gap_center`.
    pub top_edge: f64,
    /// Top of the lower segment.
    pub bottom_edge: f64,
    pub passed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundView {
    pub y: f64,
    pub x1: f64,
    pub x2: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub generation: u32,
    pub score: u32,
    pub alive_count: usize,
    /// Index into `obstacles` the cohort is currently steering for.
    pub active_obstacle: Option<usize>,
    pub agents: Vec<AgentView>,
    pub obstacles: Vec<ObstacleView>,
    pub ground: GroundView,
}
