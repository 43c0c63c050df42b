//! Exact-shape collision between an agent and an obstacle.
//!
//! Offsets are taken from the agent's top-left corner: the x offset
//! truncates toward zero and the y offset uses `round(agent.y)` with ties
//! to even.

use crate::agent::Agent;
use crate::mask::CoverageMask;
use crate::obstacle::Obstacle;
use std::sync::Arc;

/// Coverage of the two obstacle segments.
#[derive(Debug, Clone)]
pub struct SegmentMasks {
    pub top: Arc<CoverageMask>,
    pub bottom: Arc<CoverageMask>,
}

impl SegmentMasks {
    /// Fully opaque segments of the given size.
    #[must_use]
    pub fn solid(width: u32, height: u32) -> Self {
        let mask = Arc::new(CoverageMask::filled(width, height));
        Self {
            top: Arc::clone(&mask),
            bottom: mask,
        }
    }
}

#[must_use]
pub fn segment_offsets(agent: &Agent, obstacle: &Obstacle) -> ((i32, i32), (i32, i32)) {
    let dx = (obstacle.x - agent.x) as i32;
    let ay = agent.y.round_ties_even();
    (
        (dx, (obstacle.top_edge() - ay) as i32),
        (dx, (obstacle.bottom_edge() - ay) as i32),
    )
}

/// Whether any covered cell of the agent overlaps a covered cell of either
/// segment.
#[must_use]
pub fn collides(agent: &Agent, obstacle: &Obstacle, segments: &SegmentMasks) -> bool {
    let (top_offset, bottom_offset) = segment_offsets(agent, obstacle);
    agent.shape.overlaps(&segments.bottom, bottom_offset)
        || agent.shape.overlaps(&segments.top, top_offset)
}
