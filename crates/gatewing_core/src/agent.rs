//! Agent kinematics.
//!
//! Vertical motion is driven by a displacement formula evaluated from the
//! ticks elapsed since the last impulse, so a jump restarts the arc rather
//! than adding to the current velocity. Tilt is derived from the motion
//! phase each tick instead of being integrated.

use crate::config::AgentConfig;
use crate::mask::CoverageMask;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Agent {
    pub x: f64,
    pub y: f64,
    pub velocity: f64,
    /// Ticks since the last impulse.
    pub tick_count: u32,
    /// Degrees, positive is nose-up.
    pub tilt: f64,
    /// `y` at the moment of the last impulse.
    pub reference_height: f64,
    pub alive: bool,
    pub shape: Arc<CoverageMask>,
}

impl Agent {
    #[must_use]
    pub fn new(x: f64, y: f64, shape: Arc<CoverageMask>) -> Self {
        Self {
            x,
            y,
            velocity: 0.0,
            tick_count: 0,
            tilt: 0.0,
            reference_height: y,
            alive: true,
            shape,
        }
    }

    /// Applies an upward impulse.
    pub fn jump(&mut self, jump_strength: f64) {
        self.velocity = -jump_strength;
        self.tick_count = 0;
        self.reference_height = self.y;
    }

    /// Advances one tick under gravity and returns the displacement applied.
    pub fn advance(&mut self, cfg: &AgentConfig) -> f64 {
        self.tick_count += 1;
        let t = f64::from(self.tick_count);
        let mut displacement = self.velocity * t + 0.5 * cfg.gravity * t * t;

        if displacement >= cfg.terminal_displacement {
            displacement = cfg.terminal_displacement;
        }
        if displacement < 0.0 {
            displacement -= cfg.rise_boost;
        }

        self.y += displacement;

        if displacement < 0.0 || self.y < self.reference_height + cfg.tilt_threshold {
            if self.tilt < cfg.max_tilt {
                self.tilt = cfg.max_tilt;
            }
        } else if self.tilt > cfg.min_tilt {
            self.tilt = (self.tilt - cfg.rotation_step).max(cfg.min_tilt);
        }

        displacement
    }

    /// Whether `y` has reached either vertical limit.
    #[must_use]
    pub fn out_of_bounds(&self, ceiling: f64, floor: f64) -> bool {
        self.y >= floor || self.y <= ceiling
    }
}
