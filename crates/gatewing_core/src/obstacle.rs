use crate::config::ObstacleConfig;
use gatewing_data::ObstacleView;

/// A gated barrier: an upper segment ending at `gap_center` and a lower
/// segment starting `vertical_gap` below it.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub x: f64,
    pub width: f64,
    gap_center: i32,
    top_edge: f64,
    bottom_edge: f64,
    passed: bool,
}

impl Obstacle {
    #[must_use]
    pub fn new(x: f64, gap_center: i32, cfg: &ObstacleConfig) -> Self {
        let center = f64::from(gap_center);
        Self {
            x,
            width: f64::from(cfg.width),
            gap_center,
            top_edge: center - f64::from(cfg.segment_height),
            bottom_edge: center + cfg.vertical_gap,
            passed: false,
        }
    }

    #[must_use]
    pub fn gap_center(&self) -> i32 {
        self.gap_center
    }

    #[must_use]
    pub fn top_edge(&self) -> f64 {
        self.top_edge
    }

    #[must_use]
    pub fn bottom_edge(&self) -> f64 {
        self.bottom_edge
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Moves left by one tick and returns `true` on the tick the obstacle
    /// becomes passed.
    ///
    /// `reference_x` is the x of the agent that decides passing; with no
    /// reference the obstacle only moves.
    pub fn advance(&mut self, reference_x: Option<f64>, cfg: &ObstacleConfig) -> bool {
        self.x -= cfg.velocity;
        match reference_x {
            Some(rx) if !self.passed && rx - self.x > cfg.pass_threshold => {
                self.passed = true;
                true
            }
            _ => false,
        }
    }

    /// Trailing edge has left the screen.
    #[must_use]
    pub fn is_off_screen(&self) -> bool {
        self.x + self.width < 0.0
    }

    #[must_use]
    pub fn view(&self) -> ObstacleView {
        ObstacleView {
            x: self.x,
            width: self.width,
            gap_center: self.gap_center,
            top_edge: self.top_edge,
            bottom_edge: self.bottom_edge,
            passed: self.passed,
        }
    }
}
