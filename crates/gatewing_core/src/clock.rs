use crate::config::ClockConfig;

/// Fixed-step clock. Time only moves when `advance` is called, one frame
/// of `1_000_000 / frame_rate` microseconds at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationClock {
    ticks: u64,
    tick_us: u64,
    elapsed_us: u64,
    last_spawn_us: u64,
    spawn_interval_us: u64,
}

impl SimulationClock {
    #[must_use]
    pub fn new(cfg: &ClockConfig) -> Self {
        Self {
            ticks: 0,
            tick_us: 1_000_000 / u64::from(cfg.frame_rate.max(1)),
            elapsed_us: 0,
            last_spawn_us: 0,
            spawn_interval_us: cfg.spawn_interval_ms.saturating_mul(1000),
        }
    }

    /// Moves the clock one tick forward and returns the new tick number.
    pub fn advance(&mut self) -> u64 {
        self.ticks += 1;
        self.elapsed_us += self.tick_us;
        self.ticks
    }

    /// True once per elapsed spawn interval; restarts the interval when it fires.
    pub fn spawn_due(&mut self) -> bool {
        if self.elapsed_us - self.last_spawn_us > self.spawn_interval_us {
            self.last_spawn_us = self.elapsed_us;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_us / 1000
    }
}
