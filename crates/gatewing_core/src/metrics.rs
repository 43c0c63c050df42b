//! Run metrics and structured logging.
//!
//! Counters are atomics so a `Metrics` can be shared by reference with a
//! renderer or runner while a generation is stepped.

use gatewing_data::{DeathCause, TickReport};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub struct Metrics {
    tick_count: AtomicU64,
    alive_count: AtomicU64,
    boundary_deaths: AtomicU64,
    collision_deaths: AtomicU64,
    passes: AtomicU64,
    pub counters: Mutex<HashMap<String, AtomicU64>>,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            alive_count: AtomicU64::new(0),
            boundary_deaths: AtomicU64::new(0),
            collision_deaths: AtomicU64::new(0),
            passes: AtomicU64::new(0),
            counters: Mutex::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Folds one tick into the totals.
    pub fn record_tick(&self, report: &TickReport, duration: Duration) {
        self.tick_count.fetch_add(1, Ordering::Relaxed);
        self.alive_count
            .store(report.alive_count as u64, Ordering::Relaxed);
        self.boundary_deaths.fetch_add(
            report.deaths_by(DeathCause::Boundary) as u64,
            Ordering::Relaxed,
        );
        self.collision_deaths.fetch_add(
            report.deaths_by(DeathCause::Collision) as u64,
            Ordering::Relaxed,
        );
        self.passes
            .fetch_add(u64::from(report.passed), Ordering::Relaxed);

        // Log at info level every 1000 ticks
        let tick = self.tick_count.load(Ordering::Relaxed);
        if tick.is_multiple_of(1000) {
            tracing::info!(
                tick = tick,
                alive = report.alive_count,
                score = report.score,
                duration_us = duration.as_micros() as u64,
                "Simulation tick"
            );
        }
    }

    pub fn increment_counter(&self, name: &str) {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        let counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .get(name)
            .map_or(0, |c| c.load(Ordering::Relaxed))
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn alive_count(&self) -> u64 {
        self.alive_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn boundary_deaths(&self) -> u64 {
        self.boundary_deaths.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn collision_deaths(&self) -> u64 {
        self.collision_deaths.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn passes(&self) -> u64 {
        self.passes.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Initialize tracing subscriber for logging.
pub fn init_logging() {
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(tracing::Level::INFO)
            .finish(),
    )
    .ok();
}
