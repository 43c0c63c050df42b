use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    /// Left the vertical play area.
    Boundary,
    /// Overlapped an obstacle segment.
    Collision,
}

/// An agent retired during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Death {
    pub origin: usize,
    pub cause: DeathCause,
    pub fitness: f64,
}

/// Why a generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndReason {
    /// Population was empty at the start; no tick ran.
    Empty,
    /// Every agent died.
    Extinct,
    /// `episode.max_ticks` reached.
    TickCap,
    /// `episode.score_cap` reached.
    ScoreCap,
}

/// Everything that happened in one tick.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    pub deaths: Vec<Death>,
    /// Obstacles whose `passed` flag flipped this tick.
    pub passed: u32,
    pub spawned: bool,
    pub score: u32,
    pub alive_count: usize,
    pub end: Option<EndReason>,
}

impl TickReport {
    #[must_use]
    pub fn deaths_by(&self, cause: DeathCause) -> usize {
        self.deaths.iter().filter(|d| d.cause == cause).count()
    }
}

/// Live view of a generation. Read-only once `finished` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub generation: u32,
    pub score: u32,
    pub alive_count: usize,
    pub ticks: u64,
    pub finished: Option<EndReason>,
}

/// Final result of a generation, consumed by an external optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOutcome {
    pub generation: u32,
    pub score: u32,
    pub ticks: u64,
    pub end: EndReason,
    /// Final fitness indexed by submission order, including agents removed early.
    pub fitness: Vec<f64>,
    /// Fingerprint of the ruleset the generation ran under.
    pub config_fingerprint: String,
}

impl GenerationOutcome {
    /// Index and fitness of the best agent, first one wins ties.
    #[must_use]
    pub fn best(&self) -> Option<(usize, f64)> {
        self.fitness
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (i, f)| match best {
                Some((_, b)) if b >= f => best,
                _ => Some((i, f)),
            })
    }

    #[must_use]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(fitness: Vec<f64>) -> GenerationOutcome {
        GenerationOutcome {
            generation: 1,
            score: 0,
            ticks: 10,
            end: EndReason::Extinct,
            fitness,
            config_fingerprint: String::new(),
        }
    }

    #[test]
    fn test_best_prefers_first_on_ties() {
        assert_eq!(outcome(vec![1.0, 3.0, 3.0]).best(), Some((1, 3.0)));
        assert_eq!(outcome(vec![]).best(), None);
    }

    #[test]
    fn test_outcome_json_round_trip() {
        let out = outcome(vec![-1.0, 2.5]);
        let json = out.to_json().unwrap();
        let back: GenerationOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back, out);
    }

    #[test]
    fn test_deaths_by_cause() {
        let report = TickReport {
            deaths: vec![
                Death {
                    origin: 0,
                    cause: DeathCause::Boundary,
                    fitness: -1.0,
                },
                Death {
                    origin: 2,
                    cause: DeathCause::Collision,
                    fitness: -0.5,
                },
            ],
            ..Default::default()
        };
        assert_eq!(report.deaths_by(DeathCause::Boundary), 1);
        assert_eq!(report.deaths_by(DeathCause::Collision), 1);
    }
}
