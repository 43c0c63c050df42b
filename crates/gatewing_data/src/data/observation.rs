use serde::{Deserialize, Serialize};

/// Number of values a decision function receives per tick.
pub const OBSERVATION_SIZE: usize = 3;

/// What an agent sees of the obstacle it is approaching.
///
/// Both distances are absolute vertical distances from the agent's `y`.
/// When no obstacle is active they are `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Observation {
    pub height: f64,
    pub gap_center_distance: f64,
    pub bottom_edge_distance: f64,
}

impl Observation {
    #[must_use]
    pub fn to_array(&self) -> [f64; OBSERVATION_SIZE] {
        [
            self.height,
            self.gap_center_distance,
            self.bottom_edge_distance,
        ]
    }

    /// Recovers the gap center from the two distances.
    ///
    /// The gap spans `gap_center..gap_center + vertical_gap`; when the agent
    /// sits above it the bottom edge is exactly `vertical_gap` further away
    /// than the gap center.
    #[must_use]
    pub fn gap_center(&self, vertical_gap: f64) -> Option<f64> {
        if self.gap_center_distance == 0.0 && self.bottom_edge_distance == 0.0 {
            return None;
        }
        if self.bottom_edge_distance >= self.gap_center_distance + vertical_gap {
            Some(self.height + self.gap_center_distance)
        } else {
            Some(self.height - self.gap_center_distance)
        }
    }
}

impl From<Observation> for [f64; OBSERVATION_SIZE] {
    fn from(obs: Observation) -> Self {
        obs.to_array()
    }
}
