//! Reference decision function: a small fixed-topology feed-forward network.
//!
//! Three observation inputs feed one tanh hidden layer, which feeds a single
//! sigmoid output. Weights come from an injected RNG; nothing here trains or
//! mutates a network.

pub mod forward;
pub mod topology;

use crate::decision::DecisionFunction;
use gatewing_data::{Observation, OBSERVATION_SIZE};
use serde::{Deserialize, Serialize};

pub use topology::create_network_random_with_rng;

pub const NETWORK_INPUTS: usize = OBSERVATION_SIZE;
pub const DEFAULT_HIDDEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    /// `hidden x NETWORK_INPUTS`, row-major.
    pub input_weights: Vec<f64>,
    pub hidden_bias: Vec<f64>,
    pub output_weights: Vec<f64>,
    pub output_bias: f64,
}

impl Network {
    #[must_use]
    pub fn hidden_len(&self) -> usize {
        self.hidden_bias.len()
    }

    #[must_use]
    pub fn new_random_with_rng<R: rand::Rng>(rng: &mut R, hidden: usize) -> Self {
        topology::create_network_random_with_rng(rng, hidden)
    }

    /// Output in `(0, 1)`.
    #[must_use]
    pub fn forward(&self, inputs: [f64; NETWORK_INPUTS]) -> f64 {
        forward::forward(self, inputs)
    }
}

impl DecisionFunction for Network {
    fn activate(&mut self, observation: &Observation) -> anyhow::Result<f64> {
        Ok(self.forward(observation.to_array()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_network_as_decision_function() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut network = Network::new_random_with_rng(&mut rng, DEFAULT_HIDDEN);
        let obs = Observation {
            height: 350.0,
            gap_center_distance: 150.0,
            bottom_edge_distance: 50.0,
        };
        let out = network.activate(&obs).unwrap();
        assert!(out > 0.0 && out < 1.0);
        assert_eq!(out, network.forward(obs.to_array()));
    }

    #[test]
    fn test_network_serde_round_trip() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let network = Network::new_random_with_rng(&mut rng, 3);
        let json = serde_json::to_string(&network).unwrap();
        let back: Network = serde_json::from_str(&json).unwrap();
        assert_eq!(back.hidden_len(), 3);
        let drift = network
            .input_weights
            .iter()
            .zip(&back.input_weights)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        assert!(drift < 1e-12);
    }
}
