//! The capability that turns an observation into an action signal.
//!
//! The core never looks inside a decision function. Whatever it returns is
//! compared against the jump threshold; errors are handed back to the
//! caller untouched.

use gatewing_data::Observation;

pub trait DecisionFunction: Send {
    /// Scalar action signal; values above the jump threshold mean "jump".
    fn activate(&mut self, observation: &Observation) -> anyhow::Result<f64>;
}

impl<F> DecisionFunction for F
where
    F: FnMut(&Observation) -> f64 + Send,
{
    fn activate(&mut self, observation: &Observation) -> anyhow::Result<f64> {
        Ok(self(observation))
    }
}

/// Boxes a decision function for a population.
pub fn boxed<D: DecisionFunction + 'static>(decider: D) -> Box<dyn DecisionFunction> {
    Box::new(decider)
}

/// Ready-made decision functions for headless runs and tests.
pub mod policies {
    use gatewing_data::Observation;

    /// Never jumps.
    pub fn glide(_: &Observation) -> f64 {
        0.0
    }

    /// Jumps every tick.
    pub fn flap(_: &Observation) -> f64 {
        1.0
    }

    /// Jumps whenever the agent sinks below `offset` under the gap center of
    /// the obstacle ahead, or below `fallback` when there is none.
    pub fn hover(
        vertical_gap: f64,
        offset: f64,
        fallback: f64,
    ) -> impl FnMut(&Observation) -> f64 + Send {
        move |obs| {
            let target = obs
                .gap_center(vertical_gap)
                .map_or(fallback, |center| center + offset);
            if obs.height > target {
                1.0
            } else {
                0.0
            }
        }
    }
}
