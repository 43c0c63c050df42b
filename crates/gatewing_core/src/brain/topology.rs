use super::{Network, NETWORK_INPUTS};
use rand::Rng;

pub fn create_network_random_with_rng<R: Rng>(rng: &mut R, hidden: usize) -> Network {
    let hidden = hidden.max(1);
    Network {
        input_weights: (0..hidden * NETWORK_INPUTS)
            .map(|_| rng.gen_range(-1.0..1.0))
            .collect(),
        hidden_bias: (0..hidden).map(|_| rng.gen_range(-1.0..1.0)).collect(),
        output_weights: (0..hidden).map(|_| rng.gen_range(-1.0..1.0)).collect(),
        output_bias: rng.gen_range(-1.0..1.0),
    }
}
