use super::{Network, NETWORK_INPUTS};

#[inline]
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

pub fn forward(network: &Network, inputs: [f64; NETWORK_INPUTS]) -> f64 {
    let mut sum = network.output_bias;
    for (h, bias) in network.hidden_bias.iter().enumerate() {
        let row = &network.input_weights[h * NETWORK_INPUTS..(h + 1) * NETWORK_INPUTS];
        let pre: f64 = row
            .iter()
            .zip(inputs.iter())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + bias;
        sum += network.output_weights[h] * pre.tanh();
    }
    sigmoid(sum)
}
