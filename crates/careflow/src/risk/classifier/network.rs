//! Dense feed-forward network with ReLU hidden layers and a softmax head.

use rand::rngs::StdRng;
use rand::Rng;

#[derive(Debug, Clone)]
struct Dense {
    inputs: usize,
    outputs: usize,
    /// Row-major `outputs x inputs`.
    weights: Vec<f32>,
    biases: Vec<f32>,
}

impl Dense {
    fn new(inputs: usize, outputs: usize, rng: &mut StdRng) -> Self {
        let limit = (6.0 / inputs as f32).sqrt();
        let weights = (0..inputs * outputs)
            .map(|_| rng.gen_range(-limit..limit))
            .collect();
        Self {
            inputs,
            outputs,
            weights,
            biases: vec![0.0; outputs],
        }
    }

    fn affine(&self, input: &[f32]) -> Vec<f32> {
        (0..self.outputs)
            .map(|row| {
                let weights = &self.weights[row * self.inputs..(row + 1) * self.inputs];
                weights
                    .iter()
                    .zip(input)
                    .fold(self.biases[row], |acc, (weight, value)| acc + weight * value)
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Dense>,
}

impl Network {
    /// `sizes` lists every layer width including input and output.
    pub fn new(sizes: &[usize], rng: &mut StdRng) -> Self {
        let layers = sizes
            .windows(2)
            .map(|pair| Dense::new(pair[0], pair[1], rng))
            .collect();
        Self { layers }
    }

    /// Activations of every layer, input first, softmax probabilities last.
    fn trace(&self, input: &[f32]) -> Vec<Vec<f32>> {
        let mut activations = Vec::with_capacity(self.layers.len() + 1);
        activations.push(input.to_vec());

        for (index, layer) in self.layers.iter().enumerate() {
            let previous = activations.last().map(Vec::as_slice).unwrap_or(input);
            let mut output = layer.affine(previous);
            if index + 1 == self.layers.len() {
                softmax(&mut output);
            } else {
                output.iter_mut().for_each(|value| *value = value.max(0.0));
            }
            activations.push(output);
        }

        activations
    }

    pub fn predict(&self, input: &[f32]) -> Vec<f32> {
        self.trace(input).pop().unwrap_or_default()
    }

    /// One SGD step on a single labelled sample. Returns the cross-entropy loss
    /// measured before the update.
    pub fn train_step(&mut self, input: &[f32], target: usize, learning_rate: f32) -> f32 {
        let activations = self.trace(input);
        let probabilities = &activations[activations.len() - 1];
        let loss = -probabilities
            .get(target)
            .copied()
            .unwrap_or(0.0)
            .max(1e-7)
            .ln();

        // Softmax + cross-entropy gradient w.r.t. the logits.
        let mut delta: Vec<f32> = probabilities
            .iter()
            .enumerate()
            .map(|(class, p)| if class == target { p - 1.0 } else { *p })
            .collect();

        for index in (0..self.layers.len()).rev() {
            let layer_input = &activations[index];
            let layer = &mut self.layers[index];

            let propagated = if index > 0 {
                let mut upstream = vec![0.0; layer.inputs];
                for (row, gradient) in delta.iter().enumerate() {
                    let weights = &layer.weights[row * layer.inputs..(row + 1) * layer.inputs];
                    for (slot, weight) in upstream.iter_mut().zip(weights) {
                        *slot += weight * gradient;
                    }
                }
                // ReLU derivative on the previous layer's activations.
                for (slot, activation) in upstream.iter_mut().zip(layer_input) {
                    if *activation <= 0.0 {
                        *slot = 0.0;
                    }
                }
                Some(upstream)
            } else {
                None
            };

            for (row, gradient) in delta.iter().enumerate() {
                let offset = row * layer.inputs;
                for (column, value) in layer_input.iter().enumerate() {
                    layer.weights[offset + column] -= learning_rate * gradient * value;
                }
                layer.biases[row] -= learning_rate * gradient;
            }

            match propagated {
                Some(upstream) => delta = upstream,
                None => break,
            }
        }

        loss
    }
}

fn softmax(values: &mut [f32]) {
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mut sum = 0.0;
    for value in values.iter_mut() {
        *value = (*value - max).exp();
        sum += *value;
    }
    if sum > 0.0 {
        values.iter_mut().for_each(|value| *value /= sum);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn predictions_form_a_probability_distribution() {
        let mut rng = StdRng::seed_from_u64(3);
        let network = Network::new(&[4, 8, 6, 5, 3], &mut rng);
        let probabilities = network.predict(&[0.2, 0.9, 0.0, 1.0]);

        assert_eq!(probabilities.len(), 3);
        let total: f32 = probabilities.iter().sum();
        assert!((total - 1.0).abs() < 1e-5);
        assert!(probabilities.iter().all(|p| *p >= 0.0));
    }

    #[test]
    fn training_steps_reduce_loss_on_a_separable_pair() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut network = Network::new(&[2, 8, 8, 4, 3], &mut rng);
        let samples = [([1.0, 0.0], 0usize), ([0.0, 1.0], 2usize)];

        let initial: f32 = samples
            .iter()
            .map(|(input, target)| -network.predict(input)[*target].max(1e-7).ln())
            .sum();
        for _ in 0..200 {
            for (input, target) in &samples {
                network.train_step(input, *target, 0.05);
            }
        }
        let trained: f32 = samples
            .iter()
            .map(|(input, target)| -network.predict(input)[*target].max(1e-7).ln())
            .sum();

        assert!(trained < initial, "loss {trained} did not improve on {initial}");
    }
}
