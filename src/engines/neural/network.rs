//! Layered feed-forward network and its evaluation.

use super::snapshot::NetworkSnapshot;
use crate::error::{Result, TopogenError};
use rand::RngCore;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

pub(crate) fn gaussian(rng: &mut dyn RngCore) -> f64 {
    StandardNormal.sample(rng)
}

pub(crate) fn gaussian_weights(count: usize, rng: &mut dyn RngCore) -> Vec<f64> {
    (0..count).map(|_| gaussian(rng)).collect()
}

/// Logistic function. Saturates to exactly 0.0 or 1.0 once `|x|` passes
/// about 37, so outputs are only strictly inside (0, 1) for moderate sums.
#[inline]
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// A computing neuron: bias plus one weight per neuron of the previous layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Neuron {
    bias: f64,
    weights: Vec<f64>,
}

impl Neuron {
    pub fn new(bias: f64, weights: Vec<f64>) -> Self {
        Self { bias, weights }
    }

    /// Gaussian bias and weights.
    pub fn random(input_count: usize, rng: &mut dyn RngCore) -> Self {
        let weights = gaussian_weights(input_count, rng);
        Self {
            bias: gaussian(rng),
            weights,
        }
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn input_count(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    fn activate(&self, inputs: &[f64]) -> f64 {
        debug_assert_eq!(inputs.len(), self.weights.len());

        let sum = self
            .weights
            .iter()
            .zip(inputs)
            .fold(self.bias, |acc, (w, x)| acc + w * x);

        sigmoid(sum)
    }
}

/// A computing layer. Always holds at least one neuron.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    neurons: Vec<Neuron>,
}

impl Layer {
    pub(crate) fn from_neurons(neurons: Vec<Neuron>) -> Self {
        debug_assert!(!neurons.is_empty());
        Self { neurons }
    }

    fn random(neuron_count: usize, input_count: usize, rng: &mut dyn RngCore) -> Self {
        let neurons = (0..neuron_count)
            .map(|_| Neuron::random(input_count, rng))
            .collect();
        Self { neurons }
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn neuron_count(&self) -> usize {
        self.neurons.len()
    }

    pub fn input_count(&self) -> usize {
        self.neurons[0].input_count()
    }

    fn activate(&self, inputs: &[f64]) -> Vec<f64> {
        self.neurons.iter().map(|n| n.activate(inputs)).collect()
    }
}

/// Explicit bias and weight data for one computing layer.
///
/// Row `i` of `weights` belongs to the neuron with bias `biases[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub biases: Vec<f64>,
    pub weights: Vec<Vec<f64>>,
}

impl LayerSpec {
    pub fn new(biases: Vec<f64>, weights: Vec<Vec<f64>>) -> Self {
        Self { biases, weights }
    }
}

/// Feed-forward network genome.
///
/// Layer 0 is the input layer and only holds settable values. Every
/// computing layer `i` has neurons with exactly as many weights as layer
/// `i - 1` has neurons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "NetworkSnapshot", try_from = "NetworkSnapshot")]
pub struct NeuralNetwork {
    inputs: Vec<f64>,
    layers: Vec<Layer>,
    last_outputs: Vec<f64>,
}

impl NeuralNetwork {
    /// Build a network with Gaussian biases and weights.
    ///
    /// `layer_sizes[0]` is the number of inputs, the last entry the number of
    /// outputs.
    pub fn random(layer_sizes: &[usize], rng: &mut dyn RngCore) -> Result<Self> {
        if layer_sizes.len() < 2 {
            return Err(TopogenError::Configuration(format!(
                "Must be at least 2 layers: was {}",
                layer_sizes.len()
            )));
        }
        if let Some(position) = layer_sizes.iter().position(|&size| size == 0) {
            return Err(TopogenError::Configuration(format!(
                "Must have positive number of neurons in a layer; layer {} was 0",
                position
            )));
        }

        let layers = layer_sizes
            .windows(2)
            .map(|pair| Layer::random(pair[1], pair[0], rng))
            .collect();

        Ok(Self::assemble(vec![0.0; layer_sizes[0]], layers))
    }

    /// Build a network from explicit per-layer biases and weights.
    ///
    /// The input layer is given only by `num_inputs`; `layers` lists the
    /// computing layers in order.
    pub fn from_layers(num_inputs: usize, layers: Vec<LayerSpec>) -> Result<Self> {
        if num_inputs == 0 {
            return Err(TopogenError::Configuration(
                "Must have positive number of inputs".to_string(),
            ));
        }
        if layers.is_empty() {
            return Err(TopogenError::Configuration(
                "Must be at least 2 layers: was 1".to_string(),
            ));
        }

        let mut previous_count = num_inputs;
        let mut built = Vec::with_capacity(layers.len());

        for (offset, spec) in layers.into_iter().enumerate() {
            let layer_index = offset + 1;
            if spec.biases.is_empty() {
                return Err(TopogenError::Configuration(format!(
                    "Layer {} must have positive number of neurons",
                    layer_index
                )));
            }
            if spec.biases.len() != spec.weights.len() {
                return Err(TopogenError::Configuration(format!(
                    "Layer {} has {} biases but {} weight rows",
                    layer_index,
                    spec.biases.len(),
                    spec.weights.len()
                )));
            }
            if let Some(row) = spec.weights.iter().find(|row| row.len() != previous_count) {
                return Err(TopogenError::Configuration(format!(
                    "Layer {}: invalid number of weights: {}, expected {}",
                    layer_index,
                    row.len(),
                    previous_count
                )));
            }

            previous_count = spec.biases.len();
            let neurons = spec
                .biases
                .into_iter()
                .zip(spec.weights)
                .map(|(bias, weights)| Neuron::new(bias, weights))
                .collect();
            built.push(Layer::from_neurons(neurons));
        }

        Ok(Self::assemble(vec![0.0; num_inputs], built))
    }

    pub(crate) fn assemble(inputs: Vec<f64>, layers: Vec<Layer>) -> Self {
        let output_count = layers.last().map_or(0, Layer::neuron_count);
        Self {
            inputs,
            layers,
            last_outputs: vec![0.0; output_count],
        }
    }

    /// Number of layers including the input layer.
    pub fn layer_count(&self) -> usize {
        self.layers.len() + 1
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn output_count(&self) -> usize {
        self.layers.last().map_or(0, Layer::neuron_count)
    }

    /// Neuron count of `layer_index`, with 0 being the input layer.
    pub fn neuron_count(&self, layer_index: usize) -> Option<usize> {
        match layer_index {
            0 => Some(self.inputs.len()),
            i => self.layers.get(i - 1).map(Layer::neuron_count),
        }
    }

    /// Per-layer neuron counts, input layer first.
    pub fn shape(&self) -> Vec<usize> {
        std::iter::once(self.inputs.len())
            .chain(self.layers.iter().map(Layer::neuron_count))
            .collect()
    }

    /// Computing layer at `layer_index` (1-based, the input layer has no
    /// [`Layer`]).
    pub fn layer(&self, layer_index: usize) -> Option<&Layer> {
        layer_index.checked_sub(1).and_then(|i| self.layers.get(i))
    }

    pub fn computing_layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Values currently held by the input layer.
    pub fn inputs(&self) -> &[f64] {
        &self.inputs
    }

    pub fn set_inputs(&mut self, inputs: &[f64]) -> Result<()> {
        self.check_input_len(inputs)?;
        self.inputs.copy_from_slice(inputs);
        Ok(())
    }

    /// Total number of weights and biases.
    pub fn parameter_count(&self) -> usize {
        self.layers
            .iter()
            .flat_map(|layer| layer.neurons.iter())
            .map(|neuron| neuron.weights.len() + 1)
            .sum()
    }

    /// Outputs for `inputs` without touching the cached state.
    pub fn feed_forward(&self, inputs: &[f64]) -> Result<Vec<f64>> {
        self.check_input_len(inputs)?;

        let mut activation = inputs.to_vec();
        for layer in &self.layers {
            activation = layer.activate(&activation);
        }

        Ok(activation)
    }

    /// Load `inputs` into the input layer, run the network and remember the
    /// outputs.
    pub fn evaluate(&mut self, inputs: &[f64]) -> Result<Vec<f64>> {
        let outputs = self.feed_forward(inputs)?;
        self.inputs.copy_from_slice(inputs);
        self.last_outputs.copy_from_slice(&outputs);
        Ok(outputs)
    }

    /// Copy of the outputs of the last [`evaluate`](Self::evaluate) call.
    pub fn last_outputs(&self) -> Vec<f64> {
        self.last_outputs.clone()
    }

    pub fn snapshot(&self) -> NetworkSnapshot {
        NetworkSnapshot::from(self)
    }

    pub fn from_snapshot(snapshot: &NetworkSnapshot) -> Result<Self> {
        snapshot.validate()?;
        Ok(snapshot.restore_unchecked())
    }

    fn check_input_len(&self, inputs: &[f64]) -> Result<()> {
        if inputs.len() != self.inputs.len() {
            return Err(TopogenError::Input(format!(
                "Requires {} inputs, got {}",
                self.inputs.len(),
                inputs.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_sigmoid_saturates_without_overflow() {
        assert!(sigmoid(0.0) == 0.5);
        assert!(sigmoid(5.0) > 0.0 && sigmoid(5.0) < 1.0);
        assert_eq!(sigmoid(40.0), 1.0);
        assert_eq!(sigmoid(-800.0), 0.0);
        assert!(sigmoid(800.0).is_finite());
    }

    fn xor_network() -> NeuralNetwork {
        NeuralNetwork::from_layers(
            2,
            vec![
                LayerSpec::new(vec![-10.0, -10.0], vec![vec![10.0, -20.0], vec![-20.0, 10.0]]),
                LayerSpec::new(vec![-10.0], vec![vec![40.0, 40.0]]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_random_shape() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let net = NeuralNetwork::random(&[3, 5, 2], &mut rng).unwrap();

        assert_eq!(net.layer_count(), 3);
        assert_eq!(net.shape(), vec![3, 5, 2]);
        assert!(net.layer(1).unwrap().neurons().iter().all(|n| n.input_count() == 3));
        assert!(net.layer(2).unwrap().neurons().iter().all(|n| n.input_count() == 5));
        assert!(net.layer(0).is_none());
        assert_eq!(net.parameter_count(), 5 * 4 + 2 * 6);
    }

    #[test]
    fn test_random_rejects_single_layer() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        assert!(matches!(
            NeuralNetwork::random(&[3], &mut rng),
            Err(TopogenError::Configuration(_))
        ));
    }

    #[test]
    fn test_random_rejects_empty_layer() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        assert!(NeuralNetwork::random(&[3, 0, 2], &mut rng).is_err());
    }

    #[test]
    fn test_from_layers_rejects_bias_weight_mismatch() {
        let result = NeuralNetwork::from_layers(
            2,
            vec![LayerSpec::new(vec![0.0, 0.0], vec![vec![1.0, 1.0]])],
        );
        assert!(matches!(result, Err(TopogenError::Configuration(_))));
    }

    #[test]
    fn test_from_layers_rejects_wrong_row_length() {
        let result = NeuralNetwork::from_layers(
            2,
            vec![
                LayerSpec::new(vec![0.0], vec![vec![1.0, 1.0]]),
                LayerSpec::new(vec![0.0], vec![vec![1.0, 1.0]]),
            ],
        );
        assert!(matches!(result, Err(TopogenError::Configuration(_))));
    }

    #[test]
    fn test_xor_decision_boundary() {
        let mut net = xor_network();
        assert!(net.evaluate(&[0.0, 0.0]).unwrap()[0] < 0.01);
        assert!(net.evaluate(&[1.0, 1.0]).unwrap()[0] < 0.01);
        assert!(net.evaluate(&[0.0, 1.0]).unwrap()[0] > 0.99);
        assert!(net.evaluate(&[1.0, 0.0]).unwrap()[0] > 0.99);
    }

    #[test]
    fn test_wrong_input_length() {
        let mut net = xor_network();
        assert!(matches!(
            net.evaluate(&[1.0]),
            Err(TopogenError::Input(_))
        ));
        assert!(net.set_inputs(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_last_outputs_is_a_copy() {
        let mut net = xor_network();
        let outputs = net.evaluate(&[0.0, 1.0]).unwrap();

        let mut copy = net.last_outputs();
        assert_eq!(copy, outputs);
        copy[0] = -1.0;
        assert_eq!(net.last_outputs(), outputs);
    }

    #[test]
    fn test_evaluate_sets_inputs() {
        let mut net = xor_network();
        net.evaluate(&[1.0, 0.0]).unwrap();
        assert_eq!(net.inputs(), &[1.0, 0.0]);
    }
}
