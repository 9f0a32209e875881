//! Record form of a network, used as the working copy for structural edits
//! and as its serialised shape.

use super::network::{Layer, NeuralNetwork, Neuron};
use crate::error::{Result, TopogenError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeuronSnapshot {
    pub input_count: usize,
    pub bias: f64,
    pub input_weights: Vec<f64>,
}

impl NeuronSnapshot {
    pub fn new(bias: f64, input_weights: Vec<f64>) -> Self {
        Self {
            input_count: input_weights.len(),
            bias,
            input_weights,
        }
    }

    /// Input-layer slot carrying `value`.
    pub fn input(value: f64) -> Self {
        Self::new(value, Vec::new())
    }

    pub fn push_weight(&mut self, weight: f64) {
        self.input_weights.push(weight);
        self.input_count += 1;
    }

    pub fn remove_weight(&mut self, index: usize) -> f64 {
        self.input_count -= 1;
        self.input_weights.remove(index)
    }

    pub fn replace_weights(&mut self, weights: Vec<f64>) {
        self.input_count = weights.len();
        self.input_weights = weights;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerSnapshot {
    pub neuron_count: usize,
    pub neuron_data: Vec<NeuronSnapshot>,
}

impl LayerSnapshot {
    pub fn new(neuron_data: Vec<NeuronSnapshot>) -> Self {
        Self {
            neuron_count: neuron_data.len(),
            neuron_data,
        }
    }

    pub fn push_neuron(&mut self, neuron: NeuronSnapshot) {
        self.neuron_data.push(neuron);
        self.neuron_count += 1;
    }

    pub fn remove_neuron(&mut self, index: usize) -> NeuronSnapshot {
        self.neuron_count -= 1;
        self.neuron_data.remove(index)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSnapshot {
    pub layer_count: usize,
    pub layer_data: Vec<LayerSnapshot>,
}

impl NetworkSnapshot {
    pub fn new(layer_data: Vec<LayerSnapshot>) -> Self {
        Self {
            layer_count: layer_data.len(),
            layer_data,
        }
    }

    pub fn insert_layer(&mut self, index: usize, layer: LayerSnapshot) {
        self.layer_data.insert(index, layer);
        self.layer_count += 1;
    }

    pub fn remove_layer(&mut self, index: usize) -> LayerSnapshot {
        self.layer_count -= 1;
        self.layer_data.remove(index)
    }

    pub fn neuron_count(&self, layer_index: usize) -> usize {
        self.layer_data[layer_index].neuron_count
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the recorded counts and the dimensional invariants between
    /// adjacent layers.
    pub fn validate(&self) -> Result<()> {
        if self.layer_count != self.layer_data.len() {
            return Err(invalid(format!(
                "layerCount is {} but {} layers are present",
                self.layer_count,
                self.layer_data.len()
            )));
        }
        if self.layer_data.len() < 2 {
            return Err(invalid(format!(
                "Must be at least 2 layers: was {}",
                self.layer_data.len()
            )));
        }

        for (layer_index, layer) in self.layer_data.iter().enumerate() {
            if layer.neuron_count != layer.neuron_data.len() {
                return Err(invalid(format!(
                    "Layer {}: neuronCount is {} but {} neurons are present",
                    layer_index,
                    layer.neuron_count,
                    layer.neuron_data.len()
                )));
            }
            if layer.neuron_data.is_empty() {
                return Err(invalid(format!("Layer {} has no neurons", layer_index)));
            }

            let expected_inputs = match layer_index {
                0 => 0,
                i => self.layer_data[i - 1].neuron_count,
            };

            for (neuron_index, neuron) in layer.neuron_data.iter().enumerate() {
                if neuron.input_count != neuron.input_weights.len() {
                    return Err(invalid(format!(
                        "Layer {} neuron {}: inputCount is {} but {} weights are present",
                        layer_index,
                        neuron_index,
                        neuron.input_count,
                        neuron.input_weights.len()
                    )));
                }
                if neuron.input_count != expected_inputs {
                    return Err(invalid(format!(
                        "Layer {} neuron {}: has {} inputs, expected {}",
                        layer_index, neuron_index, neuron.input_count, expected_inputs
                    )));
                }
            }
        }

        Ok(())
    }

    /// Caller must have run [`validate`](Self::validate).
    pub(crate) fn restore_unchecked(&self) -> NeuralNetwork {
        let inputs = self.layer_data[0]
            .neuron_data
            .iter()
            .map(|neuron| neuron.bias)
            .collect();

        let layers = self.layer_data[1..]
            .iter()
            .map(|layer| {
                Layer::from_neurons(
                    layer
                        .neuron_data
                        .iter()
                        .map(|n| Neuron::new(n.bias, n.input_weights.clone()))
                        .collect(),
                )
            })
            .collect();

        NeuralNetwork::assemble(inputs, layers)
    }
}

fn invalid(message: String) -> TopogenError {
    TopogenError::Configuration(format!("Invalid network snapshot: {}", message))
}

impl From<&NeuralNetwork> for NetworkSnapshot {
    fn from(network: &NeuralNetwork) -> Self {
        let input_layer = LayerSnapshot::new(
            network
                .inputs()
                .iter()
                .map(|&value| NeuronSnapshot::input(value))
                .collect(),
        );

        let layer_data = std::iter::once(input_layer)
            .chain(network.computing_layers().iter().map(|layer| {
                LayerSnapshot::new(
                    layer
                        .neurons()
                        .iter()
                        .map(|n| NeuronSnapshot::new(n.bias(), n.weights().to_vec()))
                        .collect(),
                )
            }))
            .collect();

        NetworkSnapshot::new(layer_data)
    }
}

impl From<NeuralNetwork> for NetworkSnapshot {
    fn from(network: NeuralNetwork) -> Self {
        NetworkSnapshot::from(&network)
    }
}

impl TryFrom<NetworkSnapshot> for NeuralNetwork {
    type Error = TopogenError;

    fn try_from(snapshot: NetworkSnapshot) -> Result<Self> {
        NeuralNetwork::from_snapshot(&snapshot)
    }
}
