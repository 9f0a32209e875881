//! Crossover between two networks of possibly different shape.

use super::network::NeuralNetwork;
use crate::error::{Result, TopogenError};
use rand::{Rng, RngCore};

/// Uniform crossover aligned on the first parent's topology.
///
/// The child copies the first parent's structure. Every bias and weight whose
/// position (layer, neuron, input) also exists in the second parent is taken
/// from the second parent with probability `mix_rate`.
#[derive(Debug, Clone, Copy)]
pub struct NetworkCrossover {
    mix_rate: f64,
}

impl Default for NetworkCrossover {
    fn default() -> Self {
        Self { mix_rate: 0.5 }
    }
}

impl NetworkCrossover {
    pub fn new(mix_rate: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&mix_rate) {
            return Err(TopogenError::Configuration(format!(
                "Crossover mix rate must be between 0 and 1, was {}",
                mix_rate
            )));
        }
        Ok(Self { mix_rate })
    }

    pub fn mix_rate(&self) -> f64 {
        self.mix_rate
    }

    pub fn cross(
        &self,
        first: &NeuralNetwork,
        second: &NeuralNetwork,
        rng: &mut dyn RngCore,
    ) -> Result<NeuralNetwork> {
        let mut child = first.snapshot();
        let donor = second.snapshot();

        // Layer 0 only carries input values, nothing to inherit
        for (child_layer, donor_layer) in child
            .layer_data
            .iter_mut()
            .zip(&donor.layer_data)
            .skip(1)
        {
            for (neuron, donor_neuron) in child_layer
                .neuron_data
                .iter_mut()
                .zip(&donor_layer.neuron_data)
            {
                if rng.gen::<f64>() < self.mix_rate {
                    neuron.bias = donor_neuron.bias;
                }
                for (weight, donor_weight) in neuron
                    .input_weights
                    .iter_mut()
                    .zip(&donor_neuron.input_weights)
                {
                    if rng.gen::<f64>() < self.mix_rate {
                        *weight = *donor_weight;
                    }
                }
            }
        }

        NeuralNetwork::try_from(child)
    }
}
