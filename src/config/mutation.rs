use super::traits::ConfigSection;
use crate::error::{Result, TopogenError};
use serde::{Deserialize, Serialize};

/// How the layer after a removed layer is reconnected to the layer before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerJoinPolicy {
    /// Keep the leading weights and pad with fresh Gaussian weights.
    #[default]
    TruncateOrExtend,
    /// Replace every weight vector of the successor.
    Reinitialize,
}

/// Relative odds of each mutation category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationWeights {
    pub adjust_weight: f64,
    pub add_neuron: f64,
    pub remove_neuron: f64,
    pub add_layer: f64,
    pub remove_layer: f64,
}

impl Default for MutationWeights {
    fn default() -> Self {
        Self {
            adjust_weight: 600.0,
            add_neuron: 200.0,
            remove_neuron: 50.0,
            add_layer: 100.0,
            remove_layer: 20.0,
        }
    }
}

impl MutationWeights {
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.adjust_weight,
            self.add_neuron,
            self.remove_neuron,
            self.add_layer,
            self.remove_layer,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    /// Exclusive upper bound of edits per mutation call.
    pub max_mutations: usize,
    pub adjust_weight_max_percent: f64,
    pub new_layer_min_neurons: usize,
    pub new_layer_max_neurons: usize,
    pub layer_join_policy: LayerJoinPolicy,
    pub crossover_mix_rate: f64,
    pub weights: MutationWeights,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            max_mutations: 10,
            adjust_weight_max_percent: 0.4,
            new_layer_min_neurons: 1,
            new_layer_max_neurons: 4,
            layer_join_policy: LayerJoinPolicy::default(),
            crossover_mix_rate: 0.5,
            weights: MutationWeights::default(),
        }
    }
}

impl ConfigSection for MutationConfig {
    fn section_name() -> &'static str {
        "mutation"
    }

    fn validate(&self) -> Result<()> {
        if self.max_mutations == 0 {
            return Err(TopogenError::Configuration(
                "Max mutations must be positive".to_string(),
            ));
        }
        for weight in self.weights.as_array() {
            if !(weight > 0.0) || !weight.is_finite() {
                return Err(TopogenError::Configuration(format!(
                    "Mutation weights must be positive and finite, found {}",
                    weight
                )));
            }
        }
        if !(self.adjust_weight_max_percent >= 0.0) || !self.adjust_weight_max_percent.is_finite()
        {
            return Err(TopogenError::Configuration(
                "Adjust weight max percent must be a non-negative number".to_string(),
            ));
        }
        if self.new_layer_min_neurons == 0 {
            return Err(TopogenError::Configuration(
                "New layers need at least one neuron".to_string(),
            ));
        }
        if self.new_layer_min_neurons > self.new_layer_max_neurons {
            return Err(TopogenError::Configuration(format!(
                "New layer neuron range is empty: {}..={}",
                self.new_layer_min_neurons, self.new_layer_max_neurons
            )));
        }
        if !(0.0..=1.0).contains(&self.crossover_mix_rate) {
            return Err(TopogenError::Configuration(
                "Crossover mix rate must be between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }
}
