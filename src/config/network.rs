use super::traits::ConfigSection;
use crate::error::{Result, TopogenError};
use serde::{Deserialize, Serialize};

/// Starting shape of every network in the initial population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub layer_sizes: Vec<usize>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            layer_sizes: vec![2, 3, 1],
        }
    }
}

impl ConfigSection for NetworkConfig {
    fn section_name() -> &'static str {
        "network"
    }

    fn validate(&self) -> Result<()> {
        if self.layer_sizes.len() < 2 {
            return Err(TopogenError::Configuration(format!(
                "Must be at least 2 layers: was {}",
                self.layer_sizes.len()
            )));
        }
        if self.layer_sizes.contains(&0) {
            return Err(TopogenError::Configuration(
                "Every layer needs at least one neuron".to_string(),
            ));
        }
        Ok(())
    }
}
