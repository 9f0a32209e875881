use super::traits::ConfigSection;
use crate::error::{Result, TopogenError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub generations: usize,
    /// Survivors copied unchanged into every new population.
    pub selection_pool_size: usize,
    /// Chance that an offspring comes from mutation instead of crossover.
    pub mutate_portion: f64,
    /// Stop as soon as the best survivor reaches this score.
    pub target_fitness: Option<f64>,
    pub hall_of_fame_size: usize,
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 500,
            selection_pool_size: 20,
            mutate_portion: 0.5,
            target_fitness: None,
            hall_of_fame_size: 10,
            seed: None,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<()> {
        if self.selection_pool_size == 0 {
            return Err(TopogenError::Configuration(
                "Selection pool size must be positive".to_string(),
            ));
        }
        if self.population_size < self.selection_pool_size {
            return Err(TopogenError::Configuration(format!(
                "Population size {} is smaller than the selection pool of {}",
                self.population_size, self.selection_pool_size
            )));
        }
        if self.generations == 0 {
            return Err(TopogenError::Configuration(
                "Generations must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutate_portion) {
            return Err(TopogenError::Configuration(
                "Mutate portion must be between 0 and 1".to_string(),
            ));
        }
        if let Some(target) = self.target_fitness {
            if !target.is_finite() {
                return Err(TopogenError::Configuration(
                    "Target fitness must be finite".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EvolutionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_population_below_pool_rejected() {
        let config = EvolutionConfig {
            population_size: 5,
            selection_pool_size: 10,
            ..EvolutionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mutate_portion_range() {
        let config = EvolutionConfig {
            mutate_portion: 1.2,
            ..EvolutionConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
