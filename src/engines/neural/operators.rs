use super::crossover::NetworkCrossover;
use super::mutator::TopologyMutator;
use super::network::NeuralNetwork;
use crate::config::MutationConfig;
use crate::engines::generation::runner::GenomeOperators;
use crate::error::Result;
use rand::RngCore;

/// Capability set for evolving [`NeuralNetwork`] genomes: a caller supplied
/// fitness function plus topology mutation and aligned crossover.
pub struct NetworkOperators<F> {
    fitness: F,
    mutator: TopologyMutator,
    crossover: NetworkCrossover,
}

impl<F> NetworkOperators<F>
where
    F: Fn(&NeuralNetwork) -> f64,
{
    pub fn new(fitness: F, mutator: TopologyMutator, crossover: NetworkCrossover) -> Self {
        Self {
            fitness,
            mutator,
            crossover,
        }
    }

    pub fn from_config(fitness: F, config: &MutationConfig) -> Result<Self> {
        Ok(Self::new(
            fitness,
            TopologyMutator::new(config)?,
            NetworkCrossover::new(config.crossover_mix_rate)?,
        ))
    }

    pub fn mutator(&self) -> &TopologyMutator {
        &self.mutator
    }

    pub fn crossover(&self) -> &NetworkCrossover {
        &self.crossover
    }
}

impl<F> GenomeOperators<NeuralNetwork> for NetworkOperators<F>
where
    F: Fn(&NeuralNetwork) -> f64,
{
    fn fitness(&self, genome: &NeuralNetwork) -> f64 {
        let score = (self.fitness)(genome);
        if score.is_nan() {
            log::warn!("Fitness function returned NaN for network {:?}", genome.shape());
        }
        score
    }

    fn mutate(&self, genome: &NeuralNetwork, rng: &mut dyn RngCore) -> Result<NeuralNetwork> {
        self.mutator.mutate(genome, rng)
    }

    fn crossover(
        &self,
        first: &NeuralNetwork,
        second: &NeuralNetwork,
        rng: &mut dyn RngCore,
    ) -> Result<NeuralNetwork> {
        self.crossover.cross(first, second, rng)
    }
}

/// `size` independently initialised networks of the given shape.
pub fn random_population(
    layer_sizes: &[usize],
    size: usize,
    rng: &mut dyn RngCore,
) -> Result<Vec<NeuralNetwork>> {
    (0..size)
        .map(|_| NeuralNetwork::random(layer_sizes, rng))
        .collect()
}
