pub mod network;
pub mod snapshot;
pub mod mutator;
pub mod crossover;
pub mod operators;

pub use network::{Layer, LayerSpec, NeuralNetwork, Neuron};
pub use snapshot::{LayerSnapshot, NetworkSnapshot, NeuronSnapshot};
pub use mutator::{MutationKind, TopologyMutator};
pub use crossover::NetworkCrossover;
pub use operators::{random_population, NetworkOperators};
