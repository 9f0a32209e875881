pub mod weighted_choice;
pub mod runner;
pub mod hall_of_fame;
pub mod evolution_engine;
pub mod progress;

pub use weighted_choice::{choose, WeightedChoice};
pub use runner::{FnOperators, GeneticRunner, GenomeOperators, StepOutcome};
pub use hall_of_fame::{EliteGenome, HallOfFame};
pub use evolution_engine::{EvolutionEngine, EvolutionOutcome, EvolutionSettings, ProgressCallback};
pub use progress::{ConsoleProgressCallback, SilentProgress};
