pub mod traits;
pub mod evolution;
pub mod mutation;
pub mod network;
pub mod manager;

pub use manager::{AppConfig, ConfigManager};
pub use evolution::EvolutionConfig;
pub use mutation::{LayerJoinPolicy, MutationConfig, MutationWeights};
pub use network::NetworkConfig;
pub use traits::ConfigSection;
