use std::path::PathBuf;
use topogen::config::{AppConfig, ConfigManager, LayerJoinPolicy};
use topogen::TopogenError;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("topogen-{}-{}", std::process::id(), name))
}

#[test]
fn test_save_and_load_round_trip() {
    let path = temp_path("round_trip.toml");
    let manager = ConfigManager::new();
    manager
        .update(|c| {
            c.evolution.seed = Some(7);
            c.mutation.layer_join_policy = LayerJoinPolicy::Reinitialize;
            c.network.layer_sizes = vec![4, 6, 2];
        })
        .unwrap();
    manager.save_to_file(&path).unwrap();

    let loaded = ConfigManager::new();
    loaded.load_from_file(&path).unwrap();
    assert_eq!(loaded.get(), manager.get());

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_invalid_file_rejected() {
    let path = temp_path("invalid.toml");
    std::fs::write(&path, "[evolution]\npopulation_size = 3\nselection_pool_size = 5\n").unwrap();

    let manager = ConfigManager::new();
    let result = manager.load_from_file(&path);
    assert!(matches!(result, Err(TopogenError::Configuration(_))));
    assert_eq!(manager.get(), AppConfig::default());

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_missing_file_reports_error() {
    let manager = ConfigManager::new();
    assert!(manager.load_from_file(temp_path("does-not-exist.toml")).is_err());
}

#[test]
fn test_layered_file_and_environment() {
    let path = temp_path("layered.toml");
    std::fs::write(
        &path,
        "[evolution]\npopulation_size = 40\ngenerations = 12\n\n[mutation]\nmax_mutations = 6\n",
    )
    .unwrap();

    std::env::set_var("TOPOGEN__EVOLUTION__POPULATION_SIZE", "64");
    std::env::set_var("TOPOGEN__MUTATION__LAYER_JOIN_POLICY", "reinitialize");
    std::env::set_var("TOPOGEN__NETWORK__LAYER_SIZES", "3,4,1");

    let manager = ConfigManager::new();
    let result = manager.load_layered(Some(&path));

    std::env::remove_var("TOPOGEN__EVOLUTION__POPULATION_SIZE");
    std::env::remove_var("TOPOGEN__MUTATION__LAYER_JOIN_POLICY");
    std::env::remove_var("TOPOGEN__NETWORK__LAYER_SIZES");
    std::fs::remove_file(&path).ok();

    result.unwrap();
    let config = manager.get();
    assert_eq!(config.evolution.population_size, 64);
    assert_eq!(config.evolution.generations, 12);
    assert_eq!(config.mutation.max_mutations, 6);
    assert_eq!(config.mutation.layer_join_policy, LayerJoinPolicy::Reinitialize);
    assert_eq!(config.network.layer_sizes, vec![3, 4, 1]);
    assert_eq!(config.mutation.new_layer_max_neurons, 4);
}

#[test]
fn test_layered_without_file_uses_defaults() {
    let manager = ConfigManager::new();
    manager
        .load_layered(Some(temp_path("absent.toml")))
        .unwrap();

    let config = manager.get();
    assert_eq!(config.evolution.generations, 500);
    assert_eq!(config.mutation.max_mutations, 10);
}
