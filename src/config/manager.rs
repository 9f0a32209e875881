use super::{
    evolution::EvolutionConfig, mutation::MutationConfig, network::NetworkConfig,
    traits::ConfigSection,
};
use crate::error::{Result, TopogenError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Prefix of environment overrides, e.g. `TOPOGEN__EVOLUTION__SEED=7`.
pub const ENV_PREFIX: &str = "TOPOGEN";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub mutation: MutationConfig,
    pub network: NetworkConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        validate_section(&self.evolution)?;
        validate_section(&self.mutation)?;
        validate_section(&self.network)?;
        Ok(())
    }
}

fn validate_section<S: ConfigSection>(section: &S) -> Result<()> {
    section.validate().map_err(|e| match e {
        TopogenError::Configuration(message) => {
            TopogenError::Configuration(format!("[{}] {}", S::section_name(), message))
        }
        other => other,
    })
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TopogenError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = toml::from_str(&contents)
            .map_err(|e| TopogenError::Configuration(format!("Failed to parse config: {}", e)))?;

        self.install(config, "file")
    }

    /// Load an optional TOML file and apply `TOPOGEN__SECTION__KEY`
    /// environment overrides on top. A missing file leaves the defaults.
    pub fn load_layered<P: AsRef<Path>>(&self, path: Option<P>) -> Result<()> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path.as_ref()).required(false));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("network.layer_sizes"),
        );

        let config: AppConfig = builder
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| TopogenError::Configuration(format!("Failed to load config: {}", e)))?;

        self.install(config, "layered")
    }

    /// Replace the held configuration if `config` validates.
    fn install(&self, config: AppConfig, source: &str) -> Result<()> {
        if let Err(e) = config.validate() {
            log::warn!("Rejected {} configuration: {}", source, e);
            return Err(e);
        }

        log::debug!("Loaded {} configuration: {:?}", source, config);
        *self.config.write().unwrap() = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config = self.config.read().unwrap();
        let toml_str = toml::to_string_pretty(&*config)
            .map_err(|e| TopogenError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| TopogenError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config.read().unwrap().clone()
    }

    /// Apply `f` to a copy and keep it only if it still validates.
    pub fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.config.write().unwrap();
        let mut candidate = config.clone();
        f(&mut candidate);
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }
}
