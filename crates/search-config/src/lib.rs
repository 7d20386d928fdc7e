//! Layered configuration loading for the hybrid retrieval pipeline
//! (spec.md §6).
//!
//! [`AppConfig::load`] resolves settings with the precedence: in-process
//! construction (simply build an `AppConfig` directly and skip `load`) >
//! environment variables (prefix `APP__`, `__`-nested) > a YAML file at
//! `SEARCH_CONFIG_PATH` (default `search_config.yaml`) > built-in defaults.
//! This generalizes the Python prototype's `config.py`
//! (`yaml.safe_load` + Pydantic validation) into the `config`-crate layered
//! provider idiom used across this retrieval pack.

mod embedding;
mod error;
mod reranker;
mod scout;

pub mod schema;

pub use embedding::{EmbeddingConfig, EmbeddingProvider};
pub use error::ConfigError;
pub use reranker::RerankerConfig;
pub use scout::ScoutSettings;

use std::env;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Default path searched when `SEARCH_CONFIG_PATH` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "search_config.yaml";

/// `APP__EMBEDDING__MODEL_NAME=...`-style environment variable prefix.
pub const ENV_PREFIX: &str = "APP";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub embedding: EmbeddingConfig,
    pub reranker: RerankerConfig,
    pub scout: ScoutSettings,
    pub database_uri: String,
    pub env: String,
}

impl AppConfig {
    /// Load configuration from the environment-variable and YAML-file
    /// layers, falling back to built-in defaults. Use this for process
    /// start-up; construct `AppConfig` directly (bypassing `load`
    /// entirely) when a caller wants to pin configuration in-process.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Same as [`AppConfig::load`], but with an explicit YAML path
    /// overriding `SEARCH_CONFIG_PATH`/the default.
    pub fn load_from(path_override: Option<&str>) -> Result<Self, ConfigError> {
        let path = path_override
            .map(str::to_string)
            .or_else(|| env::var("SEARCH_CONFIG_PATH").ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

        let built = Config::builder()
            .add_source(File::with_name(&path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        let config: AppConfig = built
            .try_deserialize()
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.embedding.validate()?;
        self.scout.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_when_no_file_and_no_env() {
        // SEARCH_CONFIG_PATH deliberately points at a path that cannot exist.
        let config = AppConfig::load_from(Some("/nonexistent/search_config.yaml")).unwrap();
        assert_eq!(config.embedding.context_length, 32_768);
        assert_eq!(config.scout.threshold, 0.4);
    }

    #[test]
    fn yaml_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "database_uri: /tmp/my-lancedb").unwrap();
        writeln!(file, "scout:").unwrap();
        writeln!(file, "  threshold: 0.6").unwrap();
        file.flush().unwrap();

        let path = file.path().with_extension("");
        let config = AppConfig::load_from(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.database_uri, "/tmp/my-lancedb");
        assert_eq!(config.scout.threshold, 0.6);
    }

    #[test]
    fn invalid_threshold_fails_validation() {
        let mut config = AppConfig::default();
        config.scout.threshold = 1.5;
        assert!(config.validate().is_err());
    }
}
