//! `scout.*` configuration (spec.md §6).

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutSettings {
    pub threshold: f64,
    pub model_name: String,
}

impl Default for ScoutSettings {
    fn default() -> Self {
        Self {
            threshold: 0.4,
            model_name: "deterministic-substring-v1".to_string(),
        }
    }
}

impl ScoutSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::Validation(
                "scout.threshold must be within [0, 1]".into(),
            ));
        }
        Ok(())
    }
}
