//! `embedding.*` configuration (spec.md §6).

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    Auto,
    Hf,
    Mock,
}

impl Default for EmbeddingProvider {
    fn default() -> Self {
        EmbeddingProvider::Auto
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProvider,
    pub model_name: String,
    pub context_length: usize,
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProvider::default(),
            model_name: "Alibaba-NLP/gte-Qwen2-7B-instruct".to_string(),
            context_length: 32_768,
            batch_size: 1,
        }
    }
}

impl EmbeddingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.context_length == 0 {
            return Err(ConfigError::Validation(
                "embedding.context_length must be positive".into(),
            ));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::Validation(
                "embedding.batch_size must be positive".into(),
            ));
        }
        Ok(())
    }
}
