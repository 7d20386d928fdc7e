//! Error types for search-config.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The layered `config`-crate build/deserialize step failed.
    Load(String),
    /// A loaded value failed validation (e.g. `context_length <= 0`).
    Validation(String),
    /// Writing a newer row schema onto an older table (spec.md §6) — fatal,
    /// never a silent corruption.
    SchemaMigration(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Load(msg) => write!(f, "failed to load configuration: {}", msg),
            ConfigError::Validation(msg) => write!(f, "invalid configuration: {}", msg),
            ConfigError::SchemaMigration(msg) => write!(f, "schema migration error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
